//! Error types for Moneybird API calls.
//!
//! Transport failures, configuration problems and resource-level status
//! mismatches each get their own variant. Variants that originate from a
//! received response keep the raw body so callers can inspect what the API
//! actually said.

use http::StatusCode;
use std::fmt;

/// The main error type for Moneybird API calls.
///
/// # Examples
///
/// ```no_run
/// use moneybird::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let mut client = Client::builder()
///     .access_token("token")
///     .administration_id("123")
///     .build()?;
///
/// match client.contacts().get("42").await {
///     Ok(contact) => println!("Found: {:?}", contact.company_name),
///     Err(Error::NotFound { resource, id }) => eprintln!("No {} with id {}", resource, id),
///     Err(Error::UnexpectedStatus { status, raw_response }) => {
///         eprintln!("HTTP {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client was used without the configuration a call needs, such as
    /// a missing access token or administration id.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP client could not be initialised on this platform.
    ///
    /// Returned only from [`crate::ClientBuilder::build`].
    #[error("Incompatible platform: {0}")]
    IncompatiblePlatform(String),

    /// The exchange failed below HTTP (DNS, connect, TLS, timeout, truncated body).
    ///
    /// The connection handle is released before this error is returned.
    #[error("Unable to communicate with Moneybird ({code}): {message}")]
    Transport {
        /// Classification of the underlying failure
        code: TransportFailure,
        /// The underlying error message
        message: String,
    },

    /// The API answered 404 for a single entity.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The resource path, e.g. `contacts`
        resource: String,
        /// The requested id
        id: String,
    },

    /// The API answered with a status other than the one the operation expects.
    #[error("Unexpected HTTP status {status}: {raw_response}")]
    UnexpectedStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// Failed to deserialize the response body into the expected entity.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the request entity.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The assembled request URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An entity id that cannot be used as a single URL path segment.
    #[error("Invalid entity id: {0:?}")]
    InvalidId(String),

    /// A resource name outside the set this client knows about.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

/// Classification of a transport-level failure, derived from the
/// underlying `reqwest::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The per-call timeout elapsed.
    Timeout,
    /// DNS resolution, TCP connect or TLS handshake failed.
    Connect,
    /// The request could not be sent.
    Request,
    /// The response body could not be read.
    Body,
    /// The response could not be decoded.
    Decode,
    /// The redirect policy rejected the response.
    Redirect,
    /// The request could not be built.
    Builder,
    /// Anything else.
    Other,
}

impl TransportFailure {
    /// Classifies a `reqwest::Error`. Timeouts take precedence over connect
    /// failures since a connect that times out reports both.
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_connect() {
            TransportFailure::Connect
        } else if error.is_builder() {
            TransportFailure::Builder
        } else if error.is_redirect() {
            TransportFailure::Redirect
        } else if error.is_body() {
            TransportFailure::Body
        } else if error.is_decode() {
            TransportFailure::Decode
        } else if error.is_request() {
            TransportFailure::Request
        } else {
            TransportFailure::Other
        }
    }

    /// Short machine-friendly name of the failure.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::Connect => "connect",
            TransportFailure::Request => "request",
            TransportFailure::Body => "body",
            TransportFailure::Decode => "decode",
            TransportFailure::Redirect => "redirect",
            TransportFailure::Builder => "builder",
            TransportFailure::Other => "other",
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport {
            code: TransportFailure::classify(&error),
            message: error.to_string(),
        }
    }
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    ///
    /// Returns `Some(status)` for `UnexpectedStatus` and `DeserializationFailed`,
    /// `Some(404)` for `NotFound`, and `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneybird::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::UnexpectedStatus {
    ///     status: StatusCode::UNPROCESSABLE_ENTITY,
    ///     raw_response: "{\"error\":\"invalid\"}".to_string(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    ///
    /// let err = Error::ConfigurationError("access token not set".to_string());
    /// assert_eq!(err.status(), None);
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::UnexpectedStatus { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` if the request failed before any HTTP response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// A specialized `Result` type for Moneybird API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_embeds_code() {
        let err = Error::Transport {
            code: TransportFailure::Timeout,
            message: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to communicate with Moneybird (timeout): operation timed out"
        );
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_not_found_reports_404() {
        let err = Error::NotFound {
            resource: "contacts".to_string(),
            id: "7".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.raw_response(), None);
        assert_eq!(err.to_string(), "contacts with id 7 not found");
    }

    #[test]
    fn test_raw_response_accessor() {
        let err = Error::DeserializationFailed {
            raw_response: "nope".to_string(),
            serde_error: "expected value".to_string(),
            status: StatusCode::OK,
        };
        assert_eq!(err.raw_response(), Some("nope"));
        assert_eq!(err.status(), Some(StatusCode::OK));
    }
}
