//! Raw outcome of a single API call.
//!
//! The transport does not judge status codes. A [`RawResponse`] carries the
//! status, headers and body so that the resource layer can decide what a 201,
//! 204 or 404 means for the operation it performed.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The status, headers and body of a completed HTTP exchange.
///
/// # Examples
///
/// ```
/// # use moneybird::RawResponse;
/// # use http::{HeaderMap, StatusCode};
/// # use std::time::Duration;
/// let response = RawResponse::new(
///     StatusCode::CREATED,
///     HeaderMap::new(),
///     "{\"id\":\"1\"}".into(),
///     Duration::from_millis(12),
/// );
///
/// assert!(response.is(StatusCode::CREATED));
/// let value: serde_json::Value = response.json().unwrap();
/// assert_eq!(value["id"], "1");
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body.
    pub body: Bytes,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl RawResponse {
    /// Creates a new `RawResponse`.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, latency: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            latency,
        }
    }

    /// Returns `true` if the status equals `expected`.
    pub fn is(&self, expected: StatusCode) -> bool {
        self.status == expected
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DeserializationFailed`] with the raw body and
    /// status attached if the body does not match `T`.
    pub fn json<T>(&self) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body).map_err(|e| {
            let raw_response = self.text();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                "Failed to deserialize response"
            );
            crate::Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Converts a status mismatch into [`crate::Error::UnexpectedStatus`].
    pub(crate) fn into_unexpected(self) -> crate::Error {
        crate::Error::UnexpectedStatus {
            status: self.status,
            raw_response: self.text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn response(status: StatusCode, body: &'static str) -> RawResponse {
        RawResponse::new(status, HeaderMap::new(), Bytes::from_static(body.as_bytes()), Duration::ZERO)
    }

    #[test]
    fn test_json_failure_keeps_raw_body() {
        let result = response(StatusCode::OK, "not json").json::<serde_json::Value>();
        match result {
            Err(crate::Error::DeserializationFailed {
                raw_response,
                status,
                ..
            }) => {
                assert_eq!(raw_response, "not json");
                assert_eq!(status, StatusCode::OK);
            }
            other => panic!("Expected DeserializationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_into_unexpected() {
        let err = response(StatusCode::CONFLICT, "busy").into_unexpected();
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.raw_response(), Some("busy"));
    }

    #[test]
    fn test_header_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let response = RawResponse::new(StatusCode::OK, headers, Bytes::new(), Duration::ZERO);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
