//! The authenticated HTTP transport shared by every resource.
//!
//! [`Transport`] turns a [`RequestDescriptor`] into one HTTPS call against the
//! administration-scoped API and hands back the [`RawResponse`] without
//! interpreting its status. It owns the connection handle: the handle is
//! released when a call fails at the transport level, reopened on the next
//! call, and released for good when the transport is dropped.

use crate::{
    content_type::content_type_for, platform, Error, RawResponse, RequestDescriptor, Result,
    API_EXTENSION, API_VERSION,
};
use http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, StatusCode,
};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// Per-call timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The access token and administration a transport acts for.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
    administration_id: String,
}

impl Credentials {
    /// Creates credentials. Surrounding whitespace is trimmed from the token.
    pub fn new(access_token: impl AsRef<str>, administration_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.as_ref().trim().to_string(),
            administration_id: administration_id.into(),
        }
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The administration all paths are scoped to.
    pub fn administration_id(&self) -> &str {
        &self.administration_id
    }

    fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::ConfigurationError(
                "access token not set; use ClientBuilder::access_token".to_string(),
            ));
        }
        if self.administration_id.is_empty() {
            return Err(Error::ConfigurationError(
                "administration id not set; use ClientBuilder::administration_id".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("administration_id", &self.administration_id)
            .finish()
    }
}

/// Settings a [`Transport`] is created with.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API root, e.g. `https://moneybird.com/api`.
    pub endpoint: Url,
    /// Token and administration.
    pub credentials: Credentials,
    /// Per-call timeout.
    pub timeout: Duration,
}

/// Builds the full URL for a request.
///
/// The shape is `<endpoint>/<version>/<administration>/<path>[.json]<query>`.
/// A leading `/` on the resource path is ignored.
/// In raw path mode the `.json` extension is left out and the query string,
/// which may then carry extra path segments, is appended as is.
///
/// # Examples
///
/// ```
/// use moneybird::{transport::build_url, RequestDescriptor};
/// use http::Method;
/// use url::Url;
///
/// let endpoint = Url::parse("https://moneybird.com/api").unwrap();
/// let request = RequestDescriptor::new(Method::GET, "contacts").with_query("?query=acme");
/// let url = build_url(&endpoint, "123", &request).unwrap();
/// assert_eq!(url.as_str(), "https://moneybird.com/api/v2/123/contacts.json?query=acme");
/// ```
pub fn build_url(endpoint: &Url, administration_id: &str, request: &RequestDescriptor) -> Result<Url> {
    let extension = if request.raw_path { "" } else { API_EXTENSION };
    let url = format!(
        "{}/{}/{}/{}{}{}",
        endpoint.as_str().trim_end_matches('/'),
        API_VERSION,
        administration_id,
        request.resource_path.trim_start_matches('/'),
        extension,
        request.query
    );
    Ok(Url::parse(&url)?)
}

/// Executes authenticated calls against the API.
///
/// Methods take `&mut self`: one transport serves one sequential flow of
/// calls. Use separate transports (separate [`crate::Client`]s) for
/// parallel work.
pub struct Transport {
    config: TransportConfig,
    handle: Option<reqwest::Client>,
    last_status: Option<StatusCode>,
}

impl Transport {
    /// Creates a transport around an already opened connection handle.
    pub fn new(config: TransportConfig, handle: reqwest::Client) -> Self {
        Self {
            config,
            handle: Some(handle),
            last_status: None,
        }
    }

    /// The configuration this transport was created with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The URL a request would be sent to.
    pub fn url_for(&self, request: &RequestDescriptor) -> Result<Url> {
        build_url(
            &self.config.endpoint,
            self.config.credentials.administration_id(),
            request,
        )
    }

    /// Performs one authenticated call and returns the raw outcome.
    ///
    /// Any HTTP status, including 4xx and 5xx, is returned as `Ok`; deciding
    /// what it means is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigurationError`] if the access token or administration id
    ///   is empty. No network I/O happens in that case.
    /// - [`Error::Transport`] if no complete HTTP response could be obtained.
    ///   The connection handle is released first. A status that arrived before
    ///   the failure is still recorded as the last status.
    /// - [`Error::InvalidUrl`] if the assembled URL does not parse.
    pub async fn perform_call(&mut self, request: RequestDescriptor) -> Result<RawResponse> {
        self.config.credentials.validate()?;

        let url = self.url_for(&request)?;
        let content_type = match &request.content_type {
            Some(content_type) => content_type.clone(),
            None => HeaderValue::from_static(content_type_for(&request.resource_path)),
        };
        let mut authorization =
            HeaderValue::try_from(format!("Bearer {}", self.config.credentials.access_token()))
                .map_err(|e| Error::ConfigurationError(format!("Invalid access token: {}", e)))?;
        authorization.set_sensitive(true);

        let handle = self.connection()?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            content_type = ?content_type,
            has_body = request.body.is_some(),
            "Executing Moneybird API call"
        );

        let mut builder = handle
            .request(request.method.clone(), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, content_type);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let start_time = Instant::now();
        let outcome = match builder.send().await {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                match response.bytes().await {
                    Ok(body) => Ok(RawResponse::new(status, headers, body, start_time.elapsed())),
                    Err(e) => Err((Some(status), e)),
                }
            }
            Err(e) => Err((e.status(), e)),
        };

        match outcome {
            Ok(response) => {
                self.last_status = Some(response.status);
                tracing::info!(
                    status = response.status.as_u16(),
                    latency_ms = response.latency.as_millis(),
                    method = %request.method,
                    path = %request.resource_path,
                    "Received Moneybird API response"
                );
                Ok(response)
            }
            Err((status, e)) => {
                if let Some(status) = status {
                    self.last_status = Some(status);
                }
                self.close();
                let error = Error::from(e);
                tracing::warn!(
                    error = %error,
                    method = %request.method,
                    path = %request.resource_path,
                    "Moneybird API call failed"
                );
                Err(error)
            }
        }
    }

    /// Status code of the most recent call that produced one.
    ///
    /// Kept for diagnostics; resource operations report statuses through
    /// their return values.
    pub fn last_status(&self) -> Option<StatusCode> {
        self.last_status
    }

    /// Returns `true` while a connection handle is held.
    pub fn has_connection(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the connection handle. The next call opens a new one.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            tracing::trace!("Released connection handle");
        }
    }

    fn connection(&mut self) -> Result<reqwest::Client> {
        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }

        let handle = platform::connection_handle(self.config.timeout).map_err(|e| {
            Error::ConfigurationError(format!("Failed to open connection handle: {}", e))
        })?;
        tracing::trace!("Opened connection handle");
        self.handle = Some(handle.clone());
        Ok(handle)
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .field("connected", &self.has_connection())
            .field("last_status", &self.last_status)
            .finish()
    }
}
