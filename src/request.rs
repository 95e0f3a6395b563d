//! Per-call request descriptors.

use bytes::Bytes;
use http::{HeaderValue, Method};

/// Everything the transport needs to execute one call.
///
/// Descriptors are built per call and consumed by
/// [`Transport::perform_call`](crate::Transport::perform_call).
///
/// # Examples
///
/// ```
/// use moneybird::RequestDescriptor;
/// use http::Method;
///
/// let request = RequestDescriptor::new(Method::GET, "contacts")
///     .with_query("?query=acme");
/// assert_eq!(request.resource_path, "contacts");
/// assert!(!request.raw_path);
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method. Never inferred from the presence of a body.
    pub method: Method,

    /// The resource path relative to the administration, e.g. `contacts/42`.
    pub resource_path: String,

    /// Query string appended verbatim after the path (and extension, unless
    /// in raw path mode). Include the leading `?` when there are parameters.
    pub query: String,

    /// The raw request payload.
    pub body: Option<Bytes>,

    /// Content-Type to send instead of the one derived from the path.
    pub content_type: Option<HeaderValue>,

    /// Skip the `.json` extension when building the URL.
    pub raw_path: bool,
}

impl RequestDescriptor {
    /// Creates a descriptor with the given method and resource path.
    pub fn new(method: Method, resource_path: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: resource_path.into(),
            query: String::new(),
            body: None,
            content_type: None,
            raw_path: false,
        }
    }

    /// Sets the query string, appended verbatim.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Attaches a raw payload.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the Content-Type derived from the resource path.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn with_content_type(mut self, content_type: impl AsRef<str>) -> crate::Result<Self> {
        let value = HeaderValue::try_from(content_type.as_ref()).map_err(|e| {
            crate::Error::ConfigurationError(format!("Invalid content type: {}", e))
        })?;
        self.content_type = Some(value);
        Ok(self)
    }

    /// Switches to raw path mode: no `.json` extension is inserted.
    pub fn raw_path(mut self) -> Self {
        self.raw_path = true;
        self
    }
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let request = RequestDescriptor::new(Method::POST, "sales_invoices/1/attachments")
            .with_query("?x=1")
            .with_body(b"payload".to_vec())
            .raw_path();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.query, "?x=1");
        assert_eq!(request.body.as_deref(), Some(&b"payload"[..]));
        assert!(request.raw_path);
        assert!(request.content_type.is_none());
    }

    #[test]
    fn test_invalid_content_type_is_rejected() {
        let result = RequestDescriptor::new(Method::GET, "contacts").with_content_type("bad\nvalue");
        assert!(matches!(result, Err(crate::Error::ConfigurationError(_))));
    }
}
