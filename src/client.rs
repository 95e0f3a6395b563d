//! The Moneybird client and its builder.
//!
//! [`Client`] owns one [`Transport`] and hands out resource facades that
//! borrow it. Use [`ClientBuilder`] to configure and create clients.

use crate::{
    models::{Contact, LedgerAccount, Product, SalesInvoice},
    platform,
    resource::{Resource, ResourceKind},
    transport::{Credentials, Transport, TransportConfig, DEFAULT_TIMEOUT},
    RawResponse, RequestDescriptor, Result, API_ENDPOINT,
};
use http::StatusCode;
use std::time::Duration;
use url::Url;

/// A client for one administration of the Moneybird API.
///
/// Every call runs over the client's single transport, one after another.
/// Build one client per concurrent flow if you need parallel requests.
///
/// # Examples
///
/// ```no_run
/// use moneybird::Client;
///
/// # async fn example() -> Result<(), moneybird::Error> {
/// let mut client = Client::builder()
///     .access_token("my-access-token")
///     .administration_id("123456789")
///     .build()?;
///
/// for invoice in client.sales_invoices().list(&[("state", "open")]).await? {
///     println!("{:?}: {:?}", invoice.invoice_id, invoice.total_price_incl_tax);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Contacts resource.
    pub fn contacts(&mut self) -> Resource<'_, Contact> {
        Resource::new(&mut self.transport, ResourceKind::Contacts)
    }

    /// Sales invoices resource.
    pub fn sales_invoices(&mut self) -> Resource<'_, SalesInvoice> {
        Resource::new(&mut self.transport, ResourceKind::SalesInvoices)
    }

    /// Products resource.
    pub fn products(&mut self) -> Resource<'_, Product> {
        Resource::new(&mut self.transport, ResourceKind::Products)
    }

    /// Ledger accounts resource.
    pub fn ledger_accounts(&mut self) -> Resource<'_, LedgerAccount> {
        Resource::new(&mut self.transport, ResourceKind::LedgerAccounts)
    }

    /// Looks up a resource by name and returns an untyped facade over it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownResource`] if `name` is not one of
    /// the [`ResourceKind`]s.
    pub fn resource(&mut self, name: &str) -> Result<Resource<'_, serde_json::Value>> {
        let kind = name.parse::<ResourceKind>()?;
        Ok(Resource::new(&mut self.transport, kind))
    }

    /// Performs a raw call for endpoints not covered by a resource facade.
    pub async fn perform_call(&mut self, request: RequestDescriptor) -> Result<RawResponse> {
        self.transport.perform_call(request).await
    }

    /// Status code of the most recent call that produced one.
    pub fn last_status(&self) -> Option<StatusCode> {
        self.transport.last_status()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use moneybird::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), moneybird::Error> {
/// let client = ClientBuilder::new()
///     .endpoint("https://moneybird.com/api")?
///     .access_token("my-access-token")
///     .administration_id("123456789")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    endpoint: Option<Url>,
    access_token: String,
    administration_id: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            access_token: String::new(),
            administration_id: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API endpoint (defaults to [`API_ENDPOINT`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn endpoint(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.endpoint = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the access token generated in Moneybird.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    /// Sets the administration all calls are scoped to.
    pub fn administration_id(mut self, administration_id: impl Into<String>) -> Self {
        self.administration_id = administration_id.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// Missing credentials are not an error here; calls fail with
    /// [`crate::Error::ConfigurationError`] until they are provided.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatiblePlatform`] if no HTTP client can be
    /// created on this platform.
    pub fn build(self) -> Result<Client> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(API_ENDPOINT)?,
        };

        let handle = platform::check_compatibility(self.timeout)?;

        let config = TransportConfig {
            endpoint,
            credentials: Credentials::new(self.access_token, self.administration_id),
            timeout: self.timeout,
        };

        Ok(Client {
            transport: Transport::new(config, handle),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::builder().access_token(" token ").build().unwrap();
        let config = client.transport().config();
        assert_eq!(config.endpoint.as_str(), "https://moneybird.com/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.credentials.access_token(), "token");
        assert!(client.transport().has_connection());
        assert_eq!(client.last_status(), None);
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            Client::builder().endpoint("not a url"),
            Err(crate::Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resource_by_name() {
        let mut client = Client::builder().build().unwrap();
        assert_eq!(
            client.resource("salesInvoices").unwrap().kind(),
            ResourceKind::SalesInvoices
        );
        assert!(matches!(
            client.resource("payments"),
            Err(crate::Error::UnknownResource(_))
        ));
    }
}
