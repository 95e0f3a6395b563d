//! CRUD facades over the resource endpoints.
//!
//! The set of resources is closed: [`ResourceKind`] lists every endpoint
//! family the client talks to, and resolving any other name fails with
//! [`Error::UnknownResource`]. A [`Resource`] borrows the client's transport
//! for as long as it lives and maps each operation's expected status onto a
//! typed result.

use crate::{Error, RawResponse, RequestDescriptor, Result, Transport};
use bytes::Bytes;
use http::{Method, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// The resource families this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Contacts,
    SalesInvoices,
    Products,
    LedgerAccounts,
}

impl ResourceKind {
    /// Every known resource.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Contacts,
        ResourceKind::SalesInvoices,
        ResourceKind::Products,
        ResourceKind::LedgerAccounts,
    ];

    /// The URL segment of the resource, e.g. `sales_invoices`.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Contacts => "contacts",
            ResourceKind::SalesInvoices => "sales_invoices",
            ResourceKind::Products => "products",
            ResourceKind::LedgerAccounts => "ledger_accounts",
        }
    }

    /// The key a single entity is wrapped in for create and update bodies.
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Contacts => "contact",
            ResourceKind::SalesInvoices => "sales_invoice",
            ResourceKind::Products => "product",
            ResourceKind::LedgerAccounts => "ledger_account",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    /// Accepts the URL segment (`sales_invoices`) or its camel-case spelling
    /// (`salesInvoices`).
    ///
    /// # Examples
    ///
    /// ```
    /// use moneybird::{Error, ResourceKind};
    ///
    /// assert_eq!("ledgerAccounts".parse::<ResourceKind>().unwrap(), ResourceKind::LedgerAccounts);
    /// assert!(matches!("journal".parse::<ResourceKind>(), Err(Error::UnknownResource(_))));
    /// ```
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "contacts" => Ok(ResourceKind::Contacts),
            "sales_invoices" | "salesInvoices" => Ok(ResourceKind::SalesInvoices),
            "products" => Ok(ResourceKind::Products),
            "ledger_accounts" | "ledgerAccounts" => Ok(ResourceKind::LedgerAccounts),
            other => Err(Error::UnknownResource(other.to_string())),
        }
    }
}

/// Everything but RFC 3986 unreserved characters is escaped in an id.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes an entity id as exactly one path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidId`] for empty ids and for `.` and `..`, which
/// URL parsing would treat as dot segments even when escaped.
///
/// # Examples
///
/// ```
/// use moneybird::resource::id_segment;
///
/// assert_eq!(id_segment("42").unwrap(), "42");
/// assert_eq!(id_segment("7?x=1").unwrap(), "7%3Fx%3D1");
/// assert!(id_segment("..").is_err());
/// ```
pub fn id_segment(id: &str) -> Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(Error::InvalidId(id.to_string()));
    }
    Ok(utf8_percent_encode(id, ID_ENCODE_SET).to_string())
}

/// Encodes list filters as `?filter=key:value,key:value`.
///
/// Returns an empty string when there are no filters.
pub fn filter_query(filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let joined = filters
        .iter()
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect::<Vec<_>>()
        .join(",");
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filter", &joined)
        .finish();
    format!("?{}", encoded)
}

/// Typed CRUD operations on one resource family.
///
/// Obtained from [`crate::Client::contacts`] and friends. Holds a mutable
/// borrow of the client's transport, so calls through it are sequential.
///
/// # Examples
///
/// ```no_run
/// use moneybird::{models::Contact, Client};
///
/// # async fn example() -> Result<(), moneybird::Error> {
/// let mut client = Client::builder()
///     .access_token("token")
///     .administration_id("123")
///     .build()?;
///
/// let mut contacts = client.contacts();
/// let created = contacts
///     .create(&Contact {
///         company_name: Some("Acme".to_string()),
///         ..Default::default()
///     })
///     .await?;
/// let id = created.id.clone().unwrap_or_default();
/// contacts.delete(&id).await?;
/// # Ok(())
/// # }
/// ```
pub struct Resource<'a, E> {
    transport: &'a mut Transport,
    kind: ResourceKind,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E> Resource<'a, E>
where
    E: Serialize + DeserializeOwned,
{
    pub(crate) fn new(transport: &'a mut Transport, kind: ResourceKind) -> Self {
        Self {
            transport,
            kind,
            _entity: PhantomData,
        }
    }

    /// The resource family this facade operates on.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Lists entities, optionally narrowed by `key:value` filters.
    pub async fn list(&mut self, filters: &[(&str, &str)]) -> Result<Vec<E>> {
        let request =
            RequestDescriptor::new(Method::GET, self.kind.path()).with_query(filter_query(filters));
        let response = self.transport.perform_call(request).await?;
        expect_status(response, StatusCode::OK)?.json()
    }

    /// Fetches one entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the API answers 404.
    pub async fn get(&mut self, id: &str) -> Result<E> {
        let request = RequestDescriptor::new(Method::GET, self.entity_path(id)?);
        let response = self.transport.perform_call(request).await?;
        self.not_found_as_error(response, id, StatusCode::OK)?.json()
    }

    /// Creates an entity; the API must answer 201.
    pub async fn create(&mut self, entity: &E) -> Result<E> {
        let request =
            RequestDescriptor::new(Method::POST, self.kind.path()).with_body(self.encode(entity)?);
        let response = self.transport.perform_call(request).await?;
        expect_status(response, StatusCode::CREATED)?.json()
    }

    /// Updates an entity with the fields set on `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the API answers 404.
    pub async fn update(&mut self, id: &str, entity: &E) -> Result<E> {
        let request =
            RequestDescriptor::new(Method::PATCH, self.entity_path(id)?).with_body(self.encode(entity)?);
        let response = self.transport.perform_call(request).await?;
        self.not_found_as_error(response, id, StatusCode::OK)?.json()
    }

    /// Deletes an entity; the API must answer 204.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let request = RequestDescriptor::new(Method::DELETE, self.entity_path(id)?);
        let response = self.transport.perform_call(request).await?;
        expect_status(response, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    /// Uploads `data` as an attachment of entity `id`.
    ///
    /// The body is sent as is with `multipart/mixed`; the URL has no `.json`
    /// extension. Any 2xx status counts as success.
    pub async fn add_attachment(&mut self, id: &str, data: impl Into<Bytes>) -> Result<()> {
        let request = RequestDescriptor::new(Method::POST, format!("{}/attachments", self.entity_path(id)?))
            .with_body(data)
            .raw_path();
        let response = self.transport.perform_call(request).await?;
        if !response.status.is_success() {
            return Err(unexpected(response));
        }
        Ok(())
    }

    fn entity_path(&self, id: &str) -> Result<String> {
        Ok(format!("{}/{}", self.kind.path(), id_segment(id)?))
    }

    fn encode(&self, entity: &E) -> Result<Vec<u8>> {
        let wrapped = BTreeMap::from([(self.kind.singular(), entity)]);
        serde_json::to_vec(&wrapped).map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    fn not_found_as_error(
        &self,
        response: RawResponse,
        id: &str,
        expected: StatusCode,
    ) -> Result<RawResponse> {
        if response.is(StatusCode::NOT_FOUND) {
            tracing::debug!(resource = %self.kind, id = id, "Entity not found");
            return Err(Error::NotFound {
                resource: self.kind.path().to_string(),
                id: id.to_string(),
            });
        }
        expect_status(response, expected)
    }
}

fn expect_status(response: RawResponse, expected: StatusCode) -> Result<RawResponse> {
    if response.is(expected) {
        Ok(response)
    } else {
        Err(unexpected(response))
    }
}

fn unexpected(response: RawResponse) -> Error {
    if response.status.is_server_error() {
        tracing::warn!(
            status = response.status.as_u16(),
            response = %response.text(),
            "Server error (5xx)"
        );
    } else {
        tracing::error!(
            status = response.status.as_u16(),
            response = %response.text(),
            "Unexpected HTTP status"
        );
    }
    response.into_unexpected()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_through_its_path() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.path().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_resource_is_an_error() {
        match "undefined".parse::<ResourceKind>() {
            Err(Error::UnknownResource(name)) => assert_eq!(name, "undefined"),
            other => panic!("Expected UnknownResource, got {:?}", other),
        }
    }

    #[test]
    fn test_id_segment_escapes_reserved_characters() {
        assert_eq!(id_segment("7#frag").unwrap(), "7%23frag");
        assert_eq!(id_segment("7?x=1").unwrap(), "7%3Fx%3D1");
        assert_eq!(id_segment("../../other/9").unwrap(), "..%2F..%2Fother%2F9");
        assert_eq!(id_segment("a b").unwrap(), "a%20b");
        assert_eq!(id_segment("v1.2_x-y~z").unwrap(), "v1.2_x-y~z");
    }

    #[test]
    fn test_id_segment_rejects_dot_segments() {
        for id in ["", ".", ".."] {
            assert!(
                matches!(id_segment(id), Err(Error::InvalidId(ref rejected)) if rejected == id),
                "id {:?}",
                id
            );
        }
    }

    #[test]
    fn test_filter_query() {
        assert_eq!(filter_query(&[]), "");
        assert_eq!(
            filter_query(&[("state", "open"), ("period", "this_month")]),
            "?filter=state%3Aopen%2Cperiod%3Athis_month"
        );
    }
}
