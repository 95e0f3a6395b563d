//! # moneybird - a typed client for the Moneybird accounting API
//!
//! The client authenticates with a bearer token, scopes every call to one
//! administration, and exposes contacts, sales invoices, products and ledger
//! accounts as typed CRUD resources. It is built on top of `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use moneybird::{models::Contact, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), moneybird::Error> {
//!     let mut client = Client::builder()
//!         .access_token("my-access-token")
//!         .administration_id("123456789")
//!         .build()?;
//!
//!     let contact = client
//!         .contacts()
//!         .create(&Contact {
//!             company_name: Some("Acme B.V.".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created contact {:?}", contact.id);
//!
//!     let accounts = client.ledger_accounts().list(&[]).await?;
//!     println!("{} ledger accounts", accounts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`Transport`] builds the URL and headers, performs the call and returns
//!   the raw status and body. It never judges a status code.
//! - [`Resource`] maps list/get/create/update/delete onto requests and checks
//!   the status each operation expects (201 for create, 204 for delete, 404
//!   becomes [`Error::NotFound`]).
//! - [`Client`] holds the configuration, runs the platform check once and
//!   hands out resources.
//!
//! ## Error Handling
//!
//! ```no_run
//! use moneybird::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let mut client = Client::builder().access_token("t").administration_id("1").build()?;
//! match client.products().delete("1").await {
//!     Ok(()) => println!("Deleted"),
//!     Err(Error::UnexpectedStatus { status, raw_response }) => {
//!         eprintln!("HTTP {}: {}", status, raw_response);
//!     }
//!     Err(Error::Transport { code, message }) => {
//!         eprintln!("Network failure ({}): {}", code, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod content_type;
mod error;
pub mod models;
pub mod platform;
mod request;
pub mod resource;
mod response;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result, TransportFailure};
pub use request::RequestDescriptor;
pub use resource::{Resource, ResourceKind};
pub use response::RawResponse;
pub use transport::{Credentials, Transport, TransportConfig};

/// Version of this client.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default root of the remote API.
pub const API_ENDPOINT: &str = "https://moneybird.com/api";

/// Version segment of the remote API.
pub const API_VERSION: &str = "v2";

/// Extension appended to resource paths outside raw path mode.
pub const API_EXTENSION: &str = ".json";
