//! Basic example listing and creating contacts.
//!
//! This example shows how to:
//! - Create a client for one administration
//! - List entities with filters
//! - Create, fetch and delete an entity
//! - Inspect the last observed status code
//!
//! Run with:
//! `MONEYBIRD_TOKEN=... MONEYBIRD_ADMINISTRATION=... cargo run --example basic_call`

use moneybird::models::Contact;
use moneybird::{Client, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("moneybird=debug,basic_call=info")
        .init();

    let token = std::env::var("MONEYBIRD_TOKEN").unwrap_or_default();
    let administration = std::env::var("MONEYBIRD_ADMINISTRATION").unwrap_or_default();

    let mut client = Client::builder()
        .access_token(token)
        .administration_id(administration)
        .build()?;

    println!("=== Listing open invoices ===");
    match client.sales_invoices().list(&[("state", "open")]).await {
        Ok(invoices) => {
            for invoice in invoices {
                println!(
                    "{:?} {:?} {:?}",
                    invoice.invoice_id, invoice.state, invoice.total_price_incl_tax
                );
            }
        }
        Err(Error::ConfigurationError(message)) => {
            println!("Set MONEYBIRD_TOKEN and MONEYBIRD_ADMINISTRATION first: {}", message);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    println!();

    println!("=== Creating a contact ===");
    let mut contacts = client.contacts();
    let created = contacts
        .create(&Contact {
            company_name: Some("Example B.V.".to_string()),
            city: Some("Enschede".to_string()),
            ..Default::default()
        })
        .await?;
    let id = created.id.clone().unwrap_or_default();
    println!("Created contact {}", id);

    let fetched = contacts.get(&id).await?;
    println!("Fetched: {:?}", fetched.company_name);

    contacts.delete(&id).await?;
    println!("Deleted contact {}", id);

    match contacts.get(&id).await {
        Err(Error::NotFound { .. }) => println!("Contact is gone"),
        other => println!("Unexpected: {:?}", other),
    }

    println!("Last status: {:?}", client.last_status());

    Ok(())
}
