//! Interactive console harness for exercising the VetData API.
//!
//! Reads its configuration from environment variables:
//!
//! - `VETDATA_BASE_URL` (default `https://api.vetdata.net/v2`)
//! - `VETDATA_AUTH_URL` (default: the production token endpoint)
//! - `VETDATA_USERNAME` / `VETDATA_PASSWORD` (required)
//!
//! Run with: `cargo run --example console`

use std::io::{self, Write};
use std::time::Duration;
use vetdata_client::{ClientRecord, Error, SearchFilter, VetDataClient};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("vetdata_client=info")
        .init();

    let client = client_from_env()?;

    println!("VetData API Test Client");
    println!("======================");

    loop {
        println!();
        println!("Choose an operation:");
        println!("1. List installations");
        println!("2. Search clients by last name");
        println!("3. Search clients by email");
        println!("4. Look up client (last-name search)");
        println!("5. Exit");

        let choice = prompt("\nEnter your choice (1-5): ");

        let outcome = match choice.as_str() {
            "1" => list_installations(&client).await,
            "2" => search_by_last_name(&client).await,
            "3" => search_by_email(&client).await,
            "4" => look_up_client(&client).await,
            "5" => return Ok(()),
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };

        // The harness is the one place that prints errors and keeps going.
        if let Err(e) = outcome {
            eprintln!("Error: {e}");
        }
    }
}

fn client_from_env() -> Result<VetDataClient, Error> {
    let base_url = std::env::var("VETDATA_BASE_URL")
        .unwrap_or_else(|_| "https://api.vetdata.net/v2".to_string());
    let username = std::env::var("VETDATA_USERNAME")
        .map_err(|_| Error::Configuration("VETDATA_USERNAME is not set".into()))?;
    let password = std::env::var("VETDATA_PASSWORD")
        .map_err(|_| Error::Configuration("VETDATA_PASSWORD is not set".into()))?;

    let mut builder = VetDataClient::builder()
        .base_url(base_url)?
        .credentials(username, password)?
        .timeout(Duration::from_secs(30));

    if let Ok(auth_url) = std::env::var("VETDATA_AUTH_URL") {
        builder = builder.auth_url(auth_url)?;
    }

    builder.build()
}

async fn list_installations(client: &VetDataClient) -> Result<(), Error> {
    println!("\nRetrieving installations...");
    let installations = client.list_installations().await?;

    println!("\nFound {} installation(s):", installations.len());
    for installation in installations {
        println!(
            "- {} ({})",
            installation.practice_name, installation.pms
        );
        println!("  ID: {}", installation.installation_id);
    }
    Ok(())
}

async fn search_by_last_name(client: &VetDataClient) -> Result<(), Error> {
    let last_name = prompt("\nEnter last name to search: ");
    if last_name.is_empty() {
        println!("Last name is required.");
        return Ok(());
    }

    let filter = SearchFilter::new()
        .last_name(last_name)
        .include_related(true)
        .take(10);

    println!("\nSearching clients...");
    let clients = client.search_clients(&filter).await?;
    display_clients(&clients, false);
    Ok(())
}

async fn search_by_email(client: &VetDataClient) -> Result<(), Error> {
    let email = prompt("\nEnter email to search: ");
    if email.is_empty() {
        println!("Email is required.");
        return Ok(());
    }

    let filter = SearchFilter::new()
        .email(email)
        .include_related(true)
        .take(10);

    println!("\nSearching clients...");
    let clients = client.search_clients(&filter).await?;
    display_clients(&clients, false);
    Ok(())
}

// The upstream API has no account-id filter, so this is a last-name search.
async fn look_up_client(client: &VetDataClient) -> Result<(), Error> {
    let last_name = prompt("\nEnter client last name: ");
    if last_name.is_empty() {
        println!("Last name is required.");
        return Ok(());
    }

    let filter = SearchFilter::new()
        .last_name(last_name)
        .include_related(true)
        .take(1);

    println!("\nRetrieving client details...");
    let clients = client.search_clients(&filter).await?;
    display_clients(&clients, true);
    Ok(())
}

fn display_clients(clients: &[ClientRecord], detailed: bool) {
    println!("\nFound {} client(s):", clients.len());

    for client in clients {
        println!("\n- {} {}", client.first_name, client.last_name);
        println!("  Account ID: {}", client.account_id);

        if !client.phones.is_empty() {
            println!("  Phone numbers:");
            for phone in &client.phones {
                println!("    {}: {}", phone.phone_type, phone.phone_number);
            }
        }

        if detailed {
            if let Some(created) = client.api_create_date {
                println!("  Created: {created}");
            }
            if let Some(changed) = client.api_last_change_date {
                println!("  Last modified: {changed}");
            }
        }
    }
}

fn prompt(message: &str) -> String {
    print!("{message}");
    io::stdout().flush().expect("stdout flush");

    let mut line = String::new();
    io::stdin().read_line(&mut line).expect("stdin read");
    line.trim().to_string()
}
