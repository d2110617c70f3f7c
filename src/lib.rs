//! # VetData Client - an async client for the VetData practice-management API
//!
//! This crate wraps the VetData REST API: it obtains an OAuth access token
//! via the password-realm grant, caches it until close to expiry, throttles
//! token refreshes with a sliding-window limiter, attaches the token to
//! data requests as a bearer credential, and deserializes JSON responses
//! into typed records. Search parameters are translated into OData query
//! strings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vetdata_client::{SearchFilter, VetDataClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vetdata_client::Error> {
//!     let client = VetDataClient::builder()
//!         .base_url("https://api.vetdata.net/v2")?
//!         .credentials("clinic-user", "hunter2")?
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     // List the practice installations visible to this account.
//!     for installation in client.list_installations().await? {
//!         println!("{} ({})", installation.practice_name, installation.pms);
//!     }
//!
//!     // Search clients by last name, expanding phone data.
//!     let filter = SearchFilter::new()
//!         .last_name("Smith")
//!         .include_related(true)
//!         .take(10);
//!
//!     for record in client.search_clients(&filter).await? {
//!         println!("{} {} ({})", record.first_name, record.last_name, record.account_id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Token caching** - one access token shared across clones of the
//!   client, refreshed only when within five minutes of expiry
//! - **Single-flight refresh** - concurrent requests on a cold cache
//!   produce exactly one token fetch
//! - **Refresh throttling** - a sliding-window limiter fails fast with the
//!   remaining wait time instead of hammering the token endpoint
//! - **Bounded 401 retry** - a data request rejected with 401 is replayed
//!   exactly once with a freshly fetched token
//! - **Typed errors** - authentication, throttling, and request failures
//!   are distinct variants preserving status codes and raw bodies
//! - **OData search** - [`SearchFilter`] translates to the server's
//!   `$filter`/`$expand`/`$skip`/`$top` query grammar
//! - **Structured logging** - request and token lifecycle events via
//!   `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use vetdata_client::{Error, VetDataClient};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = VetDataClient::builder()
//! #     .base_url("https://api.vetdata.net/v2")?
//! #     .credentials("user", "pass")?
//! #     .build()?;
//! match client.list_installations().await {
//!     Ok(installations) => {
//!         println!("{} installations", installations.len());
//!     }
//!     Err(Error::Authentication { message, .. }) => {
//!         eprintln!("Authentication failed: {message}");
//!     }
//!     Err(Error::RateLimited { wait_secs }) => {
//!         eprintln!("Too many token refreshes, retry in {wait_secs}s");
//!     }
//!     Err(Error::Http { status, raw_response }) => {
//!         eprintln!("HTTP error {status}: {raw_response}");
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {e}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
pub mod models;
mod query;
mod rate_limit;

pub use auth::Credentials;
pub use client::{ClientBuilder, VetDataClient};
pub use error::{Error, Result};
pub use models::{ClientRecord, InstallationSummary, PhoneRecord, TokenResponse};
pub use query::SearchFilter;
