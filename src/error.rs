//! Error types for VetData API calls.
//!
//! This module provides the error taxonomy for the client: authentication
//! failures, refresh-throttle rejections, and data-request failures. Errors
//! preserve the underlying cause and, where available, the HTTP status code
//! and raw response body.

use http::StatusCode;

/// The main error type for VetData API calls.
///
/// Authentication problems, rate-limited token refreshes, and data-endpoint
/// failures each get their own variant so callers can match on the failure
/// class. Variants that carry a response preserve the raw body for
/// debugging.
///
/// # Examples
///
/// ```no_run
/// use vetdata_client::{VetDataClient, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = VetDataClient::builder()
///     .base_url("https://api.vetdata.net/v2")?
///     .credentials("clinic-user", "hunter2")?
///     .build()?;
///
/// match client.list_installations().await {
///     Ok(installations) => println!("{} installations", installations.len()),
///     Err(Error::Authentication { message, .. }) => {
///         eprintln!("Could not authenticate: {message}");
///     }
///     Err(Error::RateLimited { wait_secs }) => {
///         eprintln!("Token refresh throttled, retry in {wait_secs}s");
///     }
///     Err(e) => eprintln!("Request failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Authentication against the token endpoint failed.
    ///
    /// Raised for rejected credentials (401 from the token endpoint), an
    /// unreachable token endpoint, and malformed token responses. The
    /// transport-level cause is attached when there is one.
    #[error("authentication failed: {message}")]
    Authentication {
        /// What went wrong.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The token-refresh quota is exhausted.
    ///
    /// Refreshes are limited per rolling window; when the window is full
    /// the refresh fails fast without a network call.
    #[error("token refresh rate limit exceeded, retry in {wait_secs}s")]
    RateLimited {
        /// Seconds until the oldest refresh ages out of the window.
        wait_secs: u64,
    },

    /// A data endpoint returned a non-2xx HTTP status.
    #[error("HTTP error {status}: {raw_response}")]
    Http {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        raw_response: String,
    },

    /// Failed to deserialize a data-endpoint response body.
    ///
    /// Preserves both the raw response text and the serde error message,
    /// making it easy to debug deserialization issues in production.
    #[error("failed to deserialize response (status {status}): {serde_error}")]
    Deserialization {
        /// The raw response body that failed to deserialize.
        raw_response: String,
        /// The serde error message.
        serde_error: String,
        /// The HTTP status code.
        status: StatusCode,
    },

    /// A network-level error occurred on a data request.
    ///
    /// This wraps the underlying `reqwest::Error` and covers connection
    /// failures, DNS problems, and request timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid configuration was provided.
    ///
    /// Raised at build time, e.g. for missing base URLs or empty
    /// credentials.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    ///
    /// Returns `Some(status)` for `Http` and `Deserialization` errors,
    /// `None` for other error types.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Deserialization { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Http { raw_response, .. } => Some(raw_response),
            Error::Deserialization { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` if this error came from the authentication flow.
    ///
    /// Covers both rejected credentials and throttled refreshes.
    ///
    /// # Examples
    ///
    /// ```
    /// use vetdata_client::Error;
    ///
    /// let err = Error::RateLimited { wait_secs: 12 };
    /// assert!(err.is_authentication_failure());
    /// ```
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Error::Authentication { .. } | Error::RateLimited { .. }
        )
    }
}

/// A specialized `Result` type for VetData API calls.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
