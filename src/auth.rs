//! Token acquisition and caching.
//!
//! The [`Authenticator`] owns the single piece of shared mutable state in
//! the crate: the cached access token and the refresh-throttle window, both
//! behind one async mutex. Callers that find a fresh token return
//! immediately; callers that find a stale one refresh it while holding the
//! lock, so concurrent cold-cache requests collapse into a single network
//! call.

use crate::{models::TokenResponse, rate_limit::SlidingWindow, Error, Result};
use http::StatusCode;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

/// Fixed parameters of the password-realm grant.
const GRANT_TYPE: &str = "http://auth0.com/oauth/grant-type/password-realm";
const CLIENT_ID: &str = "vetdata";
const AUDIENCE: &str = "https://api.vetdata.com";
const REALM: &str = "vetdata-users";
const PRODUCT_CODE: &str = "VETDATA-API";

/// The production token endpoint.
pub(crate) const DEFAULT_AUTH_URL: &str = "https://auth.vetdata.com/oauth/token";

/// Tokens expiring within this margin are treated as already stale.
const EXPIRY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Token refreshes admitted per rolling window.
const MAX_REFRESHES_PER_WINDOW: usize = 10;
const REFRESH_WINDOW: Duration = Duration::from_secs(60);

/// API account credentials.
///
/// Loaded once at client construction and never mutated. The `Debug`
/// representation redacts the password.
///
/// # Examples
///
/// ```
/// use vetdata_client::Credentials;
///
/// let credentials = Credentials::new("clinic-user", "hunter2").unwrap();
/// assert!(!format!("{credentials:?}").contains("hunter2"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty usernames or passwords.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when either value is empty, so a
    /// misconfigured deployment fails at construction rather than on the
    /// first request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            return Err(Error::Configuration("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::Configuration("password must not be empty".into()));
        }

        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A cached access token with its computed expiry instant.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: Instant) -> Self {
        Self {
            access_token: response.access_token,
            expires_at: now + Duration::from_secs(response.expires_in),
        }
    }

    /// A token is fresh while its expiry is more than the safety margin away.
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now + EXPIRY_MARGIN
    }
}

/// State guarded by the authenticator's mutex.
#[derive(Debug)]
struct TokenState {
    token: Option<CachedToken>,
    window: SlidingWindow,
}

/// Obtains and caches access tokens for the VetData API.
///
/// Owned by [`crate::VetDataClient`]; not constructed directly by library
/// users.
pub(crate) struct Authenticator {
    http: reqwest::Client,
    auth_url: Url,
    credentials: Credentials,
    state: Mutex<TokenState>,
}

impl Authenticator {
    pub(crate) fn new(http: reqwest::Client, auth_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            auth_url,
            credentials,
            state: Mutex::new(TokenState {
                token: None,
                window: SlidingWindow::new(MAX_REFRESHES_PER_WINDOW, REFRESH_WINDOW),
            }),
        }
    }

    /// Returns a valid access token, refreshing if the cached one is stale.
    ///
    /// Concurrent callers serialize on the internal mutex: while a refresh
    /// is in flight the others wait, then find the freshly cached token when
    /// they acquire the lock.
    pub(crate) async fn access_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(token) = &state.token {
            if token.is_fresh(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        self.refresh_locked(&mut state).await
    }

    /// Discards the cached token and fetches a new one unconditionally.
    ///
    /// Used when a data endpoint rejects a token the freshness check still
    /// considered valid, e.g. under clock skew or server-side revocation.
    pub(crate) async fn refresh_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        state.token = None;
        self.refresh_locked(&mut state).await
    }

    async fn refresh_locked(&self, state: &mut TokenState) -> Result<String> {
        if let Err(wait) = state.window.try_admit(Instant::now()) {
            let wait_secs = wait.as_secs().max(1);
            tracing::warn!(wait_secs, "Token refresh rejected by rate limiter");
            return Err(Error::RateLimited { wait_secs });
        }

        let now = Instant::now();
        let response = self.request_token().await?;

        tracing::info!(
            token_type = %response.token_type,
            expires_in = response.expires_in,
            "Obtained access token"
        );

        let token = CachedToken::from_response(response, now);
        let access_token = token.access_token.clone();
        state.token = Some(token);

        Ok(access_token)
    }

    /// Performs the password-grant request against the token endpoint.
    async fn request_token(&self) -> Result<TokenResponse> {
        tracing::debug!(url = %self.auth_url, "Requesting access token");

        let response = self
            .http
            .post(self.auth_url.clone())
            .header(http::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", GRANT_TYPE),
                ("client_id", CLIENT_ID),
                ("audience", AUDIENCE),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
                ("realm", REALM),
                ("covetrus_product_code", PRODUCT_CODE),
            ])
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: "token endpoint unreachable".into(),
                source: Some(e),
            })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "invalid credentials".into(),
                source: None,
            });
        }
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("token endpoint returned status {status}"),
                source: None,
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::Authentication {
                message: "malformed token response".into(),
                source: Some(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_freshness_honors_expiry_margin() {
        let now = Instant::now();
        let fresh = CachedToken {
            access_token: "tok".into(),
            expires_at: now + Duration::from_secs(600),
        };
        let near_expiry = CachedToken {
            access_token: "tok".into(),
            expires_at: now + Duration::from_secs(120),
        };

        assert!(fresh.is_fresh(now));
        assert!(!near_expiry.is_fresh(now));
    }

    #[test]
    fn credentials_reject_empty_values() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("user", "").is_err());
        assert!(Credentials::new("user", "secret").is_ok());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("user", "secret").unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("secret"));
    }
}
