//! The VetData API client.
//!
//! The [`VetDataClient`] type is the main entry point. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    auth::{Authenticator, Credentials, DEFAULT_AUTH_URL},
    models::{ClientRecord, InstallationSummary, ODataEnvelope},
    Error, Result, SearchFilter,
};
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// An authenticated client for the VetData REST API.
///
/// The client is designed to be reused and cloned freely: it shares one
/// connection pool and one token cache across clones. Tokens are fetched
/// lazily on the first request, cached until close to expiry, and attached
/// to every data request as a bearer credential.
///
/// # Examples
///
/// ```no_run
/// use vetdata_client::{SearchFilter, VetDataClient};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), vetdata_client::Error> {
/// let client = VetDataClient::builder()
///     .base_url("https://api.vetdata.net/v2")?
///     .credentials("clinic-user", "hunter2")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// for installation in client.list_installations().await? {
///     println!("{} ({})", installation.practice_name, installation.pms);
/// }
///
/// let clients = client
///     .search_clients(&SearchFilter::new().last_name("Smith").take(10))
///     .await?;
/// println!("{} matches", clients.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VetDataClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    auth: Authenticator,
}

impl VetDataClient {
    /// Creates a new [`ClientBuilder`] for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Lists the practice installations visible to this account.
    ///
    /// An empty or absent response body yields an empty vec rather than an
    /// error.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Authentication`] or [`Error::RateLimited`] when
    /// no token can be obtained, and with the [`Error::Http`] /
    /// [`Error::Deserialization`] / [`Error::Network`] family when the data
    /// request itself fails.
    pub async fn list_installations(&self) -> Result<Vec<InstallationSummary>> {
        let body = self.get_with_retry("InstallationList").await?;
        parse_body::<Vec<InstallationSummary>>(body).map(|r| r.unwrap_or_default())
    }

    /// Searches client records matching `filter`.
    ///
    /// The filter is translated to an OData query string (see
    /// [`SearchFilter::to_query_string`]). The response envelope's `value`
    /// array is returned directly; an empty or absent body yields an empty
    /// vec.
    ///
    /// # Errors
    ///
    /// Same failure classes as [`Self::list_installations`].
    pub async fn search_clients(&self, filter: &SearchFilter) -> Result<Vec<ClientRecord>> {
        let path = format!("Clients{}", filter.to_query_string());
        let body = self.get_with_retry(&path).await?;
        parse_body::<ODataEnvelope<ClientRecord>>(body)
            .map(|r| r.map(|envelope| envelope.value).unwrap_or_default())
    }

    /// Issues an authenticated GET, retrying exactly once on 401.
    ///
    /// A 401 on the first attempt means the cached token was stale despite
    /// the client's own freshness check (clock skew, server-side
    /// revocation); the retry forces a fresh token fetch. A second 401 is
    /// surfaced as an error. Every other non-success status and all
    /// transport errors propagate immediately.
    ///
    /// Returns the response body, with a successful empty body normalized to
    /// `None`.
    async fn get_with_retry(&self, path_and_query: &str) -> Result<RawResponse> {
        let url = self.inner.base_url.join(path_and_query)?;
        let mut force_refresh = false;

        loop {
            let token = if force_refresh {
                self.inner.auth.refresh_token().await?
            } else {
                self.inner.auth.access_token().await?
            };

            tracing::debug!(url = %url, retry = force_refresh, "Executing data request");

            let response = self
                .inner
                .http
                .get(url.clone())
                .bearer_auth(&token)
                .send()
                .await?;

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && !force_refresh {
                tracing::warn!(url = %url, "Data request rejected with 401, refreshing token");
                force_refresh = true;
                continue;
            }

            let raw_body = response.text().await?;

            if !status.is_success() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_body,
                    "Data request failed"
                );
                return Err(Error::Http {
                    status,
                    raw_response: raw_body,
                });
            }

            return Ok(RawResponse { status, raw_body });
        }
    }
}

/// A successful response body awaiting deserialization.
struct RawResponse {
    status: StatusCode,
    raw_body: String,
}

/// Deserializes a response body, normalizing an empty body to `None`.
fn parse_body<T: DeserializeOwned>(response: RawResponse) -> Result<Option<T>> {
    if response.raw_body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<T>(&response.raw_body) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %response.raw_body,
                "Failed to deserialize response"
            );
            Err(Error::Deserialization {
                raw_response: response.raw_body,
                serde_error: e.to_string(),
                status: response.status,
            })
        }
    }
}

/// Builder for configuring and creating a [`VetDataClient`].
///
/// # Examples
///
/// ```no_run
/// use vetdata_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), vetdata_client::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.vetdata.net/v2")?
///     .credentials("clinic-user", "hunter2")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    auth_url: Option<Url>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_url: None,
            credentials: None,
            timeout: None,
        }
    }

    /// Sets the base URL of the data API.
    ///
    /// The URL is normalized to end with a slash so resource paths join
    /// onto it rather than replacing its final segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        self.base_url = Some(Url::parse(&normalized)?);
        Ok(self)
    }

    /// Overrides the token endpoint URL.
    ///
    /// Defaults to the production VetData token endpoint; override it to
    /// point at a staging environment or a test server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn auth_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.auth_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the account credentials used for the password grant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either value is empty.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        self.credentials = Some(Credentials::new(username, password)?);
        Ok(self)
    }

    /// Sets the per-request timeout on the underlying HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `VetDataClient`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the base URL or credentials
    /// are missing, or when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<VetDataClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("base URL is required".to_string()))?;

        let credentials = self
            .credentials
            .ok_or_else(|| Error::Configuration("credentials are required".to_string()))?;

        let auth_url = match self.auth_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_AUTH_URL)?,
        };

        let mut http_builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http = http_builder.build().map_err(|e| {
            Error::Configuration(format!("failed to build HTTP client: {e}"))
        })?;

        let auth = Authenticator::new(http.clone(), auth_url, credentials);

        Ok(VetDataClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                auth,
            }),
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
    fn build_requires_base_url() {
        let result = ClientBuilder::new()
            .credentials("user", "secret")
            .unwrap()
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn build_requires_credentials() {
        let result = ClientBuilder::new()
            .base_url("https://api.vetdata.net/v2")
            .unwrap()
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let builder = ClientBuilder::new()
            .base_url("https://api.vetdata.net/v2")
            .unwrap();
        assert_eq!(
            builder.base_url.as_ref().unwrap().as_str(),
            "https://api.vetdata.net/v2/"
        );
    }
}
