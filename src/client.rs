use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{Credentials, TokenManager};
use crate::error::{ApiError, Result};
use crate::http_client::TropipayHttpClient;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Known Tropipay environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Environment {
    /// Live environment
    #[default]
    Production,
    /// Test environment
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://www.tropipay.com/api/v3",
            Environment::Sandbox => "https://sandbox.tropipay.me/api/v3",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Tropipay API client
///
/// Cloning is cheap and clones share the same token cache. Independently built
/// clients each own their own cache.
#[derive(Debug, Clone)]
pub struct TropipayClient {
    http: Arc<TropipayHttpClient>,
}

impl TropipayClient {
    /// Client against production with default settings
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::builder(client_id, client_secret).build()
    }

    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ClientBuilder {
        ClientBuilder {
            credentials: Credentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            },
            base_url: Environment::default().base_url().to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            http_client: None,
        }
    }

    /// Execute an authenticated call and decode the success body
    ///
    /// `path` is appended to the base URL as-is.
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http.request(method, path, body).await
    }

    /// Execute an authenticated call, discarding the success body
    pub async fn request_discard<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.http.request_discard(method, path, body).await
    }

    /// Current access token, refreshed if needed
    pub async fn access_token(&self) -> Result<String> {
        Ok(self.http.token_manager().get_valid_token().await?)
    }

    /// Expiry of the cached token, if any
    pub async fn token_expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.http.token_manager().expires_at().await
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

/// Builder for [`TropipayClient`]
pub struct ClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ClientBuilder {
    /// Select one of the known environments
    pub fn environment(mut self, environment: Environment) -> Self {
        self.base_url = environment.base_url().to_string();
        self
    }

    /// Custom base URL (proxies, mock servers)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout for both token and API calls; `None` disables it
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bring your own transport
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<TropipayClient> {
        let base_url = self.base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config("base URL must not be empty".to_string()));
        }

        let client = match self.http_client {
            Some(client) => client,
            None => Client::builder()
                .build()
                .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {}", e)))?,
        };

        let token_manager = Arc::new(TokenManager::new(
            self.credentials,
            base_url.clone(),
            client.clone(),
            self.timeout,
        ));

        tracing::debug!(base_url = %base_url, timeout = ?self.timeout, "Tropipay client initialized");

        Ok(TropipayClient {
            http: Arc::new(TropipayHttpClient::new(
                client,
                base_url,
                self.timeout,
                token_manager,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Production.base_url(),
            "https://www.tropipay.com/api/v3"
        );
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://sandbox.tropipay.me/api/v3"
        );
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn test_builder_defaults_to_production() {
        let client = TropipayClient::new("id", "secret").unwrap();
        assert_eq!(client.base_url(), "https://www.tropipay.com/api/v3");
    }

    #[test]
    fn test_builder_overrides() {
        let client = TropipayClient::builder("id", "secret")
            .environment(Environment::Sandbox)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://sandbox.tropipay.me/api/v3");

        // Custom URL wins when set last
        let client = TropipayClient::builder("id", "secret")
            .environment(Environment::Sandbox)
            .base_url("http://localhost:8080/api")
            .timeout(Some(Duration::from_secs(5)))
            .http_client(Client::new())
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let err = TropipayClient::builder("id", "secret")
            .base_url("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn test_clones_share_token_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/access/token")
            .with_status(200)
            .with_body(r#"{"access_token":"shared","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await;

        let client = TropipayClient::builder("id", "secret")
            .base_url(server.url())
            .build()
            .unwrap();
        let clone = client.clone();

        assert_eq!(client.access_token().await.unwrap(), "shared");
        assert_eq!(clone.access_token().await.unwrap(), "shared");
        assert!(clone.token_expires_at().await.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_independent_clients_have_separate_caches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/access/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok","expires_in":3600}"#)
            .expect(2)
            .create_async()
            .await;

        let a = TropipayClient::builder("a", "secret")
            .base_url(server.url())
            .build()
            .unwrap();
        let b = TropipayClient::builder("b", "secret")
            .base_url(server.url())
            .build()
            .unwrap();

        a.access_token().await.unwrap();
        b.access_token().await.unwrap();
        mock.assert_async().await;
    }
}
