use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenManager;
use crate::error::{ApiError, Result};

/// Placeholder body for calls that send nothing
pub const NO_BODY: Option<&()> = None;

/// Authenticated HTTP client for the Tropipay API
///
/// Every call makes exactly one attempt against the target endpoint, plus a
/// token request when the cached token needs refreshing. Nothing is retried.
#[derive(Debug)]
pub struct TropipayHttpClient {
    /// Underlying transport, shared with the token manager
    client: Client,

    /// Base URL every path is appended to
    base_url: String,

    /// Per-request timeout
    timeout: Option<Duration>,

    /// Token cache
    token_manager: Arc<TokenManager>,
}

impl TropipayHttpClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        token_manager: Arc<TokenManager>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
            token_manager,
        }
    }

    /// Execute a call and decode a success body as `T`
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// Execute a call whose success body is of no interest
    pub async fn request_discard<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body).await.map(drop)
    }

    /// Send one authenticated request and classify the response status
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let token = self.token_manager.get_valid_token().await?;

        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ApiError::Serialization)?;

        // Paths are appended verbatim; callers own the slashes
        let full_url = format!("{}{}", self.base_url, path);
        let url = Url::parse(&full_url)
            .map_err(|e| ApiError::Config(format!("invalid request URL {}: {}", full_url, e)))?;

        tracing::debug!(method = %method, url = %full_url, "Sending HTTP request");

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", token));
        if let Some(payload) = payload {
            request = request.body(payload);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        tracing::debug!(status = %status, "Received HTTP response");

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, url = %full_url, "Failed to read error response body");
                String::new()
            });
            return Err(ApiError::Api {
                url: full_url,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token manager backing this client
    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }
}
