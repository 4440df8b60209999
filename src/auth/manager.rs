use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;

use super::refresh;
use super::types::{AuthError, CachedToken, Credentials};

/// Token manager
/// Caches the client-credentials token and refreshes it when it gets close to expiry
pub struct TokenManager {
    /// Application credentials, fixed for the lifetime of the manager
    credentials: Credentials,

    /// API base URL the token endpoint hangs off
    base_url: String,

    /// HTTP client for token requests
    client: Client,

    /// Per-request timeout applied to token requests
    timeout: Option<Duration>,

    /// Current token; the lock is held across a refresh so only one is in flight
    state: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    /// Create a new TokenManager with an empty cache
    pub fn new(
        credentials: Credentials,
        base_url: impl Into<String>,
        client: Client,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
            client,
            timeout,
            state: Mutex::new(None),
        }
    }

    /// Get a valid access token, refreshing if necessary
    ///
    /// Concurrent callers queue on the cache lock while a refresh runs and then
    /// observe the refreshed token. A failed refresh leaves the previous value
    /// in place; since it is stale, the next call simply refreshes again.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        let mut cached = self.state.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                tracing::trace!("Using cached access token");
                return Ok(token.access_token.clone());
            }
            tracing::debug!(
                expires_at = %token.expires_at.to_rfc3339(),
                "Cached access token is expiring, refreshing"
            );
        }

        let token = refresh::request_client_credentials(
            &self.client,
            &self.base_url,
            &self.credentials,
            self.timeout,
        )
        .await?;

        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Expiry of the cached token, if one has been obtained
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.as_ref().map(|t| t.expires_at)
    }

    /// Client id used for the grant
    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
