// Token refresh logic

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::types::{AuthError, CachedToken, ClientCredentialsRequest, Credentials, TokenResponse};

/// Token endpoint for a base URL
pub fn token_url(base_url: &str) -> String {
    format!("{}/access/token", base_url)
}

/// Obtain a fresh token via the client-credentials grant
pub async fn request_client_credentials(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    timeout: Option<Duration>,
) -> Result<CachedToken, AuthError> {
    let url = token_url(base_url);
    tracing::debug!(url = %url, client_id = %credentials.client_id, "Requesting access token");

    let body = serde_json::to_vec(&ClientCredentialsRequest::new(credentials))
        .map_err(AuthError::Serialization)?;

    let mut request = client
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .body(body);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await.map_err(AuthError::Connectivity)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Failed to read token error body");
            String::new()
        });
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(AuthError::Connectivity)?;
    let data: TokenResponse = serde_json::from_slice(&bytes).map_err(AuthError::Decode)?;
    if data.access_token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    let token = CachedToken::from_response(data, Utc::now());

    tracing::info!(
        "Access token refreshed, expires: {}",
        token.expires_at.to_rfc3339()
    );

    Ok(token)
}
