// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens are considered stale this many seconds before they actually expire
pub const TOKEN_SAFETY_BUFFER_SECS: i64 = 10;

/// Upper bound applied to `expires_in` before computing the expiry instant
const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Failures while obtaining an access token
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token endpoint unreachable or timed out
    #[error("token request failed: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// Token endpoint answered with a non-2xx status
    #[error("authentication failed: status {status}, body: {body}")]
    Rejected { status: u16, body: String },

    /// Token endpoint returned a body that is not a token response
    #[error("failed to parse token response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Token endpoint answered 2xx without an access token
    #[error("token response contains an empty access_token")]
    EmptyToken,

    /// Credentials could not be encoded
    #[error("failed to serialize token request: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Application credentials for the client-credentials grant
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Access token currently held by the manager
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cached token from a token endpoint response received at `now`
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response.expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS);
        Self {
            access_token: response.access_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    /// Usable only while non-empty and `now + buffer` is strictly before the expiry
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now + Duration::seconds(TOKEN_SAFETY_BUFFER_SECS) < self.expires_at
    }
}

/// First `len` characters of a token, for display
pub fn token_prefix(token: &str, len: usize) -> String {
    token.chars().take(len).collect()
}

/// Body of `POST /access/token`
#[derive(Debug, Serialize)]
pub struct ClientCredentialsRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl<'a> ClientCredentialsRequest<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        }
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn token_expiring_in(now: DateTime<Utc>, secs: i64) -> CachedToken {
        CachedToken {
            access_token: "t".to_string(),
            expires_at: now + Duration::seconds(secs),
        }
    }

    #[test]
    fn test_token_prefix_respects_char_boundaries() {
        assert_eq!(token_prefix("abcdefghijklmnop", 12), "abcdefghijkl");
        assert_eq!(token_prefix("short", 12), "short");
        // 11 ASCII bytes then a two-byte character straddling byte 12
        assert_eq!(token_prefix("aaaaaaaaaaaéxyz", 12), "aaaaaaaaaaaé");
    }

    #[test]
    fn test_freshness_boundary() {
        let now = Utc::now();
        assert!(token_expiring_in(now, 11).is_fresh(now));
        // Exactly at the buffer is already stale
        assert!(!token_expiring_in(now, 10).is_fresh(now));
        assert!(!token_expiring_in(now, 0).is_fresh(now));
        assert!(!token_expiring_in(now, -60).is_fresh(now));

        let empty = CachedToken {
            access_token: String::new(),
            expires_at: now + Duration::seconds(3600),
        };
        assert!(!empty.is_fresh(now));
    }

    #[test]
    fn test_from_response_computes_expiry() {
        let now = Utc::now();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"Bearer","refresh_token":"r","expires_in":3600,"scope":"ALLOW_GET_PROFILE_DATA"}"#,
        )
        .unwrap();
        let token = CachedToken::from_response(response, now);
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_at, now + Duration::seconds(3600));
    }

    #[test]
    fn test_token_response_optional_fields() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(response.expires_in, 0);
        assert!(response.token_type.is_none());
        assert!(!CachedToken::from_response(response, Utc::now()).is_fresh(Utc::now()));
    }

    #[test]
    fn test_negative_expires_in_is_clamped() {
        let now = Utc::now();
        let response = TokenResponse {
            access_token: "abc".to_string(),
            token_type: None,
            refresh_token: None,
            expires_in: -30,
            scope: None,
        };
        assert_eq!(CachedToken::from_response(response, now).expires_at, now);
    }

    #[test]
    fn test_client_credentials_body() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        let body = serde_json::to_value(ClientCredentialsRequest::new(&credentials)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": "id",
                "client_secret": "secret"
            })
        );
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "super-secret".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("id"));
        assert!(!printed.contains("super-secret"));
    }

    proptest! {
        #[test]
        fn prop_fresh_iff_beyond_buffer(secs in -100_000i64..100_000) {
            let now = Utc::now();
            let token = token_expiring_in(now, secs);
            prop_assert_eq!(token.is_fresh(now), secs > TOKEN_SAFETY_BUFFER_SECS);
        }
    }
}
