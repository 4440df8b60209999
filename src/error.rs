// Error handling module
// Defines the error kinds surfaced by every client call

use thiserror::Error;

use crate::auth::AuthError;

/// Errors that can occur while executing an API call
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be encoded as JSON
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Transport-level failure (DNS, connection refused, timeout)
    #[error("HTTP request failed: {0}")]
    Connectivity(#[from] reqwest::Error),

    /// Could not obtain an access token
    #[error("Failed to get token: {0}")]
    Auth(#[from] AuthError),

    /// Target endpoint answered with status >= 400
    #[error("API error: {url} (status: {status}) - {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    /// Success body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// GraphQL envelope carried a non-empty `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Client construction failed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// True for timeouts and connection failures on either the token or target call
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ApiError::Connectivity(_) | ApiError::Auth(AuthError::Connectivity(_))
        )
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
