use serde::{Deserialize, Serialize};

use super::common::null_as_default;
use crate::error::ApiError;

/// GraphQL request envelope
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<V: Serialize> {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
}

impl<V: Serialize> GraphQlRequest<V> {
    pub fn new(query: impl Into<String>, variables: V) -> Self {
        Self {
            query: query.into(),
            variables: Some(variables),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// GraphQL response envelope; a 200 response may still carry errors
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap the `data` field, failing with the first reported error
    pub fn into_data(self) -> Result<T, ApiError> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(ApiError::GraphQl(first.message));
        }
        self.data
            .ok_or_else(|| ApiError::GraphQl("response contains no data".to_string()))
    }
}
