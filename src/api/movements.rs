use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;

use crate::client::TropipayClient;
use crate::error::{ApiError, Result};
use crate::http_client::NO_BODY;
use crate::models::movements::GqlMovementsData;
use crate::models::{GraphQlRequest, GraphQlResponse, ListMovementsResponse, MovementFilter};

/// GraphQL endpoint for business movement search
const SEARCH_MOVEMENTS_PATH: &str = "/movements/business";

pub const SEARCH_MOVEMENTS_QUERY: &str = r#"query GetMovements($filter: MovementFilter, $pagination: PaginationInput) {
  movements(filter: $filter, pagination: $pagination) {
    items {
      id
      reference
      concept
      state
      createdAt
      completedAt
      amount { value currency }
      sender
      recipient
      movementDetail {
        senderData { name email }
        recipientData { name account }
      }
    }
    totalCount
  }
}"#;

#[derive(Debug, Serialize)]
struct SearchVariables<'a> {
    filter: Option<&'a MovementFilter>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct Pagination {
    limit: u32,
    offset: u32,
}

/// Append `limit`, `offset` (when non-zero) and the JSON-encoded filter as `query`
pub fn movements_query_path(
    path: &str,
    limit: u32,
    offset: u32,
    filter: Option<&MovementFilter>,
) -> Result<String> {
    let mut params = form_urlencoded::Serializer::new(String::new());
    let mut any = false;

    if limit > 0 {
        params.append_pair("limit", &limit.to_string());
        any = true;
    }
    if offset > 0 {
        params.append_pair("offset", &offset.to_string());
        any = true;
    }
    if let Some(filter) = filter {
        let encoded = serde_json::to_string(filter).map_err(ApiError::Serialization)?;
        params.append_pair("query", &encoded);
        any = true;
    }

    if any {
        Ok(format!("{}?{}", path, params.finish()))
    } else {
        Ok(path.to_string())
    }
}

impl TropipayClient {
    /// Movements of the authenticated user
    pub async fn list_movements(
        &self,
        limit: u32,
        offset: u32,
        filter: Option<&MovementFilter>,
    ) -> Result<ListMovementsResponse> {
        self.list_movements_at("/movements/", limit, offset, filter)
            .await
    }

    /// Movements of one account
    pub async fn list_account_movements(
        &self,
        account_id: &str,
        limit: u32,
        offset: u32,
        filter: Option<&MovementFilter>,
    ) -> Result<ListMovementsResponse> {
        let path = format!("/accounts/{}/movements", account_id);
        self.list_movements_at(&path, limit, offset, filter).await
    }

    async fn list_movements_at(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
        filter: Option<&MovementFilter>,
    ) -> Result<ListMovementsResponse> {
        let path = movements_query_path(path, limit, offset, filter)?;
        self.request(Method::GET, &path, NO_BODY).await
    }

    /// Advanced search through the GraphQL business endpoint
    pub async fn search_movements(
        &self,
        filter: Option<&MovementFilter>,
        limit: u32,
        offset: u32,
    ) -> Result<ListMovementsResponse> {
        let request = GraphQlRequest::new(
            SEARCH_MOVEMENTS_QUERY,
            SearchVariables {
                filter,
                pagination: Pagination { limit, offset },
            },
        );

        let response: GraphQlResponse<GqlMovementsData> = self
            .request(Method::POST, SEARCH_MOVEMENTS_PATH, Some(&request))
            .await?;

        Ok(response.into_data()?.movements.into_response(offset))
    }
}
