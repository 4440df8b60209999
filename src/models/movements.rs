use serde::{Deserialize, Serialize};
use std::fmt;

use super::common::{null_as_default, ResourceId, User};

// ==================================================================================================
// Movement resource
// ==================================================================================================

/// Known movement states; the API sends these in varying case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementState {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl MovementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementState::Pending => "pending",
            MovementState::Completed => "completed",
            MovementState::Failed => "failed",
            MovementState::Cancelled => "cancelled",
        }
    }

    /// Case-insensitive match against the free-form `state` string of a movement
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(MovementState::Pending),
            "completed" => Some(MovementState::Completed),
            "failed" => Some(MovementState::Failed),
            "cancelled" | "canceled" => Some(MovementState::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Movement {
    pub id: Option<ResourceId>,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// Kept as received; see [`Movement::state`]
    #[serde(rename = "state", deserialize_with = "null_as_default")]
    pub raw_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reference: String,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub balance_before: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub balance_after: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<serde_json::Value>,
}

impl Movement {
    pub fn state(&self) -> Option<MovementState> {
        MovementState::parse(&self.raw_state)
    }
}

/// Filter criteria shared by the REST listing and the GraphQL search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_gte: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_lte: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Only honored by the GraphQL search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl MovementFilter {
    pub fn with_states(states: &[MovementState]) -> Self {
        Self {
            state: states.iter().map(|s| s.as_str().to_string()).collect(),
            ..Default::default()
        }
    }
}

/// Page of movements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListMovementsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Movement>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub has_more: bool,
}

// ==================================================================================================
// GraphQL search shapes (`/movements/business`)
// ==================================================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GqlMovementsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub movements: GqlMovementPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GqlMovementPage {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<GqlMovement>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GqlMovement {
    pub id: Option<ResourceId>,
    #[serde(deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub concept: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: GqlAmount,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub movement_detail: Option<GqlMovementDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GqlAmount {
    #[serde(deserialize_with = "null_as_default")]
    pub value: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GqlMovementDetail {
    pub sender_data: Option<GqlPartyData>,
    pub recipient_data: Option<GqlPartyData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GqlPartyData {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub email: Option<String>,
    pub account: Option<String>,
}

/// Party from the detailed data when it carries a name, else from the plain name
fn party(plain: Option<String>, detail: Option<GqlPartyData>) -> User {
    match detail {
        Some(d) if !d.name.is_empty() => User {
            name: d.name,
            email: d.email.unwrap_or_default(),
            ..Default::default()
        },
        _ => User::named(plain.unwrap_or_default()),
    }
}

impl From<GqlMovement> for Movement {
    fn from(item: GqlMovement) -> Self {
        let (sender_data, recipient_data) = item
            .movement_detail
            .map(|d| (d.sender_data, d.recipient_data))
            .unwrap_or_default();

        // Balances are not part of the GraphQL item
        Movement {
            id: item.id,
            amount: item.amount.value,
            currency: item.amount.currency,
            raw_state: item.state,
            reference: item.reference,
            created_at: item.created_at,
            completed_at: item.completed_at,
            sender: Some(party(item.sender, sender_data)),
            recipient: Some(party(item.recipient, recipient_data)),
            ..Default::default()
        }
    }
}

impl GqlMovementPage {
    /// Map into the REST page shape; `offset` is the page's starting position
    pub fn into_response(self, offset: u32) -> ListMovementsResponse {
        let items: Vec<Movement> = self.items.into_iter().map(Movement::from).collect();
        let seen = i64::from(offset) + items.len() as i64;
        ListMovementsResponse {
            has_more: seen < self.total_count,
            items,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_parsing_is_case_insensitive() {
        assert_eq!(MovementState::parse("COMPLETED"), Some(MovementState::Completed));
        assert_eq!(MovementState::parse("Pending"), Some(MovementState::Pending));
        assert_eq!(MovementState::parse("canceled"), Some(MovementState::Cancelled));
        assert_eq!(MovementState::parse("processing"), None);
    }

    #[test]
    fn test_rest_movement_decoding() {
        let movement: Movement = serde_json::from_value(json!({
            "id": 9812,
            "amount": -500,
            "currency": "USD",
            "state": "Completed",
            "reference": "TX-1",
            "balanceBefore": 1000,
            "balanceAfter": 500
        }))
        .unwrap();
        assert_eq!(movement.id, Some(ResourceId::Numeric(9812)));
        assert_eq!(movement.state(), Some(MovementState::Completed));
        assert_eq!(movement.balance_after, 500);
        assert!(movement.sender.is_none());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let movement: Movement = serde_json::from_value(json!({
            "id": 1,
            "amount": null,
            "currency": "USD",
            "state": null,
            "reference": null,
            "balanceBefore": null,
            "sender": null
        }))
        .unwrap();
        assert_eq!(movement.amount, 0);
        assert_eq!(movement.reference, "");
        assert_eq!(movement.state(), None);
        assert!(movement.sender.is_none());

        let data: GqlMovementsData = serde_json::from_value(json!({
            "movements": {
                "items": [{
                    "id": "mv-2",
                    "reference": null,
                    "concept": null,
                    "state": "pending",
                    "amount": {"value": null, "currency": null},
                    "movementDetail": {"senderData": {"name": null}}
                }],
                "totalCount": null
            }
        }))
        .unwrap();
        let page = data.movements.into_response(0);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.items[0].amount, 0);
        assert_eq!(page.items[0].state(), Some(MovementState::Pending));

        let empty: GqlMovementsData =
            serde_json::from_value(json!({"movements": {"items": null}})).unwrap();
        assert!(empty.movements.items.is_empty());
    }

    #[test]
    fn test_filter_omits_empty_fields() {
        let filter = MovementFilter {
            currency: Some("EUR".to_string()),
            amount_gte: Some(100),
            ..MovementFilter::with_states(&[MovementState::Pending])
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"state": ["pending"], "currency": "EUR", "amountGte": 100})
        );
        assert_eq!(serde_json::to_string(&MovementFilter::default()).unwrap(), "{}");
    }

    #[test]
    fn test_graphql_item_mapping() {
        let item: GqlMovement = serde_json::from_value(json!({
            "id": "mv-1",
            "reference": "R1",
            "concept": "Dinner",
            "state": "completed",
            "createdAt": "2024-05-01T12:00:00Z",
            "amount": {"value": 2500, "currency": "EUR"},
            "sender": "ana",
            "recipient": "luis",
            "movementDetail": {
                "senderData": {"name": "Ana Pérez", "email": "ana@example.com"},
                "recipientData": {"name": "", "account": "ES00"}
            }
        }))
        .unwrap();

        let movement = Movement::from(item);
        assert_eq!(movement.id, Some(ResourceId::Text("mv-1".to_string())));
        assert_eq!(movement.amount, 2500);
        assert_eq!(movement.currency, "EUR");
        let sender = movement.sender.unwrap();
        assert_eq!(sender.name, "Ana Pérez");
        assert_eq!(sender.email, "ana@example.com");
        // Empty detail name falls back to the plain recipient name
        assert_eq!(movement.recipient.unwrap().name, "luis");
    }

    #[test]
    fn test_page_has_more() {
        let page = GqlMovementPage {
            items: vec![GqlMovement::default(), GqlMovement::default()],
            total_count: 5,
        };
        let resp = page.clone().into_response(0);
        assert_eq!(resp.items.len(), 2);
        assert!(resp.has_more);

        assert!(!page.into_response(3).has_more);
    }
}
