use serde::{Deserialize, Serialize};

use super::common::{null_as_default, ResourceId};

// ==================================================================================================
// Payment card (payment link) resource
// ==================================================================================================

/// Payment link / card payment order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCard {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub credential_id: Option<ResourceId>,
    #[serde(deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub concept: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Amount in the smallest currency unit (cents)
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub single_use: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub reason_id: i64,
    pub reason_des: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    pub qr_image: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub short_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_days: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub lang: String,
    pub url_success: Option<String>,
    pub url_failed: Option<String>,
    pub url_notification: Option<String>,
    pub account_id: Option<i64>,
    pub expiration_date: Option<String>,
    pub service_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub has_client: bool,
    pub payment_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub save_token: bool,
    #[serde(rename = "paymentcardType", deserialize_with = "null_as_default")]
    pub payment_card_type: i64,
    pub image_base: Option<String>,
    #[serde(rename = "force3ds", deserialize_with = "null_as_default")]
    pub force_3ds: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub origin: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub strict_postal_code_check: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub strict_address_check: bool,
    pub destination_currency: Option<String>,
    #[serde(rename = "payment3DS", deserialize_with = "null_as_default")]
    pub payment_3ds: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload for `POST /paymentcards`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentCardRequest {
    pub number: String,
    pub cvc: String,
    pub holder_name: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
}
