use reqwest::Method;

use crate::client::TropipayClient;
use crate::error::Result;
use crate::http_client::NO_BODY;
use crate::models::{CreatePaymentCardRequest, PaymentCard};

impl TropipayClient {
    /// All payment cards of the account
    pub async fn list_payment_cards(&self) -> Result<Vec<PaymentCard>> {
        self.request(Method::GET, "/paymentcards", NO_BODY).await
    }

    pub async fn get_payment_card(&self, id: &str) -> Result<PaymentCard> {
        self.request(Method::GET, &format!("/paymentcards/{}", id), NO_BODY)
            .await
    }

    pub async fn create_payment_card(&self, req: &CreatePaymentCardRequest) -> Result<PaymentCard> {
        self.request(Method::POST, "/paymentcards", Some(req)).await
    }

    pub async fn delete_payment_card(&self, id: &str) -> Result<()> {
        self.request_discard(Method::DELETE, &format!("/paymentcards/{}", id), NO_BODY)
            .await
    }
}
