use reqwest::Method;

use crate::client::TropipayClient;
use crate::error::Result;
use crate::http_client::NO_BODY;
use crate::models::User;

impl TropipayClient {
    /// Profile of the account owning the credentials
    pub async fn get_user_profile(&self) -> Result<User> {
        self.request(Method::GET, "/users/profile", NO_BODY).await
    }
}
