// Authentication module
// Client-credentials token acquisition and caching

mod manager;
mod refresh;
mod types;

pub use manager::TokenManager;
pub use refresh::token_url;
pub use types::{token_prefix, AuthError, Credentials, TOKEN_SAFETY_BUFFER_SECS};
