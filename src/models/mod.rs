// Data models for Tropipay resources

pub mod common;
pub mod graphql;
pub mod movements;
pub mod payment_cards;

pub use common::{ResourceId, User};
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use movements::{ListMovementsResponse, Movement, MovementFilter, MovementState};
pub use payment_cards::{CreatePaymentCardRequest, PaymentCard};
