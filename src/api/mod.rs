// Resource operations built on TropipayClient::request

mod movements;
mod payment_cards;
mod profile;

pub use movements::{movements_query_path, SEARCH_MOVEMENTS_QUERY};
