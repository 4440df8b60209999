//! Async client for the Tropipay API.
//!
//! Every call goes through one authenticated pipeline: a [`auth::TokenManager`]
//! caches the client-credentials token and refreshes it shortly before expiry,
//! and [`http_client::TropipayHttpClient`] attaches it, sends the request and
//! classifies the response into [`ApiError`] kinds.
//!
//! ```no_run
//! # async fn run() -> tropipay::Result<()> {
//! use tropipay::{Environment, TropipayClient};
//!
//! let client = TropipayClient::builder("client-id", "client-secret")
//!     .environment(Environment::Sandbox)
//!     .build()?;
//! let cards = client.list_payment_cards().await?;
//! println!("{} cards", cards.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;

pub use client::{ClientBuilder, Environment, TropipayClient};
pub use error::{ApiError, Result};
