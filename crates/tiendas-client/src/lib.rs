//! # tiendas-client: Store API Client
//!
//! Async access to the store REST API, with the client-side rules from
//! `tiendas-core` applied before anything is sent.
//!
//! ## Usage
//! ```rust,no_run
//! use tiendas_client::{ClientConfig, StoreClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StoreClient::new(ClientConfig::load()?)?;
//!
//! for order in client.orders_for_user(4).await? {
//!     let breakdown = order.financials()?;
//!     println!("#{} total {}", order.id, breakdown.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;

pub use api::{ConfirmOutcome, StoreClient, Subcategory};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult};
