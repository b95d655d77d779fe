//! # tiendas-core: Pure Storefront Rules
//!
//! This crate holds the rules the storefront and admin panel apply on the
//! client: form validation, card checks, and the order financial breakdown.
//! Nothing here performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tiendas Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Storefront / Admin panel (UI)                    │   │
//! │  │   Checkout form ──► Payment methods ──► Orders ──► Catalog      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ tiendas-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐     │   │
//! │  │  │ validation │ │ payment  │ │   form   │ │  financials  │     │   │
//! │  │  │ names, %   │ │ Luhn,    │ │ rule set │ │  breakdown   │     │   │
//! │  │  │ duplicates │ │ expiry   │ │ + errors │ │  of a total  │     │   │
//! │  │  └────────────┘ └──────────┘ └──────────┘ └──────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               tiendas-client (REST API client)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Orders, line items, shipping and payment status
//! - [`error`] - Validation and domain error types
//! - [`validation`] - Name, commission and e-mail validators, duplicate check
//! - [`payment`] - Card number (Luhn), expiry date, cardholder validators
//! - [`form`] - Aggregate form validation
//! - [`financials`] - Order financial breakdown
//! - [`a11y`] - Live-region announcements and focus trapping
//!
//! ## Example Usage
//!
//! ```rust
//! use tiendas_core::financials::OrderFinancials;
//! use tiendas_core::money::Money;
//! use tiendas_core::types::{OrderLineItem, ShippingMethod};
//!
//! let items = [OrderLineItem::new(2, Money::from_cents(1000))];
//! let breakdown = OrderFinancials::reconstruct(
//!     &items,
//!     Money::from_cents(2560),
//!     &ShippingMethod::from_label(Some("Delivery")),
//! )
//! .unwrap();
//!
//! assert_eq!(breakdown.shipping.cents(), 400);
//! assert_eq!(breakdown.commission.cents(), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod a11y;
pub mod error;
pub mod financials;
pub mod form;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use financials::OrderFinancials;
pub use form::{FieldValue, FormData, FormValidator, ValidationErrors};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every order subtotal, in basis points (8%).
///
/// Orders only store their final total; the tax line shown on the order
/// detail view is always recomputed at this rate.
pub const ORDER_TAX_RATE_BPS: u32 = 800;

/// Shipping-method label that means in-store pickup (no delivery fee).
pub const PICKUP_LABEL: &str = "pickup";

/// Upper bound for a payment-method commission, in percent.
pub const MAX_COMMISSION_PERCENT: f64 = 100.0;
