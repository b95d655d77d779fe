//! # Domain Types
//!
//! Core domain types shared by the storefront rules and the API client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │  OrderLineItem  │   │ CatalogRecord   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, user_id    │──►│  quantity       │   │  id             │       │
//! │  │  total          │   │  unit_price     │   │  nombre         │       │
//! │  │  shipping?      │   └─────────────────┘   └─────────────────┘       │
//! │  │  commission?    │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ ShippingMethod  │   │ PaymentStatus   │       │
//! │  │  bps (u32)      │   │  Pickup         │   │  Pending        │       │
//! │  │  800 = 8%       │   │  Delivery(lbl)  │   │  Paid           │       │
//! │  └─────────────────┘   └─────────────────┘   │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names follow the store API (`pedidos`, `estadoPago`, `nombre`...),
//! Rust names follow Rust.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::financials::OrderFinancials;
use crate::money::{self, Money};
use crate::PICKUP_LABEL;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The fixed rate applied to order subtotals.
    #[inline]
    pub const fn order_default() -> Self {
        TaxRate(crate::ORDER_TAX_RATE_BPS)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::order_default()
    }
}

// =============================================================================
// Order Line Item
// =============================================================================

/// A product line on an order.
///
/// Immutable once the order exists; the storefront only reads these.
/// A negative `precio` is rejected when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineItem {
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    #[serde(rename = "precio", with = "money::decimal::non_negative")]
    #[ts(as = "f64")]
    pub unit_price: Money,
}

impl OrderLineItem {
    pub const fn new(quantity: u32, unit_price: Money) -> Self {
        OrderLineItem {
            quantity,
            unit_price,
        }
    }

    /// Quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_multiply_quantity(i64::from(self.quantity))
            .ok_or(CoreError::AmountOverflow { what: "line total" })
    }
}

// =============================================================================
// Shipping Method
// =============================================================================

/// How an order reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingMethod {
    /// In-store pickup, never charged.
    Pickup,
    /// Any delivery option, carrying the label the store configured.
    Delivery(String),
}

impl ShippingMethod {
    /// Interprets the shipping-method label stored on an order.
    ///
    /// A missing label, a blank label or the pickup sentinel (any case)
    /// all mean pickup.
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::types::ShippingMethod;
    ///
    /// assert_eq!(ShippingMethod::from_label(None), ShippingMethod::Pickup);
    /// assert_eq!(ShippingMethod::from_label(Some(" Pickup ")), ShippingMethod::Pickup);
    /// assert!(ShippingMethod::from_label(Some("Delivery")).is_delivery());
    /// ```
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => ShippingMethod::Pickup,
            Some(l) if l.eq_ignore_ascii_case(PICKUP_LABEL) => ShippingMethod::Pickup,
            Some(l) => ShippingMethod::Delivery(l.to_string()),
        }
    }

    #[inline]
    pub fn is_delivery(&self) -> bool {
        matches!(self, ShippingMethod::Delivery(_))
    }

    /// The label to show in the order view.
    pub fn label(&self) -> &str {
        match self {
            ShippingMethod::Pickup => PICKUP_LABEL,
            ShippingMethod::Delivery(label) => label,
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment state of an order, as the API's `estadoPago` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentStatus {
    /// Awaiting payment confirmation.
    #[serde(rename = "pendiente")]
    Pending,
    /// Payment confirmed.
    #[serde(rename = "pagado")]
    Paid,
    /// Order cancelled before payment.
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl PaymentStatus {
    #[inline]
    pub const fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as returned by `GET /api/pedidos/usuario/:id`.
///
/// `shipping` and `commission` are only present on orders written after the
/// store began persisting them; older orders carry just `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,

    #[serde(rename = "usuarioId")]
    pub user_id: i64,

    #[serde(default)]
    pub items: Vec<OrderLineItem>,

    #[serde(with = "money::decimal")]
    pub total: Money,

    #[serde(rename = "metodoEnvio", default)]
    pub shipping_method: Option<String>,

    #[serde(rename = "estadoPago", default)]
    pub payment_status: PaymentStatus,

    #[serde(rename = "costoEnvio", with = "money::decimal::option", default)]
    pub shipping: Option<Money>,

    #[serde(rename = "comision", with = "money::decimal::option", default)]
    pub commission: Option<Money>,

    #[serde(rename = "fecha", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Parsed shipping method.
    pub fn shipping_method(&self) -> ShippingMethod {
        ShippingMethod::from_label(self.shipping_method.as_deref())
    }

    /// Financial breakdown for the order detail view.
    ///
    /// Stored shipping/commission win; reconstruction from the total is
    /// the fallback for orders that predate those columns. Fails only when
    /// the amounts overflow.
    pub fn financials(&self) -> CoreResult<OrderFinancials> {
        if self.shipping.is_some() || self.commission.is_some() {
            OrderFinancials::from_stored(
                &self.items,
                self.total,
                self.shipping.unwrap_or_default(),
                self.commission.unwrap_or_default(),
            )
        } else {
            OrderFinancials::reconstruct(&self.items, self.total, &self.shipping_method())
        }
    }
}

// =============================================================================
// Catalog Record
// =============================================================================

/// A row of the admin master table (payment methods, categories, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogRecord {
    pub id: i64,
    pub nombre: String,
}

/// Anything with an id and a display name that must be unique.
pub trait NamedRecord {
    fn record_id(&self) -> i64;
    fn record_name(&self) -> &str;
}

impl NamedRecord for CatalogRecord {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn record_name(&self) -> &str {
        &self.nombre
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
