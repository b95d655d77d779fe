//! # Order Financials
//!
//! Breaks an order total down into the lines shown on the order detail view.
//!
//! ## Two Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order with stored shipping / commission                                │
//! │    subtotal = Σ qty × price                                             │
//! │    tax      = subtotal × 8%                                             │
//! │    total    = stored total                             (from_stored)    │
//! │    unaccounted = total − (subtotal + tax + shipping + commission)       │
//! │                                                                         │
//! │  Legacy order (only `total` stored)                                     │
//! │    subtotal, tax as above                                               │
//! │    remainder = total − subtotal − tax                                   │
//! │    delivery && remainder > 0 ──► shipping   = remainder                 │
//! │    otherwise                 ──► commission = remainder  (reconstruct)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reconstruction cannot tell shipping and commission apart when an order
//! had both; the whole remainder lands on one line. It only exists for
//! orders written before those amounts were persisted.
//!
//! Inconsistent inputs never fail: a negative remainder or a stored total
//! that disagrees with its parts is reported, not rejected. The only error
//! is [`CoreError::AmountOverflow`], when the amounts do not fit in cents.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderLineItem, ShippingMethod, TaxRate};

/// The display breakdown of an order.
///
/// `total` is always the amount the order was charged. For reconstructed
/// breakdowns `subtotal + tax + shipping + commission == total`; for stored
/// ones any difference is reported by [`OrderFinancials::unaccounted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderFinancials {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub commission: Money,
    pub total: Money,
}

impl OrderFinancials {
    /// Σ quantity × unit price.
    pub fn subtotal(items: &[OrderLineItem]) -> CoreResult<Money> {
        items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.line_total()?)
                .ok_or(CoreError::AmountOverflow { what: "subtotal" })
        })
    }

    /// Builds the breakdown from amounts the order stored explicitly.
    ///
    /// `total` is the stored order total and is kept as is, even when it
    /// disagrees with the recomputed parts.
    pub fn from_stored(
        items: &[OrderLineItem],
        total: Money,
        shipping: Money,
        commission: Money,
    ) -> CoreResult<Self> {
        let subtotal = Self::subtotal(items)?;
        let tax = subtotal.calculate_tax(TaxRate::order_default());

        let financials = OrderFinancials {
            subtotal,
            tax,
            shipping,
            commission,
            total,
        };
        financials
            .components_sum()
            .ok_or(CoreError::AmountOverflow { what: "order breakdown" })?;
        Ok(financials)
    }

    /// Infers shipping and commission from a stored total.
    ///
    /// The remainder after subtotal and tax is attributed entirely to
    /// shipping when the order was delivered and the remainder is positive,
    /// otherwise entirely to commission. A negative remainder (total lower
    /// than subtotal + tax) is passed through as a negative commission.
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::financials::OrderFinancials;
    /// use tiendas_core::money::Money;
    /// use tiendas_core::types::{OrderLineItem, ShippingMethod};
    ///
    /// let items = [OrderLineItem::new(2, Money::from_cents(1000))];
    /// let f = OrderFinancials::reconstruct(&items, Money::from_cents(2160), &ShippingMethod::Pickup)
    ///     .unwrap();
    ///
    /// assert_eq!(f.subtotal.cents(), 2000);
    /// assert_eq!(f.tax.cents(), 160);
    /// assert!(f.shipping.is_zero() && f.commission.is_zero());
    /// ```
    pub fn reconstruct(
        items: &[OrderLineItem],
        total: Money,
        shipping: &ShippingMethod,
    ) -> CoreResult<Self> {
        let subtotal = Self::subtotal(items)?;
        let tax = subtotal.calculate_tax(TaxRate::order_default());
        let remainder = subtotal
            .checked_add(tax)
            .and_then(|charged| total.checked_sub(charged))
            .ok_or(CoreError::AmountOverflow { what: "remainder" })?;

        let (shipping, commission) = if shipping.is_delivery() && remainder.is_positive() {
            (remainder, Money::zero())
        } else {
            (Money::zero(), remainder)
        };

        Ok(OrderFinancials {
            subtotal,
            tax,
            shipping,
            commission,
            total,
        })
    }

    /// True when the stored total was lower than subtotal plus tax.
    #[inline]
    pub fn has_negative_adjustment(&self) -> bool {
        self.commission.is_negative()
    }

    /// Sum of the four components, `None` if it does not fit in cents.
    pub fn components_sum(&self) -> Option<Money> {
        self.subtotal
            .checked_add(self.tax)?
            .checked_add(self.shipping)?
            .checked_add(self.commission)
    }

    /// Part of the charged total that the components do not explain.
    ///
    /// Zero for reconstructed breakdowns. Non-zero when a stored total
    /// disagrees with its stored shipping and commission.
    pub fn unaccounted(&self) -> Option<Money> {
        self.total.checked_sub(self.components_sum()?)
    }

    /// True when the components add up to the charged total.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.unaccounted().map_or(false, |m| m.is_zero())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_at_ten() -> Vec<OrderLineItem> {
        vec![OrderLineItem::new(2, Money::from_cents(1000))]
    }

    #[test]
    fn test_pickup_order_with_exact_total() {
        let f = OrderFinancials::reconstruct(
            &two_at_ten(),
            Money::from_cents(2160),
            &ShippingMethod::from_label(None),
        )
        .unwrap();

        assert_eq!(f.subtotal.cents(), 2000);
        assert_eq!(f.tax.cents(), 160);
        assert!(f.shipping.is_zero());
        assert!(f.commission.is_zero());
        assert_eq!(f.components_sum(), Some(f.total));
    }

    #[test]
    fn test_delivery_remainder_is_shipping() {
        let f = OrderFinancials::reconstruct(
            &two_at_ten(),
            Money::from_cents(2560),
            &ShippingMethod::from_label(Some("Delivery")),
        )
        .unwrap();

        assert_eq!(f.shipping.cents(), 400);
        assert!(f.commission.is_zero());
        assert_eq!(f.components_sum(), Some(Money::from_cents(2560)));
    }

    #[test]
    fn test_pickup_remainder_is_commission() {
        let f = OrderFinancials::reconstruct(
            &two_at_ten(),
            Money::from_cents(2210),
            &ShippingMethod::from_label(Some("pickup")),
        )
        .unwrap();

        assert!(f.shipping.is_zero());
        assert_eq!(f.commission.cents(), 50);
    }

    #[test]
    fn test_negative_remainder_goes_to_commission() {
        let f = OrderFinancials::reconstruct(
            &two_at_ten(),
            Money::from_cents(2000),
            &ShippingMethod::from_label(Some("Delivery")),
        )
        .unwrap();

        assert!(f.shipping.is_zero());
        assert_eq!(f.commission.cents(), -160);
        assert!(f.has_negative_adjustment());
        assert_eq!(f.components_sum(), Some(Money::from_cents(2000)));
    }

    #[test]
    fn test_empty_order() {
        let f = OrderFinancials::reconstruct(&[], Money::from_cents(500), &ShippingMethod::Pickup)
            .unwrap();
        assert!(f.subtotal.is_zero());
        assert!(f.tax.is_zero());
        assert_eq!(f.commission.cents(), 500);
    }

    #[test]
    fn test_from_stored() {
        let f = OrderFinancials::from_stored(
            &two_at_ten(),
            Money::from_cents(2635),
            Money::from_cents(400),
            Money::from_cents(75),
        )
        .unwrap();
        assert_eq!(f.total.cents(), 2000 + 160 + 400 + 75);
        assert!(f.is_consistent());
        assert!(!f.has_negative_adjustment());
    }

    #[test]
    fn test_from_stored_keeps_charged_total() {
        // The server charged 27.00 but only explains 26.35 of it.
        let f = OrderFinancials::from_stored(
            &two_at_ten(),
            Money::from_cents(2700),
            Money::from_cents(400),
            Money::from_cents(75),
        )
        .unwrap();
        assert_eq!(f.total.cents(), 2700);
        assert!(!f.is_consistent());
        assert_eq!(f.unaccounted(), Some(Money::from_cents(65)));
    }

    #[test]
    fn test_overflowing_items_are_an_error() {
        let items = [OrderLineItem::new(2, Money::from_cents(i64::MAX / 2 + 1))];
        let err = OrderFinancials::reconstruct(&items, Money::zero(), &ShippingMethod::Pickup)
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { what: "line total" }));

        let items = [
            OrderLineItem::new(1, Money::from_cents(i64::MAX - 10)),
            OrderLineItem::new(1, Money::from_cents(11)),
        ];
        assert!(OrderFinancials::subtotal(&items).is_err());

        let f = OrderFinancials::from_stored(
            &two_at_ten(),
            Money::zero(),
            Money::from_cents(i64::MAX),
            Money::zero(),
        );
        assert!(f.is_err());
    }

    #[test]
    fn test_remainder_overflow_is_an_error() {
        let items = [OrderLineItem::new(1, Money::from_cents(1_000))];
        let f = OrderFinancials::reconstruct(&items, Money::from_cents(i64::MIN), &ShippingMethod::Pickup);
        assert!(matches!(f, Err(CoreError::AmountOverflow { what: "remainder" })));
    }

    proptest! {
        #[test]
        fn prop_components_always_sum_to_total(
            lines in proptest::collection::vec((0u32..50, 0i64..100_000), 0..10),
            total in -1_000_000i64..10_000_000,
            delivery in any::<bool>(),
        ) {
            let items: Vec<OrderLineItem> = lines
                .into_iter()
                .map(|(qty, cents)| OrderLineItem::new(qty, Money::from_cents(cents)))
                .collect();
            let method = if delivery {
                ShippingMethod::Delivery("Delivery".to_string())
            } else {
                ShippingMethod::Pickup
            };

            let f = OrderFinancials::reconstruct(&items, Money::from_cents(total), &method).unwrap();
            prop_assert_eq!(f.components_sum(), Some(f.total));
            prop_assert!(f.shipping.is_zero() || f.commission.is_zero());
            prop_assert!(!f.shipping.is_negative());
            prop_assert!(f.is_consistent());
        }
    }
}
