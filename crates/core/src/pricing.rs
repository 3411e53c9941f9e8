//! Order totals: subtotal, delivery fee, promo discount, and grand total.
//!
//! # Rounding
//!
//! Discounts are computed in decimal arithmetic and floored to whole cents:
//! `discount = floor(subtotal * percent / 100)`. The same [`OrderTotals`]
//! value feeds both the cart view and the checkout payload, so the displayed
//! total and the submitted total cannot drift apart.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::promo::PromoApplication;
use crate::types::Money;

/// Errors constructing a [`DiscountPercent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PercentError {
    #[error("discount percentage must be between 0 and 100 (got {0})")]
    OutOfRange(Decimal),
}

/// A discount percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a percentage, rejecting values outside `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`PercentError::OutOfRange`] for negative values or values
    /// above 100.
    pub fn new(value: Decimal) -> Result<Self, PercentError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PercentError::OutOfRange(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Create a whole-number percentage, clamped to 100.
    #[must_use]
    pub fn whole(value: u8) -> Self {
        Self(Decimal::from(value.min(100)))
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// The discount this percentage takes off `amount`, floored to cents.
    #[must_use]
    pub fn of(self, amount: Money) -> Money {
        let discount = (Decimal::from(amount.cents()) * self.0 / Decimal::ONE_HUNDRED).floor();
        Money::from_cents(discount.to_i64().unwrap_or_default())
    }
}

impl std::fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Serialize for DiscountPercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.scale() == 0 {
            serializer.serialize_u64(self.0.to_u64().unwrap_or_default())
        } else {
            serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
        }
    }
}

impl<'de> Deserialize<'de> for DiscountPercent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Delivery fee rule: a flat fee, waived above a subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPolicy {
    pub fee: Money,
    /// Subtotals strictly above this amount ship free.
    pub free_threshold: Money,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            fee: Money::ZERO,
            free_threshold: Money::from_cents(2000),
        }
    }
}

impl DeliveryPolicy {
    /// The delivery fee charged for `subtotal`.
    #[must_use]
    pub fn fee_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_threshold {
            Money::ZERO
        } else {
            self.fee
        }
    }
}

/// Derived totals for a cart with an optional applied promo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub discount_percent: DiscountPercent,
    /// Non-zero only when a promo is applied.
    pub discount_amount: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Compute totals for `subtotal` under `promo` and `delivery`.
    #[must_use]
    pub fn compute(subtotal: Money, promo: &PromoApplication, delivery: &DeliveryPolicy) -> Self {
        let discount_percent = promo.discount_percent();
        let discount_amount = promo.discount_for(subtotal);
        let delivery_fee = delivery.fee_for(subtotal);

        Self {
            subtotal,
            delivery_fee,
            discount_percent,
            discount_amount,
            total: subtotal.saturating_sub(discount_amount) + delivery_fee,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn applied(percent: u8) -> PromoApplication {
        let mut promo = PromoApplication::default();
        promo.accept("SAVE", DiscountPercent::whole(percent));
        promo
    }

    #[test]
    fn test_twenty_percent_of_two_thousand() {
        let totals = OrderTotals::compute(
            Money::from_cents(2000),
            &applied(20),
            &DeliveryPolicy::default(),
        );
        assert_eq!(totals.discount_amount, Money::from_cents(400));
        assert_eq!(totals.total, Money::from_cents(1600));
    }

    #[test]
    fn test_fractional_discount_is_floored() {
        let totals = OrderTotals::compute(
            Money::from_cents(1398),
            &applied(10),
            &DeliveryPolicy::default(),
        );
        assert_eq!(totals.discount_amount, Money::from_cents(139));
        assert_eq!(totals.total, Money::from_cents(1259));
    }

    #[test]
    fn test_unapplied_promo_has_no_discount() {
        let mut promo = PromoApplication::default();
        promo.reject("BOGUS", "Invalid promocode");

        let totals =
            OrderTotals::compute(Money::from_cents(1500), &promo, &DeliveryPolicy::default());
        assert_eq!(totals.discount_amount, Money::ZERO);
        assert!(totals.discount_percent.is_zero());
        assert_eq!(totals.total, Money::from_cents(1500));
    }

    #[test]
    fn test_delivery_fee_waived_above_threshold() {
        let policy = DeliveryPolicy {
            fee: Money::from_cents(299),
            free_threshold: Money::from_cents(2000),
        };
        assert_eq!(policy.fee_for(Money::from_cents(2000)), Money::from_cents(299));
        assert_eq!(policy.fee_for(Money::from_cents(2001)), Money::ZERO);

        let totals =
            OrderTotals::compute(Money::from_cents(1000), &applied(50), &policy);
        assert_eq!(totals.discount_amount, Money::from_cents(500));
        assert_eq!(totals.total, Money::from_cents(799));
    }

    #[test]
    fn test_percent_range() {
        assert!(DiscountPercent::new(Decimal::from(-1)).is_err());
        assert!(DiscountPercent::new(Decimal::from(101)).is_err());
        assert!(DiscountPercent::new(Decimal::new(125, 1)).is_ok());
        assert_eq!(DiscountPercent::whole(150), DiscountPercent::whole(100));
    }

    #[test]
    fn test_percent_of_fractional_rate() {
        let percent = DiscountPercent::new(Decimal::new(125, 1)).unwrap();
        assert_eq!(percent.of(Money::from_cents(1000)), Money::from_cents(125));
        assert_eq!(percent.of(Money::from_cents(999)), Money::from_cents(124));
    }

    #[test]
    fn test_percent_serde() {
        let whole: DiscountPercent = serde_json::from_str("15").unwrap();
        assert_eq!(whole, DiscountPercent::whole(15));
        assert_eq!(serde_json::to_string(&whole).unwrap(), "15");

        let fractional: DiscountPercent = serde_json::from_str("12.5").unwrap();
        assert_eq!(serde_json::to_string(&fractional).unwrap(), "12.5");

        assert!(serde_json::from_str::<DiscountPercent>("250").is_err());
    }
}
