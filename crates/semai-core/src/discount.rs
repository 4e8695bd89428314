//! # Discount Module
//!
//! A discount is applied once to the cart subtotal, never per line.
//!
//! ## The Kind-Switch Caveat
//! The entry field holds one raw number and a kind selector next to it.
//! Switching the kind does NOT rescale the number: "50" entered as rupiah
//! becomes 50% when the selector flips. That is how the product behaves
//! today; [`Discount::with_kind`] makes the reinterpretation explicit in
//! the API (and the tests pin it) instead of leaving it an accident of
//! UI state.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Discount
// =============================================================================

/// How the raw discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Value is a fixed rupiah amount.
    Amount,
    /// Value is a percentage of the subtotal (0-100).
    Percent,
}

/// A subtotal-level discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub kind: DiscountKind,
    /// Raw entered value; rupiah or percent depending on `kind`.
    pub value: i64,
}

impl Discount {
    /// No discount.
    pub const fn none() -> Self {
        Discount {
            kind: DiscountKind::Amount,
            value: 0,
        }
    }

    /// Fixed rupiah discount.
    pub const fn amount(rupiah: i64) -> Self {
        Discount {
            kind: DiscountKind::Amount,
            value: rupiah,
        }
    }

    /// Percentage discount.
    pub const fn percent(pct: i64) -> Self {
        Discount {
            kind: DiscountKind::Percent,
            value: pct,
        }
    }

    /// Reinterprets the raw value under another kind.
    ///
    /// Deliberately does NOT rescale: `amount(50).with_kind(Percent)` is a
    /// 50% discount. See the module docs.
    pub const fn with_kind(self, kind: DiscountKind) -> Self {
        Discount {
            kind,
            value: self.value,
        }
    }

    /// The rupiah amount taken off the given subtotal.
    ///
    /// A fixed amount larger than the subtotal is returned as-is; the
    /// grand-total computation floors at zero instead of clamping here.
    pub fn amount_off(&self, subtotal: Money) -> Money {
        match self.kind {
            DiscountKind::Amount => Money::from_rupiah(self.value),
            DiscountKind::Percent => subtotal.percent(self.value),
        }
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::none()
    }
}

// =============================================================================
// Grand Total
// =============================================================================

/// `max(0, subtotal − discount)`. Never negative.
pub fn grand_total(subtotal: Money, discount: &Discount) -> Money {
    (subtotal - discount.amount_off(subtotal)).floor_zero()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_amount_off() {
        let d = Discount::amount(5_000);
        assert_eq!(d.amount_off(Money::from_rupiah(110_000)).rupiah(), 5_000);
    }

    #[test]
    fn test_percent_amount_off() {
        // The spec scenario: 110.000 at 10% → 11.000 off, 99.000 total
        let d = Discount::percent(10);
        let subtotal = Money::from_rupiah(110_000);
        assert_eq!(d.amount_off(subtotal).rupiah(), 11_000);
        assert_eq!(grand_total(subtotal, &d).rupiah(), 99_000);
    }

    #[test]
    fn test_zero_discount_is_identity() {
        let subtotal = Money::from_rupiah(110_000);
        assert_eq!(grand_total(subtotal, &Discount::amount(0)).rupiah(), 110_000);
        assert_eq!(grand_total(subtotal, &Discount::percent(0)).rupiah(), 110_000);
    }

    #[test]
    fn test_grand_total_floors_at_zero() {
        let subtotal = Money::from_rupiah(10_000);
        let d = Discount::amount(25_000);
        assert_eq!(grand_total(subtotal, &d).rupiah(), 0);
    }

    #[test]
    fn test_full_percent_discount() {
        let subtotal = Money::from_rupiah(10_000);
        assert_eq!(grand_total(subtotal, &Discount::percent(100)).rupiah(), 0);
    }

    /// Pins the kind-switch reinterpretation: the raw value carries over
    /// unchanged, so Rp 50 becomes 50%.
    #[test]
    fn test_kind_switch_keeps_raw_value() {
        let subtotal = Money::from_rupiah(100_000);

        let as_amount = Discount::amount(50);
        assert_eq!(as_amount.amount_off(subtotal).rupiah(), 50);

        let flipped = as_amount.with_kind(DiscountKind::Percent);
        assert_eq!(flipped.amount_off(subtotal).rupiah(), 50_000);
    }
}
