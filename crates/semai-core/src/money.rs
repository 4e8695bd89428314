//! # Money Module
//!
//! Provides the `Money` type for handling rupiah amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript (where this system came from):                       │
//! │    55000 * 0.1 + 0.2  →  5500.2  (and worse with odd percentages)  │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Rupiah                                       │
//! │    The rupiah has no minor unit in practice, so every amount is    │
//! │    a whole i64. Percentages round half-up at the rupiah, once.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use semai_core::money::Money;
//!
//! let price = Money::from_rupiah(55_000);
//! let line = price * 2i64;
//! assert_eq!(line.rupiah(), 110_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A rupiah amount.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results of discount math may go negative
///   before the grand-total floor is applied
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Whole rupiah**: IDR has no usable minor unit; 1 == Rp 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the amount in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the amount is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the amount is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use semai_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(55_000);
    /// assert_eq!(unit_price.multiply_quantity(2).rupiah(), 110_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Takes a percentage of this amount, rounding half-up at the rupiah.
    ///
    /// ## Implementation
    /// Integer math widened to i128: `(amount * pct + 50) / 100`.
    /// The +50 provides the half-up rounding (50/100 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use semai_core::money::Money;
    ///
    /// let subtotal = Money::from_rupiah(110_000);
    /// assert_eq!(subtotal.percent(10).rupiah(), 11_000);
    /// ```
    pub fn percent(&self, pct: i64) -> Money {
        let amount = (self.0 as i128 * pct as i128 + 50) / 100;
        Money(amount as i64)
    }

    /// Clamps a negative amount to zero.
    ///
    /// Grand totals floor at zero: an oversized fixed discount must not
    /// produce a negative sale.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows rupiah with dot thousands grouping,
/// `id-ID` style: `Rp 55.000`.
///
/// ## Note
/// This is the exact format receipts use, so it lives here rather than in
/// the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Formats an unsigned number with `.` thousands separators (55000 → "55.000").
fn group_thousands(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups: Vec<String> = Vec::new();
    while n > 0 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    let mut out = groups.pop().unwrap_or_default();
    // Strip the leading zeros of the most significant group
    out = out.trim_start_matches('0').to_string();
    for g in groups.iter().rev() {
        out.push('.');
        out.push_str(g);
    }
    out
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
