//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    80.10 × 0.4 = 32.040000000000006  ❌ WRONG!                          │
//! │                                                                         │
//! │  A supplier statement sums dozens of 50% / 40% shares. Float drift     │
//! │  would make two renders of the same extrato disagree by a centavo.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    8010 × 4000 bps / 10000 = 3204 centavos, every single time          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brecho_core::money::Money;
//! use brecho_core::types::ShareRate;
//!
//! let price = Money::from_cents(10000); // R$ 100,00
//! let credit = price.share(ShareRate::from_bps(5000));
//! assert_eq!(credit.cents(), 5000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::ShareRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate balances may go negative before clamping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ConsignedItem.sale_price ──► 50% credit share ──┐
///                          └─► 40% cash share  ───┼─► SupplierStatement
/// PayoutEntry.amount ─────────► deductions ───────┘
///
/// GarimpoItem cost + margin ──► sale_price ──► SaleTotals
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::money::Money;
    ///
    /// let price = Money::from_cents(8000); // R$ 80,00
    /// assert_eq!(price.cents(), 8000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    ///
    /// let negative = Money::from_major_minor(-5, 50);
    /// assert_eq!(negative.cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the value, or zero when it is negative.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(300).clamp_non_negative().cents(), 300);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Computes a percentage share of this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, widened to i128 so
    /// large totals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::money::Money;
    /// use brecho_core::types::ShareRate;
    ///
    /// // R$ 1,01 at 50% = R$ 0,505 → R$ 0,51
    /// let share = Money::from_cents(101).share(ShareRate::from_bps(5000));
    /// assert_eq!(share.cents(), 51);
    /// ```
    pub fn share(&self, rate: ShareRate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Adds a percentage markup (in basis points) on top of this amount.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::money::Money;
    ///
    /// let cost = Money::from_cents(3000); // R$ 30,00
    /// let price = cost.apply_markup(6000); // +60%
    /// assert_eq!(price.cents(), 4800);
    /// ```
    pub fn apply_markup(&self, markup_bps: u32) -> Money {
        let markup = (self.0 as i128 * markup_bps as i128 + 5000) / 10000;
        Money::from_cents(self.0 + markup as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the Brazilian convention: `R$ 10,99`.
///
/// ## Note
/// No thousands separator. The dashboard formats with the browser locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$ 10,99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5,00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5,50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0,00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_consignment_shares() {
        let price = Money::from_cents(10000);
        assert_eq!(price.share(ShareRate::from_bps(5000)).cents(), 5000);
        assert_eq!(price.share(ShareRate::from_bps(4000)).cents(), 4000);
    }

    #[test]
    fn test_share_rounds_half_up() {
        // 0,99 × 50% = 0,495 → 0,50
        assert_eq!(Money::from_cents(99).share(ShareRate::from_bps(5000)).cents(), 50);
        // 0,99 × 40% = 0,396 → 0,40
        assert_eq!(Money::from_cents(99).share(ShareRate::from_bps(4000)).cents(), 40);
    }

    #[test]
    fn test_markup() {
        assert_eq!(Money::from_cents(3000).apply_markup(6000).cents(), 4800);
        assert_eq!(Money::from_cents(3000).apply_markup(0).cents(), 3000);
    }

    #[test]
    fn test_clamp_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-2000).clamp_non_negative(), Money::zero());
    }
}
