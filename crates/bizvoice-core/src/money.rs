//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice total that drifts by a fraction of a paisa will not        │
//! │  reconcile against the bank statement.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    Rs. 300.00 at 18% = 30000 × 1800 / 10000 = 5400 paise exactly        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizvoice_core::money::Money;
//!
//! let rate = Money::from_cents(10000); // Rs. 100.00
//! let line = rate.multiply_quantity(3.0);
//! assert_eq!(line.cents(), 30000);
//! assert_eq!(line.to_string(), "Rs. 300.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Currency glyph printed in front of every amount on documents.
///
/// The base-14 PDF fonts cannot encode the rupee sign, so the ASCII
/// abbreviation is used everywhere for consistency.
pub const CURRENCY_SYMBOL: &str = "Rs.";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative line amounts for discounts
/// - **Single field tuple struct**: Serializes as a bare integer in JSON
///
/// ## Where Money is Used
/// ```text
/// Product.current_price_cents ──► InvoiceItem.rate ──► InvoiceItem.amount
///                                                            │
///                    Invoice.subtotal ◄──────────────────────┘
///                          │
///                          ├──► calculate_tax(rate) ──► Invoice.tax
///                          │                               │
///                          │                          split_even() ──► CGST / SGST
///                          ▼
///                    Invoice.total ──► DashboardStats revenue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use bizvoice_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps ± 5000) / 10000`. The ±5000 provides
    /// rounding (5000/10000 = 0.5) in the direction of the amount's sign.
    ///
    /// ## Example
    /// ```rust
    /// use bizvoice_core::money::Money;
    /// use bizvoice_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(30000); // Rs. 300.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(tax.cents(), 5400); // Rs. 54.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large invoice totals from overflowing the product
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Multiplies a unit rate by a (possibly fractional) quantity.
    ///
    /// The result is rounded to the nearest paisa.
    ///
    /// ## Example
    /// ```rust
    /// use bizvoice_core::money::Money;
    ///
    /// let hourly = Money::from_cents(150000); // Rs. 1500.00 per hour
    /// assert_eq!(hourly.multiply_quantity(2.5).cents(), 375000);
    /// ```
    pub fn multiply_quantity(&self, qty: f64) -> Money {
        Money::from_cents((self.0 as f64 * qty).round() as i64)
    }

    /// Splits the value into two halves that always sum to the original.
    ///
    /// The first half is rounded toward zero; the second half carries the
    /// odd paisa if there is one.
    ///
    /// ## Example
    /// ```rust
    /// use bizvoice_core::money::Money;
    ///
    /// let (a, b) = Money::from_cents(5401).split_even();
    /// assert_eq!((a.cents(), b.cents()), (2700, 2701));
    /// ```
    pub fn split_even(&self) -> (Money, Money) {
        let first = self.0 / 2;
        (Money(first), Money(self.0 - first))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way it is printed on invoices: `Rs. 1234.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{} {}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            self.major().abs(),
            self.minor()
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "Rs. 10.99");
        assert_eq!(Money::from_cents(500).to_string(), "Rs. 5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-Rs. 5.50");
        assert_eq!(Money::from_cents(0).to_string(), "Rs. 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_gst_at_eighteen_percent() {
        let subtotal = Money::from_cents(30000);
        let tax = subtotal.calculate_tax(TaxRate::from_bps(1800));
        assert_eq!(tax.cents(), 5400);
        assert_eq!((subtotal + tax).cents(), 35400);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // Rs. 10.00 at 8.25% = 82.5 paise → 83
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // Negative amounts round away from zero symmetrically
        let tax = Money::from_cents(-1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), -83);
    }

    #[test]
    fn test_multiply_fractional_quantity() {
        let rate = Money::from_cents(333);
        assert_eq!(rate.multiply_quantity(3.0).cents(), 999);
        assert_eq!(rate.multiply_quantity(0.5).cents(), 167);
    }

    #[test]
    fn test_split_even_preserves_total() {
        for cents in [0, 1, 5400, 5401, 99_999] {
            let (a, b) = Money::from_cents(cents).split_even();
            assert_eq!(a.cents() + b.cents(), cents);
            assert!((a.cents() - b.cents()).abs() <= 1);
        }
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(1099)).unwrap();
        assert_eq!(json, "1099");
    }
}
