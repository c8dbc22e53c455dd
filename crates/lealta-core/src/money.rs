//! # Money Module
//!
//! Provides the `Money` and `Quantity` types for handling monetary values and
//! fractional quantities safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Repeated cart additions accumulate that drift until the displayed      │
//! │  subtotal disagrees with what the server charges.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every value is an exact count of cents. "Round to 2 decimals after   │
//! │    every arithmetic step" holds by construction.                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fractional Quantities
//! Goods sold by weight need fractional quantities (1.5 kg). `Quantity`
//! stores milli-units (1500 = 1.5) so quantity math stays in integers too.
//! The single rounding point is `Money::multiply_quantity`, which rounds
//! half-away-from-zero to the nearest cent.
//!
//! ## Usage
//! ```rust
//! use lealta_core::money::{Money, Quantity};
//!
//! let price = Money::from_cents(5000);        // $50.00
//! let line = price.multiply_quantity(Quantity::from_units(2));
//! assert_eq!(line.cents(), 10_000);           // $100.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99);      // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate math may go negative; public invariants
///   clamp at the edges (`saturating_sub`)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
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

    /// Returns the smaller of two values.
    ///
    /// Used for the redemption cap: `min(balance, sale_subtotal)`.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Subtracts, clamping at zero.
    ///
    /// Used for `amount_due = max(0, subtotal - redemption)`.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// This is the only place quantity rounding happens. The product is
    /// rounded half-away-from-zero to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use lealta_core::money::{Money, Quantity};
    ///
    /// let unit = Money::from_cents(333);              // $3.33
    /// let qty = Quantity::from_milli(1500);           // 1.5
    /// assert_eq!(unit.multiply_quantity(qty).cents(), 500); // $5.00 (499.5 → 500)
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Money {
        // i128 to prevent overflow on large amounts
        let product = self.0 as i128 * qty.milli() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        Money(rounded as i64)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// This is also what the receipt composer uses, so the format is part of
/// the user-visible contract: `$D.CC` with a leading sign for negatives.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
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

// =============================================================================
// Quantity Type
// =============================================================================

/// A line-item quantity in milli-units (1000 = 1.0).
///
/// ## Why Milli-Units?
/// Produce sold by weight gives fractional quantities (0.750 kg). Three
/// decimal places cover every scale we have seen in the field, and integer
/// storage keeps quantity math drift-free just like [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Creates a quantity from milli-units (1500 = 1.5).
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// One unit, the default for new line items.
    #[inline]
    pub const fn one() -> Self {
        Quantity(1000)
    }

    /// Returns the raw milli-unit count.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Checks if the quantity is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the quantity is a whole number of units.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % 1000 == 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::one()
    }
}

/// Display trims trailing zeros: `2`, `1.5`, `0.125`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 / 1000)
        } else {
            let text = format!("{}.{:03}", self.0 / 1000, (self.0 % 1000).abs());
            write!(f, "{}", text.trim_end_matches('0'))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
