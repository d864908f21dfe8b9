//! # Money Module
//!
//! Provides the `Money` type for room prices, booking totals, service lines
//! and transaction amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing thousands of transaction amounts as f64 drifts:                │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A revenue report that is off by one unit cannot be reconciled          │
//! │  against the payment provider.                                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer amounts in the smallest currency unit            │
//! │    1_000_000 + 250_000 = 1_250_000, exactly, every time                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use frontdesk_core::money::Money;
//!
//! let night = Money::from_minor(450_000);
//! let stay = night * 3;
//! assert_eq!(stay.minor(), 1_350_000);
//! assert_eq!(stay.to_string(), "1,350,000");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serializes as a bare integer, which is what the booking API sends for
/// `price`, `priceTotal` and `amount`. Reads an integer, a float (rounded) or
/// a numeric string, since older endpoints send any of the three.
///
/// ## Where Money is Used
/// ```text
/// Room.price ──────────────► RoomSummary.price
///
/// Booking.price_total ──┬──► guest_charge_total()
/// ServiceLine.total ────┘
///
/// Transaction.amount ──────► RoomSummary.revenue ──► GlobalTotals
///                      └───► direct_transaction_total()
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (refund adjustments).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let breakfast = Money::from_minor(120_000);
    /// assert_eq!(breakfast.multiply_quantity(2).minor(), 240_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Largest float that still converts to `i64` without saturating.
const MAX_FLOAT_MINOR: f64 = 9.0e18;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

fn round_minor(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() < MAX_FLOAT_MINOR).then(|| value.round() as i64)
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minor = match RawAmount::deserialize(deserializer)? {
            RawAmount::Int(n) => Some(n),
            RawAmount::Float(f) => round_minor(f),
            RawAmount::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(round_minor))
            }
        };
        minor
            .map(Money)
            .ok_or_else(|| de::Error::custom("amount is not a number"))
    }
}

/// Groups thousands with commas. Currency symbols are left to the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
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
