//! Fixed-unit monetary types.
//!
//! The venue quotes everything in whole currency units (rupiah): every
//! price update rounds to an integer, and the floor price is 1. There is
//! no sub-unit precision, so the newtypes wrap a plain `i64` count of
//! units rather than a scaled fixed-point value.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An asset price in whole currency units.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Minimum quotable price; the price path never drops below this.
    pub const FLOOR: Price = Price(1);

    /// Create a Price from a floating-point value, rounding to the unit.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self(v.round() as i64)
    }

    /// Convert to floating-point for path calculations.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64
    }

    /// Raw unit count.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if price is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Price(self.0.max(other.0))
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Price(self.0.min(other.0))
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_rupiah(self.0, f)
    }
}

/// An account balance or stake in whole currency units.
///
/// Semantically identical to [`Price`] but represents money held or moved,
/// not a quote.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Cash(pub i64);

impl Cash {
    pub const ZERO: Cash = Cash(0);

    /// Create Cash from a floating-point value, rounding to the unit.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self(v.round() as i64)
    }

    /// Convert to floating-point.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64
    }

    /// Raw unit count.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Cash(self.0.abs())
    }
}

impl fmt::Debug for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cash({})", self.0)
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_rupiah(self.0, f)
    }
}

/// Compact rupiah formatting: `Rp 2.80M`, `Rp 45.0K`, `Rp 175`.
fn format_rupiah(units: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    if abs >= 1_000_000 {
        write!(f, "{sign}Rp {:.2}M", abs as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        write!(f, "{sign}Rp {:.1}K", abs as f64 / 1_000.0)
    } else {
        write!(f, "{sign}Rp {abs}")
    }
}
