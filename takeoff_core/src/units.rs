//! # Unit Types
//!
//! Type-safe wrappers for the two quantities the takeoff deals in: lengths in
//! millimetres and weights in grams. Both are integers so sums are exact and
//! independent of summation order.
//!
//! ## Design Philosophy
//!
//! Simple newtype wrappers rather than a units library:
//! - Scaffold components come in a handful of fixed millimetre sizes
//! - JSON serialization stays clean (just numbers)
//! - Integer grams keep `Σ item weight == total weight` exact
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Grams, Millimeters};
//!
//! let span = Millimeters(1800) * 3;
//! assert_eq!(span.0, 5400);
//!
//! let deck = Grams::from_kg(14.2);
//! assert_eq!(deck.0, 14_200);
//! assert_eq!((deck * 2).kg(), 28.4);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub u64);

impl Millimeters {
    /// Length in metres, for display
    pub fn meters(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl Add for Millimeters {
    type Output = Millimeters;
    fn add(self, rhs: Millimeters) -> Millimeters {
        Millimeters(self.0 + rhs.0)
    }
}

impl Mul<u64> for Millimeters {
    type Output = Millimeters;
    fn mul(self, rhs: u64) -> Millimeters {
        Millimeters(self.0 * rhs)
    }
}

impl Sum for Millimeters {
    fn sum<I: Iterator<Item = Millimeters>>(iter: I) -> Self {
        iter.fold(Millimeters(0), Add::add)
    }
}

impl fmt::Display for Millimeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub u64);

impl Grams {
    /// Zero weight
    pub const ZERO: Grams = Grams(0);

    /// Convert a kilogram figure (as found in manufacturer tables) to grams,
    /// rounding to the nearest gram.
    pub fn from_kg(kg: f64) -> Self {
        Grams((kg.max(0.0) * 1000.0).round() as u64)
    }

    /// Whole kilograms
    pub const fn from_whole_kg(kg: u64) -> Self {
        Grams(kg * 1000)
    }

    /// Weight in kilograms, for display
    pub fn kg(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl Add for Grams {
    type Output = Grams;
    fn add(self, rhs: Grams) -> Grams {
        Grams(self.0 + rhs.0)
    }
}

impl AddAssign for Grams {
    fn add_assign(&mut self, rhs: Grams) {
        self.0 += rhs.0;
    }
}

impl Sub for Grams {
    type Output = Grams;
    /// Saturating: a load never goes negative.
    fn sub(self, rhs: Grams) -> Grams {
        Grams(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u64> for Grams {
    type Output = Grams;
    fn mul(self, rhs: u64) -> Grams {
        Grams(self.0 * rhs)
    }
}

impl Sum for Grams {
    fn sum<I: Iterator<Item = Grams>>(iter: I) -> Self {
        iter.fold(Grams::ZERO, Add::add)
    }
}

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kg", self.kg())
    }
}
