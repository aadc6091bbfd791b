//! Credits — money in minor units
//!
//! Balances, stakes, item values and payouts are all whole hundredths so that
//! settlement is exact and a replay from the same seed lands on the same cent.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Minor units per whole credit
pub const MINOR_PER_UNIT: u64 = 100;

/// An amount of credits, stored in hundredths
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Credits(u64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    /// From hundredths
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// From whole credits
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole * MINOR_PER_UNIT)
    }

    /// Nearest amount to a decimal value. Negative and non-finite input clamp to zero.
    pub fn from_decimal(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }
        Self((value * MINOR_PER_UNIT as f64).round() as u64)
    }

    /// Raw hundredths
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Decimal value (display and statistics only)
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MINOR_PER_UNIT as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn checked_sub(self, other: Credits) -> Option<Credits> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Credits(v)),
            None => None,
        }
    }

    pub const fn saturating_sub(self, other: Credits) -> Credits {
        Credits(self.0.saturating_sub(other.0))
    }

    pub const fn saturating_add(self, other: Credits) -> Credits {
        Credits(self.0.saturating_add(other.0))
    }

    /// Scale by an integer factor (line multipliers, bet × lines, price × count)
    pub const fn times(self, factor: u64) -> Credits {
        Credits(self.0.saturating_mul(factor))
    }
}

impl Add for Credits {
    type Output = Credits;

    fn add(self, rhs: Credits) -> Credits {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Credits {
    fn add_assign(&mut self, rhs: Credits) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Credits {
        iter.fold(Credits::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Credits> for Credits {
    fn sum<I: Iterator<Item = &'a Credits>>(iter: I) -> Credits {
        iter.copied().sum()
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_PER_UNIT, self.0 % MINOR_PER_UNIT)
    }
}
