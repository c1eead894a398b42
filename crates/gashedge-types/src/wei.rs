use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use crate::error::{HedgeError, Result};

/// Wei amount, the smallest on-chain currency unit.
/// Stored as u128, which covers any realistic balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wei(u128);

const GWEI: u128 = 1_000_000_000; // 10^9
const ETH: u128 = 1_000_000_000_000_000_000; // 10^18

impl Wei {
    /// Zero amount
    pub const ZERO: Wei = Wei(0);

    /// Create from a raw wei count
    pub const fn from_wei(raw: u128) -> Self {
        Wei(raw)
    }

    /// Create from gwei (10^9 wei)
    pub const fn from_gwei(gwei: u64) -> Self {
        Wei(gwei as u128 * GWEI)
    }

    /// Create from whole ether (10^18 wei)
    pub const fn from_eth(eth: u64) -> Self {
        Wei(eth as u128 * ETH)
    }

    /// Create from milli-ether; convenient for fees like 0.01 ETH
    pub const fn from_milli_eth(milli: u64) -> Self {
        Wei(milli as u128 * (ETH / 1000))
    }

    /// Get the raw wei count
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Check if amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Wei)
            .ok_or_else(|| HedgeError::AmountOverflow("overflow in addition".to_string()))
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Wei)
            .ok_or_else(|| HedgeError::AmountOverflow("underflow in subtraction".to_string()))
    }

    /// Saturating subtraction, clamping at zero
    pub fn saturating_sub(&self, other: Self) -> Self {
        Wei(self.0.saturating_sub(other.0))
    }

    /// Big-endian bytes of the raw count (16 bytes), for word encoding
    pub const fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl Add for Wei {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Wei(self.0 + other.0)
    }
}

impl Sub for Wei {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Wei(self.0 - other.0)
    }
}

impl Sum for Wei {
    fn sum<I: Iterator<Item = Wei>>(iter: I) -> Self {
        iter.fold(Wei::ZERO, |acc, w| acc + w)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
