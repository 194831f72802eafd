//! Arbitrary-precision unsigned integer in token base units.
//!
//! Backed by `BigDecimal` with scale 0, so sums never overflow or round.
//! Serialises as a decimal string.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a non-negative integer: `{0}`")]
pub struct ParseBigIntError(String);

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BigInt(BigDecimal);

impl BigInt {
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for BigInt {
    type Err = ParseBigIntError;

    /// Parses a plain base-10 digit string (what `U256::to_string` emits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseBigIntError(s.to_string()));
        }
        BigDecimal::from_str(s)
            .map(Self)
            .map_err(|_| ParseBigIntError(s.to_string()))
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.with_scale(0))
    }
}

impl Add for BigInt {
    type Output = BigInt;

    fn add(self, rhs: BigInt) -> BigInt {
        BigInt(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a BigInt> for BigInt {
    type Output = BigInt;

    fn add(self, rhs: &'a BigInt) -> BigInt {
        BigInt(self.0 + &rhs.0)
    }
}

impl<'a> AddAssign<&'a BigInt> for BigInt {
    fn add_assign(&mut self, rhs: &'a BigInt) {
        self.0 += &rhs.0;
    }
}

impl AddAssign for BigInt {
    fn add_assign(&mut self, rhs: BigInt) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for BigInt {
    fn sum<I: Iterator<Item = BigInt>>(iter: I) -> Self {
        iter.fold(BigInt::zero(), |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_past_u256_without_loss() {
        // 2^256 - 1
        let max = BigInt::from_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        )
        .unwrap();
        let total = max.clone() + &max;
        assert_eq!(
            total.to_string(),
            "231584178474632390847141970017375815706539969331281128078915168015826259279870"
        );
    }

    #[test]
    fn rejects_signs_and_fractions() {
        assert!(BigInt::from_str("-1").is_err());
        assert!(BigInt::from_str("1.5").is_err());
        assert!(BigInt::from_str("").is_err());
        assert!(BigInt::from_str("1e18").is_err());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let fee = BigInt::from_str("10000000000000000000").unwrap();
        let json = serde_json::to_string(&fee).unwrap();
        assert_eq!(json, "\"10000000000000000000\"");
        let back: BigInt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fee);
    }
}
