//! Coin amounts

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-denomination amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Denominations are 3-128 chars, start with a lowercase letter, and
    /// contain only lowercase letters and digits.
    pub fn is_valid(&self) -> bool {
        let d = self.denom.as_bytes();
        (3..=128).contains(&d.len())
            && d[0].is_ascii_lowercase()
            && d.iter().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    /// `self >= other`; coins of different denominations never compare
    pub fn is_gte(&self, other: &Coin) -> bool {
        self.denom == other.denom && self.amount >= other.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Coin::new("urh", 1).is_valid());
        assert!(Coin::new("urh", 0).is_valid());
        assert!(!Coin::new("", 1).is_valid());
        assert!(!Coin::new("UR", 1).is_valid());
        assert!(!Coin::new("1rh", 1).is_valid());
    }

    #[test]
    fn test_is_gte_requires_same_denom() {
        let a = Coin::new("urh", 1000);
        assert!(a.is_gte(&Coin::new("urh", 1000)));
        assert!(!a.is_gte(&Coin::new("urh", 1001)));
        assert!(!a.is_gte(&Coin::new("uatom", 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Coin::new("urh", 1000).to_string(), "1000urh");
    }
}
