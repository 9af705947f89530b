//! Transaction messages
//!
//! Addresses arrive as strings, exactly as they appear in a signed
//! transaction, and are parsed by `validate_basic`.

use crate::crypto::{AccAddress, Hash, ValAddress};
use crate::errors::{RandError, RandResult};
use crate::types::Coin;
use serde::{Deserialize, Serialize};

/// Commit to `commitment_hash` for the current period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCommit {
    /// Account paying the deposit
    pub creator: String,
    pub validator: String,
    pub commitment_hash: Hash,
    pub deposit: Coin,
}

/// Reveal the preimage of an earlier commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReveal {
    /// Account receiving the refunded deposit
    pub creator: String,
    pub validator: String,
    pub period: u64,
    pub reveal_value: Vec<u8>,
}

/// Either message, as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandMsg {
    Commit(MsgCommit),
    Reveal(MsgReveal),
}

fn parse_validator(validator: &str) -> RandResult<ValAddress> {
    validator.parse().map_err(|e| RandError::InvalidValidator {
        validator: validator.to_string(),
        reason: format!("{}", e),
    })
}

impl MsgCommit {
    pub fn new(creator: AccAddress, validator: ValAddress, commitment_hash: Hash, deposit: Coin) -> Self {
        Self {
            creator: creator.to_string(),
            validator: validator.to_string(),
            commitment_hash,
            deposit,
        }
    }

    /// Stateless checks; returns the parsed payer and validator
    pub fn validate_basic(&self) -> RandResult<(AccAddress, ValAddress)> {
        if self.validator.is_empty() {
            return Err(RandError::InvalidRequest("validator address cannot be empty".into()));
        }
        if self.commitment_hash.is_zero() {
            return Err(RandError::InvalidRequest("commitment hash cannot be empty".into()));
        }
        if !self.deposit.is_valid() {
            return Err(RandError::InvalidRequest(format!("invalid deposit: {}", self.deposit)));
        }
        let creator: AccAddress = self.creator.parse()?;
        let validator = parse_validator(&self.validator)?;
        Ok((creator, validator))
    }
}

impl MsgReveal {
    pub fn new(creator: AccAddress, validator: ValAddress, period: u64, reveal_value: Vec<u8>) -> Self {
        Self {
            creator: creator.to_string(),
            validator: validator.to_string(),
            period,
            reveal_value,
        }
    }

    pub fn validate_basic(&self) -> RandResult<(AccAddress, ValAddress)> {
        if self.validator.is_empty() {
            return Err(RandError::InvalidRequest("validator address cannot be empty".into()));
        }
        if self.reveal_value.is_empty() {
            return Err(RandError::InvalidReveal("reveal value cannot be empty".into()));
        }
        let creator: AccAddress = self.creator.parse()?;
        let validator = parse_validator(&self.validator)?;
        Ok((creator, validator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::compute_hash;

    fn acc() -> AccAddress {
        AccAddress([1; 20])
    }

    fn val() -> ValAddress {
        ValAddress([2; 20])
    }

    #[test]
    fn test_commit_validate_basic() {
        let msg = MsgCommit::new(acc(), val(), compute_hash(b"v"), Coin::new("urh", 1000));
        let (creator, validator) = msg.validate_basic().unwrap();
        assert_eq!(creator, acc());
        assert_eq!(validator, val());
    }

    #[test]
    fn test_commit_malformed_validator() {
        let mut msg = MsgCommit::new(acc(), val(), compute_hash(b"v"), Coin::new("urh", 1000));
        msg.validator = "rhvNOTBASE58".into();
        assert!(matches!(msg.validate_basic(), Err(RandError::InvalidValidator { .. })));
    }

    #[test]
    fn test_commit_malformed_creator() {
        let mut msg = MsgCommit::new(acc(), val(), compute_hash(b"v"), Coin::new("urh", 1000));
        msg.creator = "nope".into();
        assert!(matches!(msg.validate_basic(), Err(RandError::InvalidAddress(_))));
    }

    #[test]
    fn test_reveal_empty_value() {
        let msg = MsgReveal::new(acc(), val(), 0, Vec::new());
        assert!(matches!(msg.validate_basic(), Err(RandError::InvalidReveal(_))));
    }
}
