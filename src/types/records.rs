//! Per-validator records: commitments, reveals, penalties

use crate::crypto::{Hash, ValAddress};
use crate::types::Coin;
use serde::{Deserialize, Serialize};

/// A validator's commitment for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub period: u64,
    pub validator: ValAddress,
    /// SHA-256 of the value to be revealed
    pub commitment_hash: Hash,
    /// Escrowed deposit, refunded on reveal
    pub deposit: Coin,
    pub block_height: u64,
    pub revealed: bool,
}

/// A revealed preimage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub period: u64,
    pub validator: ValAddress,
    pub reveal_value: Vec<u8>,
    pub block_height: u64,
}

/// Forfeited deposit of a validator that committed but never revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub period: u64,
    pub validator: ValAddress,
    pub deposit: Coin,
    pub block_height: u64,
}
