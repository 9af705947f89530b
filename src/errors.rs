//! Error types for the rand module
//!
//! `RandError` is what message handlers and block hooks return. Every kind has
//! a stable numeric code so a host can report `(codespace, code, log)` in
//! transaction results.

use crate::crypto::AddressError;
use thiserror::Error;

/// Key-value store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sled::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Failures reported by the staking or bank collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("validator not found: {0}")]
    ValidatorNotFound(String),
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u128, need: u128 },
    #[error("unknown module account: {0}")]
    UnknownModule(String),
    #[error("slashing failed: {0}")]
    SlashFailed(String),
}

/// Rand module errors
#[derive(Debug, Error)]
pub enum RandError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid phase: {0}")]
    InvalidPhase(String),
    #[error("commit phase closed at height {commit_end_height}")]
    CommitPhaseClosed { commit_end_height: u64 },
    #[error("reveal phase closed at height {reveal_end_height}")]
    RevealPhaseClosed { reveal_end_height: u64 },
    #[error("invalid validator {validator}: {reason}")]
    InvalidValidator { validator: String, reason: String },
    #[error("duplicate commitment for validator {validator} in period {period}")]
    DuplicateCommitment { validator: String, period: u64 },
    #[error("insufficient deposit: got {got}, minimum {minimum}")]
    InsufficientDeposit { got: String, minimum: String },
    #[error("already revealed for validator {validator} in period {period}")]
    AlreadyRevealed { validator: String, period: u64 },
    #[error("no commitment for validator {validator} in period {period}")]
    NoCommitment { validator: String, period: u64 },
    #[error("invalid reveal: {0}")]
    InvalidReveal(String),
    #[error("validator {validator} has a penalty in period {period}")]
    HasPenalty { validator: String, period: u64 },
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("deposit transfer failed: {0}")]
    TransferFailed(HostError),
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl RandError {
    /// Stable error code within the module codespace
    pub fn code(&self) -> u32 {
        match self {
            RandError::InvalidRequest(_) => 1,
            RandError::TransferFailed(_) => 13,
            RandError::InvalidPhase(_) => 14,
            RandError::CommitPhaseClosed { .. } => 15,
            RandError::InvalidValidator { .. } => 16,
            RandError::DuplicateCommitment { .. } => 17,
            RandError::InsufficientDeposit { .. } => 18,
            RandError::AlreadyRevealed { .. } => 19,
            RandError::NoCommitment { .. } => 20,
            RandError::RevealPhaseClosed { .. } => 21,
            RandError::InvalidReveal(_) => 22,
            RandError::InvalidAddress(_) => 23,
            RandError::InvalidState(_) => 24,
            RandError::HasPenalty { .. } => 25,
            RandError::InvalidGenesis(_) => 26,
            RandError::Store(_) => 27,
            RandError::Host(_) => 28,
        }
    }
}

impl From<sled::Error> for RandError {
    fn from(e: sled::Error) -> Self {
        RandError::Store(StoreError::Db(e))
    }
}

impl From<bincode::Error> for RandError {
    fn from(e: bincode::Error) -> Self {
        RandError::Store(StoreError::Codec(e))
    }
}

pub type RandResult<T> = Result<T, RandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = vec![
            RandError::InvalidRequest(String::new()),
            RandError::TransferFailed(HostError::UnknownModule(String::new())),
            RandError::InvalidPhase(String::new()),
            RandError::CommitPhaseClosed { commit_end_height: 0 },
            RandError::InvalidValidator { validator: String::new(), reason: String::new() },
            RandError::DuplicateCommitment { validator: String::new(), period: 0 },
            RandError::InsufficientDeposit { got: String::new(), minimum: String::new() },
            RandError::AlreadyRevealed { validator: String::new(), period: 0 },
            RandError::NoCommitment { validator: String::new(), period: 0 },
            RandError::RevealPhaseClosed { reveal_end_height: 0 },
            RandError::InvalidReveal(String::new()),
            RandError::InvalidAddress(AddressError::Empty),
            RandError::InvalidState(String::new()),
            RandError::HasPenalty { validator: String::new(), period: 0 },
            RandError::InvalidGenesis(String::new()),
            RandError::Host(HostError::UnknownModule(String::new())),
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_message_carries_context() {
        let err = RandError::CommitPhaseClosed { commit_end_height: 10 };
        assert_eq!(err.to_string(), "commit phase closed at height 10");
    }
}
