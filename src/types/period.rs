//! Period state machine
//!
//! One `Period` is active at a time. It is in the commit phase from
//! `period_start_height` until `commit_end_height`, in the reveal phase until
//! `reveal_end_height`, and then rolls over into the next period.

use crate::crypto::Hash;
use crate::errors::{RandError, RandResult};
use crate::types::Params;
use serde::{Deserialize, Serialize};

/// Singleton beacon state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Epoch identifier, only ever incremented by rollover
    pub current_period: u64,
    pub period_start_height: u64,
    pub commit_end_height: u64,
    pub reveal_end_height: u64,
    pub in_commit_phase: bool,
    /// Last finalized randomness, `None` until the first rollover
    pub current_seed: Option<Hash>,
}

/// Phase change decided for one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    None,
    EnterReveal,
    Rollover,
}

impl Period {
    /// Period 0, in the commit phase, windows starting at `start_height`
    pub fn genesis(params: &Params, start_height: u64) -> RandResult<Self> {
        let (commit_end_height, reveal_end_height) = windows(start_height, params)?;
        Ok(Self {
            current_period: 0,
            period_start_height: start_height,
            commit_end_height,
            reveal_end_height,
            in_commit_phase: true,
            current_seed: None,
        })
    }

    /// Which transition, if any, applies at `height`
    pub fn transition_at(&self, height: u64) -> PhaseTransition {
        if self.in_commit_phase && height >= self.commit_end_height {
            PhaseTransition::EnterReveal
        } else if !self.in_commit_phase && height >= self.reveal_end_height {
            PhaseTransition::Rollover
        } else {
            PhaseTransition::None
        }
    }

    pub fn enter_reveal_phase(&mut self) {
        self.in_commit_phase = false;
    }

    /// Start the next period at `height` with freshly finalized randomness.
    /// Leaves `self` untouched on error.
    pub fn rollover(&mut self, height: u64, params: &Params, seed: Hash) -> RandResult<()> {
        let (commit_end_height, reveal_end_height) = windows(height, params)?;
        let next = self
            .current_period
            .checked_add(1)
            .ok_or_else(|| RandError::InvalidState("period number overflow".into()))?;

        self.current_period = next;
        self.current_seed = Some(seed);
        self.in_commit_phase = true;
        self.period_start_height = height;
        self.commit_end_height = commit_end_height;
        self.reveal_end_height = reveal_end_height;
        Ok(())
    }

    /// Period whose seed is currently published, if any
    pub fn finalized_period(&self) -> Option<u64> {
        self.current_seed
            .map(|_| self.current_period.saturating_sub(1))
    }
}

/// Commit and reveal end heights for windows opening at `start`
fn windows(start: u64, params: &Params) -> RandResult<(u64, u64)> {
    let commit_end = start.checked_add(params.commit_period);
    let reveal_end = commit_end.and_then(|c| c.checked_add(params.reveal_period));
    match (commit_end, reveal_end) {
        (Some(c), Some(r)) => Ok((c, r)),
        _ => Err(RandError::InvalidState(format!(
            "period windows overflow at height {} (commit {}, reveal {})",
            start, params.commit_period, params.reveal_period
        ))),
    }
}
