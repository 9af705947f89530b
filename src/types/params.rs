//! Module parameters

use crate::constants::{
    BOND_DENOM, BPS_DENOMINATOR, DEFAULT_COMMIT_PERIOD, DEFAULT_MINIMUM_DEPOSIT,
    DEFAULT_REVEAL_PERIOD, MAX_PERIOD_LENGTH,
};
use crate::types::Coin;
use serde::{Deserialize, Serialize};

/// Tunable parameters, stored under their own key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Commit window length in blocks
    pub commit_period: u64,
    /// Reveal window length in blocks
    pub reveal_period: u64,
    pub minimum_deposit: Coin,
    /// Stake fraction slashed from bonded non-revealers, in basis points.
    /// Zero leaves forfeiting the deposit as the only penalty.
    #[serde(default)]
    pub slash_fraction_bps: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            commit_period: DEFAULT_COMMIT_PERIOD,
            reveal_period: DEFAULT_REVEAL_PERIOD,
            minimum_deposit: Coin::new(BOND_DENOM, DEFAULT_MINIMUM_DEPOSIT),
            slash_fraction_bps: 0,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), String> {
        if self.commit_period == 0 {
            return Err("commit period cannot be zero".into());
        }
        if self.reveal_period == 0 {
            return Err("reveal period cannot be zero".into());
        }
        match self.commit_period.checked_add(self.reveal_period) {
            Some(len) if len <= MAX_PERIOD_LENGTH => {}
            _ => {
                return Err(format!(
                    "commit period {} plus reveal period {} exceeds {} blocks",
                    self.commit_period, self.reveal_period, MAX_PERIOD_LENGTH
                ))
            }
        }
        if !self.minimum_deposit.is_valid() {
            return Err(format!("invalid minimum deposit: {}", self.minimum_deposit));
        }
        if self.slash_fraction_bps > BPS_DENOMINATOR {
            return Err(format!(
                "slash fraction {} bps exceeds {}",
                self.slash_fraction_bps, BPS_DENOMINATOR
            ));
        }
        Ok(())
    }
}
