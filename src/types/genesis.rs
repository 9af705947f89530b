//! Genesis state

use crate::constants::{DEFAULT_COMMIT_PERIOD, DEFAULT_REVEAL_PERIOD};
use crate::types::{Commitment, Params, Penalty, Period, Reveal};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    pub period: Period,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub reveals: Vec<Reveal>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            period: Period {
                current_period: 0,
                period_start_height: 0,
                commit_end_height: DEFAULT_COMMIT_PERIOD,
                reveal_end_height: DEFAULT_COMMIT_PERIOD + DEFAULT_REVEAL_PERIOD,
                in_commit_phase: true,
                current_seed: None,
            },
            commitments: Vec::new(),
            reveals: Vec::new(),
            penalties: Vec::new(),
        }
    }
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), String> {
        self.params.validate()?;

        let p = &self.period;
        if p.commit_end_height < p.period_start_height || p.reveal_end_height < p.commit_end_height {
            return Err(format!(
                "period windows out of order: start {} commit_end {} reveal_end {}",
                p.period_start_height, p.commit_end_height, p.reveal_end_height
            ));
        }

        let mut seen = HashSet::new();
        for c in &self.commitments {
            if !seen.insert((c.period, c.validator)) {
                return Err(format!(
                    "duplicate commitment for {} in period {}",
                    c.validator, c.period
                ));
            }
            if !c.deposit.is_valid() {
                return Err(format!("invalid deposit for {}: {}", c.validator, c.deposit));
            }
        }

        for r in &self.reveals {
            let matched = self
                .commitments
                .iter()
                .any(|c| c.period == r.period && c.validator == r.validator && c.revealed);
            if !matched {
                return Err(format!(
                    "reveal for {} in period {} has no revealed commitment",
                    r.validator, r.period
                ));
            }
        }

        Ok(())
    }
}
