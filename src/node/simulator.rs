//! Simulated validator set for a standalone node
//!
//! Validators marked `manual` pick a random secret, commit to it while the
//! commit window is open and reveal it once the reveal window starts.
//! Everyone else is left to the automatic participation done in the end-block
//! hook. That hook also commits for manual validators in the rollover block,
//! so after period 0 a manual validator only acts when it has no commitment.

use crate::constants::MODULE_NAME;
use crate::crypto::{compute_hash, AccAddress, ConsAddress, ValAddress};
use crate::host::{InMemoryBank, InMemoryStaking, Validator};
use crate::keeper::Keeper;
use crate::node::{NodeConfig, RandApp};
use crate::types::{Coin, MsgCommit, MsgReveal, Params, Period, RandMsg};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashMap;
use tracing::debug;

pub type NodeKeeper = Keeper<InMemoryStaking, InMemoryBank>;

/// Block application with the simulated collaborators
pub type NodeApp<St> = RandApp<St, InMemoryStaking, InMemoryBank>;

/// Staking registry and bank funded from the configured validators
pub fn build_keeper(config: &NodeConfig, denom: &str) -> NodeKeeper {
    let mut staking = InMemoryStaking::new();
    let mut bank = InMemoryBank::new(&[MODULE_NAME]);
    for v in &config.validators {
        let operator = v.operator();
        staking.add_validator(Validator::new(operator, ConsAddress(operator.0), v.tokens));
        bank.mint(&v.account(), &Coin::new(denom, v.balance));
    }
    Keeper::new(staking, bank)
}

#[derive(Debug, Clone)]
struct Secret {
    period: u64,
    value: Vec<u8>,
    revealed: bool,
}

pub struct Simulator {
    manual: Vec<ValAddress>,
    secrets: HashMap<ValAddress, Secret>,
    rng: StdRng,
}

impl Simulator {
    pub fn new(config: &NodeConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: &NodeConfig, rng: StdRng) -> Self {
        Self {
            manual: config
                .validators
                .iter()
                .filter(|v| v.manual)
                .map(|v| v.operator())
                .collect(),
            secrets: HashMap::new(),
            rng,
        }
    }

    /// Messages the manual validators send in a block at `height`, given the
    /// period state after begin block. `committed` tells whether a validator
    /// already has a commitment for the current period.
    pub fn messages<F>(&mut self, period: &Period, params: &Params, height: u64, committed: F) -> Vec<RandMsg>
    where
        F: Fn(&ValAddress) -> bool,
    {
        let mut msgs = Vec::new();
        for operator in self.manual.clone() {
            let payer = AccAddress::from(operator);
            let current = self
                .secrets
                .get(&operator)
                .filter(|s| s.period == period.current_period)
                .cloned();

            match current {
                // a secret without an on-chain commitment belongs to a discarded block
                _ if period.in_commit_phase
                    && height < period.commit_end_height
                    && !committed(&operator) =>
                {
                    let mut value = vec![0u8; 32];
                    self.rng.fill_bytes(&mut value);
                    msgs.push(RandMsg::Commit(MsgCommit::new(
                        payer,
                        operator,
                        compute_hash(&value),
                        params.minimum_deposit.clone(),
                    )));
                    debug!(height, validator = %operator, "manual commit");
                    self.secrets.insert(
                        operator,
                        Secret { period: period.current_period, value, revealed: false },
                    );
                }
                Some(secret) if !period.in_commit_phase && !secret.revealed => {
                    msgs.push(RandMsg::Reveal(MsgReveal::new(
                        payer,
                        operator,
                        secret.period,
                        secret.value.clone(),
                    )));
                    debug!(height, validator = %operator, "manual reveal");
                    if let Some(s) = self.secrets.get_mut(&operator) {
                        s.revealed = true;
                    }
                }
                _ => {}
            }
        }
        msgs
    }
}
