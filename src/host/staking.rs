//! Staking collaborator
//!
//! The rand module reads validator bondedness and may request a slash; it
//! never edits validator records itself.

use crate::constants::BPS_DENOMINATOR;
use crate::crypto::{ConsAddress, ValAddress};
use crate::errors::HostError;
use serde::{Deserialize, Serialize};

/// Tokens per unit of consensus power
pub const POWER_REDUCTION: u128 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator: ValAddress,
    pub cons_address: ConsAddress,
    pub tokens: u128,
    pub status: BondStatus,
    pub jailed: bool,
}

impl Validator {
    pub fn new(operator: ValAddress, cons_address: ConsAddress, tokens: u128) -> Self {
        Self {
            operator,
            cons_address,
            tokens,
            status: BondStatus::Bonded,
            jailed: false,
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    pub fn is_jailed(&self) -> bool {
        self.jailed
    }

    /// Bonded and not jailed
    pub fn is_active(&self) -> bool {
        self.is_bonded() && !self.jailed
    }

    pub fn consensus_power(&self) -> u64 {
        (self.tokens / POWER_REDUCTION).min(u64::MAX as u128) as u64
    }
}

/// Validator registry as seen by the rand module
pub trait StakingKeeper {
    /// All validators, in registry order
    fn get_all_validators(&self) -> Vec<Validator>;

    fn validator(&self, operator: &ValAddress) -> Result<Validator, HostError>;

    fn validator_by_cons_addr(&self, cons: &ConsAddress) -> Result<Validator, HostError>;

    /// Burn `fraction_bps` of the stake backing `power` at `infraction_height`.
    /// Returns the burned amount.
    fn slash(
        &mut self,
        cons: &ConsAddress,
        infraction_height: u64,
        power: u64,
        fraction_bps: u64,
    ) -> Result<u128, HostError>;
}

/// Registry kept in memory, used by the node simulator and tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryStaking {
    validators: Vec<Validator>,
}

impl InMemoryStaking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator(&mut self, validator: Validator) {
        self.validators.retain(|v| v.operator != validator.operator);
        self.validators.push(validator);
    }

    pub fn set_status(&mut self, operator: &ValAddress, status: BondStatus) -> Result<(), HostError> {
        self.find_mut(operator)?.status = status;
        Ok(())
    }

    pub fn set_jailed(&mut self, operator: &ValAddress, jailed: bool) -> Result<(), HostError> {
        self.find_mut(operator)?.jailed = jailed;
        Ok(())
    }

    fn find_mut(&mut self, operator: &ValAddress) -> Result<&mut Validator, HostError> {
        self.validators
            .iter_mut()
            .find(|v| v.operator == *operator)
            .ok_or_else(|| HostError::ValidatorNotFound(operator.to_string()))
    }
}

impl StakingKeeper for InMemoryStaking {
    fn get_all_validators(&self) -> Vec<Validator> {
        self.validators.clone()
    }

    fn validator(&self, operator: &ValAddress) -> Result<Validator, HostError> {
        self.validators
            .iter()
            .find(|v| v.operator == *operator)
            .cloned()
            .ok_or_else(|| HostError::ValidatorNotFound(operator.to_string()))
    }

    fn validator_by_cons_addr(&self, cons: &ConsAddress) -> Result<Validator, HostError> {
        self.validators
            .iter()
            .find(|v| v.cons_address == *cons)
            .cloned()
            .ok_or_else(|| HostError::ValidatorNotFound(cons.to_string()))
    }

    fn slash(
        &mut self,
        cons: &ConsAddress,
        _infraction_height: u64,
        power: u64,
        fraction_bps: u64,
    ) -> Result<u128, HostError> {
        let validator = self
            .validators
            .iter_mut()
            .find(|v| v.cons_address == *cons)
            .ok_or_else(|| HostError::ValidatorNotFound(cons.to_string()))?;

        let base = power as u128 * POWER_REDUCTION;
        let amount = (base * fraction_bps as u128 / BPS_DENOMINATOR as u128).min(validator.tokens);
        validator.tokens -= amount;
        Ok(amount)
    }
}
