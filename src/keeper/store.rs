//! Store accessors for period, params, commitments, reveals and penalties

use super::{load, load_prefix, save, Keeper};
use crate::crypto::ValAddress;
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, StakingKeeper};
use crate::storage::KvStore;
use crate::types::keys::{
    commitment_key, commitments_by_period_prefix, params_key, penalty_key, period_key,
    reveal_key, reveals_by_period_prefix, COMMITMENT_PREFIX, PENALTY_PREFIX, REVEAL_PREFIX,
};
use crate::types::{Commitment, Params, Penalty, Period, Reveal};

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// `None` until genesis has been applied
    pub fn get_period(&self, store: &dyn KvStore) -> RandResult<Option<Period>> {
        load(store, &period_key())
    }

    pub fn set_period(&self, store: &mut dyn KvStore, period: &Period) -> RandResult<()> {
        save(store, &period_key(), period)
    }

    /// Period state that block processing cannot continue without
    pub(crate) fn require_period(&self, store: &dyn KvStore) -> RandResult<Period> {
        self.get_period(store)?
            .ok_or_else(|| RandError::InvalidState("period state not initialized".into()))
    }

    pub fn get_params(&self, store: &dyn KvStore) -> RandResult<Params> {
        load(store, &params_key())?
            .ok_or_else(|| RandError::InvalidState("params not initialized".into()))
    }

    pub fn set_params(&self, store: &mut dyn KvStore, params: &Params) -> RandResult<()> {
        save(store, &params_key(), params)
    }

    pub fn set_commitment(&self, store: &mut dyn KvStore, commitment: &Commitment) -> RandResult<()> {
        save(store, &commitment_key(commitment.period, &commitment.validator), commitment)
    }

    pub fn get_commitment(
        &self,
        store: &dyn KvStore,
        period: u64,
        validator: &ValAddress,
    ) -> RandResult<Option<Commitment>> {
        load(store, &commitment_key(period, validator))
    }

    pub fn has_commitment(&self, store: &dyn KvStore, period: u64, validator: &ValAddress) -> RandResult<bool> {
        Ok(store.has(&commitment_key(period, validator))?)
    }

    /// Commitment of a validator given in its string form
    pub fn get_validator_commitment_by_period(
        &self,
        store: &dyn KvStore,
        period: u64,
        validator: &str,
    ) -> RandResult<Option<Commitment>> {
        let addr: ValAddress = validator.parse()?;
        self.get_commitment(store, period, &addr)
    }

    /// Un-revealed commitments of `period`, ordered by validator address
    pub fn get_commitments_by_period(&self, store: &dyn KvStore, period: u64) -> RandResult<Vec<Commitment>> {
        let all: Vec<Commitment> = load_prefix(store, &commitments_by_period_prefix(period))?;
        Ok(all.into_iter().filter(|c| !c.revealed).collect())
    }

    /// Every stored commitment, revealed or not
    pub fn get_commitments(&self, store: &dyn KvStore) -> RandResult<Vec<Commitment>> {
        load_prefix(store, &[COMMITMENT_PREFIX])
    }

    pub fn set_reveal(&self, store: &mut dyn KvStore, reveal: &Reveal) -> RandResult<()> {
        save(store, &reveal_key(reveal.period, &reveal.validator), reveal)
    }

    pub fn get_reveal(&self, store: &dyn KvStore, period: u64, validator: &ValAddress) -> RandResult<Option<Reveal>> {
        load(store, &reveal_key(period, validator))
    }

    pub fn get_reveals(&self, store: &dyn KvStore) -> RandResult<Vec<Reveal>> {
        load_prefix(store, &[REVEAL_PREFIX])
    }

    /// Reveals of `period`, ordered by validator address
    pub fn get_reveals_for_period(&self, store: &dyn KvStore, period: u64) -> RandResult<Vec<Reveal>> {
        load_prefix(store, &reveals_by_period_prefix(period))
    }

    pub fn set_penalty(&self, store: &mut dyn KvStore, penalty: &Penalty) -> RandResult<()> {
        save(store, &penalty_key(penalty.period, &penalty.validator), penalty)
    }

    pub fn get_penalty(&self, store: &dyn KvStore, period: u64, validator: &ValAddress) -> RandResult<Option<Penalty>> {
        load(store, &penalty_key(period, validator))
    }

    pub fn has_penalty(&self, store: &dyn KvStore, period: u64, validator: &ValAddress) -> RandResult<bool> {
        Ok(store.has(&penalty_key(period, validator))?)
    }

    pub fn get_penalties(&self, store: &dyn KvStore) -> RandResult<Vec<Penalty>> {
        load_prefix(store, &[PENALTY_PREFIX])
    }

    /// Delete every commitment and reveal of `period`. Returns the number of
    /// entries removed.
    pub fn clear_period_data(&self, store: &mut dyn KvStore, period: u64) -> RandResult<usize> {
        let mut removed = 0;
        for prefix in [commitments_by_period_prefix(period), reveals_by_period_prefix(period)] {
            for (key, _) in store.scan_prefix(&prefix)? {
                store.delete(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
