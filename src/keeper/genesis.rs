//! Genesis import and export

use super::Keeper;
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, Context, StakingKeeper};
use crate::storage::KvStore;
use crate::types::GenesisState;
use tracing::info;

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// Validate `genesis` and write it to the store
    pub fn init_genesis(&self, ctx: &mut Context<'_>, genesis: &GenesisState) -> RandResult<()> {
        genesis.validate().map_err(RandError::InvalidGenesis)?;

        let store = ctx.store_mut();
        self.set_params(store, &genesis.params)?;
        self.set_period(store, &genesis.period)?;
        for c in &genesis.commitments {
            self.set_commitment(store, c)?;
        }
        for r in &genesis.reveals {
            self.set_reveal(store, r)?;
        }
        for p in &genesis.penalties {
            self.set_penalty(store, p)?;
        }

        info!(
            period = genesis.period.current_period,
            commit_end_height = genesis.period.commit_end_height,
            reveal_end_height = genesis.period.reveal_end_height,
            "rand genesis initialized"
        );
        Ok(())
    }

    pub fn export_genesis(&self, store: &dyn KvStore) -> RandResult<GenesisState> {
        Ok(GenesisState {
            params: self.get_params(store)?,
            period: self.require_period(store)?,
            commitments: self.get_commitments(store)?,
            reveals: self.get_reveals(store)?,
            penalties: self.get_penalties(store)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use crate::crypto::compute_hash;
    use crate::errors::RandError;
    use crate::host::Context;
    use crate::storage::MemStore;
    use crate::types::{Commitment, Params, Penalty};

    #[test]
    fn test_export_matches_import() {
        let keeper = keeper_with_validators(0);
        let mut genesis = genesis();
        genesis.commitments.push(Commitment {
            period: 0,
            validator: val(1),
            commitment_hash: compute_hash(b"x"),
            deposit: deposit(),
            block_height: 2,
            revealed: false,
        });
        genesis.penalties.push(Penalty { period: 0, validator: val(2), deposit: deposit(), block_height: 1 });

        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, header(0));
        keeper.init_genesis(&mut ctx, &genesis).unwrap();
        drop(ctx);

        assert_eq!(keeper.export_genesis(&store).unwrap(), genesis);
    }

    #[test]
    fn test_invalid_genesis_rejected() {
        let keeper = keeper_with_validators(0);
        let mut genesis = genesis();
        genesis.params = Params { commit_period: 0, ..Params::default() };

        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, header(0));
        let err = keeper.init_genesis(&mut ctx, &genesis).unwrap_err();
        assert!(matches!(err, RandError::InvalidGenesis(_)));
        drop(ctx);
        assert!(store.is_empty());
    }

    #[test]
    fn test_genesis_with_overflowing_windows_rejected() {
        let keeper = keeper_with_validators(0);
        let mut genesis = genesis();
        genesis.params.commit_period = u64::MAX - 5;
        genesis.period.in_commit_phase = false;

        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, header(0));
        let err = keeper.init_genesis(&mut ctx, &genesis).unwrap_err();
        assert!(matches!(err, RandError::InvalidGenesis(_)));
    }
}
