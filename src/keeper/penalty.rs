//! Liveness penalties for validators that committed but never revealed

use super::Keeper;
use crate::errors::RandResult;
use crate::host::{BankKeeper, Context, StakingKeeper};
use crate::types::events::{ATTRIBUTE_KEY_PERIOD_NUMBER, ATTRIBUTE_KEY_VALIDATOR, EVENT_TYPE_PENALTY};
use crate::types::{Event, Penalty};
use tracing::{debug, info, warn};

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// Record a penalty for every bonded validator with an unrevealed
    /// commitment in `period`.
    ///
    /// The forfeited deposit stays in module escrow. Validators that already
    /// carry a penalty for `period` are skipped, so a repeated call records
    /// nothing new. When `slash_fraction_bps` is set the validator's stake is
    /// slashed as well; a failed slash is logged and does not undo the penalty.
    pub fn penalize_non_revealers(&mut self, ctx: &mut Context<'_>, period: u64) -> RandResult<Vec<Penalty>> {
        let params = self.get_params(ctx.store())?;
        let height = ctx.block_height();
        let mut recorded = Vec::new();

        for commitment in self.get_commitments_by_period(ctx.store(), period)? {
            let validator = match self.staking.validator(&commitment.validator) {
                Ok(v) => v,
                Err(e) => {
                    debug!(period, validator = %commitment.validator, error = %e, "skipping unknown validator");
                    continue;
                }
            };
            if !validator.is_bonded() {
                debug!(period, validator = %commitment.validator, "skipping unbonded validator");
                continue;
            }
            if self.has_penalty(ctx.store(), period, &commitment.validator)? {
                continue;
            }

            let penalty = Penalty {
                period,
                validator: commitment.validator,
                deposit: commitment.deposit.clone(),
                block_height: height,
            };
            self.set_penalty(ctx.store_mut(), &penalty)?;

            ctx.emit_event(
                Event::new(EVENT_TYPE_PENALTY)
                    .attr(ATTRIBUTE_KEY_VALIDATOR, commitment.validator)
                    .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, period),
            );
            info!(period, validator = %commitment.validator, deposit = %commitment.deposit, "deposit forfeited");

            if params.slash_fraction_bps > 0 {
                match self.staking.slash(
                    &validator.cons_address,
                    commitment.block_height,
                    validator.consensus_power(),
                    params.slash_fraction_bps,
                ) {
                    Ok(burned) => info!(period, validator = %commitment.validator, burned, "validator slashed"),
                    Err(e) => warn!(period, validator = %commitment.validator, error = %e, "slash failed"),
                }
            }

            recorded.push(penalty);
        }

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use crate::constants::MODULE_NAME;
    use crate::crypto::compute_hash;
    use crate::host::{BankKeeper, BondStatus, Context, StakingKeeper};
    use crate::storage::MemStore;
    use crate::types::{Commitment, Params};

    fn store_with_commitments(keeper: &TestKeeper, params: &Params, entries: &[(u8, bool)]) -> MemStore {
        let mut store = MemStore::new();
        keeper.set_params(&mut store, params).unwrap();
        for &(v, revealed) in entries {
            let c = Commitment {
                period: 0,
                validator: val(v),
                commitment_hash: compute_hash(&[v]),
                deposit: deposit(),
                block_height: 4,
                revealed,
            };
            keeper.set_commitment(&mut store, &c).unwrap();
        }
        store
    }

    #[test]
    fn test_only_unrevealed_bonded_validators_penalized() {
        let mut keeper = keeper_with_validators(3);
        keeper.staking_mut().set_status(&val(3), BondStatus::Unbonded).unwrap();
        let mut store = store_with_commitments(&keeper, &genesis().params, &[(1, true), (2, false), (3, false)]);

        let mut ctx = Context::new(&mut store, header(20));
        let penalties = keeper.penalize_non_revealers(&mut ctx, 0).unwrap();
        assert_eq!(penalties.len(), 1);
        assert_eq!(penalties[0].validator, val(2));
        assert_eq!(penalties[0].deposit, deposit());
        assert_eq!(penalties[0].block_height, 20);

        let events = ctx.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "penalty");
        assert_eq!(events[0].get("period_number"), Some("0"));
        assert_eq!(events[0].get("validator"), Some(val(2).to_string().as_str()));

        assert!(keeper.has_penalty(&store, 0, &val(2)).unwrap());
        assert!(!keeper.has_penalty(&store, 0, &val(3)).unwrap());
        assert_eq!(keeper.bank().module_balance(MODULE_NAME, "urh"), 0);
    }

    #[test]
    fn test_repeat_call_records_nothing() {
        let mut keeper = keeper_with_validators(1);
        let mut store = store_with_commitments(&keeper, &genesis().params, &[(1, false)]);

        let mut ctx = Context::new(&mut store, header(20));
        assert_eq!(keeper.penalize_non_revealers(&mut ctx, 0).unwrap().len(), 1);
        assert!(keeper.penalize_non_revealers(&mut ctx, 0).unwrap().is_empty());
        assert_eq!(ctx.events().len(), 1);
    }

    #[test]
    fn test_slash_applied_when_configured() {
        let mut keeper = keeper_with_validators(1);
        let params = Params { slash_fraction_bps: 100, ..genesis().params };
        let mut store = store_with_commitments(&keeper, &params, &[(1, false)]);
        let before = keeper.staking().validator(&val(1)).unwrap().tokens;

        let mut ctx = Context::new(&mut store, header(20));
        keeper.penalize_non_revealers(&mut ctx, 0).unwrap();

        let after = keeper.staking().validator(&val(1)).unwrap().tokens;
        assert_eq!(before - after, before / 100);
    }
}
