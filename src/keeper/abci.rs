//! Block hooks: phase transitions, rollover and automatic participation

use super::{derive_reveal_value, Keeper};
use crate::crypto::{compare_with_hash, compute_hash, AccAddress};
use crate::errors::RandResult;
use crate::host::{BankKeeper, Context, StakingKeeper};
use crate::types::events::{
    ATTRIBUTE_KEY_COMMIT_END_HEIGHT, ATTRIBUTE_KEY_PERIOD_NUMBER, ATTRIBUTE_KEY_RANDOMNESS,
    ATTRIBUTE_KEY_REVEAL_END_HEIGHT, EVENT_TYPE_EPOCH_START, EVENT_TYPE_RANDOMNESS_GENERATED,
    EVENT_TYPE_REVEAL_PHASE_START,
};
use crate::types::{Event, MsgCommit, MsgReveal, Period, PhaseTransition};
use tracing::{debug, info, warn};

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// Leave the commit phase once `commit_end_height` is reached
    pub fn begin_blocker(&self, ctx: &mut Context<'_>) -> RandResult<()> {
        let mut period = self.require_period(ctx.store())?;
        if period.transition_at(ctx.block_height()) != PhaseTransition::EnterReveal {
            return Ok(());
        }

        period.enter_reveal_phase();
        self.set_period(ctx.store_mut(), &period)?;

        ctx.emit_event(
            Event::new(EVENT_TYPE_REVEAL_PHASE_START)
                .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, period.current_period)
                .attr(ATTRIBUTE_KEY_REVEAL_END_HEIGHT, period.reveal_end_height),
        );
        info!(height = ctx.block_height(), period = period.current_period, "reveal phase started");
        Ok(())
    }

    /// Roll the period over when the reveal window closes, then submit
    /// commitments or reveals on behalf of active validators.
    ///
    /// Period state errors fail the block. Failures of a single validator's
    /// automatic message are logged and skipped.
    pub fn end_blocker(&mut self, ctx: &mut Context<'_>) -> RandResult<()> {
        let mut period = self.require_period(ctx.store())?;
        let height = ctx.block_height();

        if period.transition_at(height) == PhaseTransition::Rollover {
            let closing = period.current_period;
            let seed = self.generate_randomness(ctx, closing)?;
            let params = self.get_params(ctx.store())?;

            period.rollover(height, &params, seed)?;
            self.set_period(ctx.store_mut(), &period)?;

            self.penalize_non_revealers(ctx, closing)?;
            let removed = self.clear_period_data(ctx.store_mut(), closing)?;
            debug!(period = closing, removed, "cleared period data");

            ctx.emit_event(
                Event::new(EVENT_TYPE_RANDOMNESS_GENERATED)
                    .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, closing)
                    .attr(ATTRIBUTE_KEY_RANDOMNESS, seed.to_hex()),
            );
            ctx.emit_event(
                Event::new(EVENT_TYPE_EPOCH_START)
                    .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, period.current_period)
                    .attr(ATTRIBUTE_KEY_COMMIT_END_HEIGHT, period.commit_end_height)
                    .attr(ATTRIBUTE_KEY_REVEAL_END_HEIGHT, period.reveal_end_height),
            );
            info!(height, period = closing, randomness = %seed, "randomness generated");
        }

        if period.in_commit_phase {
            self.auto_commit(ctx, &period)
        } else {
            self.auto_reveal(ctx, &period)
        }
    }

    fn auto_commit(&mut self, ctx: &mut Context<'_>, period: &Period) -> RandResult<()> {
        let height = ctx.block_height();
        let minimum = self.get_params(ctx.store())?.minimum_deposit;

        for validator in self.staking.get_all_validators() {
            if !validator.is_active() {
                continue;
            }
            let operator = validator.operator;
            if self.has_commitment(ctx.store(), period.current_period, &operator)? {
                continue;
            }

            let value = derive_reveal_value(&operator, height, period.current_period);
            let msg = MsgCommit::new(AccAddress::from(operator), operator, compute_hash(&value), minimum.clone());
            match self.commit(ctx, &msg) {
                Ok(()) => debug!(height, validator = %operator, "auto commitment submitted"),
                Err(e) => warn!(height, validator = %operator, error = %e, "auto commit skipped"),
            }
        }
        Ok(())
    }

    fn auto_reveal(&mut self, ctx: &mut Context<'_>, period: &Period) -> RandResult<()> {
        let height = ctx.block_height();

        for validator in self.staking.get_all_validators() {
            if !validator.is_bonded() {
                continue;
            }
            let operator = validator.operator;
            let commitment = match self.get_commitment(ctx.store(), period.current_period, &operator)? {
                Some(c) if !c.revealed => c,
                _ => continue,
            };

            let value = derive_reveal_value(&operator, commitment.block_height, period.current_period);
            if !compare_with_hash(&value, &commitment.commitment_hash) {
                debug!(height, validator = %operator, "commitment was not derived, leaving reveal to validator");
                continue;
            }

            let msg = MsgReveal::new(AccAddress::from(operator), operator, period.current_period, value);
            match self.reveal(ctx, &msg) {
                Ok(()) => debug!(height, validator = %operator, "auto reveal submitted"),
                Err(e) => warn!(height, validator = %operator, error = %e, "auto reveal skipped"),
            }
        }
        Ok(())
    }
}
