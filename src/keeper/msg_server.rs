//! Commit and reveal message handlers
//!
//! Each handler runs on a branch of the caller's context: on error none of
//! its store writes or events survive.

use super::Keeper;
use crate::constants::MODULE_NAME;
use crate::crypto::{compute_hash, compare_with_hash};
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, Context, StakingKeeper};
use crate::types::events::{
    ATTRIBUTE_KEY_PERIOD_NUMBER, ATTRIBUTE_KEY_VALIDATOR, EVENT_TYPE_COMMITMENT, EVENT_TYPE_REVEAL,
};
use crate::types::{Commitment, Event, MsgCommit, MsgReveal, RandMsg, Reveal};
use tracing::{debug, warn};

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// Route a delivered message to its handler
    pub fn deliver(&mut self, ctx: &mut Context<'_>, msg: &RandMsg) -> RandResult<()> {
        match msg {
            RandMsg::Commit(m) => self.commit(ctx, m),
            RandMsg::Reveal(m) => self.reveal(ctx, m),
        }
    }

    /// Record a commitment for the current period and escrow its deposit
    pub fn commit(&mut self, ctx: &mut Context<'_>, msg: &MsgCommit) -> RandResult<()> {
        ctx.run_atomic(|branch| self.handle_commit(branch, msg))
    }

    /// Verify a reveal against its commitment and refund the deposit
    pub fn reveal(&mut self, ctx: &mut Context<'_>, msg: &MsgReveal) -> RandResult<()> {
        ctx.run_atomic(|branch| self.handle_reveal(branch, msg))
    }

    fn handle_commit(&mut self, ctx: &mut Context<'_>, msg: &MsgCommit) -> RandResult<()> {
        let (payer, validator_addr) = msg.validate_basic()?;
        let height = ctx.block_height();

        let period = self
            .get_period(ctx.store())?
            .ok_or_else(|| RandError::InvalidPhase("period state unavailable".into()))?;

        if !period.in_commit_phase {
            return Err(RandError::InvalidPhase("not in commit phase".into()));
        }
        if height >= period.commit_end_height {
            return Err(RandError::CommitPhaseClosed {
                commit_end_height: period.commit_end_height,
            });
        }

        let validator = self
            .staking
            .validator(&validator_addr)
            .map_err(|e| RandError::InvalidValidator {
                validator: msg.validator.clone(),
                reason: e.to_string(),
            })?;
        if !validator.is_active() {
            warn!(height, validator = %msg.validator, "invalid or inactive validator");
            return Err(RandError::InvalidValidator {
                validator: msg.validator.clone(),
                reason: "jailed or not bonded".into(),
            });
        }

        if self.has_commitment(ctx.store(), period.current_period, &validator_addr)? {
            return Err(RandError::DuplicateCommitment {
                validator: msg.validator.clone(),
                period: period.current_period,
            });
        }

        let params = self.get_params(ctx.store())?;
        if !msg.deposit.is_gte(&params.minimum_deposit) {
            return Err(RandError::InsufficientDeposit {
                got: msg.deposit.to_string(),
                minimum: params.minimum_deposit.to_string(),
            });
        }

        let commitment = Commitment {
            period: period.current_period,
            validator: validator_addr,
            commitment_hash: msg.commitment_hash,
            deposit: msg.deposit.clone(),
            block_height: height,
            revealed: false,
        };
        self.set_commitment(ctx.store_mut(), &commitment)?;

        // last fallible step: the bank is not rolled back with the store
        self.bank
            .send_coins_from_account_to_module(&payer, MODULE_NAME, &msg.deposit)
            .map_err(RandError::TransferFailed)?;

        ctx.emit_event(
            Event::new(EVENT_TYPE_COMMITMENT)
                .attr(ATTRIBUTE_KEY_VALIDATOR, &msg.validator)
                .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, period.current_period),
        );
        debug!(height, period = period.current_period, validator = %msg.validator, "commitment recorded");

        Ok(())
    }

    fn handle_reveal(&mut self, ctx: &mut Context<'_>, msg: &MsgReveal) -> RandResult<()> {
        let (payer, validator_addr) = msg.validate_basic()?;
        let height = ctx.block_height();

        let period = self
            .get_period(ctx.store())?
            .ok_or_else(|| RandError::InvalidPhase("period state unavailable".into()))?;

        if period.in_commit_phase {
            return Err(RandError::InvalidPhase("not in reveal phase".into()));
        }
        if height >= period.reveal_end_height {
            return Err(RandError::RevealPhaseClosed {
                reveal_end_height: period.reveal_end_height,
            });
        }

        if self.has_penalty(ctx.store(), msg.period, &validator_addr)? {
            return Err(RandError::HasPenalty {
                validator: msg.validator.clone(),
                period: msg.period,
            });
        }

        let mut commitment = self
            .get_commitment(ctx.store(), msg.period, &validator_addr)?
            .ok_or_else(|| RandError::NoCommitment {
                validator: msg.validator.clone(),
                period: msg.period,
            })?;

        if commitment.revealed {
            return Err(RandError::AlreadyRevealed {
                validator: msg.validator.clone(),
                period: msg.period,
            });
        }

        if !compare_with_hash(&msg.reveal_value, &commitment.commitment_hash) {
            warn!(
                height,
                period = msg.period,
                validator = %msg.validator,
                computed_hash = %compute_hash(&msg.reveal_value),
                commitment_hash = %commitment.commitment_hash,
                "reveal does not match commitment"
            );
            return Err(RandError::InvalidReveal("reveal does not match commitment".into()));
        }

        commitment.revealed = true;
        self.set_commitment(ctx.store_mut(), &commitment)?;

        let reveal = Reveal {
            period: msg.period,
            validator: validator_addr,
            reveal_value: msg.reveal_value.clone(),
            block_height: height,
        };
        self.set_reveal(ctx.store_mut(), &reveal)?;

        self.bank
            .send_coins_from_module_to_account(MODULE_NAME, &payer, &commitment.deposit)
            .map_err(RandError::TransferFailed)?;

        ctx.emit_event(
            Event::new(EVENT_TYPE_REVEAL)
                .attr(ATTRIBUTE_KEY_VALIDATOR, &msg.validator)
                .attr(ATTRIBUTE_KEY_PERIOD_NUMBER, msg.period),
        );
        debug!(height, period = msg.period, validator = %msg.validator, "reveal recorded");

        Ok(())
    }
}
