//! Randomness aggregation for a closing period

use super::Keeper;
use crate::crypto::{sha256, sha256_concat, Hash};
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, BlockHeader, Context, StakingKeeper};
use tracing::debug;

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    /// Combine the reveals of `period` into one seed.
    ///
    /// Reveals are ordered by validator address, concatenated, and mixed with
    /// the previous block hash before hashing, so the result does not depend
    /// on submission order. With no reveals the seed falls back to
    /// [`fallback_seed`].
    pub fn generate_randomness(&self, ctx: &Context<'_>, period: u64) -> RandResult<Hash> {
        let mut reveals = self.get_reveals_for_period(ctx.store(), period)?;
        if reveals.is_empty() {
            debug!(period, height = ctx.block_height(), "no reveals, using fallback seed");
            return Ok(fallback_seed(ctx.header()));
        }

        let last_block_hash = ctx.header().last_block_hash.ok_or_else(|| {
            RandError::InvalidState("block header carries no last block hash".into())
        })?;

        reveals.sort_by(|a, b| a.validator.as_bytes().cmp(b.validator.as_bytes()));

        let mut input = Vec::with_capacity(reveals.iter().map(|r| r.reveal_value.len()).sum::<usize>() + 32);
        for reveal in &reveals {
            input.extend_from_slice(&reveal.reveal_value);
        }
        input.extend_from_slice(last_block_hash.as_bytes());

        debug!(period, reveals = reveals.len(), "aggregated reveals");
        Ok(sha256(&input))
    }
}

/// Seed used when nobody revealed: `sha256(app_hash || height_be)`
pub fn fallback_seed(header: &BlockHeader) -> Hash {
    sha256_concat(&[header.app_hash.as_bytes(), &header.height.to_be_bytes()])
}
