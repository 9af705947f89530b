//! Read-only queries served to external callers

use super::Keeper;
use crate::crypto::Hash;
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, StakingKeeper};
use crate::storage::KvStore;
use crate::types::{Commitment, Params, Penalty, Period, Reveal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPeriodResponse {
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCommitmentResponse {
    pub commitment: Commitment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCommitmentsResponse {
    pub commitments: Vec<Commitment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRevealsResponse {
    pub reveals: Vec<Reveal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPenaltiesResponse {
    pub penalties: Vec<Penalty>,
}

/// Latest finalized randomness; both fields are `None` before the first rollover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRandomnessResponse {
    pub period: Option<u64>,
    pub randomness: Option<Hash>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsResponse {
    pub params: Params,
}

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    pub fn query_period(&self, store: &dyn KvStore) -> RandResult<QueryPeriodResponse> {
        Ok(QueryPeriodResponse {
            period: self.require_period(store)?,
        })
    }

    pub fn query_commitment(
        &self,
        store: &dyn KvStore,
        period: u64,
        validator: &str,
    ) -> RandResult<QueryCommitmentResponse> {
        let commitment = self
            .get_validator_commitment_by_period(store, period, validator)?
            .ok_or_else(|| RandError::NoCommitment {
                validator: validator.to_string(),
                period,
            })?;
        Ok(QueryCommitmentResponse { commitment })
    }

    pub fn query_commitments(&self, store: &dyn KvStore) -> RandResult<QueryCommitmentsResponse> {
        Ok(QueryCommitmentsResponse {
            commitments: self.get_commitments(store)?,
        })
    }

    pub fn query_reveals(&self, store: &dyn KvStore) -> RandResult<QueryRevealsResponse> {
        Ok(QueryRevealsResponse {
            reveals: self.get_reveals(store)?,
        })
    }

    pub fn query_penalties(&self, store: &dyn KvStore) -> RandResult<QueryPenaltiesResponse> {
        Ok(QueryPenaltiesResponse {
            penalties: self.get_penalties(store)?,
        })
    }

    pub fn query_current_randomness(&self, store: &dyn KvStore) -> RandResult<QueryRandomnessResponse> {
        let period = self.require_period(store)?;
        Ok(QueryRandomnessResponse {
            period: period.finalized_period(),
            randomness: period.current_seed,
        })
    }

    pub fn query_params(&self, store: &dyn KvStore) -> RandResult<QueryParamsResponse> {
        Ok(QueryParamsResponse {
            params: self.get_params(store)?,
        })
    }
}
