//! Keeper - owns the rand module's state and its collaborators
//!
//! State lives in the store carried by each [`Context`](crate::host::Context);
//! the keeper itself only holds the staking and bank collaborators. Store
//! values are bincode-encoded.

mod store;
mod msg_server;
mod randomness;
mod penalty;
mod abci;
mod genesis;
mod query;
mod derive;

pub use derive::*;
pub use query::*;
pub use randomness::fallback_seed;

use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, StakingKeeper};
use crate::storage::KvStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Rand module keeper
#[derive(Debug, Clone)]
pub struct Keeper<S, B> {
    staking: S,
    bank: B,
}

impl<S: StakingKeeper, B: BankKeeper> Keeper<S, B> {
    pub fn new(staking: S, bank: B) -> Self {
        Self { staking, bank }
    }

    pub fn staking(&self) -> &S {
        &self.staking
    }

    pub fn staking_mut(&mut self) -> &mut S {
        &mut self.staking
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }
}

fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &[u8]) -> RandResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

fn save<T: Serialize>(store: &mut dyn KvStore, key: &[u8], value: &T) -> RandResult<()> {
    let bytes = bincode::serialize(value)?;
    store.set(key, &bytes)?;
    Ok(())
}

fn load_prefix<T: DeserializeOwned>(store: &dyn KvStore, prefix: &[u8]) -> RandResult<Vec<T>> {
    store
        .scan_prefix(prefix)?
        .into_iter()
        .map(|(_, bytes)| bincode::deserialize(&bytes).map_err(RandError::from))
        .collect()
}
