//! Per-block execution context
//!
//! A `Context` bundles the module's store, the header of the block being
//! executed, and the events emitted so far. Message handlers and block hooks
//! receive it by mutable reference.

use crate::crypto::{hash_bytes, Hash};
use crate::errors::RandResult;
use crate::storage::{CacheStore, KvStore};
use crate::types::Event;
use serde::{Deserialize, Serialize};

/// Header data supplied by the host for the block being executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    /// Seconds since Unix epoch
    pub time: u64,
    /// Hash of the previous block, absent only for the first block
    pub last_block_hash: Option<Hash>,
    /// Application state hash after the previous block
    pub app_hash: Hash,
}

impl BlockHeader {
    pub fn new(height: u64, time: u64, last_block_hash: Option<Hash>, app_hash: Hash) -> Self {
        Self {
            height,
            time,
            last_block_hash,
            app_hash,
        }
    }

    /// Serialize the header for hashing
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + 8 + 33 + 32);
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.time.to_le_bytes());
        match &self.last_block_hash {
            Some(h) => {
                bytes.push(1);
                bytes.extend_from_slice(&h.0);
            }
            None => bytes.push(0),
        }
        bytes.extend_from_slice(&self.app_hash.0);
        bytes
    }

    /// Identifier of this block, used as the next block's `last_block_hash`
    pub fn hash(&self) -> Hash {
        hash_bytes(&self.to_bytes())
    }
}

/// Store, header and event sink for one unit of execution
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    header: BlockHeader,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore, header: BlockHeader) -> Self {
        Self {
            store,
            header,
            events: Vec::new(),
        }
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    pub fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Run `f` on a branch of this context.
    ///
    /// Store writes and events of the branch are kept only if `f` succeeds;
    /// on error the branch is dropped and the error returned unchanged.
    pub fn run_atomic<T, F>(&mut self, f: F) -> RandResult<T>
    where
        F: FnOnce(&mut Context<'_>) -> RandResult<T>,
    {
        let header = self.header.clone();
        let mut cache = CacheStore::new(&mut *self.store);
        let (result, events) = {
            let mut branch = Context::new(&mut cache, header);
            let result = f(&mut branch);
            (result, branch.into_events())
        };
        let value = result?;
        cache.write()?;
        self.events.extend(events);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RandError;
    use crate::storage::MemStore;

    fn header() -> BlockHeader {
        BlockHeader::new(5, 1_700_000_000, Some(Hash([1; 32])), Hash([2; 32]))
    }

    #[test]
    fn test_header_hash_depends_on_fields() {
        let a = header();
        let mut b = header();
        b.height = 6;
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash(), header().hash());
    }

    #[test]
    fn test_run_atomic_commits_on_success() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, header());
        ctx.run_atomic(|branch| {
            branch.store_mut().set(b"k", b"v")?;
            branch.emit_event(Event::new("ok"));
            Ok(())
        })
        .unwrap();
        assert_eq!(ctx.events().len(), 1);
        drop(ctx);
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_run_atomic_discards_on_error() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, header());
        let result: RandResult<()> = ctx.run_atomic(|branch| {
            branch.store_mut().set(b"k", b"v")?;
            branch.emit_event(Event::new("lost"));
            Err(RandError::InvalidState("boom".into()))
        });
        assert!(result.is_err());
        assert!(ctx.events().is_empty());
        drop(ctx);
        assert!(store.is_empty());
    }
}
