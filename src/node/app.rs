//! Block application over a key-value store
//!
//! `RandApp` plays the host chain's part: it builds block headers, runs the
//! rand module's hooks in order (begin block, messages, end block) and
//! commits the resulting state.
//!
//! A block runs on a branch of the committed store and the keeper's
//! collaborators are checkpointed when it opens. If a hook fails, both are
//! restored and the block is dropped as if it never began.

use crate::constants::CODESPACE;
use crate::crypto::{hash_bytes, Hash};
use crate::errors::{RandError, RandResult};
use crate::host::{BankKeeper, BlockHeader, Context, StakingKeeper};
use crate::keeper::Keeper;
use crate::storage::{CacheStore, KvStore};
use crate::types::{Event, GenesisState, Period, RandMsg};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Last committed header and app hash, kept outside the module's prefixes
const CHAIN_TIP_KEY: &[u8] = b"\xffapp/tip";

/// Outcome of one delivered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub code: u32,
    pub codespace: String,
    pub log: String,
}

impl TxResult {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    fn from_result(result: RandResult<()>) -> Self {
        match result {
            Ok(()) => Self { code: 0, codespace: String::new(), log: String::new() },
            Err(e) => Self { code: e.code(), codespace: CODESPACE.to_string(), log: e.to_string() },
        }
    }
}

/// A committed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub header: BlockHeader,
    pub hash: Hash,
    /// State hash after this block, carried by the next header
    pub app_hash: Hash,
    pub events: Vec<Event>,
    pub tx_results: Vec<TxResult>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChainTip {
    header: Option<BlockHeader>,
    app_hash: Hash,
}

#[derive(Debug)]
pub struct RandApp<St, S, B> {
    store: CacheStore<St>,
    keeper: Keeper<S, B>,
    last_header: Option<BlockHeader>,
    last_app_hash: Hash,
    pending: Option<BlockHeader>,
    checkpoint: Option<Keeper<S, B>>,
    events: Vec<Event>,
    tx_results: Vec<TxResult>,
}

impl<St, S, B> RandApp<St, S, B>
where
    St: KvStore,
    S: StakingKeeper + Clone,
    B: BankKeeper + Clone,
{
    /// Resume from the store, or apply `genesis` if it holds no chain yet
    pub fn new(store: St, keeper: Keeper<S, B>, genesis: &GenesisState) -> RandResult<Self> {
        let mut store = CacheStore::new(store);

        let tip: ChainTip = match store.get(CHAIN_TIP_KEY)? {
            Some(bytes) => bincode::deserialize(&bytes)?,
            None => {
                if keeper.get_period(&store)?.is_none() {
                    let mut ctx = Context::new(&mut store, BlockHeader::new(0, 0, None, Hash::zero()));
                    keeper.init_genesis(&mut ctx, genesis)?;
                }
                let tip = ChainTip { header: None, app_hash: full_state_hash(&store)? };
                store.set(CHAIN_TIP_KEY, &bincode::serialize(&tip)?)?;
                store.commit()?;
                store.parent().flush()?;
                tip
            }
        };

        if let Some(h) = &tip.header {
            info!(height = h.height, app_hash = %tip.app_hash, "resuming from stored chain");
        }

        Ok(Self {
            store,
            keeper,
            last_header: tip.header,
            last_app_hash: tip.app_hash,
            pending: None,
            checkpoint: None,
            events: Vec::new(),
            tx_results: Vec::new(),
        })
    }

    /// Height of the last committed block, 0 before the first one
    pub fn height(&self) -> u64 {
        self.last_header.as_ref().map(|h| h.height).unwrap_or(0)
    }

    pub fn keeper(&self) -> &Keeper<S, B> {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut Keeper<S, B> {
        &mut self.keeper
    }

    /// State as seen by the open block, or the committed state between blocks
    pub fn store(&self) -> &CacheStore<St> {
        &self.store
    }

    pub fn period(&self) -> RandResult<Period> {
        self.keeper.require_period(&self.store)
    }

    /// Open the next block and run the begin-block hook
    pub fn begin_block(&mut self, time: u64) -> RandResult<()> {
        if self.pending.is_some() {
            return Err(RandError::InvalidState("previous block not committed".into()));
        }
        let header = BlockHeader::new(
            self.height() + 1,
            time,
            self.last_header.as_ref().map(BlockHeader::hash),
            self.last_app_hash,
        );

        self.checkpoint = Some(self.keeper.clone());
        self.pending = Some(header.clone());

        let mut ctx = Context::new(&mut self.store, header);
        let result = self.keeper.begin_blocker(&mut ctx);
        let events = ctx.into_events();
        self.settle(result, events)
    }

    /// Run one message; its failure is reported, not propagated
    pub fn deliver(&mut self, msg: &RandMsg) -> RandResult<TxResult> {
        let header = self.pending_header()?;
        let mut ctx = Context::new(&mut self.store, header);
        let result = TxResult::from_result(self.keeper.deliver(&mut ctx, msg));
        if !result.is_ok() {
            debug!(code = result.code, log = %result.log, "message rejected");
        }
        self.events.extend(ctx.into_events());
        self.tx_results.push(result.clone());
        Ok(result)
    }

    /// Run the end-block hook; on error the whole block is discarded
    pub fn end_block(&mut self) -> RandResult<()> {
        let header = self.pending_header()?;
        let mut ctx = Context::new(&mut self.store, header);
        let result = self.keeper.end_blocker(&mut ctx);
        let events = ctx.into_events();
        self.settle(result, events)
    }

    /// Persist the block and hand back what happened in it
    pub fn commit(&mut self) -> RandResult<BlockSummary> {
        let header = self.pending_header()?;
        let app_hash = chain_hash(&self.last_app_hash, &self.store);

        let tip = ChainTip { header: Some(header.clone()), app_hash };
        if let Err(e) = self.write_block(&tip) {
            self.abort_block(&e);
            return Err(e);
        }

        let summary = BlockSummary {
            hash: header.hash(),
            header: header.clone(),
            app_hash,
            events: std::mem::take(&mut self.events),
            tx_results: std::mem::take(&mut self.tx_results),
        };
        self.pending = None;
        self.checkpoint = None;
        self.last_header = Some(header);
        self.last_app_hash = app_hash;
        Ok(summary)
    }

    /// Begin, deliver `msgs`, end and commit in one go
    pub fn apply_block(&mut self, time: u64, msgs: &[RandMsg]) -> RandResult<BlockSummary> {
        self.begin_block(time)?;
        for msg in msgs {
            self.deliver(msg)?;
        }
        self.end_block()?;
        self.commit()
    }

    fn write_block(&mut self, tip: &ChainTip) -> RandResult<()> {
        self.store.set(CHAIN_TIP_KEY, &bincode::serialize(tip)?)?;
        self.store.commit()?;
        self.store.parent().flush()?;
        Ok(())
    }

    fn settle(&mut self, result: RandResult<()>, events: Vec<Event>) -> RandResult<()> {
        match result {
            Ok(()) => {
                self.events.extend(events);
                Ok(())
            }
            Err(e) => {
                self.abort_block(&e);
                Err(e)
            }
        }
    }

    fn abort_block(&mut self, cause: &RandError) {
        if let Some(header) = &self.pending {
            warn!(height = header.height, error = %cause, "block failed");
        }
        self.discard_block();
    }

    /// Drop every effect of the open block, if any
    pub fn discard_block(&mut self) {
        self.pending = None;
        if let Some(keeper) = self.checkpoint.take() {
            self.keeper = keeper;
        }
        self.store.discard();
        self.events.clear();
        self.tx_results.clear();
    }

    fn pending_header(&self) -> RandResult<BlockHeader> {
        self.pending
            .clone()
            .ok_or_else(|| RandError::InvalidState("no block in progress".into()))
    }
}

/// BLAKE3 over every stored key/value pair, in key order
fn full_state_hash(store: &dyn KvStore) -> RandResult<Hash> {
    let mut data = Vec::new();
    for (key, value) in store.scan_prefix(&[])? {
        data.extend_from_slice(&(key.len() as u32).to_be_bytes());
        data.extend_from_slice(&key);
        data.extend_from_slice(&(value.len() as u32).to_be_bytes());
        data.extend_from_slice(&value);
    }
    Ok(hash_bytes(&data))
}

/// Next app hash: BLAKE3 over the previous one and the block's changes
fn chain_hash<P: KvStore>(prev: &Hash, block: &CacheStore<P>) -> Hash {
    let mut data = prev.as_bytes().to_vec();
    for (key, value) in block.changes() {
        data.extend_from_slice(&(key.len() as u32).to_be_bytes());
        data.extend_from_slice(key);
        match value {
            Some(v) => {
                data.push(1);
                data.extend_from_slice(&(v.len() as u32).to_be_bytes());
                data.extend_from_slice(v);
            }
            None => data.push(0),
        }
    }
    hash_bytes(&data)
}
