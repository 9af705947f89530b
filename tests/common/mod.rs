//! Shared fixtures for integration tests

#![allow(dead_code)]

use rh_rand::constants::MODULE_NAME;
use rh_rand::crypto::{AccAddress, ConsAddress, Hash, ValAddress};
use rh_rand::host::{BlockHeader, Context, InMemoryBank, InMemoryStaking, Validator, POWER_REDUCTION};
use rh_rand::keeper::Keeper;
use rh_rand::storage::MemStore;
use rh_rand::types::{Coin, GenesisState, Params, Period};

pub type TestKeeper = Keeper<InMemoryStaking, InMemoryBank>;

pub const BALANCE: u128 = 100_000;

pub fn val(n: u8) -> ValAddress {
    ValAddress([n; 20])
}

pub fn acc(n: u8) -> AccAddress {
    AccAddress([n; 20])
}

/// Header whose previous block hash and app hash are fixed per height
pub fn header(height: u64) -> BlockHeader {
    BlockHeader::new(height, 1_700_000_000 + height, Some(Hash([height as u8; 32])), Hash([0xAA; 32]))
}

pub fn deposit() -> Coin {
    Coin::new("urh", 1000)
}

/// Bonded validators `1..=n`, each account funded with `BALANCE`
pub fn keeper_with_validators(n: u8) -> TestKeeper {
    let mut staking = InMemoryStaking::new();
    let mut bank = InMemoryBank::new(&[MODULE_NAME]);
    for i in 1..=n {
        staking.add_validator(Validator::new(val(i), ConsAddress([i; 20]), 10 * POWER_REDUCTION));
        bank.mint(&acc(i), &Coin::new("urh", BALANCE));
    }
    Keeper::new(staking, bank)
}

/// Commit window [0, 10), reveal window [10, 20)
pub fn genesis() -> GenesisState {
    let params = Params {
        commit_period: 10,
        reveal_period: 10,
        ..Params::default()
    };
    GenesisState {
        period: Period::genesis(&params, 0).unwrap(),
        params,
        ..GenesisState::default()
    }
}

pub fn init(keeper: &TestKeeper) -> MemStore {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header(0));
    keeper.init_genesis(&mut ctx, &genesis()).expect("genesis");
    store
}

/// Run the begin-block hook alone at `height`
pub fn begin(keeper: &TestKeeper, store: &mut MemStore, height: u64) {
    let mut ctx = Context::new(store, header(height));
    keeper.begin_blocker(&mut ctx).expect("begin block");
}
