//! Property-based tests for the rand module
//!
//! These tests verify invariants hold under random inputs.

mod common;

use common::*;
use proptest::prelude::*;
use rh_rand::constants::MODULE_NAME;
use rh_rand::crypto::{compare_with_hash, compute_hash};
use rh_rand::errors::RandError;
use rh_rand::host::{BankKeeper, Context};
use rh_rand::storage::MemStore;
use rh_rand::types::{Coin, MsgCommit, MsgReveal, Reveal};

// ============================================================================
// COMMITMENT HASHING
// ============================================================================

proptest! {
    /// A value always matches its own commitment hash
    #[test]
    fn prop_hash_matches_own_value(value in prop::collection::vec(any::<u8>(), 1..128)) {
        prop_assert!(compare_with_hash(&value, &compute_hash(&value)));
    }

    /// Reveal succeeds for the committed value and fails for any other
    #[test]
    fn prop_commit_reveal_symmetry(
        value in prop::collection::vec(any::<u8>(), 1..64),
        other in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut keeper = keeper_with_validators(1);
        let mut store = init(&keeper);

        let mut ctx = Context::new(&mut store, header(3));
        keeper.commit(&mut ctx, &MsgCommit::new(acc(1), val(1), compute_hash(&value), deposit())).unwrap();
        drop(ctx);
        begin(&keeper, &mut store, 10);

        let mut ctx = Context::new(&mut store, header(12));
        if other != value {
            let err = keeper.reveal(&mut ctx, &MsgReveal::new(acc(1), val(1), 0, other)).unwrap_err();
            prop_assert!(matches!(err, RandError::InvalidReveal(_)));
        }
        prop_assert!(keeper.reveal(&mut ctx, &MsgReveal::new(acc(1), val(1), 0, value)).is_ok());
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

proptest! {
    /// Randomness does not depend on the order reveals were stored in
    #[test]
    fn prop_aggregation_order_independent(
        values in prop::collection::btree_map(1u8..=200, prop::collection::vec(any::<u8>(), 1..32), 1..12),
    ) {
        let keeper = keeper_with_validators(0);
        let reveals: Vec<Reveal> = values
            .into_iter()
            .map(|(v, reveal_value)| Reveal { period: 0, validator: val(v), reveal_value, block_height: 12 })
            .collect();

        let mut forward = MemStore::new();
        for r in &reveals {
            keeper.set_reveal(&mut forward, r).unwrap();
        }
        let mut backward = MemStore::new();
        for r in reveals.iter().rev() {
            keeper.set_reveal(&mut backward, r).unwrap();
        }

        let a = keeper.generate_randomness(&Context::new(&mut forward, header(20)), 0).unwrap();
        let b = keeper.generate_randomness(&Context::new(&mut backward, header(20)), 0).unwrap();
        prop_assert_eq!(a, b);
    }

    /// A different block hash gives a different seed
    #[test]
    fn prop_aggregation_binds_block_hash(
        value in prop::collection::vec(any::<u8>(), 1..32),
        h1 in 20u64..120,
        h2 in 20u64..120,
    ) {
        prop_assume!(h1 != h2);
        let keeper = keeper_with_validators(0);
        let mut store = MemStore::new();
        keeper.set_reveal(&mut store, &Reveal { period: 0, validator: val(1), reveal_value: value, block_height: 12 }).unwrap();

        let a = keeper.generate_randomness(&Context::new(&mut store, header(h1)), 0).unwrap();
        let b = keeper.generate_randomness(&Context::new(&mut store, header(h2)), 0).unwrap();
        prop_assert_ne!(a, b);
    }
}

// ============================================================================
// DEPOSITS AND PHASES
// ============================================================================

proptest! {
    /// Commit then reveal leaves the payer's balance unchanged
    #[test]
    fn prop_deposit_conserved_on_reveal(amount in 1000u128..=BALANCE, commit_height in 1u64..10, reveal_height in 10u64..20) {
        let mut keeper = keeper_with_validators(1);
        let mut store = init(&keeper);

        let mut ctx = Context::new(&mut store, header(commit_height));
        keeper
            .commit(&mut ctx, &MsgCommit::new(acc(1), val(1), compute_hash(b"v"), Coin::new("urh", amount)))
            .unwrap();
        drop(ctx);
        prop_assert_eq!(keeper.bank().balance(&acc(1), "urh"), BALANCE - amount);

        begin(&keeper, &mut store, 10);
        let mut ctx = Context::new(&mut store, header(reveal_height));
        keeper.reveal(&mut ctx, &MsgReveal::new(acc(1), val(1), 0, b"v".to_vec())).unwrap();

        prop_assert_eq!(keeper.bank().balance(&acc(1), "urh"), BALANCE);
        prop_assert_eq!(keeper.bank().module_balance(MODULE_NAME, "urh"), 0);
    }

    /// Deposits below the minimum are refused and nothing moves
    #[test]
    fn prop_small_deposit_refused(amount in 1u128..1000) {
        let mut keeper = keeper_with_validators(1);
        let mut store = init(&keeper);

        let mut ctx = Context::new(&mut store, header(2));
        let err = keeper
            .commit(&mut ctx, &MsgCommit::new(acc(1), val(1), compute_hash(b"v"), Coin::new("urh", amount)))
            .unwrap_err();
        prop_assert!(matches!(err, RandError::InsufficientDeposit { .. }), "expected InsufficientDeposit");
        prop_assert_eq!(keeper.bank().balance(&acc(1), "urh"), BALANCE);
    }

    /// Commit only in the commit phase, reveal only in the reveal phase
    #[test]
    fn prop_phase_exclusivity(commit_height in 1u64..10, reveal_height in 10u64..20) {
        let mut keeper = keeper_with_validators(1);
        let mut store = init(&keeper);

        let mut ctx = Context::new(&mut store, header(commit_height));
        let err = keeper
            .reveal(&mut ctx, &MsgReveal::new(acc(1), val(1), 0, b"v".to_vec()))
            .unwrap_err();
        prop_assert!(matches!(err, RandError::InvalidPhase(_)));
        drop(ctx);

        begin(&keeper, &mut store, 10);
        let mut ctx = Context::new(&mut store, header(reveal_height));
        let err = keeper
            .commit(&mut ctx, &MsgCommit::new(acc(1), val(1), compute_hash(b"v"), deposit()))
            .unwrap_err();
        prop_assert!(matches!(err, RandError::InvalidPhase(_)));
    }
}
