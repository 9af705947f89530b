//! ROHO (RH) rand module
//!
//! A commit-reveal randomness beacon driven once per block by the host chain.
//! Validators commit to SHA-256 digests of secret values during the commit
//! window, reveal the preimages during the reveal window, and at the end of
//! each period the revealed values are folded into a single seed.

pub mod crypto;
pub mod errors;
pub mod storage;
pub mod types;
pub mod host;
pub mod keeper;
pub mod node;
pub mod rpc;

/// Module constants
pub mod constants {
    /// Module name, also the name of the escrow module account
    pub const MODULE_NAME: &str = "rand";

    /// Error codespace reported with transaction results
    pub const CODESPACE: &str = "rand";

    /// Bond denomination used for deposits
    pub const BOND_DENOM: &str = "urh";

    /// Default commit window length (blocks)
    pub const DEFAULT_COMMIT_PERIOD: u64 = 10;

    /// Default reveal window length (blocks)
    pub const DEFAULT_REVEAL_PERIOD: u64 = 10;

    /// Default minimum deposit (in BOND_DENOM base units)
    pub const DEFAULT_MINIMUM_DEPOSIT: u128 = 1000;

    /// Basis-point denominator for slash fractions
    pub const BPS_DENOMINATOR: u64 = 10_000;

    /// Upper bound on commit plus reveal window length (blocks)
    pub const MAX_PERIOD_LENGTH: u64 = 1_000_000;
}
