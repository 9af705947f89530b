//! Host chain collaborators - block context, staking registry, bank

mod context;
mod staking;
mod bank;

pub use context::*;
pub use staking::*;
pub use bank::*;
