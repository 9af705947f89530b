//! Node module - configuration, block application and the simulated validator set

mod app;
mod config;
mod simulator;

pub use app::*;
pub use config::*;
pub use simulator::*;
