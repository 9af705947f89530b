//! JSON-RPC API Module
//!
//! Provides an HTTP interface for external applications to query the rand
//! module's state.

mod methods;
mod server;

pub use methods::*;
pub use server::*;
