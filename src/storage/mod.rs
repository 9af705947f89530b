//! Storage module - key-value store abstraction, branches, and sled persistence

mod kv;
pub mod db;

pub use kv::*;
pub use db::SledStore;
