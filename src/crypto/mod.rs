//! Cryptography module - SHA-256 commitments, BLAKE3 header hashing, addresses

mod hash;
mod address;

pub use hash::*;
pub use address::*;
