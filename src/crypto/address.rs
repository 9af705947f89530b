//! Bech-free RH addresses
//!
//! Address format: prefix + Base58Check(bytes[0:20] + checksum[0:4]), where the
//! checksum is the first four bytes of a double BLAKE3 over the address bytes.
//! Validator operator, account and consensus addresses share the encoding and
//! differ only by prefix. A validator operator and its self-delegating account
//! share the same 20 bytes.

use crate::crypto::double_hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of raw address bytes
pub const ADDRESS_LEN: usize = 20;

/// Address parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("invalid address prefix, expected {0}")]
    InvalidPrefix(&'static str),
    #[error("invalid base58 encoding")]
    InvalidEncoding,
    #[error("invalid address length")]
    InvalidLength,
    #[error("invalid checksum")]
    InvalidChecksum,
}

fn encode(prefix: &str, bytes: &[u8; ADDRESS_LEN]) -> String {
    let checksum = double_hash(bytes);
    let mut payload = Vec::with_capacity(ADDRESS_LEN + 4);
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(&checksum.0[0..4]);
    format!("{}{}", prefix, bs58::encode(payload).into_string())
}

fn decode(prefix: &'static str, s: &str) -> Result<[u8; ADDRESS_LEN], AddressError> {
    if s.is_empty() {
        return Err(AddressError::Empty);
    }
    let encoded = s.strip_prefix(prefix).ok_or(AddressError::InvalidPrefix(prefix))?;
    let decoded = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| AddressError::InvalidEncoding)?;

    if decoded.len() != ADDRESS_LEN + 4 {
        return Err(AddressError::InvalidLength);
    }

    let (addr, checksum) = decoded.split_at(ADDRESS_LEN);
    if checksum != &double_hash(addr).0[0..4] {
        return Err(AddressError::InvalidChecksum);
    }

    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(addr);
    Ok(out)
}

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; ADDRESS_LEN]);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
                $name(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&encode(Self::PREFIX, &self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = AddressError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode(Self::PREFIX, s).map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    <[u8; ADDRESS_LEN]>::deserialize(deserializer).map($name)
                }
            }
        }
    };
}

address_type!(
    /// Account address (balances, deposit payers)
    AccAddress,
    "rha"
);

address_type!(
    /// Validator operator address
    ValAddress,
    "rhv"
);

address_type!(
    /// Validator consensus address (slashing)
    ConsAddress,
    "rhc"
);

impl From<ValAddress> for AccAddress {
    fn from(val: ValAddress) -> Self {
        AccAddress(val.0)
    }
}

impl From<AccAddress> for ValAddress {
    fn from(acc: AccAddress) -> Self {
        ValAddress(acc.0)
    }
}
