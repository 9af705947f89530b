//! Store key layout
//!
//! Every key starts with a single-byte entity prefix. Per-validator records
//! follow it with the big-endian period and the 20 raw address bytes, so a
//! prefix scan over `prefix || period` yields one period's records sorted by
//! validator address.

use crate::crypto::ValAddress;

pub const PERIOD_PREFIX: u8 = 0x01;
pub const COMMITMENT_PREFIX: u8 = 0x02;
pub const REVEAL_PREFIX: u8 = 0x03;
pub const PARAMS_PREFIX: u8 = 0x04;
pub const PENALTY_PREFIX: u8 = 0x05;

/// Identifier of the singleton period record
const PERIOD_ID: &[u8] = b"period";

/// `0x01 || len(id) || id`
pub fn period_key() -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + PERIOD_ID.len());
    key.push(PERIOD_PREFIX);
    key.push(PERIOD_ID.len() as u8);
    key.extend_from_slice(PERIOD_ID);
    key
}

pub fn params_key() -> Vec<u8> {
    vec![PARAMS_PREFIX]
}

fn period_prefix(prefix: u8, period: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 8 + 20);
    key.push(prefix);
    key.extend_from_slice(&period.to_be_bytes());
    key
}

fn record_key(prefix: u8, period: u64, validator: &ValAddress) -> Vec<u8> {
    let mut key = period_prefix(prefix, period);
    key.extend_from_slice(validator.as_bytes());
    key
}

pub fn commitment_key(period: u64, validator: &ValAddress) -> Vec<u8> {
    record_key(COMMITMENT_PREFIX, period, validator)
}

pub fn commitments_by_period_prefix(period: u64) -> Vec<u8> {
    period_prefix(COMMITMENT_PREFIX, period)
}

pub fn reveal_key(period: u64, validator: &ValAddress) -> Vec<u8> {
    record_key(REVEAL_PREFIX, period, validator)
}

pub fn reveals_by_period_prefix(period: u64) -> Vec<u8> {
    period_prefix(REVEAL_PREFIX, period)
}

pub fn penalty_key(period: u64, validator: &ValAddress) -> Vec<u8> {
    record_key(PENALTY_PREFIX, period, validator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key_is_length_prefixed() {
        assert_eq!(period_key(), b"\x01\x06period".to_vec());
    }

    #[test]
    fn test_record_key_layout() {
        let val = ValAddress([0xAB; 20]);
        let key = commitment_key(258, &val);
        assert_eq!(key.len(), 1 + 8 + 20);
        assert_eq!(key[0], COMMITMENT_PREFIX);
        assert_eq!(&key[1..9], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(&key[9..], &[0xAB; 20]);
        assert!(key.starts_with(&commitments_by_period_prefix(258)));
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let val = ValAddress([1; 20]);
        assert_ne!(commitment_key(1, &val), reveal_key(1, &val));
        assert_ne!(reveal_key(1, &val), penalty_key(1, &val));
        assert!(!commitment_key(1, &val).starts_with(&commitments_by_period_prefix(2)));
    }
}
