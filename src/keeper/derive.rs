//! Deterministic values submitted on behalf of validators

use crate::crypto::{sha256_concat, ValAddress};

/// `sha256(validator || height_be || period_be)`.
///
/// Block hooks commit to `compute_hash` of this value and later reveal it, so
/// the height must be the one recorded in the commitment.
pub fn derive_reveal_value(validator: &ValAddress, height: u64, period: u64) -> Vec<u8> {
    sha256_concat(&[validator.as_bytes(), &height.to_be_bytes(), &period.to_be_bytes()])
        .0
        .to_vec()
}
