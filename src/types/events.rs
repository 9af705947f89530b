//! Module events
//!
//! Names and attribute keys are indexed externally and must not change.

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_EPOCH_START: &str = "epoch_start";
pub const EVENT_TYPE_COMMITMENT: &str = "commitment";
pub const EVENT_TYPE_REVEAL: &str = "reveal";
pub const EVENT_TYPE_REVEAL_PHASE_START: &str = "reveal_phase_start";
pub const EVENT_TYPE_PENALTY: &str = "penalty";
pub const EVENT_TYPE_RANDOMNESS_GENERATED: &str = "randomness_generated";

pub const ATTRIBUTE_KEY_PERIOD_NUMBER: &str = "period_number";
pub const ATTRIBUTE_KEY_COMMIT_END_HEIGHT: &str = "commit_end_height";
pub const ATTRIBUTE_KEY_REVEAL_END_HEIGHT: &str = "reveal_end_height";
pub const ATTRIBUTE_KEY_VALIDATOR: &str = "validator";
pub const ATTRIBUTE_KEY_RANDOMNESS: &str = "randomness";

/// A typed event with string attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
