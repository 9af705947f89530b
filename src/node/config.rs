//! Node configuration
//!
//! Loaded from a JSON file; every field has a default so a partial file (or
//! none at all) is enough to start a local node.

use crate::crypto::{hash_bytes, AccAddress, ValAddress};
use crate::types::GenesisState;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub data_dir: PathBuf,
    pub rpc_port: u16,
    /// Time between produced blocks
    pub block_interval_ms: u64,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_level: String,
    /// Rand genesis file; the default genesis is used when absent
    pub genesis_path: Option<PathBuf>,
    pub validators: Vec<ValidatorConfig>,
}

/// One simulated validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Free-form name, hashed into the operator address
    pub name: String,
    #[serde(default = "default_tokens")]
    pub tokens: u128,
    /// Initial balance of the validator's self-delegation account
    #[serde(default = "default_balance")]
    pub balance: u128,
    /// Submit random commitments and reveals instead of relying on the
    /// automatic ones
    #[serde(default)]
    pub manual: bool,
}

fn default_tokens() -> u128 {
    10_000_000
}

fn default_balance() -> u128 {
    1_000_000
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("rh_rand_data"),
            rpc_port: 26657,
            block_interval_ms: 1000,
            log_level: "info".to_string(),
            genesis_path: None,
            validators: (1..=4)
                .map(|i| ValidatorConfig {
                    name: format!("validator-{}", i),
                    tokens: default_tokens(),
                    balance: default_balance(),
                    manual: i == 1,
                })
                .collect(),
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config file contents if present, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_genesis(&self) -> Result<GenesisState> {
        match &self.genesis_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading genesis {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing genesis {}", path.display()))
            }
            None => Ok(GenesisState::default()),
        }
    }
}

impl ValidatorConfig {
    /// First 20 bytes of BLAKE3(name)
    pub fn operator(&self) -> ValAddress {
        let digest = hash_bytes(self.name.as_bytes());
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&digest.0[..20]);
        ValAddress(addr)
    }

    pub fn account(&self) -> AccAddress {
        AccAddress::from(self.operator())
    }
}
