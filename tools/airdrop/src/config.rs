use std::path::Path;

use airdrop_common::{Formula, FormulaKind, SnapshotKind};
use cosmwasm_std::Uint256;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::snapshot::SnapshotCategory;
use crate::state::read_bytes;

/// Airdrop configuration file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Denom the claim module pays out in.
    pub airdrop_token: String,
    #[serde(default)]
    pub dust_wallet: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<SnapshotConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SnapshotConfig {
    #[serde(rename = "type", alias = "types")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// Date the snapshot was taken, carried through as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub denom: String,
    pub formula: FormulaConfig,
    #[serde(default)]
    pub excluded: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FormulaConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: u64,
    #[serde(default)]
    pub ignore: u64,
}

impl Config {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let config: Config = serde_yaml::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_slice(&read_bytes(path)?)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.airdrop_token.trim().is_empty() {
            return Err(SnapshotError::InvalidConfig {
                reason: "airdrop_token must not be empty".to_string(),
            });
        }
        for (i, snapshot) in self.snapshots.iter().enumerate() {
            if snapshot.kind.trim().is_empty() {
                return Err(SnapshotError::InvalidConfig {
                    reason: format!("snapshot {} has no type", i),
                });
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> Vec<SnapshotCategory> {
        self.snapshots.iter().map(SnapshotCategory::from).collect()
    }
}

impl From<&FormulaConfig> for Formula {
    fn from(cfg: &FormulaConfig) -> Self {
        Formula {
            kind: FormulaKind::from(cfg.kind.as_str()),
            multiplier: Uint256::from(cfg.value),
            ignore_threshold: Uint256::from(cfg.ignore),
        }
    }
}

impl From<&SnapshotConfig> for SnapshotCategory {
    fn from(cfg: &SnapshotConfig) -> Self {
        SnapshotCategory {
            kind: SnapshotKind::from(cfg.kind.as_str()),
            chain: cfg.chain.clone(),
            date: cfg.date.clone(),
            denom: cfg.denom.clone(),
            excluded: cfg.excluded.clone(),
            formula: Formula::from(&cfg.formula),
        }
    }
}
