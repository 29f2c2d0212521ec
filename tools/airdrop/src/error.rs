use std::path::PathBuf;

use cosmwasm_std::{ConversionOverflowError, OverflowError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to decode {module} genesis state: {source}")]
    Module {
        module: String,
        source: serde_json::Error,
    },

    #[error("genesis document has no app_state object")]
    MissingAppState,

    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }
}
