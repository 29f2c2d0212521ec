pub mod config;
pub mod error;
pub mod execute;
pub mod filter;
pub mod genesis;
pub mod snapshot;
pub mod state;

pub use crate::config::Config;
pub use crate::error::SnapshotError;
pub use crate::snapshot::SnapshotCategory;
pub use crate::state::{Account, Amount, Filter, Snapshot};
