pub mod formula;
pub mod types;

pub use types::{Coin, Coins, Formula, FormulaKind, SnapshotKind};
