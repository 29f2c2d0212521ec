use std::collections::BTreeMap;
use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{OverflowError, Uint256};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single denomination amount, as found in bank balances and claim supplies.
#[cw_serde]
#[derive(Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: Uint256,
}

impl Coin {
    pub fn new(amount: impl Into<Uint256>, denom: impl Into<String>) -> Self {
        Coin {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Sorted list of coins with unique denoms and no zero amounts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn new() -> Self {
        Coins(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn amount_of(&self, denom: &str) -> Uint256 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    /// Sum of every amount, regardless of denom.
    pub fn total(&self) -> Result<Uint256, OverflowError> {
        self.0
            .iter()
            .try_fold(Uint256::zero(), |acc, coin| acc.checked_add(coin.amount))
    }

    /// Drop every coin except the one matching `denom`.
    pub fn retain_denom(&mut self, denom: &str) {
        self.0.retain(|c| c.denom == denom);
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = OverflowError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        let mut merged: BTreeMap<String, Uint256> = BTreeMap::new();
        for coin in coins {
            let amount = merged.entry(coin.denom).or_default();
            *amount = amount.checked_add(coin.amount)?;
        }
        Ok(Coins(
            merged
                .into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        ))
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

/// Reward curve applied to an account's balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaKind {
    Quadratic,
    /// Kept verbatim from the config; always yields a zero claim.
    Unknown(String),
}

impl From<&str> for FormulaKind {
    fn from(s: &str) -> Self {
        match s {
            "quadratic" => FormulaKind::Quadratic,
            other => FormulaKind::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaKind::Quadratic => f.write_str("quadratic"),
            FormulaKind::Unknown(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    pub kind: FormulaKind,
    pub multiplier: Uint256,
    /// Claims at or below this value are zeroed out.
    pub ignore_threshold: Uint256,
}

/// Eligibility category of a configured snapshot rule.
///
/// Every kind derives its contributing amount from the filtered liquid
/// balance; the tag only labels the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotKind {
    Staking,
    Liquidity,
    Other(String),
}

impl From<&str> for SnapshotKind {
    fn from(s: &str) -> Self {
        match s {
            "staking" => SnapshotKind::Staking,
            "liquidity" => SnapshotKind::Liquidity,
            other => SnapshotKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Staking => f.write_str("staking"),
            SnapshotKind::Liquidity => f.write_str("liquidity"),
            SnapshotKind::Other(s) => f.write_str(s),
        }
    }
}
