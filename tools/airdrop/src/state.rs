use std::collections::BTreeMap;
use std::path::Path;

use airdrop_common::Coins;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{OverflowError, Uint256};

use crate::error::SnapshotError;

/// Per-address view of balances and stake, as aggregated from genesis.
#[cw_serde]
pub struct Account {
    pub address: String,
    pub staked: Uint256,
    pub unbonding_stake: Uint256,
    #[serde(rename = "liquid_balance")]
    pub liquid_balances: Coins,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Account {
            address: address.into(),
            staked: Uint256::zero(),
            unbonding_stake: Uint256::zero(),
            liquid_balances: Coins::new(),
        }
    }

    /// Sum of all liquid balances, regardless of denom.
    pub fn balance_amount(&self) -> Result<Uint256, OverflowError> {
        self.liquid_balances.total()
    }

    pub fn total_stake(&self) -> Result<Uint256, OverflowError> {
        self.staked.checked_add(self.unbonding_stake)
    }
}

pub type Accounts = BTreeMap<String, Account>;

#[cw_serde]
pub struct Snapshot {
    pub num_accounts: u64,
    pub accounts: Accounts,
}

impl Snapshot {
    pub fn new(accounts: Accounts) -> Self {
        Snapshot {
            num_accounts: accounts.len() as u64,
            accounts,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        if snapshot.num_accounts != snapshot.accounts.len() as u64 {
            return Err(SnapshotError::InvalidSnapshot {
                reason: format!(
                    "num_accounts is {} but {} accounts are listed",
                    snapshot.num_accounts,
                    snapshot.accounts.len()
                ),
            });
        }
        check_keys(snapshot.accounts.iter().map(|(k, a)| (k, &a.address)))?;
        Ok(snapshot)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_slice(&read_bytes(path)?)
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Claim amount granted to one address.
#[cw_serde]
pub struct Amount {
    pub address: String,
    pub claim_amount: Uint256,
}

impl Amount {
    pub fn new(address: impl Into<String>, claim_amount: impl Into<Uint256>) -> Self {
        Amount {
            address: address.into(),
            claim_amount: claim_amount.into(),
        }
    }
}

/// Claim table produced for one category, or the merge of several.
#[cw_serde]
#[derive(Default)]
pub struct Filter {
    pub num_accounts: u64,
    pub accounts: BTreeMap<String, Amount>,
}

impl Filter {
    pub fn new(accounts: BTreeMap<String, Amount>) -> Self {
        Filter {
            num_accounts: accounts.len() as u64,
            accounts,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let filter: Filter = serde_json::from_slice(bytes)?;
        if filter.num_accounts != filter.accounts.len() as u64 {
            return Err(SnapshotError::InvalidSnapshot {
                reason: format!(
                    "filter num_accounts is {} but {} amounts are listed",
                    filter.num_accounts,
                    filter.accounts.len()
                ),
            });
        }
        check_keys(filter.accounts.iter().map(|(k, a)| (k, &a.address)))?;
        Ok(filter)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_slice(&read_bytes(path)?)
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Every entry must be keyed by its own address.
fn check_keys<'a>(
    mut entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> Result<(), SnapshotError> {
    match entries.find(|(key, address)| key != address) {
        Some((key, address)) => Err(SnapshotError::InvalidSnapshot {
            reason: format!("entry {} holds address {}", key, address),
        }),
        None => Ok(()),
    }
}

pub(crate) fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, SnapshotError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| SnapshotError::io(path, e))
}
