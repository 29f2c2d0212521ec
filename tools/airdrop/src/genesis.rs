use std::collections::BTreeMap;
use std::path::Path;

use airdrop_common::Coin;
use cosmwasm_std::{Decimal256, Uint256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SnapshotError;
use crate::state::{read_bytes, Filter};

pub const BANK_MODULE: &str = "bank";
pub const STAKING_MODULE: &str = "staking";
pub const CLAIM_MODULE: &str = "claim";

// ─── Module state (only the fields the snapshot reads) ───

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct BankGenesis {
    pub balances: Vec<Balance>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Balance {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct StakingGenesis {
    pub validators: Vec<Validator>,
    pub delegations: Vec<Delegation>,
    pub unbonding_delegations: Vec<UnbondingDelegation>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Validator {
    pub operator_address: String,
    pub tokens: Uint256,
    pub delegator_shares: Decimal256,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Delegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub shares: Decimal256,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct UnbondingDelegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub entries: Vec<UnbondingDelegationEntry>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct UnbondingDelegationEntry {
    pub balance: Uint256,
}

/// Claim module record written back into genesis.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub address: String,
    pub claimable: Uint256,
    pub completed_missions: Vec<u64>,
}

// ─── Genesis document ───

/// Module name to raw module state, as found under `app_state`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenesisState(BTreeMap<String, Value>);

impl GenesisState {
    pub fn new() -> Self {
        GenesisState(BTreeMap::new())
    }

    pub fn insert(&mut self, module: impl Into<String>, state: Value) {
        self.0.insert(module.into(), state);
    }

    /// Decode one module section. Absent or `null` sections decode to `None`.
    pub fn decode<T: DeserializeOwned>(&self, module: &str) -> Result<Option<T>, SnapshotError> {
        match self.0.get(module) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => T::deserialize(raw)
                .map(Some)
                .map_err(|source| SnapshotError::Module {
                    module: module.to_string(),
                    source,
                }),
        }
    }
}

impl From<Map<String, Value>> for GenesisState {
    fn from(map: Map<String, Value>) -> Self {
        GenesisState(map.into_iter().collect())
    }
}

/// Full genesis document. Keys outside `app_state` are carried untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisDoc {
    doc: Map<String, Value>,
    app_state_key: String,
}

impl GenesisDoc {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let doc: Map<String, Value> = serde_json::from_slice(bytes)?;
        let app_state_key = ["app_state", "appState"]
            .into_iter()
            .find(|key| matches!(doc.get(*key), Some(Value::Object(_))))
            .ok_or(SnapshotError::MissingAppState)?
            .to_string();
        Ok(GenesisDoc { doc, app_state_key })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_slice(&read_bytes(path)?)
    }

    pub fn state(&self) -> GenesisState {
        match self.doc.get(&self.app_state_key) {
            Some(Value::Object(app_state)) => GenesisState::from(app_state.clone()),
            _ => GenesisState::new(),
        }
    }

    fn app_state_mut(&mut self) -> Result<&mut Map<String, Value>, SnapshotError> {
        match self.doc.get_mut(&self.app_state_key) {
            Some(Value::Object(app_state)) => Ok(app_state),
            _ => Err(SnapshotError::MissingAppState),
        }
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec_pretty(&self.doc)?)
    }
}

/// Replace the claim module's records with the claims in `filter`.
///
/// Zero claims are dropped since the claim module only accepts positive
/// claimable amounts. The airdrop supply is set to the sum of the written
/// records in `token`. Other claim module fields are kept as they are.
pub fn apply_claims(
    genesis: &mut GenesisDoc,
    token: &str,
    filter: &Filter,
) -> Result<Vec<ClaimRecord>, SnapshotError> {
    let records: Vec<ClaimRecord> = filter
        .accounts
        .values()
        .filter(|amount| !amount.claim_amount.is_zero())
        .map(|amount| ClaimRecord {
            address: amount.address.clone(),
            claimable: amount.claim_amount,
            completed_missions: vec![],
        })
        .collect();

    let mut supply = Uint256::zero();
    for record in &records {
        supply = supply.checked_add(record.claimable)?;
    }
    let airdrop_supply = Coin::new(supply, token);
    debug!(records = records.len(), supply = %airdrop_supply, "writing claim module state");

    let app_state = genesis.app_state_mut()?;
    let claim = app_state
        .entry(CLAIM_MODULE)
        .or_insert_with(|| Value::Object(Map::new()));
    if !claim.is_object() {
        *claim = Value::Object(Map::new());
    }
    if let Value::Object(claim) = claim {
        claim.insert("claim_records".to_string(), serde_json::to_value(&records)?);
        claim.insert(
            "airdrop_supply".to_string(),
            serde_json::to_value(&airdrop_supply)?,
        );
    }

    Ok(records)
}
