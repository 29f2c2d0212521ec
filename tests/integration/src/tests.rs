//! End-to-end tests for the airdrop snapshot pipeline.
//!
//! Each test writes a config and a genesis export into a temp directory and
//! drives the same `execute` functions the `airdrop` binary calls.
//!
//! Run:
//! ```bash
//! cargo test -p airdrop-integration-tests
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use airdrop_snapshot::execute;
use airdrop_snapshot::{Filter, Snapshot, SnapshotError};
use cosmwasm_std::Uint256;
use serde_json::{json, Value};
use tempfile::TempDir;

// ─── Fixtures ───

const ADDR_A: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";
const ADDR_B: &str = "cosmos1qyfkm2y3zhqhtxe7w2xq6rs0zqg3yyc5v6lkha";
const ADDR_C: &str = "cosmos1zg69v7ys40x77y352eufp27daufrg4ncnjqz7q";
const ADDR_DAO: &str = "cosmos1aqn8ynvr3jmq67879qulzrwhchq5dtrvh6h4er";
const VALOPER: &str = "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5d5kj3s";

fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Two-account genesis: A holds 100 uatom and 10 staked, B holds nothing.
fn two_account_genesis() -> Value {
    json!({
        "genesis_time": "2023-01-01T00:00:00Z",
        "chain_id": "airdrop-1",
        "initial_height": "1",
        "app_state": {
            "bank": {
                "balances": [
                    {"address": ADDR_A, "coins": [{"denom": "uatom", "amount": "100"}]},
                    {"address": ADDR_B, "coins": []}
                ]
            },
            "staking": {
                "validators": [{
                    "operator_address": VALOPER,
                    "tokens": "10",
                    "delegator_shares": "10.000000000000000000"
                }],
                "delegations": [{
                    "delegator_address": ADDR_A,
                    "validator_address": VALOPER,
                    "shares": "10.000000000000000000"
                }],
                "unbonding_delegations": []
            }
        }
    })
}

/// Mainnet-shaped genesis with several denoms, unbondings and a claim module.
fn full_genesis() -> Value {
    json!({
        "genesis_time": "2023-01-01T00:00:00Z",
        "chain_id": "airdrop-1",
        "consensus_params": {"block": {"max_bytes": "22020096"}},
        "app_state": {
            "auth": {"accounts": []},
            "bank": {
                "params": {"default_send_enabled": true},
                "balances": [
                    {"address": ADDR_A, "coins": [
                        {"denom": "uatom", "amount": "1000000"},
                        {"denom": "uosmo", "amount": "250000"}
                    ]},
                    {"address": ADDR_B, "coins": [{"denom": "uatom", "amount": "40000"}]},
                    {"address": ADDR_DAO, "coins": [{"denom": "uatom", "amount": "900000000"}]}
                ],
                "supply": [{"denom": "uatom", "amount": "901040000"}]
            },
            "staking": {
                "params": {"bond_denom": "uatom", "unbonding_time": "1814400s"},
                "validators": [{
                    "operator_address": VALOPER,
                    "tokens": "9000000",
                    "delegator_shares": "10000000.000000000000000000",
                    "status": "BOND_STATUS_BONDED",
                    "jailed": false
                }],
                "delegations": [
                    {"delegator_address": ADDR_A, "validator_address": VALOPER, "shares": "5000000.000000000000000000"},
                    {"delegator_address": ADDR_C, "validator_address": VALOPER, "shares": "1000.500000000000000000"},
                    {"delegator_address": ADDR_DAO, "validator_address": VALOPER, "shares": "10.000000000000000000"}
                ],
                "unbonding_delegations": [{
                    "delegator_address": ADDR_B,
                    "validator_address": VALOPER,
                    "entries": [
                        {"creation_height": "5", "completion_time": "2023-01-22T00:00:00Z", "initial_balance": "700", "balance": "700"},
                        {"creation_height": "9", "completion_time": "2023-01-23T00:00:00Z", "initial_balance": "300", "balance": "290"}
                    ]
                }]
            },
            "claim": {
                "params": {"decay_information": {"enabled": false}},
                "claim_records": [],
                "missions": [{"mission_id": "0", "description": "initial claim", "weight": "1.000000000000000000"}],
                "initial_claim": {"enabled": true, "mission_id": "0"},
                "airdrop_supply": {"denom": "drop", "amount": "0"}
            }
        }
    })
}

const FULL_CONFIG: &str = r#"
airdrop_token: drop
dust_wallet: 0
snapshots:
  - type: staking
    chain: airdrop-1
    denom: uatom
    formula:
      type: quadratic
      value: 2
      ignore: 0
    excluded:
      - cosmos1aqn8ynvr3jmq67879qulzrwhchq5dtrvh6h4er
  - type: liquidity
    denom: uosmo
    formula:
      type: quadratic
      value: 0
      ignore: 100
    excluded:
      - cosmos1aqn8ynvr3jmq67879qulzrwhchq5dtrvh6h4er
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Workspace {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        write(self.dir.path(), name, contents)
    }

    fn genesis(&self, genesis: &Value) -> PathBuf {
        self.file("genesis.json", genesis.to_string().as_bytes())
    }

    fn config(&self, yaml: &str) -> PathBuf {
        self.file("config.yml", yaml.as_bytes())
    }
}

fn claim(filter: &Filter, address: &str) -> u128 {
    filter.accounts[address].claim_amount.to_string().parse().unwrap()
}

// ─── Snapshot ───

#[test]
fn test_raw_snapshot_from_genesis() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&full_genesis());

    let snapshot = Snapshot::from_slice(&execute::raw(&genesis).unwrap()).unwrap();
    assert_eq!(snapshot.num_accounts, 4);

    // 5M shares at 0.9 tokens per share
    assert_eq!(snapshot.accounts[ADDR_A].staked, Uint256::from(4_500_000u128));
    assert_eq!(snapshot.accounts[ADDR_A].liquid_balances.len(), 2);
    assert_eq!(snapshot.accounts[ADDR_B].unbonding_stake, Uint256::from(990u128));
    // 1000.5 * 0.9 = 900.45
    assert_eq!(snapshot.accounts[ADDR_C].staked, Uint256::from(900u128));
    assert!(snapshot.accounts[ADDR_C].liquid_balances.is_empty());
}

#[test]
fn test_raw_snapshot_file_round_trip() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&full_genesis());

    let bytes = execute::raw(&genesis).unwrap();
    let path = ws.file("snapshot.json", &bytes);
    let parsed = Snapshot::read(&path).unwrap();

    assert_eq!(parsed.to_json_vec().unwrap(), bytes);
}

// ─── Process ───

#[test]
fn test_two_account_scenario() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&two_account_genesis());
    let config = ws.config(
        r#"
airdrop_token: ufoo
snapshots:
  - type: staking
    denom: uatom
    formula: {type: quadratic, value: 1, ignore: 0}
    excluded: []
"#,
    );

    let snapshot = ws.file("snapshot.json", &execute::raw(&genesis).unwrap());
    let filter = Filter::from_slice(&execute::process(&config, &snapshot).unwrap()).unwrap();

    assert_eq!(filter.num_accounts, 2);
    // isqrt(100) = 10, staked/balance = 10/100 = 0 so no bonus
    assert_eq!(claim(&filter, ADDR_A), 10);
    // empty balance: zero ratio, zero claim
    assert_eq!(claim(&filter, ADDR_B), 0);
}

#[test]
fn test_process_full_config() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&full_genesis());
    let config = ws.config(FULL_CONFIG);

    let snapshot = ws.file("snapshot.json", &execute::raw(&genesis).unwrap());
    let filter = Filter::from_slice(&execute::process(&config, &snapshot).unwrap()).unwrap();

    // excluded in both categories
    assert!(!filter.accounts.contains_key(ADDR_DAO));
    assert_eq!(filter.num_accounts, 3);

    // staking: isqrt(1_000_000) = 1000, 4.5M / 1M = 4, bonus 1000 * 2 * 4
    // liquidity: isqrt(250_000) = 500 > 100
    assert_eq!(claim(&filter, ADDR_A), 1000 + 8000 + 500);
    // staking: isqrt(40_000) = 200; liquidity: no uosmo
    assert_eq!(claim(&filter, ADDR_B), 200);
    // no liquid balance at all
    assert_eq!(claim(&filter, ADDR_C), 0);
}

#[test]
fn test_unknown_formula_grants_nothing() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&two_account_genesis());
    let config = ws.config(
        r#"
airdrop_token: ufoo
snapshots:
  - type: staking
    denom: uatom
    formula: {type: exponential, value: 5}
"#,
    );

    let snapshot = ws.file("snapshot.json", &execute::raw(&genesis).unwrap());
    let filter = Filter::from_slice(&execute::process(&config, &snapshot).unwrap()).unwrap();
    assert_eq!(filter.num_accounts, 2);
    assert_eq!(filter.total_claimable().unwrap(), Uint256::zero());
}

// ─── Genesis ───

#[test]
fn test_generate_patches_claim_module() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&full_genesis());
    let config = ws.config(FULL_CONFIG);

    let out: Value = serde_json::from_slice(&execute::generate(&config, &genesis).unwrap()).unwrap();
    let claim = &out["app_state"]["claim"];

    // zero claims are not written
    assert_eq!(claim["claim_records"].as_array().unwrap().len(), 2);
    assert_eq!(claim["airdrop_supply"], json!({"denom": "drop", "amount": "9700"}));
    assert_eq!(claim["initial_claim"]["enabled"], true);
    assert_eq!(claim["missions"][0]["description"], "initial claim");

    // the rest of the document is untouched
    assert_eq!(out["consensus_params"]["block"]["max_bytes"], "22020096");
    assert_eq!(out["app_state"]["bank"], full_genesis()["app_state"]["bank"]);
}

#[test]
fn test_split_commands_match_generate() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&full_genesis());
    let config = ws.config(FULL_CONFIG);

    let snapshot = ws.file("snapshot.json", &execute::raw(&genesis).unwrap());
    let filter = ws.file("filter.json", &execute::process(&config, &snapshot).unwrap());
    let patched = execute::genesis(&config, &filter, &genesis).unwrap();

    assert_eq!(patched, execute::generate(&config, &genesis).unwrap());
}

// ─── Failures ───

#[test]
fn test_malformed_genesis_aborts() {
    let ws = Workspace::new();
    let mut doc = two_account_genesis();
    doc["app_state"]["staking"]["delegations"] = json!("oops");
    let genesis = ws.genesis(&doc);

    let err = execute::raw(&genesis).unwrap_err();
    assert!(matches!(err, SnapshotError::Module { ref module, .. } if module == "staking"));
}

#[test]
fn test_missing_files_abort_without_output() {
    let ws = Workspace::new();
    let config = ws.config(FULL_CONFIG);
    let missing = ws.dir.path().join("missing.json");
    let out = ws.dir.path().join("out.json");

    let result = execute::generate(&config, &missing)
        .and_then(|bytes| execute::write_output(Some(out.as_path()), &bytes));
    assert!(matches!(result, Err(SnapshotError::Io { .. })));
    assert!(!out.exists());
}

#[test]
fn test_tampered_filter_rejected() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&two_account_genesis());
    let config = ws.config(FULL_CONFIG);
    let filter = ws.file(
        "filter.json",
        br#"{"num_accounts": 5, "accounts": {}}"#,
    );

    let err = execute::genesis(&config, &filter, &genesis).unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidSnapshot { .. }));
}

#[test]
fn test_overflowing_balances_abort() {
    let ws = Workspace::new();
    let half = (Uint256::one() << 255).to_string();

    let mut doc = two_account_genesis();
    doc["app_state"]["bank"]["balances"][0]["coins"] = json!([
        {"denom": "uatom", "amount": half},
        {"denom": "uatom", "amount": half}
    ]);
    let err = execute::raw(&ws.genesis(&doc)).unwrap_err();
    assert!(matches!(err, SnapshotError::Overflow(_)));

    // distinct denoms aggregate fine but cannot be summed by a catch-all category
    doc["app_state"]["bank"]["balances"][0]["coins"] = json!([
        {"denom": "uatom", "amount": half},
        {"denom": "uosmo", "amount": half}
    ]);
    let snapshot = ws.file("snapshot.json", &execute::raw(&ws.genesis(&doc)).unwrap());
    let config = ws.config(
        "airdrop_token: drop\nsnapshots:\n  - type: liquidity\n    formula: {type: quadratic, value: 0}\n",
    );
    let err = execute::process(&config, &snapshot).unwrap_err();
    assert!(matches!(err, SnapshotError::Overflow(_)));
}

#[test]
fn test_filter_keyed_by_wrong_address_rejected() {
    let ws = Workspace::new();
    let genesis = ws.genesis(&two_account_genesis());
    let config = ws.config(FULL_CONFIG);
    let filter = ws.file(
        "filter.json",
        format!(
            r#"{{"num_accounts": 1, "accounts": {{"{ADDR_A}": {{"address": "{ADDR_B}", "claim_amount": "7"}}}}}}"#
        )
        .as_bytes(),
    );

    let err = execute::genesis(&config, &filter, &genesis).unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidSnapshot { .. }));
}
