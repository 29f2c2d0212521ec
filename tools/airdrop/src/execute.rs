use std::io::Write;
use std::path::Path;

use cosmwasm_std::Uint256;
use tracing::info;

use crate::config::Config;
use crate::error::SnapshotError;
use crate::filter;
use crate::genesis::{apply_claims, GenesisDoc};
use crate::snapshot;
use crate::state::{Filter, Snapshot};

/// Run every configured category over the snapshot and merge the results.
pub fn process_snapshot(config: &Config, snapshot: &Snapshot) -> Result<Filter, SnapshotError> {
    let filters = config
        .categories()
        .iter()
        .map(|category| snapshot.filter(category))
        .collect::<Result<Vec<_>, _>>()?;
    let merged = filter::sum(&filters)?;
    let total_claimable = merged.total_claimable()?;

    info!(
        categories = filters.len(),
        accounts = merged.num_accounts,
        total_claimable = %total_claimable,
        "processed snapshot"
    );
    Ok(merged)
}

/// Patch `genesis` with the claims of `filter` and serialize it.
pub fn patch_genesis(
    config: &Config,
    filter: &Filter,
    genesis: &mut GenesisDoc,
) -> Result<Vec<u8>, SnapshotError> {
    let records = apply_claims(genesis, &config.airdrop_token, filter)?;
    info!(
        token = %config.airdrop_token,
        dust_wallet = config.dust_wallet,
        claim_records = records.len(),
        "applied claim records"
    );
    genesis.to_json_vec()
}

/// config + genesis -> patched genesis
pub fn generate(config_path: &Path, genesis_path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let config = Config::load(config_path)?;
    let mut genesis = GenesisDoc::read(genesis_path)?;

    let snapshot = snapshot::generate(&genesis.state())?;
    info!(accounts = snapshot.num_accounts, "generated snapshot");

    let merged = process_snapshot(&config, &snapshot)?;
    patch_genesis(&config, &merged, &mut genesis)
}

/// genesis -> snapshot
pub fn raw(genesis_path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let genesis = GenesisDoc::read(genesis_path)?;
    let snapshot = snapshot::generate(&genesis.state())?;

    let total_stake = snapshot
        .accounts
        .values()
        .try_fold(Uint256::zero(), |acc, account| {
            acc.checked_add(account.total_stake()?)
        })?;
    info!(
        accounts = snapshot.num_accounts,
        total_stake = %total_stake,
        "generated snapshot"
    );
    snapshot.to_json_vec()
}

/// config + snapshot -> merged filter
pub fn process(config_path: &Path, snapshot_path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let config = Config::load(config_path)?;
    let snapshot = Snapshot::read(snapshot_path)?;
    process_snapshot(&config, &snapshot)?.to_json_vec()
}

/// config + filter + genesis -> patched genesis
pub fn genesis(
    config_path: &Path,
    filter_path: &Path,
    genesis_path: &Path,
) -> Result<Vec<u8>, SnapshotError> {
    let config = Config::load(config_path)?;
    let filter = Filter::read(filter_path)?;
    let mut genesis = GenesisDoc::read(genesis_path)?;
    patch_genesis(&config, &filter, &mut genesis)
}

/// Write a finished artifact to `output`, or stdout when no path is given.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), SnapshotError> {
    match output {
        Some(path) => std::fs::write(path, bytes).map_err(|e| SnapshotError::io(path, e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.write_all(b"\n"))
                .map_err(|e| SnapshotError::io("<stdout>", e))
        }
    }
}
