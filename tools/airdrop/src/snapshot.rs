use std::collections::{BTreeMap, HashMap};

use airdrop_common::{Coins, Formula, SnapshotKind};
use cosmwasm_std::{Decimal256, Uint256, Uint512};
use tracing::{debug, warn};

use crate::error::SnapshotError;
use crate::genesis::{BankGenesis, GenesisState, StakingGenesis, Validator, BANK_MODULE, STAKING_MODULE};
use crate::state::{Account, Accounts, Amount, Filter, Snapshot};

/// One configured eligibility rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotCategory {
    pub kind: SnapshotKind,
    pub chain: Option<String>,
    /// Snapshot date as written in the config, kept for the run log.
    pub date: Option<String>,
    /// Empty means every denom counts.
    pub denom: String,
    pub excluded: Vec<String>,
    pub formula: Formula,
}

/// Aggregate bank balances and staking positions into a per-address snapshot.
pub fn generate(state: &GenesisState) -> Result<Snapshot, SnapshotError> {
    let mut accounts = Accounts::new();

    let bank: BankGenesis = state.decode(BANK_MODULE)?.unwrap_or_default();
    apply_bank(&mut accounts, &bank)?;

    let staking: StakingGenesis = state.decode(STAKING_MODULE)?.unwrap_or_default();
    apply_staking(&mut accounts, &staking)?;

    debug!(
        balances = bank.balances.len(),
        delegations = staking.delegations.len(),
        unbondings = staking.unbonding_delegations.len(),
        accounts = accounts.len(),
        "aggregated genesis state"
    );

    Ok(Snapshot::new(accounts))
}

fn upsert<'a>(accounts: &'a mut Accounts, address: &str) -> &'a mut Account {
    accounts
        .entry(address.to_string())
        .or_insert_with(|| Account::new(address))
}

pub(crate) fn apply_bank(
    accounts: &mut Accounts,
    bank: &BankGenesis,
) -> Result<(), SnapshotError> {
    for balance in &bank.balances {
        upsert(accounts, &balance.address).liquid_balances =
            Coins::try_from(balance.coins.clone())?;
    }
    Ok(())
}

pub(crate) fn apply_staking(
    accounts: &mut Accounts,
    staking: &StakingGenesis,
) -> Result<(), SnapshotError> {
    for unbonding in &staking.unbonding_delegations {
        let total = unbonding
            .entries
            .iter()
            .try_fold(Uint256::zero(), |acc, entry| acc.checked_add(entry.balance))?;
        let acc = upsert(accounts, &unbonding.delegator_address);
        acc.unbonding_stake = acc.unbonding_stake.checked_add(total)?;
    }

    let validators: HashMap<&str, &Validator> = staking
        .validators
        .iter()
        .map(|v| (v.operator_address.as_str(), v))
        .collect();

    for delegation in &staking.delegations {
        let staked = match validators.get(delegation.validator_address.as_str()) {
            Some(val) if !val.delegator_shares.is_zero() => {
                shares_to_tokens(delegation.shares, val.tokens, val.delegator_shares)?
            }
            _ => {
                warn!(
                    delegator = %delegation.delegator_address,
                    validator = %delegation.validator_address,
                    "delegation to unknown or empty validator counts as zero stake"
                );
                Uint256::zero()
            }
        };
        let acc = upsert(accounts, &delegation.delegator_address);
        acc.staked = acc.staked.checked_add(staked)?;
    }

    Ok(())
}

/// `round(shares * tokens / delegator_shares)`, rounding half to even.
///
/// Both share values carry 18 fractional digits, so their atomics cancel and
/// the quotient is exact before the single rounding step.
pub fn shares_to_tokens(
    shares: Decimal256,
    tokens: Uint256,
    delegator_shares: Decimal256,
) -> Result<Uint256, SnapshotError> {
    let numerator = shares.atomics().full_mul(tokens);
    let denominator = Uint512::from(delegator_shares.atomics());

    let mut quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder + remainder;
    let odd = quotient % Uint512::from(2u32) == Uint512::one();
    if twice > denominator || (twice == denominator && odd) {
        quotient += Uint512::one();
    }

    Ok(Uint256::try_from(quotient)?)
}

/// Existing account for `address`, or a zero-valued one.
pub fn get_account(accounts: &Accounts, address: &str) -> Account {
    accounts
        .get(address)
        .cloned()
        .unwrap_or_else(|| Account::new(address))
}

pub fn exclude_address(accounts: &mut Accounts, address: &str) {
    accounts.remove(address);
}

pub fn exclude_addresses<S: AsRef<str>>(accounts: &mut Accounts, addresses: &[S]) {
    for address in addresses {
        exclude_address(accounts, address.as_ref());
    }
}

/// Keep only `denom` in every account's liquid balance.
pub fn filter_denom(accounts: &mut Accounts, denom: &str) {
    for account in accounts.values_mut() {
        account.liquid_balances.retain_denom(denom);
    }
}

impl Snapshot {
    /// Evaluate one category over a copy of the snapshot accounts.
    pub fn filter(&self, category: &SnapshotCategory) -> Result<Filter, SnapshotError> {
        let mut accounts = self.accounts.clone();
        if !category.excluded.is_empty() {
            exclude_addresses(&mut accounts, &category.excluded);
        }
        if !category.denom.is_empty() {
            filter_denom(&mut accounts, &category.denom);
        }

        let mut amounts = BTreeMap::new();
        for (address, account) in accounts {
            let claim = category
                .formula
                .calculate(account.balance_amount()?, account.staked)?;
            amounts.insert(address.clone(), Amount::new(address, claim));
        }

        debug!(
            kind = %category.kind,
            chain = category.chain.as_deref().unwrap_or_default(),
            date = category.date.as_deref().unwrap_or_default(),
            denom = %category.denom,
            formula = %category.formula.kind,
            excluded = category.excluded.len(),
            accounts = amounts.len(),
            "filtered snapshot"
        );

        Ok(Filter::new(amounts))
    }
}
