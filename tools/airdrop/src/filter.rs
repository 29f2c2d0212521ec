use std::collections::BTreeMap;

use cosmwasm_std::{OverflowError, Uint256};

use crate::state::{Amount, Filter};

impl Filter {
    /// Existing amount for `address`, or a zero claim.
    pub fn get_amount(&self, address: &str) -> Amount {
        self.accounts
            .get(address)
            .cloned()
            .unwrap_or_else(|| Amount::new(address, Uint256::zero()))
    }

    pub fn total_claimable(&self) -> Result<Uint256, OverflowError> {
        self.accounts
            .values()
            .try_fold(Uint256::zero(), |acc, amount| acc.checked_add(amount.claim_amount))
    }
}

/// Merge filters into one claim table, adding up claims per address.
pub fn sum(filters: &[Filter]) -> Result<Filter, OverflowError> {
    let mut result: BTreeMap<String, Amount> = BTreeMap::new();
    for filter in filters {
        for amount in filter.accounts.values() {
            let merged = result
                .entry(amount.address.clone())
                .or_insert_with(|| Amount::new(amount.address.clone(), Uint256::zero()));
            merged.claim_amount = merged.claim_amount.checked_add(amount.claim_amount)?;
        }
    }
    Ok(Filter::new(result))
}
