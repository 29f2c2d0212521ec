use cosmwasm_std::{Isqrt, OverflowError, Uint256};

use crate::types::{Formula, FormulaKind};

impl Formula {
    pub fn quadratic(multiplier: impl Into<Uint256>, ignore_threshold: impl Into<Uint256>) -> Self {
        Formula {
            kind: FormulaKind::Quadratic,
            multiplier: multiplier.into(),
            ignore_threshold: ignore_threshold.into(),
        }
    }

    /// Compute the claim for an account holding `amount` with `staked` delegated.
    ///
    /// Quadratic: `isqrt(amount) * (1 + multiplier * (staked / amount))`, where
    /// the ratio is an integer division and is taken as zero for an empty
    /// balance. Results at or below the ignore threshold are dust and become
    /// zero. Unknown kinds never grant anything.
    pub fn calculate(&self, amount: Uint256, staked: Uint256) -> Result<Uint256, OverflowError> {
        match self.kind {
            FormulaKind::Quadratic => {
                let staked_percent = if amount.is_zero() {
                    Uint256::zero()
                } else {
                    staked / amount
                };
                let base = amount.isqrt();
                let bonus = base
                    .checked_mul(self.multiplier)?
                    .checked_mul(staked_percent)?;
                let claim = base.checked_add(bonus)?;
                if claim <= self.ignore_threshold {
                    return Ok(Uint256::zero());
                }
                Ok(claim)
            }
            FormulaKind::Unknown(_) => Ok(Uint256::zero()),
        }
    }
}
