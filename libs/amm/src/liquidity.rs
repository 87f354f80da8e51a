//! Pool-token mint and burn accounting
//!
//! Deposits mint pool tokens against the smallest per-reserve ratio of the
//! offered amounts, and only pull what that ratio covers: an unbalanced
//! deposit cannot shift the pool's price, the surplus simply stays with the
//! caller. Withdrawals pay out the proportional share of every reserve,
//! floored.

use crate::AmmError;
use serde::{Deserialize, Serialize};
use tracing::trace;
use weir_types::{decimal_length, mul_div_ceil, mul_div_floor, round_div, U256};

/// How the pool-token supply is seeded on the very first deposit.
///
/// Historical converter versions disagree on this rule, so it is a
/// configurable policy rather than a fixed formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Mint exactly the deposited amount of the first listed reserve
    #[default]
    FirstReserve,
    /// Mint a power of ten whose decimal length is the rounded mean of the
    /// deposit amounts' decimal lengths
    DecimalGeometricMean,
}

/// Pool tokens minted by the first deposit into an empty pool.
///
/// Every amount must be positive; the deposit is accepted in full.
pub fn seed_supply(policy: SeedPolicy, amounts: &[U256]) -> Result<U256, AmmError> {
    debug_assert!(!amounts.is_empty());
    for (i, amount) in amounts.iter().enumerate() {
        if amount.is_zero() {
            return Err(AmmError::InvalidReserveAmount(i));
        }
    }
    match policy {
        SeedPolicy::FirstReserve => Ok(amounts[0]),
        SeedPolicy::DecimalGeometricMean => {
            let digits: u32 = amounts.iter().map(|a| decimal_length(*a)).sum();
            let mean = round_div(U256::from(digits), U256::from(amounts.len() as u64))?;
            // every amount has at least one digit, so mean >= 1
            Ok(U256::from(10u8).pow(mean - 1))
        }
    }
}

/// Result of a deposit quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositQuote {
    /// Pool tokens to mint
    pub pool_tokens: U256,
    /// Per-reserve amounts actually pulled from the caller; never exceeds
    /// the offered amounts
    pub accepted: Vec<U256>,
}

/// Quote a deposit against a pool that already has supply outstanding.
///
/// The minted amount is `floor(supply * amounts[m] / balances[m])` for the
/// reserve `m` with the smallest offered ratio; accepted amounts are then
/// derived from the minted amount, `ceil(minted * balance / supply)`, so the
/// pulled reserves always fully back the minted tokens.
pub fn deposit_quote(
    balances: &[U256],
    supply: U256,
    amounts: &[U256],
) -> Result<DepositQuote, AmmError> {
    debug_assert_eq!(balances.len(), amounts.len());
    if supply.is_zero() {
        return Err(AmmError::ZeroSupply);
    }
    for (i, (balance, amount)) in balances.iter().zip(amounts).enumerate() {
        if balance.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        if amount.is_zero() {
            return Err(AmmError::InvalidReserveAmount(i));
        }
    }

    // reserve with the smallest amount/balance ratio, by cross-multiplication
    let mut min = 0usize;
    for i in 1..amounts.len() {
        if amounts[i].full_mul(balances[min]) < amounts[min].full_mul(balances[i]) {
            min = i;
        }
    }

    let pool_tokens = mul_div_floor(supply, amounts[min], balances[min])?;
    let accepted = balances
        .iter()
        .map(|balance| mul_div_ceil(pool_tokens, *balance, supply))
        .collect::<Result<Vec<_>, _>>()?;

    trace!(min_ratio_index = min, %pool_tokens, "deposit quote");
    Ok(DepositQuote { pool_tokens, accepted })
}

/// Per-reserve amounts paid out for burning `amount` pool tokens, floored
pub fn withdrawal_quote(
    balances: &[U256],
    supply: U256,
    amount: U256,
) -> Result<Vec<U256>, AmmError> {
    if supply.is_zero() {
        return Err(AmmError::ZeroSupply);
    }
    if amount.is_zero() {
        return Err(AmmError::InvalidAmount);
    }
    if amount > supply {
        return Err(AmmError::InsufficientBalance);
    }
    balances
        .iter()
        .map(|balance| mul_div_floor(*balance, amount, supply).map_err(Into::into))
        .collect()
}
