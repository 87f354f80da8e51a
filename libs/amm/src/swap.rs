//! Cross-reserve conversion quotes along the constant-product curve
//!
//! With equal reserve weights the weighted invariant collapses to
//! `balance_source * balance_target = k`, so a conversion of `amount` source
//! units yields `target_balance * amount / (source_balance + amount)` gross
//! target units. The conversion fee is taken out of the target side and stays
//! in the pool.

use crate::AmmError;
use weir_types::{mul_div_ceil, mul_div_floor, MathError, U256, PPM_SCALE};

/// Result of a forward quote: gross target amount and the fee embedded in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetQuote {
    /// Target amount before the conversion fee
    pub gross: U256,
    /// Conversion fee, floored, retained by the pool
    pub fee: U256,
}

impl TargetQuote {
    /// Amount actually paid out to the trader
    pub fn net(&self) -> U256 {
        // fee = floor(gross * fee_ppm / PPM) <= gross for any fee_ppm < PPM
        self.gross - self.fee
    }
}

/// Result of an inverse quote: required source amount and the fee the trader
/// will pay on top of the requested net target amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceQuote {
    /// Source amount the trader must provide
    pub source_amount: U256,
    /// Conversion fee, ceiled
    pub fee: U256,
}

/// Quote the gross target amount and fee for converting `amount` source units.
///
/// Floor division throughout: the pool rounds its own pay-out down.
/// `fee_ppm` must be below [`PPM_SCALE`]; the converter enforces this when the
/// fee is configured.
pub fn quote_target(
    source_balance: U256,
    target_balance: U256,
    amount: U256,
    fee_ppm: u32,
) -> Result<TargetQuote, AmmError> {
    debug_assert!(fee_ppm < PPM_SCALE);

    if amount.is_zero() {
        return Ok(TargetQuote { gross: U256::zero(), fee: U256::zero() });
    }

    let denominator = source_balance
        .checked_add(amount)
        .ok_or(AmmError::InsufficientLiquidity)?;
    let gross = mul_div_floor(target_balance, amount, denominator)?;
    if gross >= target_balance {
        return Err(AmmError::InsufficientLiquidity);
    }

    let fee = mul_div_floor(gross, U256::from(fee_ppm), U256::from(PPM_SCALE))?;
    Ok(TargetQuote { gross, fee })
}

/// Quote the source amount required to receive `net_amount` target units after
/// the fee.
///
/// Ceiling division on both the embedded fee and the required input, so that
/// `quote_target(quote_source(y).source_amount)` never nets less than `y`.
pub fn quote_source(
    source_balance: U256,
    target_balance: U256,
    net_amount: U256,
    fee_ppm: u32,
) -> Result<SourceQuote, AmmError> {
    debug_assert!(fee_ppm < PPM_SCALE);

    if net_amount.is_zero() {
        return Ok(SourceQuote { source_amount: U256::zero(), fee: U256::zero() });
    }
    if source_balance.is_zero() || target_balance.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }

    // fee such that net + fee, charged at fee_ppm, nets back to >= net:
    // fee = ceil(net * fee_ppm / (PPM - fee_ppm))
    let fee = mul_div_ceil(
        net_amount,
        U256::from(fee_ppm),
        U256::from(PPM_SCALE - fee_ppm),
    )?;
    let gross = net_amount.checked_add(fee).ok_or(MathError::Overflow)?;
    if gross >= target_balance {
        return Err(AmmError::InsufficientLiquidity);
    }

    let source_amount = mul_div_ceil(source_balance, gross, target_balance - gross)?;
    Ok(SourceQuote { source_amount, fee })
}
