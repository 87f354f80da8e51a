//! Converter error taxonomy
//!
//! Every operation either commits in full or fails with one of these typed
//! reasons; callers never see a silent zero-amount success. The taxonomy
//! distinguishes "trade too small" from "pool exhausted" from "price moved
//! past the slippage tolerance" so off-chain tooling can react differently.

use crate::traits::{Action, TransferError};
use thiserror::Error;
use weir_amm::AmmError;
use weir_types::{MathError, ReserveId, U256};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConverterError {
    /// Zero or otherwise unusable amount (including a zero slippage floor)
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Reserve identifier not configured on this pool
    #[error("unknown reserve {0}")]
    UnknownReserve(ReserveId),

    /// Conversion between a reserve and itself
    #[error("source and target reserve are the same")]
    SameSourceAndTarget,

    /// Number of per-reserve amounts does not match the reserve set
    #[error("expected {expected} reserve amounts, got {actual}")]
    ReserveCountMismatch { expected: usize, actual: usize },

    /// A per-reserve deposit amount is zero while the reserve holds balance
    #[error("reserve amount at index {0} must be greater than zero")]
    InvalidReserveAmount(usize),

    /// The trade or deposit cannot be satisfied by the pool's reserves
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Computed return fell below the caller's floor
    #[error("return amount {actual} is below the minimum {min}")]
    SlippageExceeded { min: U256, actual: U256 },

    /// Nested call into a state-mutating entry point
    #[error("reentrant call rejected")]
    ReentrancyRejected,

    /// Caller lacks the permission for this action
    #[error("caller is not authorized for {0:?}")]
    Unauthorized(Action),

    /// Liquidity withdrawal against an empty pool
    #[error("pool token supply is zero")]
    ZeroSupply,

    /// Pool token amount exceeds the outstanding supply
    #[error("pool token amount exceeds total supply")]
    InsufficientBalance,

    /// Requested conversion fee above the configured maximum
    #[error("conversion fee {rate_ppm} ppm exceeds maximum {max_ppm} ppm")]
    InvalidConversionFee { rate_ppm: u32, max_ppm: u32 },

    /// Invalid reserve set or weights at pool creation
    #[error("invalid pool configuration: {0}")]
    InvalidPool(String),

    /// Converter or network settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("token transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Math(#[from] MathError),
}

impl From<AmmError> for ConverterError {
    fn from(err: AmmError) -> Self {
        match err {
            AmmError::InvalidAmount => ConverterError::InvalidAmount,
            AmmError::InvalidReserveAmount(i) => ConverterError::InvalidReserveAmount(i),
            AmmError::InsufficientLiquidity => ConverterError::InsufficientLiquidity,
            AmmError::ZeroSupply => ConverterError::ZeroSupply,
            AmmError::InsufficientBalance => ConverterError::InsufficientBalance,
            AmmError::Math(e) => ConverterError::Math(e),
        }
    }
}
