//! # Weir AMM Library - Standard Pool Mathematics
//!
//! ## Purpose
//!
//! Pure mathematical core for the Weir converter: cross-reserve conversion
//! quotes along the constant-product curve, their inverse, and the
//! proportional mint/burn accounting for pool-ownership tokens. Everything in
//! this crate is a pure function over 256-bit integers; holding and mutating
//! pool state is the converter crate's job.
//!
//! ## Integration Points
//!
//! - **Input Sources**: reserve balances and the conversion-fee rate from the
//!   converter's ledger
//! - **Output Destinations**: the converter controller, which applies quotes
//!   to the ledger, and read-only callers previewing a trade or deposit
//! - **Precision**: floor division on the forward (pay-out) path, ceiling
//!   division on the inverse (charge) path; the asymmetry guarantees the pool
//!   never pays out more value than it takes in
//!
//! ## Rounding Contract
//!
//! `quote_target` floors both the gross output and the fee. `quote_source`
//! ceils both the embedded fee and the required input, so feeding its result
//! back through `quote_target` never under-delivers; the caller may gain at
//! most one unit, the pool never loses one.

pub mod liquidity;
pub mod pricing;
pub mod swap;

pub use liquidity::{deposit_quote, seed_supply, withdrawal_quote, DepositQuote, SeedPolicy};
pub use pricing::{PoolKind, Pricing, PricingStrategy, StandardPricing};
pub use swap::{quote_source, quote_target, SourceQuote, TargetQuote};

use thiserror::Error;
use weir_types::MathError;

/// Errors from pricing and liquidity mathematics
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Zero amount where a positive amount is required
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// A per-reserve deposit amount is zero while the reserve holds balance
    #[error("reserve amount at index {0} must be greater than zero")]
    InvalidReserveAmount(usize),

    /// The trade or deposit cannot be satisfied by the pool's reserves
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Liquidity withdrawal against an empty pool
    #[error("pool token supply is zero")]
    ZeroSupply,

    /// Pool token amount exceeds the outstanding supply
    #[error("pool token amount exceeds total supply")]
    InsufficientBalance,

    #[error(transparent)]
    Math(#[from] MathError),
}
