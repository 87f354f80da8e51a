//! Pricing strategy selection
//!
//! A pool picks its pricing strategy once, at construction, from a closed set
//! of variants. The hot conversion path dispatches over the enum rather than
//! a trait object so the selection cannot change underneath an open position.

use crate::swap::{self, SourceQuote, TargetQuote};
use crate::AmmError;
use serde::{Deserialize, Serialize};
use weir_types::U256;

/// Pool flavor identifier, fixed at creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Equal-weight constant-product pool
    #[default]
    Standard,
}

/// Forward and inverse conversion quoting over one (source, target) reserve
/// slice of a pool
pub trait PricingStrategy {
    /// Gross target amount and fee for a given source amount
    fn quote_target(
        &self,
        source_balance: U256,
        target_balance: U256,
        amount: U256,
        fee_ppm: u32,
    ) -> Result<TargetQuote, AmmError>;

    /// Required source amount and fee for a desired net target amount
    fn quote_source(
        &self,
        source_balance: U256,
        target_balance: U256,
        net_amount: U256,
        fee_ppm: u32,
    ) -> Result<SourceQuote, AmmError>;
}

/// Constant-product pricing for equal-weight reserves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardPricing;

impl PricingStrategy for StandardPricing {
    fn quote_target(
        &self,
        source_balance: U256,
        target_balance: U256,
        amount: U256,
        fee_ppm: u32,
    ) -> Result<TargetQuote, AmmError> {
        swap::quote_target(source_balance, target_balance, amount, fee_ppm)
    }

    fn quote_source(
        &self,
        source_balance: U256,
        target_balance: U256,
        net_amount: U256,
        fee_ppm: u32,
    ) -> Result<SourceQuote, AmmError> {
        swap::quote_source(source_balance, target_balance, net_amount, fee_ppm)
    }
}

/// The closed set of shipping strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pricing {
    Standard(StandardPricing),
}

impl Pricing {
    pub fn for_kind(kind: PoolKind) -> Self {
        match kind {
            PoolKind::Standard => Pricing::Standard(StandardPricing),
        }
    }

    pub fn kind(&self) -> PoolKind {
        match self {
            Pricing::Standard(_) => PoolKind::Standard,
        }
    }
}

impl PricingStrategy for Pricing {
    fn quote_target(
        &self,
        source_balance: U256,
        target_balance: U256,
        amount: U256,
        fee_ppm: u32,
    ) -> Result<TargetQuote, AmmError> {
        match self {
            Pricing::Standard(s) => s.quote_target(source_balance, target_balance, amount, fee_ppm),
        }
    }

    fn quote_source(
        &self,
        source_balance: U256,
        target_balance: U256,
        net_amount: U256,
        fee_ppm: u32,
    ) -> Result<SourceQuote, AmmError> {
        match self {
            Pricing::Standard(s) => s.quote_source(source_balance, target_balance, net_amount, fee_ppm),
        }
    }
}
