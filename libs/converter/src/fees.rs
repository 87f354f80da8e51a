//! Network-fee accrual
//!
//! The network's share of each conversion fee is a *claim* on the pool, not a
//! separate pot: the fee itself stays inside the target reserve's balance,
//! and this ledger merely remembers how much of that balance is spoken for.
//! `transfer_fees` reconciles the claims against the balances and resets them.

use serde::{Deserialize, Serialize};
use weir_types::{mul_div_floor, MathError, U256, PPM_SCALE};

/// Per-reserve accrued network-fee claims, index-aligned with the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDistributor {
    accrued: Vec<U256>,
}

impl FeeDistributor {
    pub fn new(reserve_count: usize) -> Self {
        Self { accrued: vec![U256::zero(); reserve_count] }
    }

    /// Network share of a conversion fee: `fee * network_fee_ppm / PPM`,
    /// floored
    pub fn network_share(fee: U256, network_fee_ppm: u32) -> Result<U256, MathError> {
        mul_div_floor(fee, U256::from(network_fee_ppm), U256::from(PPM_SCALE))
    }

    pub fn accrued(&self, index: usize) -> U256 {
        self.accrued[index]
    }

    pub fn accrued_all(&self) -> &[U256] {
        &self.accrued
    }

    pub(crate) fn set_accrued(&mut self, index: usize, value: U256) {
        self.accrued[index] = value;
    }
}
