//! Reserve ledger
//!
//! Per-pool holdings: an ordered reserve set fixed at creation, each entry
//! carrying a balance and an immutable ppm weight. Balances change only
//! through the controller's commit step; nothing here computes, it only
//! holds.

use crate::config::ReserveSpec;
use crate::error::ConverterError;
use serde::{Deserialize, Serialize};
use weir_types::{ReserveId, U256, PPM_SCALE};

/// One reserve asset held by the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    pub id: ReserveId,
    pub balance: U256,
    /// Immutable after creation; all reserves of a standard pool carry the
    /// same weight and the weights sum to [`PPM_SCALE`]
    pub weight_ppm: u32,
}

/// The ordered reserve set of one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveLedger {
    reserves: Vec<Reserve>,
}

impl ReserveLedger {
    /// Build a ledger with zero balances from a creation spec.
    ///
    /// Requires at least two distinct reserves with positive weights summing
    /// to [`PPM_SCALE`].
    pub fn new(specs: &[ReserveSpec]) -> Result<Self, ConverterError> {
        if specs.len() < 2 {
            return Err(ConverterError::InvalidPool(
                "a pool needs at least two reserves".into(),
            ));
        }
        for (i, spec) in specs.iter().enumerate() {
            if spec.weight_ppm == 0 {
                return Err(ConverterError::InvalidPool(format!(
                    "reserve {} has zero weight",
                    spec.id
                )));
            }
            if specs[..i].iter().any(|other| other.id == spec.id) {
                return Err(ConverterError::InvalidPool(format!(
                    "duplicate reserve {}",
                    spec.id
                )));
            }
        }
        let weight_sum: u64 = specs.iter().map(|s| u64::from(s.weight_ppm)).sum();
        if weight_sum != u64::from(PPM_SCALE) {
            return Err(ConverterError::InvalidPool(format!(
                "reserve weights sum to {weight_sum} ppm, expected {PPM_SCALE}"
            )));
        }

        Ok(Self {
            reserves: specs
                .iter()
                .map(|s| Reserve {
                    id: s.id,
                    balance: U256::zero(),
                    weight_ppm: s.weight_ppm,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    pub fn reserves(&self) -> &[Reserve] {
        &self.reserves
    }

    pub fn index_of(&self, id: ReserveId) -> Option<usize> {
        self.reserves.iter().position(|r| r.id == id)
    }

    pub fn balance(&self, index: usize) -> U256 {
        self.reserves[index].balance
    }

    pub fn balances(&self) -> Vec<U256> {
        self.reserves.iter().map(|r| r.balance).collect()
    }

    /// True when every weight is identical (the standard-pool requirement)
    pub fn weights_are_equal(&self) -> bool {
        self.reserves
            .iter()
            .all(|r| r.weight_ppm == self.reserves[0].weight_ppm)
    }

    pub(crate) fn set_balance(&mut self, index: usize, balance: U256) {
        self.reserves[index].balance = balance;
    }
}
