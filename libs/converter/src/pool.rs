//! The pool aggregate
//!
//! Owns the reserve ledger, the pool-token supply, the conversion-fee rate,
//! the pricing strategy, the rate oracle, and the network-fee claims — all by
//! value, with no sharing. Mutation goes exclusively through the controller's
//! staged commits; everything public here is a read.

use crate::config::{ConverterSettings, PoolSpec};
use crate::error::ConverterError;
use crate::fees::FeeDistributor;
use crate::ledger::{Reserve, ReserveLedger};
use crate::oracle::{OracleUpdate, RateOracle};
use weir_amm::{PoolKind, Pricing};
use weir_types::{Fraction, MathError, ReserveId, Timestamp, U256};

#[derive(Debug, Clone)]
pub struct Pool {
    pub(crate) ledger: ReserveLedger,
    pub(crate) pool_token_supply: U256,
    pub(crate) conversion_fee_ppm: u32,
    pub(crate) pricing: Pricing,
    pub(crate) oracle: RateOracle,
    pub(crate) fees: FeeDistributor,
}

impl Pool {
    /// Create an inactive pool (zero balances, zero supply) from a creation
    /// spec. The reserve set and weights are fixed from here on.
    pub fn new(spec: &PoolSpec, settings: &ConverterSettings) -> Result<Self, ConverterError> {
        let ledger = ReserveLedger::new(&spec.reserves)?;
        if spec.kind == PoolKind::Standard && !ledger.weights_are_equal() {
            return Err(ConverterError::InvalidPool(
                "standard pools require equal reserve weights".into(),
            ));
        }
        if spec.conversion_fee_ppm > settings.max_conversion_fee_ppm {
            return Err(ConverterError::InvalidConversionFee {
                rate_ppm: spec.conversion_fee_ppm,
                max_ppm: settings.max_conversion_fee_ppm,
            });
        }

        let reserve_count = ledger.len();
        Ok(Self {
            ledger,
            pool_token_supply: U256::zero(),
            conversion_fee_ppm: spec.conversion_fee_ppm,
            pricing: Pricing::for_kind(spec.kind),
            oracle: RateOracle::new(settings.average_rate_window_secs),
            fees: FeeDistributor::new(reserve_count),
        })
    }

    pub fn kind(&self) -> PoolKind {
        self.pricing.kind()
    }

    pub fn reserves(&self) -> &[Reserve] {
        self.ledger.reserves()
    }

    pub fn pool_token_supply(&self) -> U256 {
        self.pool_token_supply
    }

    pub fn conversion_fee_ppm(&self) -> u32 {
        self.conversion_fee_ppm
    }

    pub fn balance_of(&self, id: ReserveId) -> Result<U256, ConverterError> {
        self.index_of(id).map(|i| self.ledger.balance(i))
    }

    /// Portion of a reserve's balance earmarked for the network-fee wallet
    pub fn accrued_network_fee(&self, id: ReserveId) -> Result<U256, ConverterError> {
        self.index_of(id).map(|i| self.fees.accrued(i))
    }

    /// Time-weighted average rate of `target` per unit of `source`, blended
    /// forward to `now`
    pub fn average_rate(
        &self,
        source: ReserveId,
        target: ReserveId,
        now: Timestamp,
    ) -> Result<Fraction, ConverterError> {
        let si = self.index_of(source)?;
        let ti = self.index_of(target)?;
        if si == ti {
            return Err(ConverterError::SameSourceAndTarget);
        }
        if self.ledger.balance(si).is_zero() || self.ledger.balance(ti).is_zero() {
            return Err(ConverterError::InsufficientLiquidity);
        }

        let pair = (si.min(ti), si.max(ti));
        let spot = self.spot(pair.0, pair.1);
        let average = self.oracle.average(pair, spot, now)?;
        Ok(if si < ti { average } else { average.inverted() })
    }

    /// Average rate of one unit of `reserve` in terms of the pool's other
    /// reserve. Defined for two-reserve pools only.
    pub fn recent_average_rate(
        &self,
        reserve: ReserveId,
        now: Timestamp,
    ) -> Result<Fraction, ConverterError> {
        if self.ledger.len() != 2 {
            return Err(ConverterError::InvalidPool(
                "recent_average_rate is defined for two-reserve pools".into(),
            ));
        }
        let i = self.index_of(reserve)?;
        let other = self.ledger.reserves()[1 - i].id;
        self.average_rate(reserve, other, now)
    }

    pub(crate) fn index_of(&self, id: ReserveId) -> Result<usize, ConverterError> {
        self.ledger
            .index_of(id)
            .ok_or(ConverterError::UnknownReserve(id))
    }

    /// Spot rate of reserve `j` per unit of reserve `i`
    pub(crate) fn spot(&self, i: usize, j: usize) -> Fraction {
        Fraction::new(self.ledger.balance(j), self.ledger.balance(i))
    }

    /// Stage oracle updates for every pair with liquidity on both sides,
    /// using pre-operation balances
    pub(crate) fn stage_oracle(&self, now: Timestamp) -> Result<Vec<OracleUpdate>, MathError> {
        let n = self.ledger.len();
        let mut spots = Vec::new();
        for i in 0..n {
            if self.ledger.balance(i).is_zero() {
                continue;
            }
            for j in (i + 1)..n {
                if self.ledger.balance(j).is_zero() {
                    continue;
                }
                spots.push(((i, j), self.spot(i, j)));
            }
        }
        self.oracle.stage(&spots, now)
    }
}
