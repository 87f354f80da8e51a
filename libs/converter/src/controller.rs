//! Converter controller
//!
//! The single entry point for everything that mutates a pool. Each operation
//! runs the same shape: acquire the reentrancy guard, validate, stage the
//! complete outcome with checked arithmetic, execute external transfers, then
//! commit the staged state in one step. Pool state is never observable
//! half-applied; any failure before the commit leaves it untouched.

use crate::config::{ConverterSettings, NetworkSettings, PoolSpec};
use crate::error::ConverterError;
use crate::fees::FeeDistributor;
use crate::ledger::Reserve;
use crate::pool::Pool;
use crate::traits::{AccessControl, Action, TokenTransport};
use std::cell::Cell;
use tracing::{info, warn};
use weir_amm::{
    deposit_quote, seed_supply, withdrawal_quote, DepositQuote, PricingStrategy, SourceQuote,
    TargetQuote,
};
use weir_types::{Address, Fraction, MathError, ReserveId, Timestamp, U256, PPM_SCALE};

/// Reentrancy flag for one pool. Acquired on entry to every state-mutating
/// operation and released on every exit path, including errors.
#[derive(Debug, Default)]
struct EntryFlag(Cell<bool>);

impl EntryFlag {
    fn acquire(&self) -> Result<EntryGuard<'_>, ConverterError> {
        if self.0.replace(true) {
            return Err(ConverterError::ReentrancyRejected);
        }
        Ok(EntryGuard(&self.0))
    }
}

struct EntryGuard<'a>(&'a Cell<bool>);

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Facade over one pool: conversion, liquidity provisioning, fee settlement,
/// and fee configuration, sequenced atomically over the collaborators.
#[derive(Debug)]
pub struct ConverterController<T, A> {
    pool: Pool,
    settings: ConverterSettings,
    transport: T,
    access: A,
    entry: EntryFlag,
}

impl<T: TokenTransport, A: AccessControl> ConverterController<T, A> {
    pub fn new(
        spec: &PoolSpec,
        settings: ConverterSettings,
        transport: T,
        access: A,
    ) -> Result<Self, ConverterError> {
        settings
            .validate()
            .map_err(|e| ConverterError::InvalidSettings(e.to_string()))?;
        let pool = Pool::new(spec, &settings)?;
        Ok(Self { pool, settings, transport, access, entry: EntryFlag::default() })
    }

    /// Convert `amount` of `source` into `target`, enforcing the caller's
    /// `min_return` floor. Returns the net amount paid out.
    pub fn convert(
        &mut self,
        caller: Address,
        source: ReserveId,
        target: ReserveId,
        amount: U256,
        min_return: U256,
        now: Timestamp,
    ) -> Result<U256, ConverterError> {
        let _entry = self.entry.acquire()?;

        let si = self.pool.index_of(source)?;
        let ti = self.pool.index_of(target)?;
        if si == ti {
            return Err(ConverterError::SameSourceAndTarget);
        }
        if amount.is_zero() || min_return.is_zero() {
            return Err(ConverterError::InvalidAmount);
        }

        let oracle_updates = self.pool.stage_oracle(now)?;

        let source_balance = self.pool.ledger.balance(si);
        let target_balance = self.pool.ledger.balance(ti);
        let quote = self.pool.pricing.quote_target(
            source_balance,
            target_balance,
            amount,
            self.pool.conversion_fee_ppm,
        )?;
        let net = quote.net();
        if net < min_return {
            warn!(%source, %target, %amount, net = %net, floor = %min_return, "conversion under slippage floor");
            return Err(ConverterError::SlippageExceeded { min: min_return, actual: net });
        }

        let new_source = source_balance
            .checked_add(amount)
            .ok_or(ConverterError::InsufficientLiquidity)?;
        // the fee stays in the target balance; only the net amount leaves
        let new_target = target_balance
            .checked_sub(net)
            .ok_or(ConverterError::InsufficientLiquidity)?;
        let share = FeeDistributor::network_share(quote.fee, self.settings.network.network_fee_ppm)?;
        let new_accrued = self
            .pool
            .fees
            .accrued(ti)
            .checked_add(share)
            .ok_or(MathError::Overflow)?;

        self.transport.pull(source, caller, amount)?;
        self.transport.push(target, caller, net)?;

        self.pool.ledger.set_balance(si, new_source);
        self.pool.ledger.set_balance(ti, new_target);
        self.pool.fees.set_accrued(ti, new_accrued);
        self.pool.oracle.apply(oracle_updates);

        info!(%source, %target, %amount, net = %net, fee = %quote.fee, "converted");
        Ok(net)
    }

    /// Deposit up to `amounts` (index-aligned with the reserve set), minting
    /// at least `min_pool_tokens` pool tokens. Only the amounts covered by
    /// the smallest offered ratio are pulled; the surplus stays with the
    /// caller. Returns the minted amount.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        amounts: &[U256],
        min_pool_tokens: U256,
        now: Timestamp,
    ) -> Result<U256, ConverterError> {
        let _entry = self.entry.acquire()?;

        let reserve_count = self.pool.ledger.len();
        if amounts.len() != reserve_count {
            return Err(ConverterError::ReserveCountMismatch {
                expected: reserve_count,
                actual: amounts.len(),
            });
        }
        if min_pool_tokens.is_zero() {
            return Err(ConverterError::InvalidAmount);
        }

        let oracle_updates = self.pool.stage_oracle(now)?;

        let supply = self.pool.pool_token_supply;
        let balances = self.pool.ledger.balances();
        let DepositQuote { pool_tokens: minted, accepted } = if supply.is_zero() {
            DepositQuote {
                pool_tokens: seed_supply(self.settings.seed_policy, amounts)?,
                accepted: amounts.to_vec(),
            }
        } else {
            deposit_quote(&balances, supply, amounts)?
        };
        if minted < min_pool_tokens {
            warn!(minted = %minted, floor = %min_pool_tokens, "deposit under slippage floor");
            return Err(ConverterError::SlippageExceeded { min: min_pool_tokens, actual: minted });
        }

        let mut new_balances = Vec::with_capacity(reserve_count);
        for (balance, accepted) in balances.iter().zip(&accepted) {
            new_balances.push(balance.checked_add(*accepted).ok_or(MathError::Overflow)?);
        }
        let new_supply = supply.checked_add(minted).ok_or(MathError::Overflow)?;

        let ids: Vec<ReserveId> = self.pool.ledger.reserves().iter().map(|r| r.id).collect();
        for (i, id) in ids.iter().enumerate() {
            if !accepted[i].is_zero() {
                self.transport.pull(*id, caller, accepted[i])?;
            }
        }

        for (i, balance) in new_balances.into_iter().enumerate() {
            self.pool.ledger.set_balance(i, balance);
        }
        self.pool.pool_token_supply = new_supply;
        self.pool.oracle.apply(oracle_updates);

        info!(minted = %minted, supply = %new_supply, "liquidity added");
        Ok(minted)
    }

    /// Burn `pool_token_amount` pool tokens for the proportional share of
    /// every reserve, enforcing the caller's per-reserve floors. Returns the
    /// paid-out amounts, index-aligned with the reserve set.
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        pool_token_amount: U256,
        min_amounts: &[U256],
        now: Timestamp,
    ) -> Result<Vec<U256>, ConverterError> {
        let _entry = self.entry.acquire()?;

        let reserve_count = self.pool.ledger.len();
        if min_amounts.len() != reserve_count {
            return Err(ConverterError::ReserveCountMismatch {
                expected: reserve_count,
                actual: min_amounts.len(),
            });
        }
        if pool_token_amount.is_zero() || min_amounts.iter().any(U256::is_zero) {
            return Err(ConverterError::InvalidAmount);
        }

        let oracle_updates = self.pool.stage_oracle(now)?;

        let supply = self.pool.pool_token_supply;
        let balances = self.pool.ledger.balances();
        let amounts = withdrawal_quote(&balances, supply, pool_token_amount)?;
        for (paid, floor) in amounts.iter().zip(min_amounts) {
            if paid < floor {
                warn!(paid = %paid, floor = %floor, "withdrawal under slippage floor");
                return Err(ConverterError::SlippageExceeded { min: *floor, actual: *paid });
            }
        }

        let mut new_balances = Vec::with_capacity(reserve_count);
        for (balance, amount) in balances.iter().zip(&amounts) {
            new_balances.push(balance.checked_sub(*amount).ok_or(MathError::Overflow)?);
        }
        // amount <= supply was checked by the withdrawal quote
        let new_supply = supply - pool_token_amount;

        let ids: Vec<ReserveId> = self.pool.ledger.reserves().iter().map(|r| r.id).collect();
        for (i, id) in ids.iter().enumerate() {
            if !amounts[i].is_zero() {
                self.transport.push(*id, caller, amounts[i])?;
            }
        }

        for (i, balance) in new_balances.into_iter().enumerate() {
            self.pool.ledger.set_balance(i, balance);
        }
        self.pool.pool_token_supply = new_supply;
        self.pool.oracle.apply(oracle_updates);

        info!(burned = %pool_token_amount, supply = %new_supply, "liquidity removed");
        Ok(amounts)
    }

    /// Sweep every reserve's accrued network-fee claim to the configured fee
    /// wallet. The only operation that removes value from the pool without
    /// burning pool tokens. A no-op when nothing has accrued.
    pub fn transfer_fees(&mut self, now: Timestamp) -> Result<Vec<(ReserveId, U256)>, ConverterError> {
        let _entry = self.entry.acquire()?;

        let oracle_updates = self.pool.stage_oracle(now)?;

        let mut swept = Vec::new();
        let mut new_balances = Vec::new();
        for (i, reserve) in self.pool.ledger.reserves().iter().enumerate() {
            let claim = self.pool.fees.accrued(i);
            if claim.is_zero() {
                continue;
            }
            // claims accrue out of fees already inside the balance
            let new_balance = reserve
                .balance
                .checked_sub(claim)
                .ok_or(ConverterError::InsufficientLiquidity)?;
            swept.push((reserve.id, claim));
            new_balances.push((i, new_balance));
        }

        let wallet = self.settings.network.fee_wallet;
        for (id, claim) in &swept {
            self.transport.push(*id, wallet, *claim)?;
        }

        for (i, balance) in new_balances {
            self.pool.ledger.set_balance(i, balance);
            self.pool.fees.set_accrued(i, U256::zero());
        }
        self.pool.oracle.apply(oracle_updates);

        if !swept.is_empty() {
            info!(reserves = swept.len(), "network fees transferred");
        }
        Ok(swept)
    }

    /// Change the pool's conversion fee. Gated by the access-control
    /// collaborator and bounded by the configured maximum.
    pub fn set_conversion_fee(
        &mut self,
        caller: Address,
        rate_ppm: u32,
    ) -> Result<(), ConverterError> {
        let _entry = self.entry.acquire()?;

        if !self.access.is_authorized(caller, Action::SetConversionFee) {
            warn!(%caller, "unauthorized conversion-fee change");
            return Err(ConverterError::Unauthorized(Action::SetConversionFee));
        }
        if rate_ppm > self.settings.max_conversion_fee_ppm {
            return Err(ConverterError::InvalidConversionFee {
                rate_ppm,
                max_ppm: self.settings.max_conversion_fee_ppm,
            });
        }

        self.pool.conversion_fee_ppm = rate_ppm;
        info!(rate_ppm, "conversion fee updated");
        Ok(())
    }

    /// Replace the network-fee parameters. Gated by the access-control
    /// collaborator.
    pub fn update_network_settings(
        &mut self,
        caller: Address,
        network: NetworkSettings,
    ) -> Result<(), ConverterError> {
        let _entry = self.entry.acquire()?;

        if !self.access.is_authorized(caller, Action::ConfigureNetwork) {
            warn!(%caller, "unauthorized network-settings change");
            return Err(ConverterError::Unauthorized(Action::ConfigureNetwork));
        }
        if network.network_fee_ppm > PPM_SCALE {
            return Err(ConverterError::InvalidSettings(format!(
                "network fee {} ppm exceeds {}",
                network.network_fee_ppm, PPM_SCALE
            )));
        }

        self.settings.network = network;
        info!("network settings updated");
        Ok(())
    }

    // ---- read-only surface ----

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn reserves(&self) -> &[Reserve] {
        self.pool.reserves()
    }

    pub fn balance_of(&self, id: ReserveId) -> Result<U256, ConverterError> {
        self.pool.balance_of(id)
    }

    pub fn conversion_fee_ppm(&self) -> u32 {
        self.pool.conversion_fee_ppm()
    }

    pub fn pool_token_supply(&self) -> U256 {
        self.pool.pool_token_supply()
    }

    pub fn accrued_network_fee(&self, id: ReserveId) -> Result<U256, ConverterError> {
        self.pool.accrued_network_fee(id)
    }

    pub fn average_rate(
        &self,
        source: ReserveId,
        target: ReserveId,
        now: Timestamp,
    ) -> Result<Fraction, ConverterError> {
        self.pool.average_rate(source, target, now)
    }

    /// Two-reserve convenience: average rate of `reserve` against the other
    /// reserve
    pub fn recent_average_rate(
        &self,
        reserve: ReserveId,
        now: Timestamp,
    ) -> Result<Fraction, ConverterError> {
        self.pool.recent_average_rate(reserve, now)
    }

    /// Preview a conversion: gross target amount and fee
    pub fn target_amount_and_fee(
        &self,
        source: ReserveId,
        target: ReserveId,
        amount: U256,
    ) -> Result<TargetQuote, ConverterError> {
        let (si, ti) = self.conversion_pair(source, target)?;
        Ok(self.pool.pricing.quote_target(
            self.pool.ledger.balance(si),
            self.pool.ledger.balance(ti),
            amount,
            self.pool.conversion_fee_ppm,
        )?)
    }

    /// Preview the inverse: source amount required for a net target amount
    pub fn source_amount_and_fee(
        &self,
        source: ReserveId,
        target: ReserveId,
        net_amount: U256,
    ) -> Result<SourceQuote, ConverterError> {
        let (si, ti) = self.conversion_pair(source, target)?;
        Ok(self.pool.pricing.quote_source(
            self.pool.ledger.balance(si),
            self.pool.ledger.balance(ti),
            net_amount,
            self.pool.conversion_fee_ppm,
        )?)
    }

    /// Preview a deposit: minted pool tokens and the amounts that would
    /// actually be pulled
    pub fn add_liquidity_return(&self, amounts: &[U256]) -> Result<DepositQuote, ConverterError> {
        let reserve_count = self.pool.ledger.len();
        if amounts.len() != reserve_count {
            return Err(ConverterError::ReserveCountMismatch {
                expected: reserve_count,
                actual: amounts.len(),
            });
        }
        let supply = self.pool.pool_token_supply;
        if supply.is_zero() {
            return Ok(DepositQuote {
                pool_tokens: seed_supply(self.settings.seed_policy, amounts)?,
                accepted: amounts.to_vec(),
            });
        }
        Ok(deposit_quote(&self.pool.ledger.balances(), supply, amounts)?)
    }

    /// Preview a withdrawal: per-reserve amounts for burning `pool_token_amount`
    pub fn remove_liquidity_return(
        &self,
        pool_token_amount: U256,
    ) -> Result<Vec<U256>, ConverterError> {
        Ok(withdrawal_quote(
            &self.pool.ledger.balances(),
            self.pool.pool_token_supply,
            pool_token_amount,
        )?)
    }

    fn conversion_pair(
        &self,
        source: ReserveId,
        target: ReserveId,
    ) -> Result<(usize, usize), ConverterError> {
        let si = self.pool.index_of(source)?;
        let ti = self.pool.index_of(target)?;
        if si == ti {
            return Err(ConverterError::SameSourceAndTarget);
        }
        Ok((si, ti))
    }
}
