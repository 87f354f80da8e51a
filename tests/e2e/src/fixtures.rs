//! Shared fixtures: an in-memory token bank, access-control stubs, and
//! builders for activated pools

use anyhow::Result;
use std::collections::HashMap;
use weir_converter::{
    AccessControl, Action, ConverterController, ConverterSettings, NetworkSettings, PoolSpec,
    TokenTransport, TransferError,
};
use weir_types::{Address, ReserveId, U256};

/// Base timestamp for test scenarios
pub const T0: u64 = 1_700_000_000;

pub fn asset(tag: u64) -> ReserveId {
    ReserveId::from_low_u64(tag)
}

pub fn trader() -> Address {
    Address::from_low_u64(0x7ade)
}

pub fn fee_wallet() -> Address {
    Address::from_low_u64(0xfee)
}

/// In-memory account ledger standing in for the token-transfer collaborator.
/// Fails atomically: a pull that exceeds the account balance changes nothing.
#[derive(Debug, Default)]
pub struct TestBank {
    accounts: HashMap<(ReserveId, Address), U256>,
    /// Completed transfers, for asserting that failed operations moved nothing
    pub transfers: usize,
}

impl TestBank {
    pub fn fund(&mut self, asset: ReserveId, account: Address, amount: U256) {
        *self.accounts.entry((asset, account)).or_insert_with(U256::zero) += amount;
    }

    pub fn balance(&self, asset: ReserveId, account: Address) -> U256 {
        self.accounts.get(&(asset, account)).copied().unwrap_or_default()
    }
}

impl TokenTransport for TestBank {
    fn pull(&mut self, asset: ReserveId, from: Address, amount: U256) -> Result<(), TransferError> {
        let balance = self.accounts.entry((asset, from)).or_insert_with(U256::zero);
        if *balance < amount {
            return Err(TransferError::InsufficientBalance);
        }
        *balance -= amount;
        self.transfers += 1;
        Ok(())
    }

    fn push(&mut self, asset: ReserveId, to: Address, amount: U256) -> Result<(), TransferError> {
        *self.accounts.entry((asset, to)).or_insert_with(U256::zero) += amount;
        self.transfers += 1;
        Ok(())
    }
}

/// Grants every caller every action
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn is_authorized(&self, _caller: Address, _action: Action) -> bool {
        true
    }
}

/// Denies every caller every action
pub struct DenyAll;

impl AccessControl for DenyAll {
    fn is_authorized(&self, _caller: Address, _action: Action) -> bool {
        false
    }
}

pub type TestController = ConverterController<TestBank, AllowAll>;

/// How much of each asset the trader starts with
pub const TRADER_FUNDS: u64 = u64::MAX / 2;

/// Fresh two-reserve standard pool with a funded trader and the given settings
pub fn standard_pair_controller(settings: ConverterSettings) -> Result<TestController> {
    standard_pair_controller_with_fee(settings, 0)
}

pub fn standard_pair_controller_with_fee(
    settings: ConverterSettings,
    conversion_fee_ppm: u32,
) -> Result<TestController> {
    let mut spec = PoolSpec::standard_pair(asset(1), asset(2));
    spec.conversion_fee_ppm = conversion_fee_ppm;

    let mut bank = TestBank::default();
    bank.fund(asset(1), trader(), U256::from(TRADER_FUNDS));
    bank.fund(asset(2), trader(), U256::from(TRADER_FUNDS));

    Ok(ConverterController::new(&spec, settings, bank, AllowAll)?)
}

/// Settings with a permissive fee bound and the given network-fee share
pub fn test_settings(network_fee_ppm: u32) -> ConverterSettings {
    ConverterSettings {
        max_conversion_fee_ppm: 500_000,
        network: NetworkSettings { fee_wallet: fee_wallet(), network_fee_ppm },
        ..Default::default()
    }
}

/// Pool activated at [`T0`] with the given reserve balances
pub fn activated_controller(
    balance_a: u64,
    balance_b: u64,
    conversion_fee_ppm: u32,
    network_fee_ppm: u32,
) -> Result<TestController> {
    let mut controller =
        standard_pair_controller_with_fee(test_settings(network_fee_ppm), conversion_fee_ppm)?;
    controller.add_liquidity(
        trader(),
        &[U256::from(balance_a), U256::from(balance_b)],
        U256::one(),
        T0,
    )?;
    Ok(controller)
}

/// Product of the two reserve balances, the quantity conversions must never
/// decrease
pub fn reserve_product(controller: &TestController) -> weir_types::U512 {
    let a = controller.balance_of(asset(1)).unwrap();
    let b = controller.balance_of(asset(2)).unwrap();
    a.full_mul(b)
}
