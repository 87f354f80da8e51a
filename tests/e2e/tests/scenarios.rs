//! Narrative end-to-end scenarios
//!
//! Each test walks a pool through a realistic sequence of operations and
//! checks the global bookkeeping afterwards: every unit of every asset is
//! either with the trader, inside the pool, or with the network-fee wallet.

use assert_matches::assert_matches;
use weir_amm::SeedPolicy;
use weir_converter::{ConverterController, ConverterError, PoolSpec, ReserveSpec};
use weir_e2e_tests::fixtures::*;
use weir_types::{Address, ReserveId, U256};

fn u(v: u64) -> U256 {
    U256::from(v)
}

/// bank(trader) + bank(fee wallet) + pool balance must equal the initial funding
fn assert_conservation(c: &TestController, id: ReserveId) {
    let with_trader = c.transport().balance(id, trader());
    let with_wallet = c.transport().balance(id, fee_wallet());
    let in_pool = c.balance_of(id).unwrap();
    assert_eq!(
        with_trader + with_wallet + in_pool,
        u(TRADER_FUNDS),
        "asset {id} leaked"
    );
}

#[test]
fn full_lifecycle_conserves_every_asset() {
    let mut c = activated_controller(1_000_000, 2_000_000, 30_000, 200_000).unwrap();

    c.convert(trader(), asset(1), asset(2), u(10_000), u(1), T0 + 10).unwrap();
    c.convert(trader(), asset(2), asset(1), u(5_000), u(1), T0 + 20).unwrap();
    c.convert(trader(), asset(1), asset(2), u(2_500), u(1), T0 + 30).unwrap();

    c.add_liquidity(trader(), &[u(50_000), u(100_000)], u(1), T0 + 40).unwrap();

    let tenth = c.pool_token_supply() / 10;
    c.remove_liquidity(trader(), tenth, &[u(1), u(1)], T0 + 50).unwrap();

    c.transfer_fees(T0 + 60).unwrap();

    assert_conservation(&c, asset(1));
    assert_conservation(&c, asset(2));
}

#[test]
fn unbalanced_deposit_surplus_stays_with_the_trader() {
    let mut c = activated_controller(1_000, 1_000, 0, 0).unwrap();
    let before_a = c.transport().balance(asset(1), trader());
    let before_b = c.transport().balance(asset(2), trader());

    let minted = c.add_liquidity(trader(), &[u(100), u(50)], u(1), T0 + 10).unwrap();
    assert_eq!(minted, u(50));

    // only 50 of each asset was pulled; the surplus 50 of asset 1 stayed put
    assert_eq!(c.transport().balance(asset(1), trader()), before_a - 50);
    assert_eq!(c.transport().balance(asset(2), trader()), before_b - 50);
}

#[test]
fn seed_policy_decides_the_initial_supply() {
    // first-reserve rule: mint the first listed reserve's deposit
    let mut first = standard_pair_controller(test_settings(0)).unwrap();
    let minted = first
        .add_liquidity(trader(), &[u(1_000), u(250_000)], u(1), T0)
        .unwrap();
    assert_eq!(minted, u(1_000));

    // decimal-geometric-mean rule: 4 and 6 digits average to 5, minting 10^4
    let mut settings = test_settings(0);
    settings.seed_policy = SeedPolicy::DecimalGeometricMean;
    let mut normalized = standard_pair_controller(settings).unwrap();
    let minted = normalized
        .add_liquidity(trader(), &[u(1_000), u(250_000)], u(1), T0)
        .unwrap();
    assert_eq!(minted, u(10_000));
}

#[test]
fn swept_fees_are_gone_for_liquidity_providers() {
    // the full conversion fee is earmarked for the network
    let mut c = activated_controller(5_000, 8_000, 30_000, 1_000_000).unwrap();
    c.convert(trader(), asset(1), asset(2), u(500), u(1), T0 + 10).unwrap();
    assert_eq!(c.accrued_network_fee(asset(2)).unwrap(), u(21));

    let swept = c.transfer_fees(T0 + 20).unwrap();
    assert_eq!(swept, vec![(asset(2), u(21))]);
    assert_eq!(c.transport().balance(asset(2), fee_wallet()), u(21));

    // a full exit now pays out exactly what is left in the pool
    let supply = c.pool_token_supply();
    let amounts = c.remove_liquidity(trader(), supply, &[u(1), u(1)], T0 + 30).unwrap();
    assert_eq!(amounts, vec![u(5_500), u(7_273)]);
    assert_conservation(&c, asset(1));
    assert_conservation(&c, asset(2));
}

#[test]
fn a_failed_operation_does_not_wedge_the_pool() {
    let mut c = activated_controller(5_000, 8_000, 0, 0).unwrap();
    assert_matches!(
        c.convert(trader(), asset(1), asset(2), u(500), u(100_000), T0 + 10),
        Err(ConverterError::SlippageExceeded { .. })
    );

    // the reentrancy guard was released on the error path
    let net = c.convert(trader(), asset(1), asset(2), u(500), u(1), T0 + 20).unwrap();
    assert_eq!(net, u(727));
}

#[test]
fn four_reserve_pools_follow_the_same_rules() {
    let spec = PoolSpec {
        kind: Default::default(),
        conversion_fee_ppm: 0,
        reserves: (1..=4)
            .map(|tag| ReserveSpec { id: asset(tag), weight_ppm: 250_000 })
            .collect(),
    };
    let mut bank = TestBank::default();
    for tag in 1..=4 {
        bank.fund(asset(tag), trader(), u(TRADER_FUNDS));
    }
    let mut c: TestController =
        ConverterController::new(&spec, test_settings(0), bank, AllowAll).unwrap();

    c.add_liquidity(
        trader(),
        &[u(1_000), u(2_000), u(3_000), u(4_000)],
        u(1),
        T0,
    )
    .unwrap();
    assert_eq!(c.pool_token_supply(), u(1_000));

    // convert across an inner pair: 4000 * 100 / 2100 = 190
    let net = c.convert(trader(), asset(2), asset(4), u(100), u(1), T0 + 10).unwrap();
    assert_eq!(net, u(190));

    // withdraw half the supply: every reserve pays out half, floored
    let amounts = c
        .remove_liquidity(trader(), u(500), &[u(1), u(1), u(1), u(1)], T0 + 20)
        .unwrap();
    assert_eq!(amounts, vec![u(500), u(1_050), u(1_500), u(1_905)]);
}

#[test]
fn average_rates_are_visible_to_external_consumers() {
    let mut c = activated_controller(5_000, 8_000, 0, 0).unwrap();
    c.convert(trader(), asset(1), asset(2), u(500), u(1), T0 + 10).unwrap();

    // an insurance-style consumer reads the lagged rate, not the spot
    let average = c.average_rate(asset(1), asset(2), T0 + 10).unwrap();
    let spot_n = c.balance_of(asset(2)).unwrap();
    let spot_d = c.balance_of(asset(1)).unwrap();
    assert!(average.n * spot_d != average.d * spot_n, "average must lag the moved spot");
}

#[test]
fn deposits_from_an_underfunded_account_fail_cleanly() {
    let spec = PoolSpec::standard_pair(asset(1), asset(2));
    let mut bank = TestBank::default();
    let poor = Address::from_low_u64(0x9001);
    bank.fund(asset(1), poor, u(10));
    bank.fund(asset(2), poor, u(10));
    let mut c: TestController =
        ConverterController::new(&spec, test_settings(0), bank, AllowAll).unwrap();

    assert!(c.add_liquidity(poor, &[u(100), u(100)], u(1), T0).is_err());
    assert!(c.pool_token_supply().is_zero());
    assert_eq!(c.transport().balance(asset(1), poor), u(10));
}
