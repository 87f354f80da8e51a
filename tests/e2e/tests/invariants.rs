//! Engine-level invariants, exercised through the full controller stack
//!
//! These are the properties the whole design leans on: conversions never
//! destroy pool value, the inverse quote never under-delivers, liquidity
//! round trips never mint for free, and the oracle converges.

use proptest::prelude::*;
use weir_e2e_tests::fixtures::*;
use weir_types::{Fraction, U256};

fn u(v: u64) -> U256 {
    U256::from(v)
}

#[test]
fn reference_scenario_quotes() {
    // pool A:5000 B:8000, no fee: 8000*500/5500 = 727 (floor)
    let c = activated_controller(5_000, 8_000, 0, 0).unwrap();
    let q = c.target_amount_and_fee(asset(1), asset(2), u(500)).unwrap();
    assert_eq!(q.gross, u(727));
    assert_eq!(q.fee, u(0));

    // same pool at 3%: fee = floor(727 * 30000 / 1e6) = 21, net 706
    let c = activated_controller(5_000, 8_000, 30_000, 0).unwrap();
    let q = c.target_amount_and_fee(asset(1), asset(2), u(500)).unwrap();
    assert_eq!(q.fee, u(21));
    assert_eq!(q.net(), u(706));
}

#[test]
fn fees_strictly_increase_the_reserve_product() {
    let mut c = activated_controller(5_000, 8_000, 30_000, 0).unwrap();
    let before = reserve_product(&c);
    c.convert(trader(), asset(1), asset(2), u(500), u(1), T0 + 10).unwrap();
    assert!(reserve_product(&c) > before);
}

#[test]
fn fee_monotonicity_on_the_reference_pool() {
    let mut last_net = None;
    for fee_ppm in [0u32, 10_000, 30_000, 100_000, 300_000] {
        let c = activated_controller(5_000, 8_000, fee_ppm, 0).unwrap();
        let net = c.target_amount_and_fee(asset(1), asset(2), u(500)).unwrap().net();
        if let Some(previous) = last_net {
            assert!(net < previous, "net payout must strictly fall as the fee rises");
        }
        last_net = Some(net);
    }
}

#[test]
fn oracle_converges_after_a_quiet_window() {
    let mut c = activated_controller(1_000_000, 2_000_000, 3_000, 0).unwrap();
    for (i, amount) in [10_000u64, 25_000, 5_000].into_iter().enumerate() {
        c.convert(trader(), asset(1), asset(2), u(amount), u(1), T0 + 10 + i as u64)
            .unwrap();
    }

    let window = c.settings().average_rate_window_secs;
    let a = c.balance_of(asset(1)).unwrap();
    let b = c.balance_of(asset(2)).unwrap();
    let average = c.average_rate(asset(1), asset(2), T0 + 12 + window).unwrap();
    assert_eq!(average, Fraction::new(b, a));
}

proptest! {
    #[test]
    fn conversions_never_decrease_the_reserve_product(
        balance_a in 1_000u64..1_000_000_000u64,
        balance_b in 1_000u64..1_000_000_000u64,
        amount in 1u64..1_000_000u64,
        fee_ppm in 0u32..500_000u32,
    ) {
        let mut c = activated_controller(balance_a, balance_b, fee_ppm, 0).unwrap();
        let before = reserve_product(&c);

        let result = c.convert(trader(), asset(1), asset(2), u(amount), u(1), T0 + 10);
        prop_assume!(result.is_ok());

        prop_assert!(reserve_product(&c) >= before);
    }

    #[test]
    fn inverse_quotes_never_under_deliver(
        balance_a in 10_000u64..1_000_000_000u64,
        balance_b in 10_000u64..1_000_000_000u64,
        net in 1u64..1_000u64,
        fee_ppm in 0u32..400_000u32,
    ) {
        let c = activated_controller(balance_a, balance_b, fee_ppm, 0).unwrap();

        let inverse = c.source_amount_and_fee(asset(1), asset(2), u(net)).unwrap();
        let forward = c
            .target_amount_and_fee(asset(1), asset(2), inverse.source_amount)
            .unwrap();
        prop_assert!(forward.gross >= u(net));
        prop_assert!(forward.net() >= u(net));
    }

    #[test]
    fn liquidity_round_trips_never_mint_for_free(
        balance_a in 1_000u64..1_000_000_000u64,
        balance_b in 1_000u64..1_000_000_000u64,
        share_ppm in 1u32..1_000_000u32,
    ) {
        let mut c = activated_controller(balance_a, balance_b, 0, 0).unwrap();
        let supply_before = c.pool_token_supply();
        let burn = weir_types::mul_div_floor(
            supply_before,
            u(share_ppm as u64),
            u(1_000_000),
        ).unwrap();
        prop_assume!(!burn.is_zero());

        let amounts = match c.remove_liquidity(trader(), burn, &[u(1), u(1)], T0 + 10) {
            Ok(amounts) => amounts,
            // tiny burns can round a pay-out below the mandatory floor
            Err(_) => return Ok(()),
        };

        // re-depositing dust can round the mint to zero, which is rejected;
        // either way the supply must not exceed its pre-withdrawal level
        if let Ok(minted) = c.add_liquidity(trader(), &amounts, u(1), T0 + 20) {
            prop_assert!(minted <= burn);
        }
        prop_assert!(c.pool_token_supply() <= supply_before);
    }
}
