//! Property-based tests for the release arithmetic and supply accounting.

use proptest::prelude::*;
use sale_shared::math::{mul_div_floor, unlock_portion, vesting_portion};
use sale_shared::{RoundState, SaleError};
use soroban_sdk::{testutils::Address as _, Address, Env};
use vesting::release::{apply, compute_releasable};
use vesting::VestingSchedule;

use crate::utils::SaleHarness;

const MONTH: u64 = 300;
const START: u64 = 1_000_000;

fn schedule(env: &Env, total: u128, unlock_rate: u32, cliff: u32, vesting: u32) -> VestingSchedule {
    VestingSchedule {
        beneficiary: Address::generate(env),
        round_id: 0,
        start_date: START,
        cliff_months: cliff,
        vesting_months: vesting,
        unlock_rate,
        revocable: true,
        revoked: false,
        total_allocation: total,
        vesting_allocation: vesting_portion(total, unlock_rate),
        invested: 0,
        price: 0,
        unlock_released: false,
        released_periods: 0,
        fully_claimed: false,
        released_unlock: 0,
        released_vesting: 0,
    }
}

/// Strategy for schedule shapes: (total, unlock rate, cliff months, vesting months).
fn schedule_shape() -> impl Strategy<Value = (u128, u32, u32, u32)> {
    (1u128..1_000_000_000_000, 0u32..=100, 0u32..12, 0u32..48)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: the unlock and vesting portions always add up to the total.
    #[test]
    fn prop_unlock_plus_vesting_is_total(total in any::<u64>(), rate in 0u32..=100) {
        let total = total as u128;
        prop_assert_eq!(unlock_portion(total, rate) + vesting_portion(total, rate), total);
        prop_assert_eq!(unlock_portion(total, rate), total * rate as u128 / 100);
    }

    /// Property: the overflow-free quotient agrees with the naive one wherever
    /// the naive product fits.
    #[test]
    fn prop_mul_div_floor_matches_naive(a in any::<u64>(), b in any::<u32>(), d in 1u64..) {
        let expected = (a as u128) * (b as u128) / (d as u128);
        prop_assert_eq!(mul_div_floor(a as u128, b as u128, d as u128), Some(expected));
    }

    /// Property: any claim pattern releases monotonically and, once the
    /// horizon has passed, exactly the total allocation.
    #[test]
    fn prop_claims_never_exceed_allocation(
        (total, rate, cliff, vesting) in schedule_shape(),
        offsets in prop::collection::vec(0u64..20_000, 0..24),
    ) {
        let env = Env::default();
        let mut s = schedule(&env, total, rate, cliff, vesting);
        let mut times = offsets;
        times.sort_unstable();

        let mut released = 0u128;
        for offset in times {
            let release = compute_releasable(&s, START + offset, MONTH);
            prop_assert_eq!(release.amount, release.unlock + release.vested);
            released += release.amount;
            apply(&mut s, &release);
            prop_assert!(released <= total);
            prop_assert!(s.released_periods <= s.vesting_months);
        }

        let horizon = START + (cliff as u64 + vesting as u64) * MONTH;
        let last = compute_releasable(&s, horizon, MONTH);
        released += last.amount;
        apply(&mut s, &last);
        prop_assert_eq!(released, total);
        prop_assert!(s.fully_claimed);
        prop_assert_eq!(compute_releasable(&s, horizon + 10 * MONTH, MONTH).amount, 0);
    }

    /// Property: without claiming, the releasable amount never shrinks as time passes.
    #[test]
    fn prop_releasable_is_monotonic_in_time(
        (total, rate, cliff, vesting) in schedule_shape(),
        t1 in 0u64..30_000,
        dt in 0u64..30_000,
    ) {
        let env = Env::default();
        let s = schedule(&env, total, rate, cliff, vesting);
        let earlier = compute_releasable(&s, START + t1, MONTH).amount;
        let later = compute_releasable(&s, START + t1 + dt, MONTH).amount;
        prop_assert!(earlier <= later);
        prop_assert!(later <= total);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: purchases never push a round past its supply, and every
    /// rejection is one of the admission errors.
    #[test]
    fn prop_purchases_respect_supply(
        supply in 1u128..5_000,
        price in 1u128..50,
        payments in prop::collection::vec(0u128..20_000, 1..8),
    ) {
        let h = SaleHarness::new();
        let round_id = h.open_round(&h.paid_round(supply, price), RoundState::Active);

        let mut granted = 0u128;
        for payment in payments {
            let buyer = h.funded_buyer(payment.max(1) as i128);
            match h.sale.try_buy(&buyer, &round_id, &payment) {
                Ok(Ok(tokens)) => {
                    prop_assert_eq!(tokens, payment / price);
                    granted += tokens;
                }
                Err(Ok(SaleError::ZeroAmount)) | Err(Ok(SaleError::InsufficientSupply)) => {}
                other => prop_assert!(false, "unexpected buy outcome: {:?}", other),
            }
            let round = h.sale.get_round(&round_id);
            prop_assert!(round.allocated <= round.supply);
        }
        prop_assert_eq!(h.sale.get_round(&round_id).allocated, granted);
    }
}
