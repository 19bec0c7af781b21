/// Reference purchase and release scenarios, run end to end through the
/// outboxes of both contracts.
use sale_shared::{RoundState, SaleError, ScheduleParams};
use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::utils::constants::*;
use crate::utils::SaleHarness;

/// Round used by scenarios A to D: supply 1000, price 10, 20% unlock,
/// one cliff month, four vesting months.
fn reference_purchase(h: &SaleHarness) -> (u32, Address) {
    let round_id = h.open_round(&h.paid_round(1_000, 10), RoundState::Active);
    let buyer = h.funded_buyer(100);
    assert_eq!(h.sale.buy(&buyer, &round_id, &100), 10);
    h.relay();
    (round_id, buyer)
}

#[test]
fn scenario_a_purchase_splits_allocation() {
    let h = SaleHarness::new();
    let (round_id, buyer) = reference_purchase(&h);

    let round = h.sale.get_round(&round_id);
    assert_eq!(round.allocated, 10);
    assert_eq!(round.raised, 100);

    let schedule = h.vesting.get_schedule(&buyer, &round_id);
    assert_eq!(schedule.total_allocation, 10);
    assert_eq!(schedule.unlock_allocation(), 2);
    assert_eq!(schedule.vesting_allocation, 8);
}

#[test]
fn scenario_b_unlock_released_once_before_cliff() {
    let h = SaleHarness::new();
    let (round_id, buyer) = reference_purchase(&h);

    h.months_after_start(0);
    assert_eq!(h.vesting.claim(&buyer, &round_id), 2);
    h.relay();
    assert_eq!(h.token.balance(&buyer), 2);

    assert_eq!(
        h.vesting.try_claim(&buyer, &round_id),
        Err(Ok(SaleError::ZeroAmount))
    );
    h.months_after_start(1);
    assert_eq!(h.vesting.get_releasable(&buyer, &buyer, &round_id), 0);
    assert_eq!(h.relay(), 0);
    assert_eq!(h.token.balance(&buyer), 2);

    h.months_after_start(2);
    assert_eq!(h.vesting.get_releasable(&buyer, &buyer, &round_id), 2);
}

#[test]
fn scenario_c_two_periods_after_cliff() {
    let h = SaleHarness::new();
    let (round_id, buyer) = reference_purchase(&h);

    h.months_after_start(0);
    h.vesting.claim(&buyer, &round_id);

    h.months_after_start(3);
    assert_eq!(h.vesting.claim(&buyer, &round_id), 8 / 4 * 2);
    assert_eq!(h.vesting.get_schedule(&buyer, &round_id).released_periods, 2);

    h.relay();
    assert_eq!(h.token.balance(&buyer), 6);
    assert_eq!(h.sale.get_round(&round_id).sold, 6);
}

#[test]
fn scenario_d_revocation_rules() {
    let h = SaleHarness::new();
    let (round_id, buyer) = reference_purchase(&h);

    let advisor = Address::generate(&h.env);
    h.vesting.create_schedule(
        &h.sale.address,
        &ScheduleParams {
            beneficiary: advisor.clone(),
            round_id,
            allocation: 50,
            cliff_months: 1,
            vesting_months: 4,
            unlock_rate: 20,
            revocable: false,
            invested: 0,
            start_date: ROUND_START,
            price: 0,
        },
    );
    assert_eq!(
        h.vesting.try_revoke(&h.owner, &advisor, &round_id),
        Err(Ok(SaleError::InvalidState))
    );

    h.vesting.revoke(&h.owner, &buyer, &round_id);
    assert_eq!(
        h.vesting.try_revoke(&h.owner, &buyer, &round_id),
        Err(Ok(SaleError::InvalidState))
    );
}

#[test]
fn scenario_e_price_must_match_round_kind() {
    let h = SaleHarness::new();

    assert_eq!(
        h.sale.try_create_round(&h.owner, &h.paid_round(1_000, 0)),
        Err(Ok(SaleError::InvalidConfig))
    );
    let mut priced_free = h.free_round(1_000);
    priced_free.price = 1;
    assert_eq!(
        h.sale.try_create_round(&h.owner, &priced_free),
        Err(Ok(SaleError::InvalidConfig))
    );
}

#[test]
fn scenario_f_whitelist_admission() {
    let h = SaleHarness::new();
    let mut config = h.paid_round(1_000, 10);
    config.whitelist_only = true;
    let round_id = h.open_round(&config, RoundState::Active);
    let buyer = h.funded_buyer(100);

    assert_eq!(
        h.sale.try_buy(&buyer, &round_id, &100),
        Err(Ok(SaleError::Unauthorized))
    );
    h.sale
        .add_to_whitelist(&h.owner, &round_id, &vec![&h.env, buyer.clone()]);
    assert_eq!(h.sale.buy(&buyer, &round_id, &100), 10);
}
