/// Whole-lifecycle checks across the crowdsale, vesting and token contracts.
use sale_shared::xcall::CallStatus;
use sale_shared::{RoundState, SaleError};
use soroban_sdk::{testutils::Address as _, Address};
use vesting::{VestingContract, VestingContractClient};

use crate::utils::constants::MONTH;
use crate::utils::SaleHarness;

#[test]
fn test_monthly_claims_pay_out_exact_allocation() {
    let h = SaleHarness::new();
    let mut config = h.paid_round(100_000, 3);
    config.unlock_rate = 15;
    config.cliff_months = 2;
    config.vesting_months = 7;
    let round_id = h.open_round(&config, RoundState::Active);

    let buyer = h.funded_buyer(30_000);
    let tokens = h.sale.buy(&buyer, &round_id, &29_999);
    assert_eq!(tokens, 9_999);
    h.relay();

    for month in 0..=12 {
        h.months_after_start(month);
        let _ = h.vesting.try_claim(&buyer, &round_id);
        h.relay();
    }

    assert_eq!(h.token.balance(&buyer), tokens as i128);
    let round = h.sale.get_round(&round_id);
    assert_eq!(round.sold, round.allocated);

    let schedule = h.vesting.get_schedule(&buyer, &round_id);
    assert!(schedule.fully_claimed);
    assert_eq!(schedule.released_periods, 7);
    assert_eq!(
        h.vesting.try_claim(&buyer, &round_id),
        Err(Ok(SaleError::ZeroAmount))
    );
}

#[test]
fn test_closed_round_leftover_feeds_next_round() {
    let h = SaleHarness::new();
    let first = h.open_round(&h.paid_round(1_000, 10), RoundState::Active);
    let buyer = h.funded_buyer(2_000);
    h.sale.buy(&buyer, &first, &2_000);

    h.sale
        .change_round_state(&h.owner, &first, &RoundState::Done);
    h.relay();
    assert_eq!(h.sale.get_leftover(&h.owner), 800);
    assert_eq!(h.vesting.get_round_state(&first), RoundState::Done);

    let second = h.open_round(&h.paid_round(100, 10), RoundState::Active);
    h.sale
        .increase_supply_from_leftover(&h.owner, &second, &800);
    assert_eq!(h.sale.get_round(&second).supply, 900);
    assert_eq!(h.sale.get_leftover(&h.owner), 0);
    assert_eq!(h.sale.get_total_allocation(), 1_100);

    // Claims keep working once the round is closed.
    h.months_after_start(0);
    assert_eq!(h.vesting.claim(&buyer, &first), 40);
}

#[test]
fn test_team_allocation_vests_like_a_purchase() {
    let h = SaleHarness::new();
    let round_id = h.open_round(&h.free_round(5_000), RoundState::Active);
    let member = Address::generate(&h.env);

    h.sale
        .add_team_allocation(&h.owner, &member, &round_id, &1_000);
    h.sale
        .add_team_allocation(&h.owner, &member, &round_id, &500);
    h.relay();

    let schedule = h.vesting.get_schedule(&member, &round_id);
    assert_eq!(schedule.total_allocation, 1_500);
    assert_eq!(schedule.vesting_allocation, 1_200);
    assert_eq!(h.sale.get_round_members(&round_id).len(), 1);

    h.months_after_start(5);
    assert_eq!(h.vesting.claim(&member, &round_id), 1_500);
    h.relay();
    assert_eq!(h.token.balance(&member), 1_500);
    assert_eq!(h.sale.get_round(&round_id).sold, 1_500);
}

#[test]
fn test_inactive_round_freezes_claims_until_reactivated() {
    let h = SaleHarness::new();
    let round_id = h.open_round(&h.paid_round(1_000, 10), RoundState::Active);
    let buyer = h.funded_buyer(100);
    h.sale.buy(&buyer, &round_id, &100);
    h.relay();

    h.sale
        .change_round_state(&h.owner, &round_id, &RoundState::Inactive);
    h.relay();
    h.months_after_start(0);
    assert_eq!(
        h.vesting.try_claim(&buyer, &round_id),
        Err(Ok(SaleError::InvalidState))
    );

    h.sale
        .change_round_state(&h.owner, &round_id, &RoundState::Active);
    h.relay();
    assert_eq!(h.vesting.claim(&buyer, &round_id), 2);
}

#[test]
fn test_state_propagation_waits_for_relay() {
    let h = SaleHarness::new();
    let round_id = h.open_round(&h.paid_round(1_000, 10), RoundState::Inactive);

    let call_id = h
        .sale
        .change_round_state(&h.owner, &round_id, &RoundState::Active);
    assert_eq!(
        h.vesting.try_get_round_state(&round_id),
        Err(Ok(SaleError::NotFound))
    );
    assert_eq!(h.sale.get_call(&call_id).status, CallStatus::Pending);

    assert!(h.sale.dispatch(&call_id));
    assert_eq!(h.vesting.get_round_state(&round_id), RoundState::Active);
    assert_eq!(
        h.sale.try_dispatch(&call_id),
        Err(Ok(SaleError::InvalidState))
    );
}

#[test]
fn test_supply_invariants_hold_across_many_buyers() {
    let h = SaleHarness::new();
    let round_id = h.open_round(&h.paid_round(500, 7), RoundState::Active);

    let mut granted = 0u128;
    for payment in [70u128, 699, 1, 1_400, 3, 350, 2_000] {
        let buyer = h.funded_buyer(payment as i128);
        match h.sale.try_buy(&buyer, &round_id, &payment) {
            Ok(Ok(tokens)) => granted += tokens,
            Err(Ok(SaleError::ZeroAmount)) | Err(Ok(SaleError::InsufficientSupply)) => {}
            other => panic!("unexpected buy outcome: {:?}", other),
        }
        let round = h.sale.get_round(&round_id);
        assert!(round.allocated <= round.supply);
        assert!(round.sold <= round.allocated);
    }
    h.relay();

    let round = h.sale.get_round(&round_id);
    assert_eq!(round.allocated, granted);
    assert_eq!(h.payment.balance(&h.sale.address) as u128, round.raised);
}

#[test]
fn test_late_state_changes_never_reopen_a_closed_round() {
    let h = SaleHarness::new();
    let round_id = h.open_round(&h.paid_round(1_000, 10), RoundState::Active);
    let buyer = h.funded_buyer(500);
    assert_eq!(h.sale.buy(&buyer, &round_id, &500), 50);
    h.relay();

    // Reverse delivery: the close is relayed before the pause queued ahead of it.
    let pause = h
        .sale
        .change_round_state(&h.owner, &round_id, &RoundState::Inactive);
    let close = h
        .sale
        .change_round_state(&h.owner, &round_id, &RoundState::Done);
    assert!(h.sale.dispatch(&close));
    assert!(h.sale.dispatch(&pause));
    assert_eq!(h.vesting.get_round_state(&round_id), RoundState::Done);

    // Retry path: a pause that failed is re-driven after a later close.
    let next = h.open_round(&h.paid_round(1_000, 10), RoundState::Active);
    let stray = h.env.register_contract(None, VestingContract);
    VestingContractClient::new(&h.env, &stray).initialize(
        &h.owner,
        &Address::generate(&h.env),
        &h.token.address,
        &MONTH,
    );
    h.sale.set_peers(&h.owner, &stray, &h.token.address);
    let failed = h
        .sale
        .change_round_state(&h.owner, &next, &RoundState::Inactive);
    assert!(!h.sale.dispatch(&failed));

    h.sale
        .set_peers(&h.owner, &h.vesting.address, &h.token.address);
    h.sale
        .change_round_state(&h.owner, &next, &RoundState::Done);
    h.relay();
    h.sale.redrive(&h.owner, &failed);
    h.relay();
    assert_eq!(h.sale.get_call(&failed).status, CallStatus::Succeeded);
    assert_eq!(h.vesting.get_round_state(&next), RoundState::Done);

    h.months_after_start(10);
    assert_eq!(h.vesting.claim(&buyer, &round_id), 50);
    h.relay();
    assert_eq!(h.token.balance(&buyer), 50);
    assert_eq!(h.sale.get_round(&round_id).sold, 50);
}
