use sale_shared::RoundState;
use soroban_sdk::{contracttype, symbol_short, Address, Env};

// Topic pattern ("VEST", symbol_short!("…")).

#[derive(Clone)]
#[contracttype]
pub struct ScheduleEvent {
    pub beneficiary: Address,
    pub round_id: u32,
    pub total_allocation: u128,
    pub vesting_allocation: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ReleaseEvent {
    pub beneficiary: Address,
    pub round_id: u32,
    pub amount: u128,
    pub released_periods: u32,
    pub transfer_call: Option<u64>,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RoundStateEvent {
    pub round_id: u32,
    pub state: RoundState,
    pub seq: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct MonthLengthEvent {
    pub month_secs: u64,
    pub timestamp: u64,
}

pub fn emit_schedule_created(env: &Env, beneficiary: Address, round_id: u32, total: u128, vesting: u128) {
    env.events().publish(
        ("VEST", symbol_short!("created")),
        ScheduleEvent {
            beneficiary,
            round_id,
            total_allocation: total,
            vesting_allocation: vesting,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_schedule_updated(env: &Env, beneficiary: Address, round_id: u32, total: u128, vesting: u128) {
    env.events().publish(
        ("VEST", symbol_short!("updated")),
        ScheduleEvent {
            beneficiary,
            round_id,
            total_allocation: total,
            vesting_allocation: vesting,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_claimed(
    env: &Env,
    beneficiary: Address,
    round_id: u32,
    amount: u128,
    released_periods: u32,
    transfer_call: Option<u64>,
) {
    env.events().publish(
        ("VEST", symbol_short!("claimed")),
        ReleaseEvent {
            beneficiary,
            round_id,
            amount,
            released_periods,
            transfer_call,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_revoked(
    env: &Env,
    beneficiary: Address,
    round_id: u32,
    amount: u128,
    released_periods: u32,
    transfer_call: Option<u64>,
) {
    env.events().publish(
        ("VEST", symbol_short!("revoked")),
        ReleaseEvent {
            beneficiary,
            round_id,
            amount,
            released_periods,
            transfer_call,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_round_state(env: &Env, round_id: u32, state: RoundState, seq: u32) {
    env.events().publish(
        ("VEST", symbol_short!("state")),
        RoundStateEvent {
            round_id,
            state,
            seq,
            timestamp: env.ledger().timestamp(),
        },
    );
}

/// A state change that arrived after a newer one and was dropped.
pub fn emit_stale_state(env: &Env, round_id: u32, state: RoundState, seq: u32) {
    env.events().publish(
        ("VEST", symbol_short!("stale")),
        RoundStateEvent {
            round_id,
            state,
            seq,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_month_length(env: &Env, month_secs: u64) {
    env.events().publish(
        ("VEST", symbol_short!("month")),
        MonthLengthEvent {
            month_secs,
            timestamp: env.ledger().timestamp(),
        },
    );
}
