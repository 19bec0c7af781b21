use crate::types::*;
use sale_shared::{RoundState, SaleError};
use soroban_sdk::{Address, Env};

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(SaleError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_config(env: &Env) -> Result<VestingConfig, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(SaleError::NotInitialized)
}

pub fn set_config(env: &Env, config: &VestingConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_schedule(env: &Env, beneficiary: &Address, round_id: u32) -> Option<VestingSchedule> {
    env.storage()
        .persistent()
        .get(&DataKey::Schedule(beneficiary.clone(), round_id))
}

pub fn load_schedule(
    env: &Env,
    beneficiary: &Address,
    round_id: u32,
) -> Result<VestingSchedule, SaleError> {
    get_schedule(env, beneficiary, round_id).ok_or(SaleError::NotFound)
}

/// Writes a schedule after checking it never pays out more than it holds.
pub fn set_schedule(env: &Env, schedule: &VestingSchedule) -> Result<(), SaleError> {
    if schedule.vesting_allocation > schedule.total_allocation
        || schedule.released_unlock > schedule.unlock_allocation()
        || schedule.released_vesting > schedule.vesting_allocation
        || schedule.released_periods > schedule.vesting_months
    {
        return Err(SaleError::InvalidState);
    }
    env.storage().persistent().set(
        &DataKey::Schedule(schedule.beneficiary.clone(), schedule.round_id),
        schedule,
    );
    Ok(())
}

pub fn get_round_state(env: &Env, round_id: u32) -> Option<RoundState> {
    env.storage()
        .persistent()
        .get(&DataKey::RoundState(round_id))
}

/// Sequence number of the last applied state change, 0 if none.
pub fn get_round_state_seq(env: &Env, round_id: u32) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::RoundStateSeq(round_id))
        .unwrap_or(0)
}

pub fn set_round_state(env: &Env, round_id: u32, state: RoundState, seq: u32) {
    env.storage()
        .persistent()
        .set(&DataKey::RoundState(round_id), &state);
    env.storage()
        .persistent()
        .set(&DataKey::RoundStateSeq(round_id), &seq);
}
