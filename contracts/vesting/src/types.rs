use sale_shared::ScheduleParams;
use soroban_sdk::{contracttype, Address, Env};

/// Thirty days.
pub const DEFAULT_MONTH_SECS: u64 = 30 * 86_400;

/// Release schedule of one beneficiary in one round.
///
/// `total_allocation` is always split as `unlock + vesting_allocation` with
/// `unlock = total_allocation * unlock_rate / 100` (floor). The released
/// counters track each half separately so a top-up never re-releases.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VestingSchedule {
    pub beneficiary: Address,
    pub round_id: u32,
    pub start_date: u64,
    pub cliff_months: u32,
    pub vesting_months: u32,
    pub unlock_rate: u32,
    pub revocable: bool,
    pub revoked: bool,
    pub total_allocation: u128,
    pub vesting_allocation: u128,
    /// Payment behind this allocation; zero for team allocations.
    pub invested: u128,
    pub price: u128,
    pub unlock_released: bool,
    /// Vesting periods already paid out. Never above `vesting_months`.
    pub released_periods: u32,
    pub fully_claimed: bool,
    pub released_unlock: u128,
    pub released_vesting: u128,
}

impl VestingSchedule {
    pub fn from_params(params: &ScheduleParams, vesting_allocation: u128) -> Self {
        Self {
            beneficiary: params.beneficiary.clone(),
            round_id: params.round_id,
            start_date: params.start_date,
            cliff_months: params.cliff_months,
            vesting_months: params.vesting_months,
            unlock_rate: params.unlock_rate,
            revocable: params.revocable,
            revoked: false,
            total_allocation: params.allocation,
            vesting_allocation,
            invested: params.invested,
            price: params.price,
            unlock_released: false,
            released_periods: 0,
            fully_claimed: false,
            released_unlock: 0,
            released_vesting: 0,
        }
    }

    pub fn unlock_allocation(&self) -> u128 {
        self.total_allocation - self.vesting_allocation
    }

    pub fn released(&self) -> u128 {
        self.released_unlock + self.released_vesting
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VestingConfig {
    /// Crowdsale contract; the only caller allowed to write schedules.
    pub crowdsale: Address,
    /// Token paid out on claims. This contract must hold the balance.
    pub token: Address,
    /// Length of one vesting month in seconds.
    pub month_secs: u64,
}

#[contracttype]
pub enum DataKey {
    Owner,
    Config,
    Schedule(Address, u32),
    RoundState(u32),
    RoundStateSeq(u32),
}

pub fn get_ledger_timestamp(env: &Env) -> u64 {
    env.ledger().timestamp()
}
