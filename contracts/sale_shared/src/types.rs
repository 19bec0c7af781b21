use soroban_sdk::{contracttype, Address, String};

/// Lifecycle of a sale round. Mirrored into the vesting contract to gate claims.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum RoundState {
    /// Purchases accepted, claims allowed.
    Active = 0,
    /// Purchases and claims stopped. Default for a new round.
    Inactive = 1,
    /// Closed for good; unsold supply has been swept to the leftover pool.
    Done = 2,
}

impl RoundState {
    pub fn allows_claims(self) -> bool {
        !matches!(self, RoundState::Inactive)
    }
}

/// Owner-supplied parameters of a new round.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RoundConfig {
    pub name: String,
    pub supply: u128,
    pub cliff_months: u32,
    pub vesting_months: u32,
    /// Percent of the allocation released at start, 0..=100.
    pub unlock_rate: u32,
    /// Ledger timestamp (seconds) at which vesting starts and sales close.
    pub start_date: u64,
    /// Payment base units per token base unit. Zero iff `is_free`.
    pub price: u128,
    pub is_free: bool,
    pub whitelist_only: bool,
}

/// Arguments of the create-schedule call (crowdsale -> vesting).
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ScheduleParams {
    pub beneficiary: Address,
    pub round_id: u32,
    pub allocation: u128,
    pub cliff_months: u32,
    pub vesting_months: u32,
    pub unlock_rate: u32,
    pub revocable: bool,
    pub invested: u128,
    pub start_date: u64,
    pub price: u128,
}

/// Arguments of the update-schedule call, merging a repeat purchase.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ScheduleTopUp {
    pub beneficiary: Address,
    pub round_id: u32,
    pub added_allocation: u128,
    /// Vesting-only share of `added_allocation` as the crowdsale sees it.
    /// Advisory: the vesting ledger recomputes the split from the new total,
    /// so floor rounding can differ by a unit. Only bounded by
    /// `added_allocation`.
    pub added_vesting: u128,
    pub added_invested: u128,
}

/// Every request that crosses a contract boundary.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum CallRequest {
    /// crowdsale -> token: read total supply, then register the round.
    QuerySupply(RoundConfig),
    /// crowdsale -> vesting.
    CreateSchedule(ScheduleParams),
    /// crowdsale -> vesting.
    UpdateSchedule(ScheduleTopUp),
    /// crowdsale -> vesting: round id, state, per-round sequence number.
    PropagateState(u32, RoundState, u32),
    /// vesting -> crowdsale: round id, released amount.
    ReportSold(u32, u128),
    /// vesting -> token: beneficiary, amount.
    Transfer(Address, u128),
}

/// The single result record a callback inspects.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum CallReply {
    Unit,
    Amount(i128),
}
