use sale_shared::{RoundConfig, RoundState};
use soroban_sdk::{contracttype, Address, Env, String};

/// Configuration and running totals of one sale round.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleRound {
    pub name: String,
    pub supply: u128,
    /// Payment collected, in payment token base units.
    pub raised: u128,
    /// Tokens reserved for buyers and team members. Never above `supply`.
    pub allocated: u128,
    /// Tokens actually released by the vesting contract. Never above `allocated`.
    pub sold: u128,
    pub state: RoundState,
    /// Bumped on every state change; carried by each state propagation.
    pub state_seq: u32,
    pub cliff_months: u32,
    pub vesting_months: u32,
    pub unlock_rate: u32,
    pub start_date: u64,
    pub price: u128,
    pub is_free: bool,
    pub whitelist_only: bool,
}

impl SaleRound {
    pub fn from_config(config: &RoundConfig) -> Self {
        Self {
            name: config.name.clone(),
            supply: config.supply,
            raised: 0,
            allocated: 0,
            sold: 0,
            state: RoundState::Inactive,
            state_seq: 0,
            cliff_months: config.cliff_months,
            vesting_months: config.vesting_months,
            unlock_rate: config.unlock_rate,
            start_date: config.start_date,
            price: config.price,
            is_free: config.is_free,
            whitelist_only: config.whitelist_only,
        }
    }

    /// Supply not yet reserved by anyone.
    pub fn unallocated(&self) -> u128 {
        self.supply.saturating_sub(self.allocated)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleConfig {
    /// Vesting contract; the only caller allowed to report released tokens.
    pub vesting: Address,
    /// Token being sold; queried for its total supply.
    pub token: Address,
    /// Token buyers pay with. Payments are held by this contract.
    pub payment_token: Address,
}

#[contracttype]
pub enum DataKey {
    Owner,
    Config,
    RoundCount,
    TotalAllocation,
    TotalLeftover,
    Round(u32),
    Members(u32),
    IsMember(Address, u32),
    Whitelist(u32),
}

pub fn get_ledger_timestamp(env: &Env) -> u64 {
    env.ledger().timestamp()
}
