// Minimal interfaces of the peer contracts. Only the outbox dispatchers call
// through these clients.

use soroban_sdk::{contractclient, Address, Env};

use crate::errors::SaleError;
use crate::types::{RoundState, ScheduleParams, ScheduleTopUp};

#[contractclient(name = "VestingLedgerClient")]
pub trait VestingLedger {
    fn create_schedule(env: Env, caller: Address, params: ScheduleParams) -> Result<(), SaleError>;

    fn update_schedule(env: Env, caller: Address, top_up: ScheduleTopUp) -> Result<(), SaleError>;

    fn change_round_state(
        env: Env,
        caller: Address,
        round_id: u32,
        state: RoundState,
        seq: u32,
    ) -> Result<(), SaleError>;
}

#[contractclient(name = "AllocationEngineClient")]
pub trait AllocationEngine {
    fn report_tokens_sold(
        env: Env,
        caller: Address,
        round_id: u32,
        amount: u128,
    ) -> Result<(), SaleError>;
}

#[contractclient(name = "TokenLedgerClient")]
pub trait TokenLedger {
    fn total_supply(env: Env) -> i128;

    fn balance(env: Env, id: Address) -> i128;

    fn transfer(env: Env, from: Address, to: Address, amount: i128);
}
