use sale_shared::RoundState;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

// ==================== Event Payload Structs ====================
// Indexers subscribe via topic pattern ("SALE", symbol_short!("…")).

#[derive(Clone)]
#[contracttype]
pub struct RoundRequestedEvent {
    pub call_id: u64,
    pub name: String,
    pub supply: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RoundCreatedEvent {
    pub round_id: u32,
    pub name: String,
    pub supply: u128,
    pub total_allocation: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RoundStateEvent {
    pub round_id: u32,
    pub state: RoundState,
    /// Unsold supply moved to the leftover pool by this change.
    pub swept: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct PurchaseEvent {
    pub round_id: u32,
    pub beneficiary: Address,
    pub tokens: u128,
    pub payment: u128,
    /// True when the purchase merged into an existing schedule.
    pub top_up: bool,
    pub call_id: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct SupplyEvent {
    pub round_id: u32,
    pub amount: u128,
    pub supply: u128,
    pub leftover: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct WhitelistEvent {
    pub round_id: u32,
    pub added: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct SoldEvent {
    pub round_id: u32,
    pub amount: u128,
    pub sold: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct CompensationEvent {
    pub call_id: u64,
    pub round_id: u32,
    pub beneficiary: Address,
    pub released: u128,
    pub refunded: u128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ProceedsEvent {
    pub to: Address,
    pub amount: u128,
    pub timestamp: u64,
}

// ==================== Emit Helpers ====================

pub fn emit_round_requested(env: &Env, call_id: u64, name: String, supply: u128) {
    env.events().publish(
        ("SALE", symbol_short!("requested")),
        RoundRequestedEvent {
            call_id,
            name,
            supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_round_created(
    env: &Env,
    round_id: u32,
    name: String,
    supply: u128,
    total_allocation: u128,
) {
    env.events().publish(
        ("SALE", symbol_short!("created")),
        RoundCreatedEvent {
            round_id,
            name,
            supply,
            total_allocation,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_state_changed(env: &Env, round_id: u32, state: RoundState, swept: u128) {
    env.events().publish(
        ("SALE", symbol_short!("state")),
        RoundStateEvent {
            round_id,
            state,
            swept,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_purchase(
    env: &Env,
    round_id: u32,
    beneficiary: Address,
    tokens: u128,
    payment: u128,
    top_up: bool,
    call_id: u64,
) {
    env.events().publish(
        ("SALE", symbol_short!("bought")),
        PurchaseEvent {
            round_id,
            beneficiary,
            tokens,
            payment,
            top_up,
            call_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_team_allocation(
    env: &Env,
    round_id: u32,
    member: Address,
    tokens: u128,
    top_up: bool,
    call_id: u64,
) {
    env.events().publish(
        ("SALE", symbol_short!("team")),
        PurchaseEvent {
            round_id,
            beneficiary: member,
            tokens,
            payment: 0,
            top_up,
            call_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_supply_increased(env: &Env, round_id: u32, amount: u128, supply: u128, leftover: u128) {
    env.events().publish(
        ("SALE", symbol_short!("supply")),
        SupplyEvent {
            round_id,
            amount,
            supply,
            leftover,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_whitelisted(env: &Env, round_id: u32, added: u32) {
    env.events().publish(
        ("SALE", symbol_short!("whitelist")),
        WhitelistEvent {
            round_id,
            added,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_sold(env: &Env, round_id: u32, amount: u128, sold: u128) {
    env.events().publish(
        ("SALE", symbol_short!("sold")),
        SoldEvent {
            round_id,
            amount,
            sold,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_compensated(
    env: &Env,
    call_id: u64,
    round_id: u32,
    beneficiary: Address,
    released: u128,
    refunded: u128,
) {
    env.events().publish(
        ("SALE", symbol_short!("compensd")),
        CompensationEvent {
            call_id,
            round_id,
            beneficiary,
            released,
            refunded,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_proceeds_withdrawn(env: &Env, to: Address, amount: u128) {
    env.events().publish(
        ("SALE", symbol_short!("withdrawn")),
        ProceedsEvent {
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
