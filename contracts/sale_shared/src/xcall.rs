//! Outbox for cross-contract calls.
//!
//! An operation that needs a peer records an [`OutboundCall`] instead of calling
//! the peer inline. A relayer later invokes the issuing contract's `dispatch`
//! entry point, which performs the peer call and then runs the callback inside
//! the issuing contract. The callback sees exactly one reply and only records
//! the outcome; whatever the original operation committed stays committed.
//! Failed calls stay in the outbox until the owner re-drives or abandons them.

use soroban_sdk::{contracttype, symbol_short, Env, Vec};

use crate::errors::SaleError;
use crate::types::{CallReply, CallRequest};

pub const DEFAULT_EXEC_UNITS: u32 = 5;
pub const DEFAULT_CALLBACK_UNITS: u32 = 5;
pub const DEFAULT_MIN_PREPAID: u32 = 20;

/// Processing budget charged for every outbound call.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct BudgetPolicy {
    pub exec_units: u32,
    pub callback_units: u32,
    /// Prepaid balance below which no new call is accepted.
    pub min_prepaid: u32,
}

impl BudgetPolicy {
    pub fn standard() -> Self {
        Self {
            exec_units: DEFAULT_EXEC_UNITS,
            callback_units: DEFAULT_CALLBACK_UNITS,
            min_prepaid: DEFAULT_MIN_PREPAID,
        }
    }

    pub fn per_call(&self) -> u64 {
        self.exec_units as u64 + self.callback_units as u64
    }

    fn validate(&self) -> Result<(), SaleError> {
        if self.exec_units == 0 || self.callback_units == 0 {
            return Err(SaleError::InvalidConfig);
        }
        if (self.min_prepaid as u64) < self.per_call() {
            return Err(SaleError::InvalidConfig);
        }
        Ok(())
    }
}

/// Split of a call's budget between the peer execution and the callback.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CallBudget {
    pub exec_units: u32,
    pub callback_units: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum CallStatus {
    Pending = 0,
    Succeeded = 1,
    Failed = 2,
    /// Failed and compensated; never dispatched again.
    Abandoned = 3,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct OutboundCall {
    pub id: u64,
    pub request: CallRequest,
    pub budget: CallBudget,
    pub status: CallStatus,
    pub attempts: u32,
    pub created_at: u64,
    pub settled_at: Option<u64>,
    /// `SaleError` code of the last failure.
    pub error: Option<u32>,
}

#[derive(Clone)]
#[contracttype]
pub struct CallEvent {
    pub call_id: u64,
    pub status: CallStatus,
    pub attempts: u32,
    pub error: Option<u32>,
    pub timestamp: u64,
}

// Prefixed so the keys never collide with a host contract's own `DataKey`.
#[contracttype]
pub enum OutboxKey {
    OutboxPolicy,
    OutboxPrepaid,
    OutboxNextId,
    OutboxQueue,
    OutboxCall(u64),
}

/// The per-contract half of a call: how to reach the peer and what to do with
/// its reply.
pub trait CallHandler {
    /// Performs the peer call. `None` when the peer failed.
    fn execute(env: &Env, request: &CallRequest) -> Option<CallReply>;

    /// Callback for a successful peer reply. An error marks the call failed;
    /// it must be returned before the callback writes anything.
    fn on_reply(env: &Env, call: &OutboundCall, reply: &CallReply) -> Result<(), SaleError>;
}

pub struct Outbox;

impl Outbox {
    pub fn init(env: &Env) {
        let storage = env.storage().instance();
        storage.set(&OutboxKey::OutboxPolicy, &BudgetPolicy::standard());
        storage.set(&OutboxKey::OutboxPrepaid, &0u64);
        storage.set(&OutboxKey::OutboxNextId, &0u64);
    }

    pub fn policy(env: &Env) -> BudgetPolicy {
        env.storage()
            .instance()
            .get(&OutboxKey::OutboxPolicy)
            .unwrap_or(BudgetPolicy::standard())
    }

    pub fn set_policy(env: &Env, policy: &BudgetPolicy) -> Result<(), SaleError> {
        policy.validate()?;
        env.storage().instance().set(&OutboxKey::OutboxPolicy, policy);
        Ok(())
    }

    pub fn prepaid(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&OutboxKey::OutboxPrepaid)
            .unwrap_or(0)
    }

    pub fn fund(env: &Env, units: u64) -> Result<u64, SaleError> {
        if units == 0 {
            return Err(SaleError::ZeroAmount);
        }
        let balance = Self::prepaid(env)
            .checked_add(units)
            .ok_or(SaleError::Overflow)?;
        env.storage().instance().set(&OutboxKey::OutboxPrepaid, &balance);
        Ok(balance)
    }

    /// Fails fast unless the prepaid balance covers `calls` calls and their
    /// callbacks. Writes nothing.
    pub fn ensure_budget(env: &Env, calls: u32) -> Result<(), SaleError> {
        let policy = Self::policy(env);
        let prepaid = Self::prepaid(env);
        let needed = policy.per_call().saturating_mul(calls as u64);
        if prepaid < policy.min_prepaid as u64 || prepaid < needed {
            return Err(SaleError::InsufficientCallBudget);
        }
        Ok(())
    }

    fn charge(env: &Env) -> Result<CallBudget, SaleError> {
        Self::ensure_budget(env, 1)?;
        let policy = Self::policy(env);
        let remaining = Self::prepaid(env) - policy.per_call();
        env.storage().instance().set(&OutboxKey::OutboxPrepaid, &remaining);
        Ok(CallBudget {
            exec_units: policy.exec_units,
            callback_units: policy.callback_units,
        })
    }

    pub fn enqueue(env: &Env, request: CallRequest) -> Result<u64, SaleError> {
        let budget = Self::charge(env)?;

        let id: u64 = env
            .storage()
            .instance()
            .get(&OutboxKey::OutboxNextId)
            .unwrap_or(0);
        let next = id.checked_add(1).ok_or(SaleError::Overflow)?;
        env.storage().instance().set(&OutboxKey::OutboxNextId, &next);

        let call = OutboundCall {
            id,
            request,
            budget,
            status: CallStatus::Pending,
            attempts: 0,
            created_at: env.ledger().timestamp(),
            settled_at: None,
            error: None,
        };
        Self::store(env, &call);
        Self::push_queue(env, id);
        Self::emit(env, symbol_short!("queued"), &call);
        Ok(id)
    }

    pub fn get(env: &Env, call_id: u64) -> Option<OutboundCall> {
        env.storage().persistent().get(&OutboxKey::OutboxCall(call_id))
    }

    pub fn pending(env: &Env) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&OutboxKey::OutboxQueue)
            .unwrap_or(Vec::new(env))
    }

    /// Runs one pending call and its callback. Returns whether the call
    /// succeeded; a failed peer call is recorded, not propagated.
    pub fn dispatch<H: CallHandler>(env: &Env, call_id: u64) -> Result<bool, SaleError> {
        let mut call = Self::get(env, call_id).ok_or(SaleError::NotFound)?;
        if call.status != CallStatus::Pending {
            return Err(SaleError::InvalidState);
        }
        Self::remove_from_queue(env, call_id);
        call.attempts = call.attempts.saturating_add(1);

        let outcome = match H::execute(env, &call.request) {
            Some(reply) => H::on_reply(env, &call, &reply),
            None => Err(SaleError::PeerCallFailed),
        };

        call.settled_at = Some(env.ledger().timestamp());
        match outcome {
            Ok(()) => {
                call.status = CallStatus::Succeeded;
                call.error = None;
                Self::store(env, &call);
                Self::emit(env, symbol_short!("settled"), &call);
                Ok(true)
            }
            Err(error) => {
                call.status = CallStatus::Failed;
                call.error = Some(error as u32);
                Self::store(env, &call);
                Self::emit(env, symbol_short!("failed"), &call);
                Ok(false)
            }
        }
    }

    /// Dispatches up to `limit` calls in queue order. Returns how many ran.
    pub fn dispatch_pending<H: CallHandler>(env: &Env, limit: u32) -> Result<u32, SaleError> {
        let queue = Self::pending(env);
        let mut dispatched = 0u32;
        for call_id in queue.iter() {
            if dispatched >= limit {
                break;
            }
            Self::dispatch::<H>(env, call_id)?;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    /// Puts a failed call back in the queue, charging a fresh budget.
    pub fn redrive(env: &Env, call_id: u64) -> Result<(), SaleError> {
        let mut call = Self::get(env, call_id).ok_or(SaleError::NotFound)?;
        if call.status != CallStatus::Failed {
            return Err(SaleError::InvalidState);
        }
        call.budget = Self::charge(env)?;
        call.status = CallStatus::Pending;
        call.settled_at = None;
        Self::store(env, &call);
        Self::push_queue(env, call_id);
        Self::emit(env, symbol_short!("redriven"), &call);
        Ok(())
    }

    /// Closes a failed call for good and hands it back for compensation.
    pub fn abandon(env: &Env, call_id: u64) -> Result<OutboundCall, SaleError> {
        let mut call = Self::get(env, call_id).ok_or(SaleError::NotFound)?;
        if call.status != CallStatus::Failed {
            return Err(SaleError::InvalidState);
        }
        call.status = CallStatus::Abandoned;
        Self::store(env, &call);
        Self::emit(env, symbol_short!("abandoned"), &call);
        Ok(call)
    }

    fn store(env: &Env, call: &OutboundCall) {
        env.storage()
            .persistent()
            .set(&OutboxKey::OutboxCall(call.id), call);
    }

    fn push_queue(env: &Env, call_id: u64) {
        let mut queue = Self::pending(env);
        queue.push_back(call_id);
        env.storage().persistent().set(&OutboxKey::OutboxQueue, &queue);
    }

    fn remove_from_queue(env: &Env, call_id: u64) {
        let queue = Self::pending(env);
        let mut kept = Vec::new(env);
        for id in queue.iter() {
            if id != call_id {
                kept.push_back(id);
            }
        }
        env.storage().persistent().set(&OutboxKey::OutboxQueue, &kept);
    }

    fn emit(env: &Env, action: soroban_sdk::Symbol, call: &OutboundCall) {
        env.events().publish(
            ("XCALL", action),
            CallEvent {
                call_id: call.id,
                status: call.status,
                attempts: call.attempts,
                error: call.error,
                timestamp: env.ledger().timestamp(),
            },
        );
    }
}
