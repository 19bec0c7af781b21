use crate::events;
use crate::release::{self, compute_releasable, ReleaseStage};
use crate::storage::*;
use crate::types::*;
use crate::xcall::VestingCalls;
use sale_shared::math::{vesting_portion, PERCENT};
use sale_shared::xcall::{BudgetPolicy, OutboundCall, Outbox};
use sale_shared::{
    Access, CallRequest, Gate, RoundState, SaleError, ScheduleParams, ScheduleTopUp,
};
use soroban_sdk::{contract, contractimpl, contractmeta, Address, Env, Vec};

contractmeta!(
    key = "Description",
    val = "Cliff and monthly vesting ledger for crowdsale allocations"
);

#[contract]
pub struct VestingContract;

fn gate(env: &Env) -> Result<Gate, SaleError> {
    let owner = get_owner(env)?;
    let config = get_config(env)?;
    Ok(Gate::new(owner, Some(config.crowdsale)))
}

/// Round state as mirrored from the crowdsale, checked against claims.
fn claimable_round(env: &Env, round_id: u32) -> Result<(), SaleError> {
    let state = get_round_state(env, round_id).ok_or(SaleError::NotFound)?;
    if !state.allows_claims() {
        return Err(SaleError::InvalidState);
    }
    Ok(())
}

/// Queues the payout and the sold report for `amount`. Budget must have been
/// checked for two calls. Returns the id of the transfer call.
fn queue_release(
    env: &Env,
    beneficiary: &Address,
    round_id: u32,
    amount: u128,
) -> Result<u64, SaleError> {
    let transfer = Outbox::enqueue(env, CallRequest::Transfer(beneficiary.clone(), amount))?;
    Outbox::enqueue(env, CallRequest::ReportSold(round_id, amount))?;
    Ok(transfer)
}

#[contractimpl]
impl VestingContract {
    pub fn initialize(
        env: Env,
        owner: Address,
        crowdsale: Address,
        token: Address,
        month_secs: u64,
    ) -> Result<(), SaleError> {
        if is_initialized(&env) {
            return Err(SaleError::AlreadyInitialized);
        }
        if month_secs == 0 {
            return Err(SaleError::InvalidConfig);
        }
        owner.require_auth();

        set_owner(&env, &owner);
        set_config(
            &env,
            &VestingConfig {
                crowdsale,
                token,
                month_secs,
            },
        );
        Outbox::init(&env);
        Ok(())
    }

    pub fn set_peers(
        env: Env,
        caller: Address,
        crowdsale: Address,
        token: Address,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        let mut config = get_config(&env)?;
        config.crowdsale = crowdsale;
        config.token = token;
        set_config(&env, &config);
        Ok(())
    }

    pub fn set_month_length(env: Env, caller: Address, month_secs: u64) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        if month_secs == 0 {
            return Err(SaleError::InvalidConfig);
        }
        let mut config = get_config(&env)?;
        config.month_secs = month_secs;
        set_config(&env, &config);
        events::emit_month_length(&env, month_secs);
        Ok(())
    }

    pub fn set_budget_policy(
        env: Env,
        caller: Address,
        policy: BudgetPolicy,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Outbox::set_policy(&env, &policy)
    }

    pub fn fund_calls(env: Env, caller: Address, units: u64) -> Result<u64, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Outbox::fund(&env, units)
    }

    // ==================== Crowdsale Calls ====================

    pub fn create_schedule(
        env: Env,
        caller: Address,
        params: ScheduleParams,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Peer)?;

        if get_schedule(&env, &params.beneficiary, params.round_id).is_some() {
            return Err(SaleError::InvalidState);
        }
        if params.unlock_rate > PERCENT {
            return Err(SaleError::InvalidConfig);
        }
        if params.allocation == 0 {
            return Err(SaleError::ZeroAmount);
        }

        let vesting = vesting_portion(params.allocation, params.unlock_rate);
        let schedule = VestingSchedule::from_params(&params, vesting);
        set_schedule(&env, &schedule)?;

        events::emit_schedule_created(
            &env,
            params.beneficiary,
            params.round_id,
            params.allocation,
            vesting,
        );
        Ok(())
    }

    /// Merges a repeat purchase into an existing schedule. The split between
    /// unlock and vesting is recomputed from the new total.
    pub fn update_schedule(
        env: Env,
        caller: Address,
        top_up: ScheduleTopUp,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Peer)?;

        let mut schedule = load_schedule(&env, &top_up.beneficiary, top_up.round_id)?;
        if schedule.revoked || top_up.added_vesting > top_up.added_allocation {
            return Err(SaleError::InvalidState);
        }
        if top_up.added_allocation == 0 {
            return Err(SaleError::ZeroAmount);
        }

        schedule.total_allocation = schedule
            .total_allocation
            .checked_add(top_up.added_allocation)
            .ok_or(SaleError::Overflow)?;
        schedule.invested = schedule
            .invested
            .checked_add(top_up.added_invested)
            .ok_or(SaleError::Overflow)?;
        schedule.vesting_allocation = vesting_portion(schedule.total_allocation, schedule.unlock_rate);
        schedule.unlock_released = schedule.released_unlock == schedule.unlock_allocation();
        schedule.fully_claimed = false;
        set_schedule(&env, &schedule)?;

        events::emit_schedule_updated(
            &env,
            top_up.beneficiary,
            top_up.round_id,
            schedule.total_allocation,
            schedule.vesting_allocation,
        );
        Ok(())
    }

    /// Mirrors a round state. Changes are applied in `seq` order; one that is
    /// not newer than the held state is dropped and still reported as done.
    pub fn change_round_state(
        env: Env,
        caller: Address,
        round_id: u32,
        state: RoundState,
        seq: u32,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Peer)?;
        if seq <= get_round_state_seq(&env, round_id) {
            events::emit_stale_state(&env, round_id, state, seq);
            return Ok(());
        }
        set_round_state(&env, round_id, state, seq);
        events::emit_round_state(&env, round_id, state, seq);
        Ok(())
    }

    // ==================== Release ====================

    /// Releases everything currently due to the caller and queues the payout.
    /// Returns the released amount.
    pub fn claim(env: Env, beneficiary: Address, round_id: u32) -> Result<u128, SaleError> {
        gate(&env)?.check(&beneficiary, Access::Subject(&beneficiary))?;

        claimable_round(&env, round_id)?;
        let mut schedule = load_schedule(&env, &beneficiary, round_id)?;
        if schedule.revoked {
            return Err(SaleError::InvalidState);
        }

        let config = get_config(&env)?;
        let release = compute_releasable(&schedule, get_ledger_timestamp(&env), config.month_secs);
        if release.amount == 0 {
            return Err(SaleError::ZeroAmount);
        }
        Outbox::ensure_budget(&env, 2)?;

        release::apply(&mut schedule, &release);
        set_schedule(&env, &schedule)?;
        let transfer = queue_release(&env, &beneficiary, round_id, release.amount)?;

        events::emit_claimed(
            &env,
            beneficiary,
            round_id,
            release.amount,
            schedule.released_periods,
            Some(transfer),
        );
        Ok(release.amount)
    }

    /// Pays out whatever is due, then stops the schedule for good.
    pub fn revoke(
        env: Env,
        caller: Address,
        beneficiary: Address,
        round_id: u32,
    ) -> Result<u128, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let mut schedule = load_schedule(&env, &beneficiary, round_id)?;
        if !schedule.revocable || schedule.revoked {
            return Err(SaleError::InvalidState);
        }
        claimable_round(&env, round_id)?;

        let config = get_config(&env)?;
        let release = compute_releasable(&schedule, get_ledger_timestamp(&env), config.month_secs);
        if release.amount > 0 {
            Outbox::ensure_budget(&env, 2)?;
        }

        release::apply(&mut schedule, &release);
        schedule.revoked = true;
        set_schedule(&env, &schedule)?;

        let transfer = if release.amount > 0 {
            Some(queue_release(&env, &beneficiary, round_id, release.amount)?)
        } else {
            None
        };

        events::emit_revoked(
            &env,
            beneficiary,
            round_id,
            release.amount,
            schedule.released_periods,
            transfer,
        );
        Ok(release.amount)
    }

    // ==================== Cross-Contract Calls ====================

    pub fn dispatch(env: Env, call_id: u64) -> Result<bool, SaleError> {
        Outbox::dispatch::<VestingCalls>(&env, call_id)
    }

    pub fn dispatch_pending(env: Env, limit: u32) -> Result<u32, SaleError> {
        Outbox::dispatch_pending::<VestingCalls>(&env, limit)
    }

    pub fn redrive(env: Env, caller: Address, call_id: u64) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Outbox::redrive(&env, call_id)
    }

    // ==================== Views ====================

    pub fn get_schedule(
        env: Env,
        beneficiary: Address,
        round_id: u32,
    ) -> Result<VestingSchedule, SaleError> {
        load_schedule(&env, &beneficiary, round_id)
    }

    pub fn get_release_stages(
        env: Env,
        caller: Address,
        beneficiary: Address,
        round_id: u32,
    ) -> Result<Vec<ReleaseStage>, SaleError> {
        gate(&env)?.check(&caller, Access::OwnerOrSubject(&beneficiary))?;
        let schedule = load_schedule(&env, &beneficiary, round_id)?;
        let config = get_config(&env)?;
        Ok(release::release_stages(&env, &schedule, config.month_secs))
    }

    /// Amount a claim would release right now.
    pub fn get_releasable(
        env: Env,
        caller: Address,
        beneficiary: Address,
        round_id: u32,
    ) -> Result<u128, SaleError> {
        gate(&env)?.check(&caller, Access::OwnerOrSubject(&beneficiary))?;
        let schedule = load_schedule(&env, &beneficiary, round_id)?;
        let config = get_config(&env)?;
        Ok(compute_releasable(&schedule, get_ledger_timestamp(&env), config.month_secs).amount)
    }

    pub fn get_round_state(env: Env, round_id: u32) -> Result<RoundState, SaleError> {
        get_round_state(&env, round_id).ok_or(SaleError::NotFound)
    }

    pub fn get_month_length(env: Env) -> Result<u64, SaleError> {
        Ok(get_config(&env)?.month_secs)
    }

    pub fn get_call(env: Env, call_id: u64) -> Result<OutboundCall, SaleError> {
        Outbox::get(&env, call_id).ok_or(SaleError::NotFound)
    }

    pub fn get_pending_calls(env: Env) -> Vec<u64> {
        Outbox::pending(&env)
    }

    pub fn get_prepaid_units(env: Env) -> u64 {
        Outbox::prepaid(&env)
    }

    pub fn get_budget_policy(env: Env) -> BudgetPolicy {
        Outbox::policy(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, SaleError> {
        get_owner(&env)
    }

    pub fn get_config(env: Env) -> Result<VestingConfig, SaleError> {
        get_config(&env)
    }
}
