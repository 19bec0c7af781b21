use crate::events;
use crate::storage::*;
use crate::types::*;
use crate::xcall::CrowdsaleCalls;
use sale_shared::math::{to_token_amount, vesting_portion};
use sale_shared::xcall::{BudgetPolicy, OutboundCall, Outbox};
use sale_shared::{
    Access, CallRequest, Gate, RoundConfig, RoundState, SaleError, ScheduleParams, ScheduleTopUp,
};
use soroban_sdk::{contract, contractimpl, contractmeta, token, Address, Env, Vec};

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Multi-round token sale with vesting-backed allocations"
);

#[contract]
pub struct CrowdsaleContract;

fn gate(env: &Env) -> Result<Gate, SaleError> {
    let owner = get_owner(env)?;
    let config = get_config(env)?;
    Ok(Gate::new(owner, Some(config.vesting)))
}

/// Admission checks shared by purchases and team allocations. Writes nothing.
fn admit(env: &Env, round: &SaleRound, tokens: u128) -> Result<(), SaleError> {
    if tokens == 0 {
        return Err(SaleError::ZeroAmount);
    }
    let allocated = round
        .allocated
        .checked_add(tokens)
        .ok_or(SaleError::Overflow)?;
    if allocated > round.supply {
        return Err(SaleError::InsufficientSupply);
    }
    Outbox::ensure_budget(env, 1)
}

/// Reserves `tokens` for `beneficiary` and queues the schedule call. Returns
/// the call id and whether an existing schedule is being topped up.
fn reserve(
    env: &Env,
    round_id: u32,
    mut round: SaleRound,
    beneficiary: &Address,
    tokens: u128,
    payment: u128,
) -> Result<(u64, bool), SaleError> {
    let top_up = is_member(env, beneficiary, round_id);

    let request = if top_up {
        CallRequest::UpdateSchedule(ScheduleTopUp {
            beneficiary: beneficiary.clone(),
            round_id,
            added_allocation: tokens,
            added_vesting: vesting_portion(tokens, round.unlock_rate),
            added_invested: payment,
        })
    } else {
        CallRequest::CreateSchedule(ScheduleParams {
            beneficiary: beneficiary.clone(),
            round_id,
            allocation: tokens,
            cliff_months: round.cliff_months,
            vesting_months: round.vesting_months,
            unlock_rate: round.unlock_rate,
            revocable: true,
            invested: payment,
            start_date: round.start_date,
            price: round.price,
        })
    };

    round.allocated = round
        .allocated
        .checked_add(tokens)
        .ok_or(SaleError::Overflow)?;
    round.raised = round
        .raised
        .checked_add(payment)
        .ok_or(SaleError::Overflow)?;
    set_round(env, round_id, &round)?;
    if !top_up {
        add_member(env, beneficiary, round_id);
    }

    let call_id = Outbox::enqueue(env, request)?;
    Ok((call_id, top_up))
}

#[contractimpl]
impl CrowdsaleContract {
    // ==================== Setup ====================

    pub fn initialize(
        env: Env,
        owner: Address,
        vesting: Address,
        token: Address,
        payment_token: Address,
    ) -> Result<(), SaleError> {
        if is_initialized(&env) {
            return Err(SaleError::AlreadyInitialized);
        }
        owner.require_auth();

        set_owner(&env, &owner);
        set_config(
            &env,
            &SaleConfig {
                vesting,
                token,
                payment_token,
            },
        );
        set_round_count(&env, 0);
        set_total_allocation(&env, 0);
        set_total_leftover(&env, 0);
        Outbox::init(&env);
        Ok(())
    }

    pub fn set_peers(
        env: Env,
        caller: Address,
        vesting: Address,
        token: Address,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        let mut config = get_config(&env)?;
        config.vesting = vesting;
        config.token = token;
        set_config(&env, &config);
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

    /// Adds call budget units. Returns the new prepaid balance.
    pub fn fund_calls(env: Env, caller: Address, units: u64) -> Result<u64, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Outbox::fund(&env, units)
    }

    // ==================== Round Lifecycle ====================

    /// Validates `config` and queues the token supply query. The round is
    /// registered only when that query confirms the supply, so this returns
    /// the id of the pending call, not a round id.
    pub fn create_round(env: Env, caller: Address, config: RoundConfig) -> Result<u64, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        if config.start_date < get_ledger_timestamp(&env) {
            return Err(SaleError::InvalidConfig);
        }
        if config.is_free != (config.price == 0) {
            return Err(SaleError::InvalidConfig);
        }
        if config.unlock_rate > sale_shared::math::PERCENT {
            return Err(SaleError::InvalidConfig);
        }
        if config.supply == 0 {
            return Err(SaleError::ZeroAmount);
        }

        let name = config.name.clone();
        let supply = config.supply;
        let call_id = Outbox::enqueue(&env, CallRequest::QuerySupply(config))?;
        events::emit_round_requested(&env, call_id, name, supply);
        Ok(call_id)
    }

    /// Moves a round to `state` and mirrors it into the vesting contract.
    /// Closing a round sweeps its unallocated supply into the leftover pool.
    /// Each change carries the round's next sequence number so the mirror
    /// can drop propagations delivered out of order.
    pub fn change_round_state(
        env: Env,
        caller: Address,
        round_id: u32,
        state: RoundState,
    ) -> Result<u64, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let mut round = load_round(&env, round_id)?;
        if round.state == RoundState::Done {
            return Err(SaleError::InvalidState);
        }
        Outbox::ensure_budget(&env, 1)?;

        let mut swept = 0u128;
        if state == RoundState::Done {
            swept = round.unallocated();
            let leftover = get_total_leftover(&env)
                .checked_add(swept)
                .ok_or(SaleError::Overflow)?;
            round.supply = round.allocated;
            set_total_leftover(&env, leftover);
        }
        round.state = state;
        round.state_seq = round
            .state_seq
            .checked_add(1)
            .ok_or(SaleError::Overflow)?;
        set_round(&env, round_id, &round)?;

        let call_id = Outbox::enqueue(
            &env,
            CallRequest::PropagateState(round_id, state, round.state_seq),
        )?;
        events::emit_state_changed(&env, round_id, state, swept);
        Ok(call_id)
    }

    pub fn increase_supply_from_leftover(
        env: Env,
        caller: Address,
        round_id: u32,
        amount: u128,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let mut round = load_round(&env, round_id)?;
        if round.state == RoundState::Done {
            return Err(SaleError::InvalidState);
        }
        if amount == 0 {
            return Err(SaleError::ZeroAmount);
        }
        let leftover = get_total_leftover(&env);
        if amount > leftover {
            return Err(SaleError::InsufficientLeftover);
        }

        round.supply = round
            .supply
            .checked_add(amount)
            .ok_or(SaleError::Overflow)?;
        set_round(&env, round_id, &round)?;
        set_total_leftover(&env, leftover - amount);

        events::emit_supply_increased(&env, round_id, amount, round.supply, leftover - amount);
        Ok(())
    }

    // ==================== Allocation ====================

    /// Buys `payment / price` tokens in a paid round. The payment is moved
    /// into this contract's escrow. Returns the number of tokens allocated.
    pub fn buy(env: Env, buyer: Address, round_id: u32, payment: u128) -> Result<u128, SaleError> {
        gate(&env)?.check(&buyer, Access::Subject(&buyer))?;

        let round = load_round(&env, round_id)?;
        if round.is_free || round.state != RoundState::Active {
            return Err(SaleError::InvalidState);
        }
        if get_ledger_timestamp(&env) > round.start_date {
            return Err(SaleError::InvalidState);
        }
        if round.whitelist_only && !is_whitelisted(&env, &buyer, round_id) {
            return Err(SaleError::Unauthorized);
        }

        let tokens = payment
            .checked_div(round.price)
            .ok_or(SaleError::InvalidState)?;
        admit(&env, &round, tokens)?;

        let config = get_config(&env)?;
        token::Client::new(&env, &config.payment_token).transfer(
            &buyer,
            &env.current_contract_address(),
            &to_token_amount(payment)?,
        );

        let (call_id, top_up) = reserve(&env, round_id, round, &buyer, tokens, payment)?;
        events::emit_purchase(&env, round_id, buyer, tokens, payment, top_up, call_id);
        Ok(tokens)
    }

    /// Allocates `tokens` of a free round to a team member. Returns the id of
    /// the queued schedule call.
    pub fn add_team_allocation(
        env: Env,
        caller: Address,
        member: Address,
        round_id: u32,
        tokens: u128,
    ) -> Result<u64, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let round = load_round(&env, round_id)?;
        if !round.is_free || round.state == RoundState::Done {
            return Err(SaleError::InvalidState);
        }
        admit(&env, &round, tokens)?;

        let (call_id, top_up) = reserve(&env, round_id, round, &member, tokens, 0)?;
        events::emit_team_allocation(&env, round_id, member, tokens, top_up, call_id);
        Ok(call_id)
    }

    pub fn add_to_whitelist(
        env: Env,
        caller: Address,
        round_id: u32,
        beneficiaries: Vec<Address>,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let round = load_round(&env, round_id)?;
        if !round.whitelist_only {
            return Err(SaleError::InvalidState);
        }

        let mut whitelist = get_whitelist(&env, round_id).unwrap_or(Vec::new(&env));
        for beneficiary in beneficiaries.iter() {
            if whitelist.contains(&beneficiary) {
                return Err(SaleError::DuplicateWhitelistEntry);
            }
            whitelist.push_back(beneficiary);
        }
        set_whitelist(&env, round_id, &whitelist);

        events::emit_whitelisted(&env, round_id, beneficiaries.len());
        Ok(())
    }

    /// Records tokens released by the vesting contract.
    pub fn report_tokens_sold(
        env: Env,
        caller: Address,
        round_id: u32,
        amount: u128,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Peer)?;

        let mut round = load_round(&env, round_id)?;
        let sold = round.sold.checked_add(amount).ok_or(SaleError::Overflow)?;
        if sold > round.allocated {
            return Err(SaleError::InvalidState);
        }
        round.sold = sold;
        set_round(&env, round_id, &round)?;

        events::emit_sold(&env, round_id, amount, sold);
        Ok(())
    }

    /// Moves escrowed payment out of the contract.
    pub fn withdraw_proceeds(
        env: Env,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        if amount == 0 {
            return Err(SaleError::ZeroAmount);
        }

        let config = get_config(&env)?;
        let payment = token::Client::new(&env, &config.payment_token);
        let this = env.current_contract_address();
        let amount_i128 = to_token_amount(amount)?;
        if payment.balance(&this) < amount_i128 {
            return Err(SaleError::InsufficientSupply);
        }
        payment.transfer(&this, &to, &amount_i128);

        events::emit_proceeds_withdrawn(&env, to, amount);
        Ok(())
    }

    // ==================== Cross-Contract Calls ====================

    /// Performs one queued peer call and its callback. Anyone may relay.
    pub fn dispatch(env: Env, call_id: u64) -> Result<bool, SaleError> {
        Outbox::dispatch::<CrowdsaleCalls>(&env, call_id)
    }

    pub fn dispatch_pending(env: Env, limit: u32) -> Result<u32, SaleError> {
        Outbox::dispatch_pending::<CrowdsaleCalls>(&env, limit)
    }

    pub fn redrive(env: Env, caller: Address, call_id: u64) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Outbox::redrive(&env, call_id)
    }

    /// Gives up on a failed schedule call and undoes its reservation: the
    /// tokens go back to the round (or to the leftover pool if the round is
    /// closed) and the escrowed payment is refunded.
    pub fn abandon_call(env: Env, caller: Address, call_id: u64) -> Result<(), SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;

        let call = Outbox::get(&env, call_id).ok_or(SaleError::NotFound)?;
        let (beneficiary, round_id, tokens, payment, created) = match &call.request {
            CallRequest::CreateSchedule(p) => {
                (p.beneficiary.clone(), p.round_id, p.allocation, p.invested, true)
            }
            CallRequest::UpdateSchedule(t) => (
                t.beneficiary.clone(),
                t.round_id,
                t.added_allocation,
                t.added_invested,
                false,
            ),
            CallRequest::QuerySupply(_) => {
                Outbox::abandon(&env, call_id)?;
                return Ok(());
            }
            _ => return Err(SaleError::InvalidState),
        };
        Outbox::abandon(&env, call_id)?;

        let mut round = load_round(&env, round_id)?;
        round.allocated = round
            .allocated
            .checked_sub(tokens)
            .ok_or(SaleError::InvalidState)?;
        round.raised = round
            .raised
            .checked_sub(payment)
            .ok_or(SaleError::InvalidState)?;
        if round.state == RoundState::Done {
            round.supply = round
                .supply
                .checked_sub(tokens)
                .ok_or(SaleError::InvalidState)?;
            let leftover = get_total_leftover(&env)
                .checked_add(tokens)
                .ok_or(SaleError::Overflow)?;
            set_total_leftover(&env, leftover);
        }
        set_round(&env, round_id, &round)?;
        if created {
            remove_member(&env, &beneficiary, round_id);
        }

        if payment > 0 {
            let config = get_config(&env)?;
            token::Client::new(&env, &config.payment_token).transfer(
                &env.current_contract_address(),
                &beneficiary,
                &to_token_amount(payment)?,
            );
        }

        events::emit_compensated(&env, call_id, round_id, beneficiary, tokens, payment);
        Ok(())
    }

    // ==================== Views ====================

    pub fn get_round(env: Env, round_id: u32) -> Result<SaleRound, SaleError> {
        load_round(&env, round_id)
    }

    pub fn get_round_count(env: Env) -> u32 {
        get_round_count(&env)
    }

    pub fn get_round_members(env: Env, round_id: u32) -> Result<Vec<Address>, SaleError> {
        get_members(&env, round_id).ok_or(SaleError::NotFound)
    }

    pub fn get_whitelist(env: Env, caller: Address, round_id: u32) -> Result<Vec<Address>, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        let round = load_round(&env, round_id)?;
        if !round.whitelist_only {
            return Err(SaleError::InvalidState);
        }
        Ok(get_whitelist(&env, round_id).unwrap_or(Vec::new(&env)))
    }

    pub fn is_whitelisted(env: Env, round_id: u32, beneficiary: Address) -> bool {
        is_whitelisted(&env, &beneficiary, round_id)
    }

    pub fn get_total_allocation(env: Env) -> u128 {
        get_total_allocation(&env)
    }

    pub fn get_leftover(env: Env, caller: Address) -> Result<u128, SaleError> {
        gate(&env)?.check(&caller, Access::Owner)?;
        Ok(get_total_leftover(&env))
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

    pub fn get_config(env: Env) -> Result<SaleConfig, SaleError> {
        get_config(&env)
    }
}
