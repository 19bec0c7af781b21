use sale_shared::peers::{TokenLedgerClient, VestingLedgerClient};
use sale_shared::xcall::{CallHandler, OutboundCall};
use sale_shared::{CallReply, CallRequest, RoundConfig, SaleError};
use soroban_sdk::{Env, Vec};

use crate::events;
use crate::storage::*;
use crate::types::SaleRound;

/// Peer calls issued by the crowdsale: supply queries to the token and
/// schedule/state calls to the vesting contract.
pub struct CrowdsaleCalls;

impl CallHandler for CrowdsaleCalls {
    fn execute(env: &Env, request: &CallRequest) -> Option<CallReply> {
        let config = get_config(env).ok()?;
        let this = env.current_contract_address();

        match request {
            CallRequest::QuerySupply(_) => {
                match TokenLedgerClient::new(env, &config.token).try_total_supply() {
                    Ok(Ok(supply)) => Some(CallReply::Amount(supply)),
                    _ => None,
                }
            }
            CallRequest::CreateSchedule(params) => {
                let vesting = VestingLedgerClient::new(env, &config.vesting);
                match vesting.try_create_schedule(&this, params) {
                    Ok(Ok(())) => Some(CallReply::Unit),
                    _ => None,
                }
            }
            CallRequest::UpdateSchedule(top_up) => {
                let vesting = VestingLedgerClient::new(env, &config.vesting);
                match vesting.try_update_schedule(&this, top_up) {
                    Ok(Ok(())) => Some(CallReply::Unit),
                    _ => None,
                }
            }
            CallRequest::PropagateState(round_id, state, seq) => {
                let vesting = VestingLedgerClient::new(env, &config.vesting);
                match vesting.try_change_round_state(&this, round_id, state, seq) {
                    Ok(Ok(())) => Some(CallReply::Unit),
                    _ => None,
                }
            }
            // Issued by the vesting contract only.
            CallRequest::ReportSold(..) | CallRequest::Transfer(..) => None,
        }
    }

    fn on_reply(env: &Env, call: &OutboundCall, reply: &CallReply) -> Result<(), SaleError> {
        match (&call.request, reply) {
            (CallRequest::QuerySupply(config), CallReply::Amount(total_supply)) => {
                register_round(env, config, *total_supply)
            }
            (CallRequest::QuerySupply(_), _) => Err(SaleError::InvalidState),
            (_, CallReply::Unit) => Ok(()),
            _ => Err(SaleError::InvalidState),
        }
    }
}

/// Registers a round once the token has confirmed its supply can back it.
fn register_round(env: &Env, config: &RoundConfig, total_supply: i128) -> Result<(), SaleError> {
    let total_supply = u128::try_from(total_supply).map_err(|_| SaleError::InvalidState)?;
    let total_allocation = get_total_allocation(env)
        .checked_add(config.supply)
        .ok_or(SaleError::Overflow)?;
    if total_allocation > total_supply {
        return Err(SaleError::InsufficientSupply);
    }

    let round_id = get_round_count(env);
    let next = round_id.checked_add(1).ok_or(SaleError::Overflow)?;

    set_round(env, round_id, &SaleRound::from_config(config))?;
    set_members(env, round_id, &Vec::new(env));
    if config.whitelist_only {
        set_whitelist(env, round_id, &Vec::new(env));
    }
    set_round_count(env, next);
    set_total_allocation(env, total_allocation);

    events::emit_round_created(
        env,
        round_id,
        config.name.clone(),
        config.supply,
        total_allocation,
    );
    Ok(())
}
