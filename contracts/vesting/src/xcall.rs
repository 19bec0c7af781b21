use sale_shared::math::to_token_amount;
use sale_shared::peers::{AllocationEngineClient, TokenLedgerClient};
use sale_shared::xcall::{CallHandler, OutboundCall};
use sale_shared::{CallReply, CallRequest, SaleError};
use soroban_sdk::Env;

use crate::storage::get_config;

/// Peer calls issued on claim and revoke: the token payout and the sold report.
pub struct VestingCalls;

impl CallHandler for VestingCalls {
    fn execute(env: &Env, request: &CallRequest) -> Option<CallReply> {
        let config = get_config(env).ok()?;
        let this = env.current_contract_address();

        match request {
            CallRequest::Transfer(to, amount) => {
                let amount = to_token_amount(*amount).ok()?;
                let token = TokenLedgerClient::new(env, &config.token);
                match token.try_transfer(&this, to, &amount) {
                    Ok(Ok(())) => Some(CallReply::Unit),
                    _ => None,
                }
            }
            CallRequest::ReportSold(round_id, amount) => {
                let crowdsale = AllocationEngineClient::new(env, &config.crowdsale);
                match crowdsale.try_report_tokens_sold(&this, round_id, amount) {
                    Ok(Ok(())) => Some(CallReply::Unit),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn on_reply(_env: &Env, _call: &OutboundCall, reply: &CallReply) -> Result<(), SaleError> {
        match reply {
            CallReply::Unit => Ok(()),
            CallReply::Amount(_) => Err(SaleError::InvalidState),
        }
    }
}
