#![no_std]
#![allow(clippy::too_many_arguments)]

//! Types and plumbing shared by the crowdsale and vesting contracts: the error
//! taxonomy, the authorization gate, release arithmetic, the peer contract
//! interfaces and the outbox used for every cross-contract call.

pub mod access;
pub mod errors;
pub mod math;
pub mod peers;
pub mod types;
pub mod xcall;

pub use access::{Access, Gate};
pub use errors::SaleError;
pub use types::{
    CallReply, CallRequest, RoundConfig, RoundState, ScheduleParams, ScheduleTopUp,
};
