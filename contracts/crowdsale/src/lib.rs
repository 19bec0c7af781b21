#![no_std]
#![allow(clippy::too_many_arguments)]

mod contract;
mod events;
mod storage;
mod types;
mod xcall;


pub use contract::{CrowdsaleContract, CrowdsaleContractClient};
pub use types::{SaleConfig, SaleRound};
