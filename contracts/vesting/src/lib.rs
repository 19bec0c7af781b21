#![no_std]

mod contract;
mod events;
pub mod release;
mod storage;
mod types;
mod xcall;


pub use contract::{VestingContract, VestingContractClient};
pub use release::{compute_releasable, Release, ReleaseStage};
pub use types::{VestingConfig, VestingSchedule, DEFAULT_MONTH_SECS};
