/// Fixtures shared by the integration and property tests.
pub mod test_fixtures;

pub use test_fixtures::*;

/// Common test constants
pub mod constants {
    /// Ledger time at which every fixture starts.
    pub const GENESIS: u64 = 50_000;
    /// Start date of fixture rounds; purchases close after it.
    pub const ROUND_START: u64 = 60_000;
    /// Test-scale vesting month.
    pub const MONTH: u64 = 300;
    pub const TOKEN_SUPPLY: i128 = 10_000_000;
    pub const CALL_UNITS: u64 = 1_000_000;
}
