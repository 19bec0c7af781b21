use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SaleError {
    // --- Lifecycle (1–2) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // --- Authorization (3) ---
    Unauthorized = 3,

    // --- Lookup (4) ---
    NotFound = 4,

    // --- State and configuration (5–6) ---
    InvalidState = 5,
    InvalidConfig = 6,

    // --- Amounts (7–10) ---
    InsufficientSupply = 7,
    InsufficientLeftover = 8,
    ZeroAmount = 9,
    Overflow = 10,

    // --- Whitelist (11) ---
    DuplicateWhitelistEntry = 11,

    // --- Cross-contract calls (12–13) ---
    InsufficientCallBudget = 12,
    PeerCallFailed = 13,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn suggestion(error: SaleError) -> Symbol {
    match error {
        SaleError::Unauthorized => symbol_short!("CHK_AUTH"),
        SaleError::NotFound => symbol_short!("CHK_ID"),
        SaleError::InsufficientCallBudget => symbol_short!("FUND_CALL"),
        SaleError::PeerCallFailed => symbol_short!("REDRIVE"),
        SaleError::InsufficientSupply | SaleError::InsufficientLeftover => {
            symbol_short!("REDUCE")
        }
        SaleError::ZeroAmount => symbol_short!("INCREASE"),
        SaleError::NotInitialized => symbol_short!("INIT"),
        _ => symbol_short!("CONTACT"),
    }
}
