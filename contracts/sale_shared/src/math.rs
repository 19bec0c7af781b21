//! Integer release arithmetic. Every division that decides a token amount
//! goes through [`mul_div_floor`], so the truncation rule is the same at every
//! call site: floor, computed exactly.

use crate::errors::SaleError;

pub const PERCENT: u32 = 100;
pub const BPS: u32 = 10_000;

/// `floor(amount * num / den)` without overflowing the intermediate product.
///
/// Splits `amount` into `q * den + r`, so the result is `q * num + r * num / den`.
/// Returns `None` when `den == 0` or the result does not fit.
pub fn mul_div_floor(amount: u128, num: u128, den: u128) -> Option<u128> {
    if den == 0 {
        return None;
    }
    let q = amount / den;
    let r = amount % den;
    let whole = q.checked_mul(num)?;
    let part = r.checked_mul(num)? / den;
    whole.checked_add(part)
}

/// Portion of `total` released at sale start.
pub fn unlock_portion(total: u128, unlock_rate: u32) -> u128 {
    let rate = unlock_rate.min(PERCENT) as u128;
    // rate <= 100 keeps the result <= total, so this cannot overflow.
    mul_div_floor(total, rate, PERCENT as u128).unwrap_or(0)
}

/// Vesting-only share of `total`: everything that is not unlocked at start.
pub fn vesting_portion(total: u128, unlock_rate: u32) -> u128 {
    total - unlock_portion(total, unlock_rate)
}

/// Cumulative amount of a `vesting` allocation vested after `periods` of
/// `num_periods`. With no vesting periods the whole allocation is vested.
pub fn vested_through(vesting: u128, periods: u32, num_periods: u32) -> u128 {
    if num_periods == 0 || periods >= num_periods {
        return vesting;
    }
    // periods < num_periods keeps the result < vesting.
    mul_div_floor(vesting, periods as u128, num_periods as u128).unwrap_or(vesting)
}

/// Token contracts take SEP-41 `i128` amounts.
pub fn to_token_amount(amount: u128) -> Result<i128, SaleError> {
    i128::try_from(amount).map_err(|_| SaleError::Overflow)
}
