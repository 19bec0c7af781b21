//! Release calculator.
//!
//! Pure functions over a [`VestingSchedule`] and a timestamp. A schedule
//! releases its unlock portion once the round has started, then one slice of
//! the vesting portion per month after the cliff. Slices are read off the
//! cumulative curve `floor(vesting * k / n)`, so consecutive claims add up to
//! exactly the vesting portion whatever the claim pattern.

use sale_shared::math::{mul_div_floor, vested_through, BPS, PERCENT};
use soroban_sdk::{contracttype, Env, Vec};

use crate::types::VestingSchedule;

/// Outcome of evaluating a schedule at a point in time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Release {
    /// `unlock + vested`.
    pub amount: u128,
    pub unlock: u128,
    pub vested: u128,
    /// Vesting periods elapsed after the cliff, capped at `vesting_months`.
    pub periods_due: u32,
    /// The whole schedule horizon has passed.
    pub fully_vested: bool,
}

/// One row of the release table.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ReleaseStage {
    /// When the row becomes releasable.
    pub timestamp: u64,
    pub tokens: u128,
    /// Share of the invested payment behind `tokens`.
    pub payment_share: u128,
    /// `tokens` as a share of the total allocation, in basis points.
    pub rate_bps: u32,
    pub released: bool,
}

/// Whole months between `start` and `now`. `None` before start.
fn elapsed_months(start: u64, now: u64, month_secs: u64) -> Option<u64> {
    let elapsed = now.checked_sub(start)?;
    elapsed.checked_div(month_secs)
}

/// Amount `schedule` may release at `now`. Revoked and fully claimed
/// schedules release nothing; so does any schedule before its start date.
pub fn compute_releasable(schedule: &VestingSchedule, now: u64, month_secs: u64) -> Release {
    let mut release = Release {
        periods_due: schedule.released_periods,
        ..Release::default()
    };
    if schedule.revoked || schedule.fully_claimed {
        return release;
    }
    let months = match elapsed_months(schedule.start_date, now, month_secs) {
        Some(months) => months,
        None => return release,
    };

    let cliff = schedule.cliff_months as u64;
    let periods = schedule.vesting_months as u64;
    let horizon = cliff + periods;
    let months = months.min(horizon);
    release.fully_vested = months == horizon;

    release.unlock = schedule
        .unlock_allocation()
        .saturating_sub(schedule.released_unlock);

    if months >= cliff {
        let due = (months - cliff) as u32;
        release.periods_due = due.max(schedule.released_periods);
        let vested = vested_through(
            schedule.vesting_allocation,
            release.periods_due,
            schedule.vesting_months,
        );
        release.vested = vested.saturating_sub(schedule.released_vesting);
    }

    release.amount = release.unlock + release.vested;
    release
}

/// Books `release` into `schedule`.
pub fn apply(schedule: &mut VestingSchedule, release: &Release) {
    schedule.released_unlock += release.unlock;
    schedule.released_vesting += release.vested;
    schedule.unlock_released = schedule.released_unlock == schedule.unlock_allocation();
    schedule.released_periods = schedule.released_periods.max(release.periods_due);
    if release.fully_vested {
        schedule.fully_claimed = true;
    }
}

fn stage(schedule: &VestingSchedule, timestamp: u64, tokens: u128, released: bool) -> ReleaseStage {
    let total = schedule.total_allocation;
    let payment_share = mul_div_floor(schedule.invested, tokens, total).unwrap_or(0);
    let rate_bps = mul_div_floor(tokens, BPS as u128, total).unwrap_or(0);
    ReleaseStage {
        timestamp,
        tokens,
        payment_share,
        rate_bps: rate_bps.min(BPS as u128) as u32,
        released,
    }
}

/// Release table: the unlock stage, then one row per vesting period that has
/// not been paid out yet.
pub fn release_stages(env: &Env, schedule: &VestingSchedule, month_secs: u64) -> Vec<ReleaseStage> {
    let mut stages = Vec::new(env);
    let unlock = schedule.unlock_allocation();
    stages.push_back(ReleaseStage {
        rate_bps: schedule.unlock_rate.min(PERCENT) * (BPS / PERCENT),
        ..stage(
            schedule,
            schedule.start_date,
            unlock,
            schedule.released_unlock == unlock,
        )
    });

    let month_at = |months: u64| {
        schedule
            .start_date
            .saturating_add(months.saturating_mul(month_secs))
    };
    let cliff = schedule.cliff_months as u64;
    let n = schedule.vesting_months;

    if n == 0 {
        let remaining = schedule
            .vesting_allocation
            .saturating_sub(schedule.released_vesting);
        if remaining > 0 {
            stages.push_back(stage(schedule, month_at(cliff), remaining, false));
        }
        return stages;
    }

    let mut paid = schedule.released_vesting;
    for period in (schedule.released_periods + 1)..=n {
        let cumulative = vested_through(schedule.vesting_allocation, period, n);
        let tokens = cumulative.saturating_sub(paid);
        paid = paid.max(cumulative);
        stages.push_back(stage(
            schedule,
            month_at(cliff + period as u64),
            tokens,
            false,
        ));
    }
    stages
}
