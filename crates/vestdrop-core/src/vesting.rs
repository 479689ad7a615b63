//! Vesting schedules: a fixed payout every `period` blocks, `period_count`
//! times, starting at block `start`.
//!
//! Two presets cover the whole distribution: standard vesting releases over
//! twelve 30-day months from the distribution start; team vesting begins
//! six months later and releases over twenty-four months. A grant's amount
//! is split into equal whole-base-unit payouts by floor division; the
//! modulus is kept as a remainder, never delivered.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::constants::{
    DISTRIBUTION_START_BLOCK, VESTING_PERIOD_BLOCKS, days_to_blocks, days_to_period_count,
};
use crate::error::ScheduleError;

/// Vesting parameters shared by a class of grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingParams {
    /// Block height of the first payout period.
    pub start: u64,
    /// Blocks between payouts.
    pub period: u64,
    /// Number of payouts.
    pub period_count: u32,
}

/// Standard vesting: twelve months of periods from the distribution start.
pub const STANDARD_VESTING: VestingParams = VestingParams {
    start: DISTRIBUTION_START_BLOCK,
    period: VESTING_PERIOD_BLOCKS,
    period_count: days_to_period_count(30 * 12),
};

/// Team vesting: a six-month cliff, then twenty-four months of periods.
pub const TEAM_VESTING: VestingParams = VestingParams {
    start: DISTRIBUTION_START_BLOCK + days_to_blocks(30 * 6),
    period: VESTING_PERIOD_BLOCKS,
    period_count: days_to_period_count(30 * 24),
};

/// The on-wire vesting schedule attached to a vested transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub start: u64,
    pub period: u64,
    pub per_period: Amount,
    pub period_count: u32,
}

impl VestingSchedule {
    /// Base units the schedule releases over its full lifetime
    /// (`per_period * period_count`).
    pub fn locked_units(&self) -> Result<u128, ScheduleError> {
        self.per_period
            .units()
            .checked_mul(self.period_count as u128)
            .ok_or(ScheduleError::ValueOverflow)
    }
}

/// A computed schedule plus the dust left over by the equal split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedSchedule {
    pub schedule: VestingSchedule,
    /// Base units that do not divide into the periods. The remainder stays
    /// with the issuing authority; it is accounted for but not delivered.
    pub remainder: Amount,
}

impl ComputedSchedule {
    /// Reconstruct the full grant: `per_period * period_count + remainder`.
    pub fn total_units(&self) -> Result<u128, ScheduleError> {
        self.schedule
            .locked_units()?
            .checked_add(self.remainder.units())
            .ok_or(ScheduleError::ValueOverflow)
    }
}

/// Split `amount` into `params.period_count` equal whole-base-unit payouts.
///
/// `per_period` is the floor of the division and `remainder` the modulus,
/// always in `[0, period_count)`. A zero period count is a fatal
/// configuration error: the split is undefined. Pure and deterministic.
pub fn calculate_schedule(
    amount: Amount,
    params: &VestingParams,
) -> Result<ComputedSchedule, ScheduleError> {
    if params.period_count == 0 {
        return Err(ScheduleError::ZeroPeriodCount);
    }
    let count = params.period_count as u128;
    let per_period = amount.units() / count;
    let remainder = amount.units() % count;

    Ok(ComputedSchedule {
        schedule: VestingSchedule {
            start: params.start,
            period: params.period,
            per_period: Amount::from_units(per_period),
            period_count: params.period_count,
        },
        remainder: Amount::from_units(remainder),
    })
}
