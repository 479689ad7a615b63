//! Error types for the allocation calculator.
use thiserror::Error;

use crate::amount::Amount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount string")] Empty,
    #[error("amount has no digits")] MissingDigits,
    #[error("invalid character {0:?} in amount")] InvalidCharacter(char),
    #[error("too many decimal places: {got} > {max}")] TooManyDecimals { got: usize, max: usize },
    #[error("amount overflow")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("vesting period count is zero")] ZeroPeriodCount,
    #[error("schedule value overflow")] ValueOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error(transparent)] Amount(#[from] AmountError),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error("{tranche} totals {actual}, published figure is {expected}")] TrancheTotalMismatch { tranche: &'static str, expected: Amount, actual: Amount },
    #[error("{tranche} over-allocated: {actual} exceeds target {target}")] OverAllocated { tranche: &'static str, target: Amount, actual: Amount },
    #[error("grand total is {actual}, published total is {expected}")] GrandTotalMismatch { expected: Amount, actual: Amount },
    #[error("schedules reconstruct {actual} base units, expected {expected}")] DistributedTotalMismatch { expected: u128, actual: u128 },
    #[error("allocation total overflow")] Overflow,
}
