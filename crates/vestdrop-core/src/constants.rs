//! Distribution constants. All monetary values in base units (1 token = 10^12).

/// Base units per whole token.
pub const UNIT: u128 = 1_000_000_000_000;

/// Target block time of the ledger, in seconds.
pub const BLOCK_TIME_SECS: u64 = 6;

/// Length of one vesting period, in blocks.
pub const VESTING_PERIOD_BLOCKS: u64 = 11_250;

/// Block height at which standard vesting begins.
pub const DISTRIBUTION_START_BLOCK: u64 = 13_517_962;

/// First derivation index for anonymous proxy accounts. One index per
/// grant, counting up, so a re-run on a clean chain derives the same set.
pub const PROXY_INDEX_BASE: u32 = 2_000;

/// Whole tokens of float transferred to each proxy account: existential
/// deposit plus headroom for the fees it will pay under multisig control.
pub const PROXY_FUNDING_TOKENS: u64 = 1_000;

/// Blocks spanned by `days` days at the target block time.
pub const fn days_to_blocks(days: u64) -> u64 {
    days * 24 * 60 * 60 / BLOCK_TIME_SECS
}

/// Whole vesting periods spanned by `days` days. Floor division: a
/// partial trailing period is dropped.
pub const fn days_to_period_count(days: u64) -> u32 {
    (days_to_blocks(days) / VESTING_PERIOD_BLOCKS) as u32
}
