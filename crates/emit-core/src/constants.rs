//! Emission constants. All token quantities in micro-units (1 token = 10^6 micro-units).

/// Micro-units per whole token.
pub const MICROS_PER_TOKEN: u64 = 1_000_000;

/// Fractional digits every amount is rounded to.
pub const AMOUNT_DECIMALS: u32 = 6;

/// Denominator for [`Rate`](crate::amount::Rate) values (parts per million).
pub const RATE_PRECISION: u64 = 1_000_000;

/// Fractional digits a rate can carry.
pub const RATE_DECIMALS: u32 = 6;

/// Upper bound accepted for `supply_cap` and `initial_allocation` (10^12 tokens).
///
/// A cycle total is at most four times the initial allocation, so with both
/// inputs bounded here no cumulative sum can approach `u64::MAX` micro-units.
pub const MAX_SUPPLY_CAP: u64 = 1_000_000_000_000 * MICROS_PER_TOKEN;

// ------------------------------------------------------------------
// Reference scenario
// ------------------------------------------------------------------

/// Hard cap on total ever-minted supply.
pub const DEFAULT_SUPPLY_CAP: u64 = 1_000_243_154 * MICROS_PER_TOKEN;

/// Supply pre-minted by the testnet migration, counted toward the cap.
pub const DEFAULT_MIGRATION_AMOUNT: u64 = 3_750_000 * MICROS_PER_TOKEN;

/// Allocation (and engagement) paid in the bootstrap cycle.
pub const DEFAULT_INITIAL_ALLOCATION: u64 = 2_000_000 * MICROS_PER_TOKEN;

/// 4% allocation decay per period.
pub const DEFAULT_ALLOCATION_DECAY_PPM: u64 = 40_000;

/// Cycles between allocation decay applications.
pub const DEFAULT_ALLOCATION_DECAY_PERIOD: u64 = 12;

/// 20% engagement decay per elapsed period.
pub const DEFAULT_ENGAGEMENT_DECAY_PPM: u64 = 200_000;

/// Cycles per engagement decay step.
pub const DEFAULT_ENGAGEMENT_DECAY_PERIOD: u64 = 50;

/// Engagement decay never exceeds 80%.
pub const DEFAULT_ENGAGEMENT_DECAY_CAP_PPM: u64 = 800_000;

/// 25% of allocation + engagement is routed to the treasury.
pub const DEFAULT_TREASURY_PPM: u64 = 250_000;

/// First cycle in which the bonus pool is funded.
pub const DEFAULT_BONUS_POOL_START_CYCLE: u64 = 46;

/// 25% of the treasury is redirected to the bonus pool once active.
pub const DEFAULT_BONUS_POOL_SHARE_PPM: u64 = 250_000;
