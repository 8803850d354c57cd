//! Shared test helpers for E2E and property tests.

use emit_core::amount::{Amount, Rate};
use emit_core::config::EmissionsConfig;

/// Whole tokens.
pub fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n)
}

/// Rate from a decimal fraction or percentage literal.
pub fn rate(s: &str) -> Rate {
    s.parse().unwrap_or_else(|e| panic!("bad rate literal {s:?}: {e}"))
}

/// The reference schedule: 2M initial allocation, 4% every 12 cycles,
/// 20% engagement steps every 50 cycles capped at 80%, 25% treasury,
/// bonus pool from cycle 46 at 25%, cap 1,000,243,154, migration 3,750,000.
pub fn reference_config() -> EmissionsConfig {
    EmissionsConfig {
        initial_allocation: tokens(2_000_000),
        allocation_decay_rate: rate("0.04"),
        allocation_decay_period: 12,
        engagement_decay_rate: rate("0.20"),
        engagement_decay_period: 50,
        engagement_decay_cap: rate("0.80"),
        treasury_rate: rate("0.25"),
        bonus_pool_start_cycle: 46,
        bonus_pool_share: rate("0.25"),
        supply_cap: tokens(1_000_243_154),
        migration_amount: tokens(3_750_000),
    }
}

/// A small configuration that reaches its cap within a few dozen cycles.
pub fn small_config() -> EmissionsConfig {
    EmissionsConfig {
        initial_allocation: tokens(100),
        allocation_decay_rate: rate("10%"),
        allocation_decay_period: 2,
        engagement_decay_rate: rate("25%"),
        engagement_decay_period: 3,
        engagement_decay_cap: rate("50%"),
        treasury_rate: rate("20%"),
        bonus_pool_start_cycle: 4,
        bonus_pool_share: rate("50%"),
        supply_cap: tokens(3_500),
        migration_amount: tokens(1_000),
    }
}
