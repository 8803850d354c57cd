//! Decay engine implementing the [`DecaySchedule`] trait.
//!
//! Combines periodic allocation decay with the capped engagement step
//! function. All arithmetic is fixed-point with half-to-even rounding.

use emit_core::amount::{Amount, Rate};
use emit_core::config::EmissionsConfig;
use emit_core::traits::DecaySchedule;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::{allocation_for_cycle, is_decay_cycle};
use crate::engagement::decay_fraction;

/// The production decay rules.
///
/// - Allocation: multiplied by `1 - allocation_decay_rate` every
///   `allocation_decay_period` cycles
/// - Engagement: allocation discounted by
///   `min(engagement_decay_rate * periods_elapsed, engagement_decay_cap)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayEngine {
    pub allocation_decay_rate: Rate,
    pub allocation_decay_period: u64,
    pub engagement_decay_rate: Rate,
    pub engagement_decay_period: u64,
    pub engagement_decay_cap: Rate,
}

impl DecayEngine {
    /// Take the decay parameters from a configuration.
    pub fn from_config(config: &EmissionsConfig) -> Self {
        Self {
            allocation_decay_rate: config.allocation_decay_rate,
            allocation_decay_period: config.allocation_decay_period,
            engagement_decay_rate: config.engagement_decay_rate,
            engagement_decay_period: config.engagement_decay_period,
            engagement_decay_cap: config.engagement_decay_cap,
        }
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::from_config(&EmissionsConfig::default())
    }
}

impl DecaySchedule for DecayEngine {
    fn next_allocation(&self, cycle: u64, last_allocation: Amount) -> Amount {
        let next = allocation_for_cycle(
            cycle,
            last_allocation,
            self.allocation_decay_rate,
            self.allocation_decay_period,
        );
        if is_decay_cycle(cycle, self.allocation_decay_period) {
            debug!(cycle, from = %last_allocation, to = %next, "decay: allocation step");
        }
        next
    }

    fn engagement_decay(&self, cycle: u64) -> Rate {
        decay_fraction(
            cycle,
            self.engagement_decay_rate,
            self.engagement_decay_period,
            self.engagement_decay_cap,
        )
    }
}
