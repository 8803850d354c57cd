//! Trait interfaces for Emit.
//!
//! - [`DecaySchedule`] — allocation and engagement decay rules (emit-decay implements)

use crate::amount::{Amount, Rate};

/// Pure decay rules applied to each cycle after the bootstrap cycle.
///
/// Implementations must be deterministic: the same inputs always give the
/// same outputs, with every amount already rounded to micro-units.
pub trait DecaySchedule {
    /// Allocation for `cycle` given the allocation of the previous cycle.
    fn next_allocation(&self, cycle: u64, last_allocation: Amount) -> Amount;

    /// Engagement decay fraction in effect at `cycle`.
    fn engagement_decay(&self, cycle: u64) -> Rate;

    /// Engagement for `cycle`, derived from that cycle's allocation.
    ///
    /// Default implementation discounts `allocation` by
    /// [`engagement_decay`](Self::engagement_decay).
    fn engagement(&self, cycle: u64, allocation: Amount) -> Amount {
        allocation.mul_rate(self.engagement_decay(cycle).complement())
    }
}
