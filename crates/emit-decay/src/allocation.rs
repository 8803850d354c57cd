//! Periodic allocation decay.
//!
//! The allocation stays flat for `period` cycles and is then multiplied by
//! `1 - rate`. Decay applies at cycles `period + 1`, `2 * period + 1`, ...,
//! compounding on the previously rounded value.

use emit_core::amount::{Amount, Rate};

/// Whether the allocation decays on entering `cycle`.
///
/// Never true for the bootstrap cycle. A zero period never decays.
pub fn is_decay_cycle(cycle: u64, period: u64) -> bool {
    cycle >= 2 && (cycle - 1).checked_rem(period) == Some(0)
}

/// Allocation for `cycle` given the previous cycle's allocation.
pub fn allocation_for_cycle(cycle: u64, last_allocation: Amount, rate: Rate, period: u64) -> Amount {
    if is_decay_cycle(cycle, period) {
        last_allocation.mul_rate(rate.complement())
    } else {
        last_allocation
    }
}
