//! Capped step-function engagement decay.
//!
//! The decay fraction is recomputed from scratch every cycle as
//! `min(rate * periods_elapsed, cap)`. It does not compound and only changes
//! at period boundaries.

use emit_core::amount::Rate;

/// Whole engagement periods elapsed before `cycle`.
///
/// Zero for the bootstrap cycle and for a zero period.
pub fn periods_elapsed(cycle: u64, period: u64) -> u64 {
    cycle.saturating_sub(1).checked_div(period).unwrap_or(0)
}

/// Engagement decay fraction in effect at `cycle`.
pub fn decay_fraction(cycle: u64, rate: Rate, period: u64, cap: Rate) -> Rate {
    rate.scaled(periods_elapsed(cycle, period)).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rate(s: &str) -> Rate {
        s.parse().unwrap()
    }

    fn reference(cycle: u64) -> Rate {
        decay_fraction(cycle, rate("0.2"), 50, rate("0.8"))
    }

    #[test]
    fn periods_elapsed_boundaries() {
        assert_eq!(periods_elapsed(0, 50), 0);
        assert_eq!(periods_elapsed(1, 50), 0);
        assert_eq!(periods_elapsed(50, 50), 0);
        assert_eq!(periods_elapsed(51, 50), 1);
        assert_eq!(periods_elapsed(101, 50), 2);
        assert_eq!(periods_elapsed(1_000, 0), 0);
    }

    #[test]
    fn no_decay_in_first_period() {
        for cycle in 1..=50 {
            assert_eq!(reference(cycle), Rate::ZERO, "cycle {cycle}");
        }
    }

    #[test]
    fn steps_at_period_boundaries() {
        assert_eq!(reference(51), rate("0.2"));
        assert_eq!(reference(100), rate("0.2"));
        assert_eq!(reference(101), rate("0.4"));
        assert_eq!(reference(151), rate("0.6"));
        assert_eq!(reference(200), rate("0.6"));
    }

    #[test]
    fn saturates_at_cap() {
        assert_eq!(reference(201), rate("0.8"));
        assert_eq!(reference(251), rate("0.8"));
        assert_eq!(reference(10_000), rate("0.8"));
        assert_eq!(reference(u64::MAX), rate("0.8"));
    }

    #[test]
    fn cap_between_steps_clamps_partial_step() {
        assert_eq!(decay_fraction(101, rate("0.3"), 50, rate("0.5")), rate("0.5"));
    }

    #[test]
    fn full_decay_never_exceeds_one() {
        assert_eq!(decay_fraction(1_000, rate("1"), 1, Rate::ONE), Rate::ONE);
    }

    proptest! {
        #[test]
        fn never_exceeds_cap(
            cycle in any::<u64>(),
            rate_ppm in 0u64..=1_000_000,
            cap_ppm in 0u64..=1_000_000,
            period in 1u64..10_000,
        ) {
            let cap = Rate::from_ppm(cap_ppm).unwrap();
            let d = decay_fraction(cycle, Rate::from_ppm(rate_ppm).unwrap(), period, cap);
            prop_assert!(d <= cap);
        }

        #[test]
        fn non_decreasing_in_cycle(
            a in 1u64..1_000_000,
            b in 1u64..1_000_000,
            period in 1u64..500,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(reference_with(lo, period) <= reference_with(hi, period));
        }
    }

    fn reference_with(cycle: u64, period: u64) -> Rate {
        decay_fraction(cycle, rate("0.2"), period, rate("0.8"))
    }
}
