//! Capped emission schedule simulator.
//!
//! Cycle 1 is a bootstrap cycle paying `initial_allocation` to both the
//! allocation and engagement pools. Every later cycle derives its pools from
//! the decay rules, routes a share to the treasury and, once active, carves a
//! bonus pool out of the treasury. Each candidate cycle is computed in full
//! and then either accepted or, if it would push `cumulative + migration`
//! past the supply cap, rejected, which ends the run.

use std::iter::FusedIterator;

use emit_core::amount::Amount;
use emit_core::config::EmissionsConfig;
use emit_core::error::ConfigError;
use emit_core::traits::DecaySchedule;
use emit_core::types::{CycleRecord, SimulationResult, StopReason};
use emit_decay::DecayEngine;
use tracing::{debug, info};

/// Pools of a cycle before it is tested against the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    allocation: Amount,
    engagement: Amount,
    treasury: Amount,
    bonus_pool: Amount,
}

impl Candidate {
    fn total(&self) -> Amount {
        self.allocation + self.engagement + self.treasury + self.bonus_pool
    }
}

/// A validated configuration paired with its decay rules.
#[derive(Debug, Clone)]
pub struct Simulator<D = DecayEngine> {
    config: EmissionsConfig,
    decay: D,
    cycle_limit: Option<u64>,
}

impl Simulator<DecayEngine> {
    /// Validate `config` and use the standard decay rules.
    pub fn new(config: EmissionsConfig) -> Result<Self, ConfigError> {
        let decay = DecayEngine::from_config(&config);
        Self::with_decay(config, decay)
    }
}

impl<D: DecaySchedule> Simulator<D> {
    /// Validate `config` and use custom decay rules.
    ///
    /// Only the pool-routing and cap parameters of `config` are read; decay
    /// behaviour comes entirely from `decay`.
    pub fn with_decay(config: EmissionsConfig, decay: D) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            decay,
            cycle_limit: None,
        })
    }

    /// Stop after at most `limit` accepted cycles.
    pub fn with_cycle_limit(mut self, limit: u64) -> Self {
        self.cycle_limit = Some(limit);
        self
    }

    pub fn config(&self) -> &EmissionsConfig {
        &self.config
    }

    pub fn decay(&self) -> &D {
        &self.decay
    }

    /// A fresh lazy sequence starting at cycle 1.
    pub fn emissions(&self) -> Emissions<'_, D> {
        Emissions {
            config: &self.config,
            decay: &self.decay,
            cycle_limit: self.cycle_limit,
            next_cycle: 1,
            last_allocation: self.config.initial_allocation,
            cumulative: Amount::ZERO,
            stop_reason: None,
        }
    }

    /// Run to completion.
    pub fn run(&self) -> SimulationResult {
        let mut emissions = self.emissions();
        let records: Vec<CycleRecord> = emissions.by_ref().collect();
        let stop_reason = emissions.finish();
        SimulationResult::new(
            records,
            stop_reason,
            self.config.migration_amount,
            self.config.supply_cap,
        )
    }
}

/// Validate `config` and run it with the standard decay rules.
pub fn run(config: EmissionsConfig) -> Result<SimulationResult, ConfigError> {
    Ok(Simulator::new(config)?.run())
}

/// Lazy, finite sequence of accepted cycles.
///
/// After the iterator returns `None`, [`stop_reason`](Self::stop_reason)
/// reports why.
#[derive(Debug, Clone)]
pub struct Emissions<'s, D> {
    config: &'s EmissionsConfig,
    decay: &'s D,
    cycle_limit: Option<u64>,
    next_cycle: u64,
    last_allocation: Amount,
    cumulative: Amount,
    stop_reason: Option<StopReason>,
}

impl<D: DecaySchedule> Emissions<'_, D> {
    /// Why the sequence ended, or `None` while it is still running.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Cumulative emissions of the cycles yielded so far.
    pub fn cumulative(&self) -> Amount {
        self.cumulative
    }

    /// Drain the remaining cycles and return the stop reason.
    pub fn finish(mut self) -> StopReason {
        loop {
            if let Some(reason) = self.stop_reason {
                return reason;
            }
            self.next();
        }
    }

    fn candidate(&self, cycle: u64) -> Candidate {
        let cfg = self.config;

        if cycle == 1 {
            let allocation = cfg.initial_allocation;
            let engagement = cfg.initial_allocation;
            return Candidate {
                allocation,
                engagement,
                treasury: (allocation + engagement).mul_rate(cfg.treasury_rate),
                bonus_pool: Amount::ZERO,
            };
        }

        let allocation = self.decay.next_allocation(cycle, self.last_allocation);
        let engagement = self.decay.engagement(cycle, allocation);
        let mut treasury = (allocation + engagement).mul_rate(cfg.treasury_rate);

        let mut bonus_pool = Amount::ZERO;
        if cycle >= cfg.bonus_pool_start_cycle {
            bonus_pool = treasury.mul_rate(cfg.bonus_pool_share);
            treasury = treasury.saturating_sub(bonus_pool);
            if cycle == cfg.bonus_pool_start_cycle {
                debug!(cycle, "emissions: bonus pool active");
            }
        }

        Candidate {
            allocation,
            engagement,
            treasury,
            bonus_pool,
        }
    }

    fn stop(&mut self, reason: StopReason) {
        info!(
            cycles = self.next_cycle - 1,
            emitted = %self.cumulative,
            %reason,
            "emissions: simulation stopped"
        );
        self.stop_reason = Some(reason);
    }
}

impl<D: DecaySchedule> Iterator for Emissions<'_, D> {
    type Item = CycleRecord;

    fn next(&mut self) -> Option<CycleRecord> {
        if self.stop_reason.is_some() {
            return None;
        }

        let cycle = self.next_cycle;
        if let Some(limit) = self.cycle_limit {
            if cycle > limit {
                self.stop(StopReason::CycleLimit { limit });
                return None;
            }
        }

        let candidate = self.candidate(cycle);
        let cycle_total = candidate.total();

        if cycle_total.is_zero() {
            self.stop(StopReason::Exhausted { cycle });
            return None;
        }

        let projected = self.cumulative + cycle_total + self.config.migration_amount;
        if projected > self.config.supply_cap {
            self.stop(StopReason::CapReached { cycle, cycle_total });
            return None;
        }

        self.cumulative += cycle_total;
        self.last_allocation = candidate.allocation;
        self.next_cycle += 1;

        Some(CycleRecord {
            cycle,
            allocation: candidate.allocation,
            engagement: candidate.engagement,
            treasury: candidate.treasury,
            bonus_pool: candidate.bonus_pool,
            cycle_total,
            cumulative_total: self.cumulative,
        })
    }
}

impl<D: DecaySchedule> FusedIterator for Emissions<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use emit_core::amount::Rate;
    use proptest::prelude::*;

    fn reference() -> Simulator {
        Simulator::new(EmissionsConfig::default()).unwrap()
    }

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    // ------------------------------------------------------------------
    // Bootstrap
    // ------------------------------------------------------------------

    #[test]
    fn bootstrap_cycle() {
        let first = reference().emissions().next().unwrap();
        assert_eq!(
            first,
            CycleRecord {
                cycle: 1,
                allocation: tokens(2_000_000),
                engagement: tokens(2_000_000),
                treasury: tokens(1_000_000),
                bonus_pool: Amount::ZERO,
                cycle_total: tokens(5_000_000),
                cumulative_total: tokens(5_000_000),
            }
        );
    }

    #[test]
    fn bootstrap_ignores_early_bonus_start() {
        let cfg = EmissionsConfig {
            bonus_pool_start_cycle: 1,
            ..EmissionsConfig::default()
        };
        let sim = Simulator::new(cfg).unwrap();
        let mut it = sim.emissions();
        let first = it.next().unwrap();
        assert_eq!(first.bonus_pool, Amount::ZERO);
        assert_eq!(first.treasury, tokens(1_000_000));
        let second = it.next().unwrap();
        assert_eq!(second.bonus_pool, tokens(250_000));
        assert_eq!(second.treasury, tokens(750_000));
    }

    // ------------------------------------------------------------------
    // Decay timing
    // ------------------------------------------------------------------

    #[test]
    fn allocation_unchanged_until_cycle_thirteen() {
        let records: Vec<_> = reference().emissions().take(13).collect();
        for r in &records[..12] {
            assert_eq!(r.allocation, tokens(2_000_000), "cycle {}", r.cycle);
        }
        assert_eq!(records[12].cycle, 13);
        assert_eq!(records[12].allocation, tokens(1_920_000));
        assert_eq!(records[12].engagement, tokens(1_920_000));
    }

    #[test]
    fn engagement_follows_current_allocation() {
        let records: Vec<_> = reference().emissions().take(51).collect();
        let c51 = &records[50];
        assert_eq!(c51.allocation, Amount::from_micros(1_698_693_120_000));
        assert_eq!(c51.engagement, Amount::from_micros(1_358_954_496_000));
    }

    // ------------------------------------------------------------------
    // Bonus pool
    // ------------------------------------------------------------------

    #[test]
    fn bonus_pool_activation() {
        let records: Vec<_> = reference().emissions().take(47).collect();
        let c45 = &records[44];
        let c46 = &records[45];
        assert_eq!(c45.bonus_pool, Amount::ZERO);
        assert_eq!(c45.treasury, tokens(884_736));

        let before = (c46.allocation + c46.engagement).mul_rate(Rate::saturating_from_ppm(250_000));
        assert_eq!(before, tokens(884_736));
        assert_eq!(c46.bonus_pool, before.mul_rate(Rate::saturating_from_ppm(250_000)));
        assert_eq!(c46.bonus_pool, tokens(221_184));
        assert_eq!(c46.treasury, tokens(663_552));
        assert_eq!(c46.cycle_total, c45.cycle_total);

        // Stays active.
        assert_eq!(records[46].bonus_pool, tokens(221_184));
    }

    #[test]
    fn bonus_pool_beyond_run_never_activates() {
        let cfg = EmissionsConfig {
            bonus_pool_start_cycle: u64::MAX,
            ..EmissionsConfig::default()
        };
        let result = run(cfg).unwrap();
        assert!(result.records().iter().all(|r| r.bonus_pool.is_zero()));
    }

    // ------------------------------------------------------------------
    // Cap
    // ------------------------------------------------------------------

    #[test]
    fn reference_run_stops_at_cap() {
        let result = reference().run();
        assert_eq!(result.len(), 634);
        let last = result.last().unwrap();
        assert_eq!(last.cycle, 634);
        assert_eq!(last.cumulative_total, Amount::from_micros(996_493_153_381_968));
        assert_eq!(
            result.stop_reason(),
            StopReason::CapReached {
                cycle: 635,
                cycle_total: Amount::from_micros(359_108_241_930),
            }
        );
    }

    #[test]
    fn cap_check_includes_migration() {
        let cfg = EmissionsConfig {
            supply_cap: tokens(3_750_000 + 10_000_000),
            ..EmissionsConfig::default()
        };
        let result = run(cfg).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.total_supply(), tokens(13_750_000));
        assert_eq!(result.headroom(), Amount::ZERO);
    }

    #[test]
    fn exact_fit_is_accepted() {
        let cfg = EmissionsConfig {
            supply_cap: tokens(3_750_000 + 5_000_000),
            ..EmissionsConfig::default()
        };
        let result = run(cfg).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn cap_below_bootstrap_gives_empty_result() {
        let cfg = EmissionsConfig {
            supply_cap: tokens(3_750_000 + 4_999_999),
            ..EmissionsConfig::default()
        };
        let result = run(cfg).unwrap();
        assert!(result.is_empty());
        assert_eq!(
            result.stop_reason(),
            StopReason::CapReached {
                cycle: 1,
                cycle_total: tokens(5_000_000),
            }
        );
    }

    #[test]
    fn invalid_config_rejected_before_running() {
        let cfg = EmissionsConfig {
            engagement_decay_period: 0,
            ..EmissionsConfig::default()
        };
        assert!(matches!(run(cfg), Err(ConfigError::ZeroPeriod { .. })));
    }

    // ------------------------------------------------------------------
    // Termination
    // ------------------------------------------------------------------

    #[test]
    fn cycle_limit_stops_early() {
        let result = reference().with_cycle_limit(10).run();
        assert_eq!(result.len(), 10);
        assert_eq!(result.stop_reason(), StopReason::CycleLimit { limit: 10 });
    }

    #[test]
    fn exhausted_when_allocation_rounds_to_zero() {
        // One micro-unit halves to zero at the first decay step.
        let cfg = EmissionsConfig {
            initial_allocation: Amount::from_micros(1),
            allocation_decay_rate: "0.5".parse().unwrap(),
            allocation_decay_period: 1,
            treasury_rate: Rate::ZERO,
            ..EmissionsConfig::default()
        };
        let result = run(cfg).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.stop_reason(), StopReason::Exhausted { cycle: 2 });
    }

    // ------------------------------------------------------------------
    // Iterator behaviour
    // ------------------------------------------------------------------

    #[test]
    fn iterator_is_fused_and_reports_reason() {
        let sim = reference().with_cycle_limit(3);
        let mut it = sim.emissions();
        assert!(it.stop_reason().is_none());
        assert_eq!(it.by_ref().count(), 3);
        assert_eq!(it.stop_reason(), Some(StopReason::CycleLimit { limit: 3 }));
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn emissions_restart_from_cycle_one() {
        let sim = reference();
        let a: Vec<_> = sim.emissions().take(20).collect();
        let b: Vec<_> = sim.emissions().take(20).collect();
        assert_eq!(a, b);
        assert_eq!(b[0].cycle, 1);
    }

    #[test]
    fn partial_iteration_then_finish() {
        let sim = reference();
        let mut it = sim.emissions();
        it.next();
        it.next();
        assert_eq!(it.cumulative(), tokens(10_000_000));
        assert!(matches!(it.finish(), StopReason::CapReached { cycle: 635, .. }));
    }

    #[test]
    fn run_is_deterministic() {
        assert_eq!(reference().run(), reference().run());
    }

    #[test]
    fn custom_decay_schedule() {
        struct Flat;
        impl DecaySchedule for Flat {
            fn next_allocation(&self, _cycle: u64, last: Amount) -> Amount {
                last
            }
            fn engagement_decay(&self, _cycle: u64) -> Rate {
                Rate::ZERO
            }
        }

        let cfg = EmissionsConfig {
            initial_allocation: tokens(100),
            treasury_rate: Rate::ZERO,
            supply_cap: tokens(1_000),
            migration_amount: Amount::ZERO,
            ..EmissionsConfig::default()
        };
        let result = Simulator::with_decay(cfg, Flat).unwrap().run();
        assert_eq!(result.len(), 5);
        assert_eq!(result.total_emitted(), tokens(1_000));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn cumulative_strictly_increasing_and_capped(
            initial in 1u64..5_000_000,
            decay_ppm in 0u64..500_000,
            period in 1u64..20,
            treasury_ppm in 0u64..=1_000_000,
            cap_tokens in 10_000_000u64..200_000_000,
        ) {
            let cfg = EmissionsConfig {
                initial_allocation: tokens(initial),
                allocation_decay_rate: Rate::from_ppm(decay_ppm).unwrap(),
                allocation_decay_period: period,
                treasury_rate: Rate::from_ppm(treasury_ppm).unwrap(),
                supply_cap: tokens(cap_tokens),
                ..EmissionsConfig::default()
            };
            let result = Simulator::new(cfg.clone()).unwrap().with_cycle_limit(50_000).run();

            for pair in result.records().windows(2) {
                prop_assert!(pair[1].cumulative_total > pair[0].cumulative_total);
                prop_assert_eq!(pair[1].cycle, pair[0].cycle + 1);
            }
            prop_assert!(result.total_supply() <= cfg.supply_cap);
            if let StopReason::CapReached { cycle_total, .. } = result.stop_reason() {
                prop_assert!(result.total_supply() + cycle_total > cfg.supply_cap);
            }
        }
    }
}
