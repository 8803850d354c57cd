//! Emission schedule output types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// One of the four pools that receive emissions each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// Application rewards; decays on a fixed period schedule.
    Allocation,
    /// Engagement rewards; a capped step-function discount on allocation.
    Engagement,
    /// Reserve funded from allocation + engagement.
    Treasury,
    /// Carve-out of the treasury, active from a configured cycle onward.
    BonusPool,
}

impl Pool {
    pub const ALL: [Pool; 4] = [Pool::Allocation, Pool::Engagement, Pool::Treasury, Pool::BonusPool];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Allocation => "allocation",
            Self::Engagement => "engagement",
            Self::Treasury => "treasury",
            Self::BonusPool => "bonus_pool",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Emissions of a single accepted cycle.
///
/// `cumulative_total` is the running sum of `cycle_total` through this cycle.
/// The migration amount is never included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u64,
    pub allocation: Amount,
    pub engagement: Amount,
    pub treasury: Amount,
    pub bonus_pool: Amount,
    pub cycle_total: Amount,
    pub cumulative_total: Amount,
}

impl CycleRecord {
    pub fn pool(&self, pool: Pool) -> Amount {
        match pool {
            Pool::Allocation => self.allocation,
            Pool::Engagement => self.engagement,
            Pool::Treasury => self.treasury,
            Pool::BonusPool => self.bonus_pool,
        }
    }
}

/// Why a simulation stopped producing cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Accepting `cycle` would push cumulative supply plus migration past the cap.
    CapReached { cycle: u64, cycle_total: Amount },
    /// `cycle` would emit nothing, so the cap can never be reached.
    Exhausted { cycle: u64 },
    /// The caller-imposed cycle limit was hit before the cap.
    CycleLimit { limit: u64 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapReached { cycle, cycle_total } => {
                write!(f, "supply cap reached (cycle {cycle} would emit {cycle_total})")
            }
            Self::Exhausted { cycle } => write!(f, "emissions exhausted at cycle {cycle}"),
            Self::CycleLimit { limit } => write!(f, "cycle limit of {limit} reached"),
        }
    }
}

/// The ordered cycles of one simulation run and why it stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    records: Vec<CycleRecord>,
    stop_reason: StopReason,
    migration_amount: Amount,
    supply_cap: Amount,
}

impl SimulationResult {
    pub fn new(
        records: Vec<CycleRecord>,
        stop_reason: StopReason,
        migration_amount: Amount,
        supply_cap: Amount,
    ) -> Self {
        Self {
            records,
            stop_reason,
            migration_amount,
            supply_cap,
        }
    }

    /// Accepted cycles, cycle 1 first.
    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CycleRecord> {
        self.records
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CycleRecord> {
        self.records.last()
    }

    /// Record for a 1-based cycle index.
    pub fn cycle(&self, cycle: u64) -> Option<&CycleRecord> {
        let idx = usize::try_from(cycle.checked_sub(1)?).ok()?;
        self.records.get(idx)
    }

    pub fn migration_amount(&self) -> Amount {
        self.migration_amount
    }

    pub fn supply_cap(&self) -> Amount {
        self.supply_cap
    }

    /// Sum of every accepted cycle total.
    pub fn total_emitted(&self) -> Amount {
        self.last().map_or(Amount::ZERO, |r| r.cumulative_total)
    }

    /// Emitted supply plus the migration amount.
    pub fn total_supply(&self) -> Amount {
        self.total_emitted() + self.migration_amount
    }

    /// Supply still available under the cap.
    pub fn headroom(&self) -> Amount {
        self.supply_cap.saturating_sub(self.total_supply())
    }
}
