//! Aggregation over a finished simulation.
//!
//! Per-pool totals over a prefix of cycles, each pool's share of a cycle or
//! of total supply, and a [`Summary`] combining both with the cap headroom.
//! Nothing here feeds back into the simulator.

use emit_core::amount::{Amount, Rate};
use emit_core::types::{CycleRecord, Pool, SimulationResult};
use serde::{Deserialize, Serialize};

/// Sum of each pool's column over a run of cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals {
    pub allocation: Amount,
    pub engagement: Amount,
    pub treasury: Amount,
    pub bonus_pool: Amount,
}

impl PoolTotals {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CycleRecord>,
    {
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.allocation += r.allocation;
            acc.engagement += r.engagement;
            acc.treasury += r.treasury;
            acc.bonus_pool += r.bonus_pool;
            acc
        })
    }

    /// Totals over every cycle `<= cycle`.
    pub fn through(result: &SimulationResult, cycle: u64) -> Self {
        Self::from_records(result.records().iter().take_while(|r| r.cycle <= cycle))
    }

    pub fn get(&self, pool: Pool) -> Amount {
        match pool {
            Pool::Allocation => self.allocation,
            Pool::Engagement => self.engagement,
            Pool::Treasury => self.treasury,
            Pool::BonusPool => self.bonus_pool,
        }
    }

    /// Sum over all four pools.
    pub fn total(&self) -> Amount {
        Pool::ALL.iter().map(|p| self.get(*p)).sum()
    }

    /// Each pool's share of `denominator`.
    pub fn shares_of(&self, denominator: Amount) -> PoolShares {
        PoolShares {
            allocation: self.allocation.ratio_of(denominator),
            engagement: self.engagement.ratio_of(denominator),
            treasury: self.treasury.ratio_of(denominator),
            bonus_pool: self.bonus_pool.ratio_of(denominator),
        }
    }
}

impl From<&CycleRecord> for PoolTotals {
    fn from(r: &CycleRecord) -> Self {
        Self::from_records(std::iter::once(r))
    }
}

/// Each pool's fraction of some denominator, half-to-even rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolShares {
    pub allocation: Rate,
    pub engagement: Rate,
    pub treasury: Rate,
    pub bonus_pool: Rate,
}

impl PoolShares {
    /// Per-cycle breakdown of `record.cycle_total`.
    pub fn of_cycle(record: &CycleRecord) -> Self {
        PoolTotals::from(record).shares_of(record.cycle_total)
    }

    pub fn get(&self, pool: Pool) -> Rate {
        match pool {
            Pool::Allocation => self.allocation,
            Pool::Engagement => self.engagement,
            Pool::Treasury => self.treasury,
            Pool::BonusPool => self.bonus_pool,
        }
    }
}

/// Supply position after a given cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Last cycle included; 0 for an empty run.
    pub through_cycle: u64,
    pub totals: PoolTotals,
    pub emitted: Amount,
    pub migration_amount: Amount,
    /// Emitted plus migration.
    pub total_supply: Amount,
    pub supply_cap: Amount,
    /// Cap minus total supply.
    pub headroom: Amount,
    /// Each pool's share of total supply.
    pub shares: PoolShares,
    pub migration_share: Rate,
}

impl Summary {
    /// Summarise cycles `<= through`, or the whole run when `None`.
    ///
    /// A `through` past the last cycle is clamped to it.
    pub fn new(result: &SimulationResult, through: Option<u64>) -> Self {
        let last = result.last().map_or(0, |r| r.cycle);
        let through_cycle = through.map_or(last, |c| c.min(last));

        let totals = PoolTotals::through(result, through_cycle);
        let emitted = totals.total();
        let migration_amount = result.migration_amount();
        let total_supply = emitted + migration_amount;
        let supply_cap = result.supply_cap();

        Self {
            through_cycle,
            totals,
            emitted,
            migration_amount,
            total_supply,
            supply_cap,
            headroom: supply_cap.saturating_sub(total_supply),
            shares: totals.shares_of(total_supply),
            migration_share: migration_amount.ratio_of(total_supply),
        }
    }
}
