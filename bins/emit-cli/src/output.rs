//! Plain-text rendering of simulation results.

use std::io::{self, Write};

use emit_core::types::{Pool, SimulationResult, StopReason};
use emit_sim::Summary;

const AMOUNT_WIDTH: usize = 22;

/// One row per cycle, then the stop reason and final supply.
pub fn write_cycles(out: &mut impl Write, result: &SimulationResult) -> io::Result<()> {
    writeln!(
        out,
        "{:>6} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$}",
        "cycle",
        Pool::Allocation,
        Pool::Engagement,
        Pool::Treasury,
        Pool::BonusPool,
        "cycle_total",
        "cumulative_total",
        w = AMOUNT_WIDTH
    )?;

    for r in result.records() {
        writeln!(
            out,
            "{:>6} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$}",
            r.cycle,
            r.allocation,
            r.engagement,
            r.treasury,
            r.bonus_pool,
            r.cycle_total,
            r.cumulative_total,
            w = AMOUNT_WIDTH
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Stopped:      {}", result.stop_reason())?;
    writeln!(out, "Emitted:      {}", result.total_emitted())?;
    writeln!(out, "Total supply: {} (incl. migration {})", result.total_supply(), result.migration_amount())?;
    writeln!(out, "Headroom:     {}", result.headroom())?;
    Ok(())
}

/// Per-pool totals and supply position.
pub fn write_summary(out: &mut impl Write, summary: &Summary, stop: StopReason) -> io::Result<()> {
    writeln!(out, "Emissions totals up to cycle {}", summary.through_cycle)?;
    writeln!(out)?;
    for pool in Pool::ALL {
        writeln!(
            out,
            "  {:<12} {:>w$}  {:>9}",
            pool,
            summary.totals.get(pool),
            summary.shares.get(pool).to_percent_string(),
            w = AMOUNT_WIDTH
        )?;
    }
    writeln!(
        out,
        "  {:<12} {:>w$}  {:>9}",
        "migration",
        summary.migration_amount,
        summary.migration_share.to_percent_string(),
        w = AMOUNT_WIDTH
    )?;
    writeln!(out)?;
    writeln!(out, "Total supply: {}", summary.total_supply)?;
    writeln!(out, "Supply cap:   {}", summary.supply_cap)?;
    writeln!(out, "Headroom:     {}", summary.headroom)?;
    writeln!(out, "Run stopped:  {stop}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emit_core::config::EmissionsConfig;
    use emit_sim::Simulator;

    fn short_run() -> SimulationResult {
        Simulator::new(EmissionsConfig::default())
            .unwrap()
            .with_cycle_limit(2)
            .run()
    }

    #[test]
    fn cycles_table_has_header_and_rows() {
        let mut buf = Vec::new();
        write_cycles(&mut buf, &short_run()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("bonus_pool"));
        assert!(lines[1].trim_start().starts_with("1 "));
        assert!(lines[2].ends_with("10000000"));
        assert!(text.contains("Headroom:"));
    }

    #[test]
    fn summary_lists_every_pool() {
        let result = short_run();
        let summary = Summary::new(&result, None);
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary, result.stop_reason()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        for pool in Pool::ALL {
            assert!(text.contains(pool.name()), "missing {pool}");
        }
        assert!(text.contains("up to cycle 2"));
        assert!(text.contains("13750000"));
    }
}
