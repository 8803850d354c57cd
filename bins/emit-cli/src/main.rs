//! emit-cli — Command-line front end for the emission schedule simulator.
//!
//! Loads a configuration (defaults, config file, `EMIT_*` environment
//! variables, then flags), runs the simulator and prints per-cycle tables,
//! supply summaries or JSON.

mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use emit_core::amount::{Amount, Rate};
use emit_core::config::{self, EmissionsConfig};
use emit_core::types::{SimulationResult, StopReason};
use emit_sim::{Simulator, Summary};
use tracing::{info, warn};

/// Cycles simulated unless `--max-cycles` says otherwise. Rounding can hold a
/// tiny allocation at a non-zero floor, so a very high cap may otherwise take
/// ~10^14 cycles to reach.
const DEFAULT_MAX_CYCLES: u64 = 1_000_000;

/// Emission schedule simulator.
#[derive(Parser)]
#[command(name = "emit-cli")]
#[command(version, about = "Simulate a capped, decaying token emission schedule.")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every emitted cycle.
    Simulate(SimulateArgs),
    /// Print per-pool totals and supply position up to a cycle.
    Summary(SummaryArgs),
    /// Print the effective configuration as JSON.
    Config(ParamArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Configuration source and per-field overrides.
#[derive(Args, Default)]
struct ParamArgs {
    /// Config file (TOML, JSON or YAML). Default: <config_dir>/emit/emissions.toml if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allocation and engagement paid in cycle 1 (tokens).
    #[arg(long)]
    initial_allocation: Option<Amount>,

    /// Allocation decay per period (e.g. 0.04 or 4%).
    #[arg(long)]
    allocation_decay_rate: Option<Rate>,

    /// Cycles between allocation decay steps.
    #[arg(long)]
    allocation_decay_period: Option<u64>,

    /// Engagement decay added per elapsed period.
    #[arg(long)]
    engagement_decay_rate: Option<Rate>,

    /// Cycles per engagement decay step.
    #[arg(long)]
    engagement_decay_period: Option<u64>,

    /// Maximum accumulated engagement decay.
    #[arg(long)]
    engagement_decay_cap: Option<Rate>,

    /// Share of allocation + engagement routed to the treasury.
    #[arg(long)]
    treasury_rate: Option<Rate>,

    /// First cycle the bonus pool is funded.
    #[arg(long)]
    bonus_pool_start_cycle: Option<u64>,

    /// Share of the treasury redirected to the bonus pool.
    #[arg(long)]
    bonus_pool_share: Option<Rate>,

    /// Hard cap on total supply, migration included (tokens).
    #[arg(long)]
    supply_cap: Option<Amount>,

    /// Pre-minted supply counted toward the cap (tokens).
    #[arg(long)]
    migration_amount: Option<Amount>,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Stop after this many cycles even if the cap is not reached.
    #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Summarise cycles up to and including this one (default: all).
    #[arg(short, long)]
    through: Option<u64>,

    /// Stop after this many cycles even if the cap is not reached.
    #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ParamArgs {
    /// Load the layered configuration and apply flag overrides.
    ///
    /// `env` holds the environment variables considered for `EMIT_*` overrides.
    fn resolve(self, env: &[(String, String)]) -> Result<EmissionsConfig> {
        let mut cfg = EmissionsConfig::load_with_vars(self.config.as_deref(), env.iter().cloned())
            .context("Failed to load configuration")?;

        if let Some(v) = self.initial_allocation {
            cfg.initial_allocation = v;
        }
        if let Some(v) = self.allocation_decay_rate {
            cfg.allocation_decay_rate = v;
        }
        if let Some(v) = self.allocation_decay_period {
            cfg.allocation_decay_period = v;
        }
        if let Some(v) = self.engagement_decay_rate {
            cfg.engagement_decay_rate = v;
        }
        if let Some(v) = self.engagement_decay_period {
            cfg.engagement_decay_period = v;
        }
        if let Some(v) = self.engagement_decay_cap {
            cfg.engagement_decay_cap = v;
        }
        if let Some(v) = self.treasury_rate {
            cfg.treasury_rate = v;
        }
        if let Some(v) = self.bonus_pool_start_cycle {
            cfg.bonus_pool_start_cycle = v;
        }
        if let Some(v) = self.bonus_pool_share {
            cfg.bonus_pool_share = v;
        }
        if let Some(v) = self.supply_cap {
            cfg.supply_cap = v;
        }
        if let Some(v) = self.migration_amount {
            cfg.migration_amount = v;
        }

        cfg.validate().context("Invalid configuration")?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let env = config::process_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Simulate(args) => simulate(args, &env, &mut out),
        Commands::Summary(args) => summary(args, &env, &mut out),
        Commands::Config(params) => show_config(params, &env, &mut out),
    }
}

/// Resolve parameters and run the schedule up to `max_cycles`.
fn run_simulation(params: ParamArgs, max_cycles: u64, env: &[(String, String)]) -> Result<SimulationResult> {
    let cfg = params.resolve(env)?;
    info!(
        supply_cap = %cfg.supply_cap,
        migration = %cfg.migration_amount,
        max_cycles,
        "starting simulation"
    );
    let result = Simulator::new(cfg)
        .context("Invalid configuration")?
        .with_cycle_limit(max_cycles)
        .run();

    if let StopReason::CycleLimit { limit } = result.stop_reason() {
        warn!(
            limit,
            headroom = %result.headroom(),
            "supply cap not reached within the cycle limit; raise --max-cycles to continue"
        );
    }
    Ok(result)
}

/// Run the schedule and print every cycle.
fn simulate(args: SimulateArgs, env: &[(String, String)], out: &mut impl Write) -> Result<()> {
    let result = run_simulation(args.params, args.max_cycles, env)?;
    match args.format {
        OutputFormat::Text => output::write_cycles(out, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result).context("Failed to encode result")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Run the schedule and print the supply summary.
fn summary(args: SummaryArgs, env: &[(String, String)], out: &mut impl Write) -> Result<()> {
    let result = run_simulation(args.params, args.max_cycles, env)?;
    let summary = Summary::new(&result, args.through);
    match args.format {
        OutputFormat::Text => output::write_summary(out, &summary, result.stop_reason())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &summary).context("Failed to encode summary")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print the effective configuration.
fn show_config(params: ParamArgs, env: &[(String, String)], out: &mut impl Write) -> Result<()> {
    let cfg = params.resolve(env)?;
    serde_json::to_writer_pretty(&mut *out, &cfg).context("Failed to encode configuration")?;
    writeln!(out)?;
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .init(),
    }
}
