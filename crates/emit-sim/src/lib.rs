//! # emit-sim — Capped emission schedule simulator.
//!
//! [`Simulator`] turns an [`EmissionsConfig`](emit_core::config::EmissionsConfig)
//! into an ordered sequence of [`CycleRecord`](emit_core::types::CycleRecord)s,
//! stopping just before the supply cap would be exceeded. The [`report`]
//! module aggregates a finished run into per-pool totals and shares.
//!
//! ```
//! use emit_core::config::EmissionsConfig;
//! use emit_core::types::StopReason;
//!
//! let result = emit_sim::run(EmissionsConfig::default()).unwrap();
//! assert_eq!(result.cycle(1).unwrap().cycle_total.to_string(), "5000000");
//! assert!(matches!(result.stop_reason(), StopReason::CapReached { .. }));
//! ```

pub mod report;
pub mod simulator;

pub use report::{PoolShares, PoolTotals, Summary};
pub use simulator::{run, Emissions, Simulator};
