//! # emit-decay — Allocation and engagement decay rules.
//!
//! All calculations use fixed-point arithmetic for determinism.
//!
//! - **Allocation decay**: the allocation is multiplied by `1 - rate` once per
//!   decay period, compounding on the rounded value.
//! - **Engagement decay**: a step function of whole elapsed periods, clamped
//!   to a cap and applied to the current cycle's allocation.

pub mod allocation;
pub mod engagement;
pub mod engine;

pub use allocation::{allocation_for_cycle, is_decay_cycle};
pub use engagement::{decay_fraction, periods_elapsed};
pub use engine::DecayEngine;
