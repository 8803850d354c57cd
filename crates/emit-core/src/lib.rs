//! # emit-core
//! Foundation types and traits for the Emit emission schedule simulator.
//!
//! All token quantities are fixed-point [`Amount`](amount::Amount)s with six
//! fractional digits and all fractions are [`Rate`](amount::Rate)s in parts
//! per million, so every computation is exact and deterministic.

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
