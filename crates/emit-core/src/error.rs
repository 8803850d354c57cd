//! Error types for Emit.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty value")] Empty,
    #[error("invalid decimal: {0}")] InvalidDecimal(String),
    #[error("too many fractional digits in {value}: at most {max}")] TooPrecise { value: String, max: u32 },
    #[error("value out of range: {0}")] OutOfRange(String),
    #[error("rate above 100%: {0}")] RateAboveOne(String),
    #[error("negative value: {0}")] Negative(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial_allocation must be greater than zero")] ZeroInitialAllocation,
    #[error("{field} must be a positive number of cycles")] ZeroPeriod { field: &'static str },
    #[error("bonus_pool_start_cycle must be at least 1")] ZeroBonusPoolStart,
    #[error("allocation_decay_rate must be below 100%")] FullAllocationDecay,
    #[error("supply_cap ({cap}) must exceed migration_amount ({migration})")] CapNotAboveMigration { cap: String, migration: String },
    #[error("{field} exceeds the maximum of {max}")] AboveMaximum { field: &'static str, max: String },
    #[error("load: {0}")] Load(String),
}
