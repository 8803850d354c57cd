//! Shared helpers for Emit integration tests.

pub mod helpers;
