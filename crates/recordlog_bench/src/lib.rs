//! Shared helpers for the recordlog benchmarks.

pub mod utils;
