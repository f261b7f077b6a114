//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the selectable data `Source`
//! - the canonical dashboard schema (`DashboardData` and its records)

pub mod types;

pub use types::*;
