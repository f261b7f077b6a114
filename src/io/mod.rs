//! Input/output helpers.
//!
//! - JSON snapshot export (`export`)

pub mod export;

pub use export::*;
