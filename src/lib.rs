//! `transparency-dashboard` library crate.
//!
//! The binary (`tdash`) is a thin wrapper around this library so that:
//!
//! - ingestion is testable without spawning processes or a terminal
//! - the CLI and the TUI share one fetch pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
