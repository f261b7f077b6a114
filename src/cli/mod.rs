//! Command-line parsing for the transparency dashboard.
//!
//! Argument parsing and command dispatch stay separate from ingestion and
//! rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::api::parse_header_arg;
use crate::domain::Source;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tdash", version, about = "Nonprofit Transparency & Impact Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(SourceArgs),
    /// Fetch once, print a summary, and optionally export a JSON snapshot.
    Fetch(FetchArgs),
}

/// Where to load dashboard data from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Data source to load.
    #[arg(short = 's', long, value_enum, default_value_t = Source::Mock)]
    pub source: Source,

    /// REST endpoint returning the dashboard JSON object.
    #[arg(long, env = "DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// CSV file with `year` and `donations` columns.
    #[arg(long, value_name = "CSV", conflicts_with = "csv_text")]
    pub csv: Option<PathBuf>,

    /// CSV text given inline (e.g. "year,donations\n2024,100").
    ///
    /// A literal `\n` is read as a row break unless the text already contains
    /// real newlines.
    #[arg(long, value_name = "TEXT")]
    pub csv_text: Option<String>,

    /// Bearer token sent to the API endpoint.
    #[arg(long, env = "DASHBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Extra request header for the API endpoint (repeatable).
    #[arg(long = "header", value_name = "NAME: VALUE", value_parser = parse_header_arg)]
    pub headers: Vec<(String, String)>,

    /// Re-fetch the current source every N seconds in the TUI (0 disables).
    #[arg(long, default_value_t = 0)]
    pub refresh_secs: u64,
}

/// Options for a one-shot fetch.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the fetched dataset as a JSON snapshot.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Exit non-zero when the fetch fell back to the default dataset.
    #[arg(long)]
    pub strict: bool,
}
