//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs a one-shot fetch (printing a summary, optionally exporting)
//! - or hands control to the TUI

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use crate::app::pipeline::{DashboardState, run_fetch};
use crate::cli::{Command, FetchArgs, SourceArgs};
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::logging::{LogTarget, TUI_LOG_FILE};

pub mod pipeline;

/// Exit code of `tdash fetch --strict` when the default dataset was served.
pub const STRICT_FALLBACK_EXIT: u8 = 3;

/// Entry point for the `tdash` binary.
pub fn run() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();

    // We want `tdash` and `tdash -s api ...` to behave like `tdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<ExitCode, AppError> {
    crate::logging::init(LogTarget::Stderr)?;

    let config = DashboardConfig::from_args(&args.source);
    let mut state = DashboardState::new();
    state.apply(run_fetch(&config.request()));

    println!("{}", crate::report::format_summary(&state));

    if let Some(path) = &args.export {
        crate::io::export::write_snapshot_json(path, &state.snapshot())?;
        info!(path = %path.display(), "exported snapshot");
        println!("Exported: {}", path.display());
    }

    Ok(ExitCode::from(fetch_exit_code(args.strict, &state)))
}

fn fetch_exit_code(strict: bool, state: &DashboardState) -> u8 {
    if strict && state.last_error.is_some() {
        STRICT_FALLBACK_EXIT
    } else {
        0
    }
}

fn handle_tui(args: SourceArgs) -> Result<ExitCode, AppError> {
    crate::logging::init(LogTarget::File(TUI_LOG_FILE.into()))?;
    crate::tui::run(DashboardConfig::from_args(&args))?;
    Ok(ExitCode::SUCCESS)
}

/// Rewrite argv so `tdash` defaults to `tdash tui`.
///
/// Rules:
/// - `tdash`                      -> `tdash tui`
/// - `tdash -s api ...`           -> `tdash tui -s api ...`
/// - `tdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "fetch");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strict_fetch_signals_fallback_in_exit_code() {
        let mut state = DashboardState::new();
        assert_eq!(fetch_exit_code(true, &state), 0);

        state.last_error = Some("Please paste CSV data or upload a file.".to_string());
        assert_eq!(fetch_exit_code(false, &state), 0);
        assert_eq!(fetch_exit_code(true, &state), STRICT_FALLBACK_EXIT);
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["tdash"])), argv(&["tdash", "tui"]));
    }

    #[test]
    fn leading_flags_are_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["tdash", "-s", "csv"])),
            argv(&["tdash", "tui", "-s", "csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for case in [&["tdash", "fetch"][..], &["tdash", "--help"], &["tdash", "tui", "-s", "api"]] {
            assert_eq!(rewrite_args(argv(case)), argv(case));
        }
    }
}
