//! Resolved runtime configuration.
//!
//! Precedence: command-line flags, then environment (`.env` is loaded by
//! `app::run` before parsing, so clap's `env` fallbacks see it), then the
//! defaults below.

use std::path::PathBuf;
use std::time::Duration;

use crate::app::pipeline::FetchRequest;
use crate::cli::SourceArgs;
use crate::data::{ApiOptions, FetchParams};
use crate::domain::Source;

pub const DEFAULT_API_URL: &str = "https://api.example.com/dashboard-data";

/// Environment variable holding the tracing filter (e.g. `debug`).
pub const LOG_ENV: &str = "DASHBOARD_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: Source,
    pub api_url: String,
    pub api: ApiOptions,
    pub csv_path: Option<PathBuf>,
    pub csv_text: String,
    pub refresh: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: Source::Mock,
            api_url: DEFAULT_API_URL.to_string(),
            api: ApiOptions::default(),
            csv_path: None,
            csv_text: String::new(),
            refresh: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_args(args: &SourceArgs) -> Self {
        Self {
            source: args.source,
            api_url: args
                .api_url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api: ApiOptions {
                api_key: args.api_key.clone(),
                headers: args.headers.clone(),
            },
            csv_path: args.csv.clone(),
            csv_text: args.csv_text.as_deref().map(unescape_csv_text).unwrap_or_default(),
            refresh: (args.refresh_secs > 0).then(|| Duration::from_secs(args.refresh_secs)),
        }
    }

    /// Build a fetch for `source` from the current settings.
    pub fn request_for(&self, source: Source) -> FetchRequest {
        FetchRequest {
            source,
            params: FetchParams {
                api_url: self.api_url.clone(),
                api: self.api.clone(),
                csv_text: self.csv_text.clone(),
            },
            csv_path: self.csv_path.clone(),
        }
    }

    pub fn request(&self) -> FetchRequest {
        self.request_for(self.source)
    }
}

/// Shells pass `\n` literally; treat it as a row break, but only when the
/// text has no real newline (otherwise a `\n` sits inside a cell).
fn unescape_csv_text(text: &str) -> String {
    if text.contains('\n') {
        text.to_string()
    } else {
        text.replace("\\n", "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SourceArgs {
        SourceArgs {
            source: Source::Csv,
            api_url: None,
            csv: None,
            csv_text: Some("year,donations\\n2024,1".to_string()),
            api_key: Some("k".to_string()),
            headers: vec![],
            refresh_secs: 0,
        }
    }

    #[test]
    fn defaults_fill_missing_settings() {
        let cfg = DashboardConfig::from_args(&args());
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.refresh, None);
        assert_eq!(cfg.csv_text, "year,donations\n2024,1");
        assert_eq!(cfg.api.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn literal_backslash_n_kept_when_text_has_real_rows() {
        let text = "year,donations,note\n2024,1,\"a\\nb\"\n";
        assert_eq!(unescape_csv_text(text), text);
        assert_eq!(unescape_csv_text("year,donations\\n2024,1"), "year,donations\n2024,1");
    }

    #[test]
    fn request_carries_settings() {
        let mut a = args();
        a.refresh_secs = 30;
        a.csv = Some(PathBuf::from("gifts.csv"));
        let cfg = DashboardConfig::from_args(&a);
        assert_eq!(cfg.refresh, Some(Duration::from_secs(30)));

        let req = cfg.request();
        assert_eq!(req.source, Source::Csv);
        assert_eq!(req.csv_path, Some(PathBuf::from("gifts.csv")));
        assert_eq!(req.params.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.request_for(Source::Mock).source, Source::Mock);
    }
}
