//! Source selection: obtain raw data from the chosen source and hand back the
//! canonical dataset.

use tracing::{info, warn};

use crate::data::api::{ApiClient, ApiOptions};
use crate::data::ingest::parse_donations_csv;
use crate::data::sample::default_dataset;
use crate::domain::{DashboardData, Source};
use crate::error::IngestError;

/// Inputs a source may need. Sources ignore the fields they don't use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub api_url: String,
    pub api: ApiOptions,
    pub csv_text: String,
}

/// Result of a fetch after fallback: always carries renderable data.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub source: Source,
    pub data: DashboardData,
    /// Message of the failure that caused the default dataset to be served.
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch from `source` and normalize to the canonical schema.
pub fn fetch_from_source(source: Source, params: &FetchParams) -> Result<DashboardData, IngestError> {
    match source {
        Source::Mock | Source::Airtable | Source::GoogleSheets => Ok(default_dataset()),
        Source::Api => ApiClient::new(params.api.clone()).fetch_dashboard(&params.api_url),
        Source::Csv => {
            let import = parse_donations_csv(&params.csv_text)?;
            let r = &import.report;
            info!(
                rows_read = r.rows_read,
                rows_used = r.rows_used,
                rows_skipped = r.rows_skipped,
                duplicate_years = r.duplicate_years,
                placeholder = r.placeholder,
                "csv import"
            );
            Ok(import.data)
        }
    }
}

/// Fetch from `source`, substituting the default dataset on any failure.
///
/// The failure message is kept on the outcome so the caller can surface it.
pub fn fetch_with_fallback(source: Source, params: &FetchParams) -> FetchOutcome {
    match fetch_from_source(source, params) {
        Ok(data) => {
            info!(?source, years = data.donations_by_year.len(), "fetch succeeded");
            FetchOutcome {
                source,
                data,
                error: None,
            }
        }
        Err(err) => {
            warn!(?source, error = %err, "fetch failed; serving default dataset");
            FetchOutcome {
                source,
                data: default_dataset(),
                error: Some(err.to_string()),
            }
        }
    }
}
