//! Export the current dataset as a JSON snapshot.
//!
//! The snapshot is the canonical object with two timestamps added at the top
//! level, so it can be fed back to the API source unchanged.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DashboardData;
use crate::error::AppError;

pub const DEFAULT_EXPORT_FILE: &str = "dashboard_data.json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub generated_at: DateTime<Utc>,
    pub last_fetched: DateTime<Utc>,
    #[serde(flatten)]
    pub data: &'a DashboardData,
}

/// Write a snapshot as pretty-printed JSON.
pub fn write_snapshot_json(path: &Path, snapshot: &Snapshot<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::api::decode_dashboard_json;
    use crate::data::sample::default_dataset;

    #[test]
    fn snapshot_round_trips_through_api_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let data = default_dataset();
        let fetched = Utc::now();
        let snapshot = Snapshot {
            generated_at: Utc::now(),
            last_fetched: fetched,
            data: &data,
        };

        write_snapshot_json(&path, &snapshot).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["generatedAt"].is_string());
        assert_eq!(value["lastFetched"], serde_json::to_value(fetched).unwrap());
        assert_eq!(value["donationsByYear"].as_array().unwrap().len(), 6);

        assert_eq!(decode_dashboard_json(&text).unwrap(), data);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let data = default_dataset();
        let snapshot = Snapshot {
            generated_at: Utc::now(),
            last_fetched: Utc::now(),
            data: &data,
        };
        let err = write_snapshot_json(&dir.path().join("missing/dir/out.json"), &snapshot).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
