//! REST endpoint integration.
//!
//! The endpoint is expected to return the canonical dashboard object as JSON.
//! Only `donationsByYear` is required; see `decode_dashboard_json`.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{DashboardData, DonationRecord};
use crate::error::IngestError;

/// Request options from the advanced settings (`--api-key`, `--header`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOptions {
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
    /// Extra request headers, sent in order after the bearer token.
    pub headers: Vec<(String, String)>,
}

pub struct ApiClient {
    client: Client,
    options: ApiOptions,
}

impl ApiClient {
    pub fn new(options: ApiOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    /// GET `url` and decode the body into canonical data.
    pub fn fetch_dashboard(&self, url: &str) -> Result<DashboardData, IngestError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(IngestError::Validation("Please enter an API endpoint URL.".to_string()));
        }

        let mut req = self.client.get(url);
        if let Some(key) = self.options.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.bearer_auth(key);
        }
        for (name, value) in &self.options.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .map_err(|e| IngestError::Network(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IngestError::Network(format!("HTTP {status}")));
        }

        let body = resp
            .text()
            .map_err(|e| IngestError::Network(format!("failed to read response body: {e}")))?;

        decode_dashboard_json(&body)
    }
}

/// Decode an API body into canonical data.
///
/// The body must be JSON (`ParseError` otherwise) and carry a `donationsByYear`
/// array of donation records (`SchemaError` otherwise). The other lists are
/// best effort: absent or non-list fields read as empty, and individual
/// records that do not fit the schema are dropped with a warning. Records are
/// passed through as given: no re-sorting or range checks.
pub fn decode_dashboard_json(body: &str) -> Result<DashboardData, IngestError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| IngestError::Parse(format!("response is not valid JSON: {e}")))?;

    let Value::Object(mut fields) = value else {
        return Err(IngestError::Schema("missing `donationsByYear`".to_string()));
    };

    let donations_by_year: Vec<DonationRecord> = match fields.remove("donationsByYear") {
        Some(list @ Value::Array(_)) => {
            serde_json::from_value(list).map_err(|e| IngestError::Schema(format!("`donationsByYear`: {e}")))?
        }
        Some(_) => {
            return Err(IngestError::Schema("`donationsByYear` is not a list".to_string()));
        }
        None => {
            return Err(IngestError::Schema("missing `donationsByYear`".to_string()));
        }
    };

    Ok(DashboardData {
        donations_by_year,
        donation_mix: lenient_list(&mut fields, "donationMix"),
        expenses_by_category: lenient_list(&mut fields, "expensesByCategory"),
        impact_by_year: lenient_list(&mut fields, "impactByYear"),
        projects: lenient_list(&mut fields, "projects"),
        partnerships: lenient_list(&mut fields, "partnerships"),
        risk: lenient_list(&mut fields, "risk"),
    })
}

fn lenient_list<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Vec<T> {
    let items = match fields.remove(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(field = key, "ignoring non-list field in API response");
            return Vec::new();
        }
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!(field = key, dropped = total - kept.len(), "dropped malformed records");
    }
    kept
}

/// Parse a `Name: value` header argument.
pub fn parse_header_arg(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("Invalid header '{raw}'. Expected `Name: value`."))?;
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return Err(format!("Invalid header name in '{raw}'."));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
