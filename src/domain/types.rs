//! Shared domain types.
//!
//! These types are the canonical dashboard schema. Every data source either
//! produces them directly (mock data, API JSON) or is normalized into them (CSV).
//!
//! They are kept plain and serializable so they can be:
//!
//! - decoded straight from an API response body
//! - held in memory as the single in-session dataset
//! - exported to a JSON snapshot

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where dashboard data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    /// Built-in sample data.
    Mock,
    /// JSON object fetched from a REST endpoint.
    Api,
    /// CSV text with `year` and `donations` columns.
    Csv,
    /// Demo entry; serves the built-in sample data.
    Airtable,
    /// Demo entry; serves the built-in sample data.
    GoogleSheets,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Mock,
        Source::Api,
        Source::Csv,
        Source::Airtable,
        Source::GoogleSheets,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Source::Mock => "Mock Data",
            Source::Api => "API Endpoint",
            Source::Csv => "CSV Upload",
            Source::Airtable => "Airtable",
            Source::GoogleSheets => "Google Sheets",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Source::Mock => "Use built-in sample data",
            Source::Api => "Fetch from REST API",
            Source::Csv => "Upload CSV files",
            Source::Airtable | Source::GoogleSheets => "Demo (mock fallback)",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Total donations received in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub year: i32,
    pub amount: f64,
}

/// A labelled fraction of a whole (0..=1).
///
/// Used for both the donation mix and the expense breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub label: String,
    pub value: f64,
}

pub type DonationMixEntry = ShareEntry;
pub type ExpenseEntry = ShareEntry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRecord {
    pub year: i32,
    pub nonprofits_supported: u32,
    pub beneficiaries: u64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
    /// Any status this dashboard has no badge for (e.g. "Planned").
    #[serde(other)]
    Other,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub year: i32,
    pub name: String,
    #[serde(default)]
    pub partner: String,
    pub funding: f64,
    #[serde(default)]
    pub outcome: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub contribution: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub area: String,
    pub score: f64,
    #[serde(default)]
    pub note: String,
}

/// The canonical dashboard dataset.
///
/// `donations_by_year` is the only field an API payload must carry; the other
/// lists default to empty so the presentation layer always has something to
/// iterate over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub donations_by_year: Vec<DonationRecord>,
    #[serde(default)]
    pub donation_mix: Vec<DonationMixEntry>,
    #[serde(default)]
    pub expenses_by_category: Vec<ExpenseEntry>,
    #[serde(default)]
    pub impact_by_year: Vec<ImpactRecord>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub partnerships: Vec<Partnership>,
    #[serde(default)]
    pub risk: Vec<RiskEntry>,
}
