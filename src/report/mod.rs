//! Reporting utilities: derived KPIs and formatted output.

pub mod format;
pub mod metrics;

pub use format::{format_count, format_money, format_pct, format_share, format_summary};
pub use metrics::{DonationMode, Kpis, RiskTone};
