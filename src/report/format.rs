//! Formatted terminal output.
//!
//! Number formatting lives here so the CLI summary and the TUI widgets agree.

use chrono::Local;

use crate::app::pipeline::DashboardState;
use crate::report::metrics::{Kpis, RiskTone};

/// US dollars with thousands separators and cents: `$1,020,000.00`.
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Signed percent with one decimal: `+12.1%`, `-3.0%`, `0.0%`.
pub fn format_pct(fraction: f64) -> String {
    let sign = if fraction > 0.0 { "+" } else { "" };
    format!("{sign}{:.1}%", fraction * 100.0)
}

/// A 0..=1 share as a whole percent: `78%`.
pub fn format_share(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// Integer with thousands separators: `60,000`.
pub fn format_count(n: u64) -> String {
    group_thousands(n)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain-text dashboard summary for the CLI.
pub fn format_summary(state: &DashboardState) -> String {
    let data = &state.data;
    let k = Kpis::from_data(data);
    let mut out = String::new();

    out.push_str("=== tdash - Transparency & Impact Dashboard ===\n");
    out.push_str(&format!(
        "Source: {} | last fetched: {}\n",
        state.source.display_name(),
        state.last_fetched.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
    ));
    if let Some(err) = &state.last_error {
        out.push_str(&format!("Warning: {err} (showing default data)\n"));
    }

    out.push_str("\nKey figures:\n");
    out.push_str(&format!(
        "  Total donations (lifetime): {} ({} YoY)\n",
        format_money(k.donation_total),
        format_pct(k.yoy)
    ));
    out.push_str(&format!(
        "  Latest year donations:      {} ({})\n",
        format_money(k.latest.amount),
        k.latest.year
    ));
    out.push_str(&format!(
        "  Program spend ratio:        {} (admin {})\n",
        format_share(k.program_ratio),
        format_share(k.admin_ratio)
    ));
    out.push_str(&format!(
        "  Impact score (latest):      {} ({})\n",
        k.impact_latest.impact_score,
        format_pct(k.impact_score_delta)
    ));

    out.push_str("\nDonations by year:\n");
    for d in &data.donations_by_year {
        out.push_str(&format!("  {:>6}  {:>16}\n", d.year, format_money(d.amount)));
    }

    out.push_str("\nExpenses:\n");
    for e in &data.expenses_by_category {
        out.push_str(&format!("  {:<16} {:>5}\n", e.label, format_share(e.value)));
    }

    if !data.risk.is_empty() {
        out.push_str("\nRisk:\n");
        for r in &data.risk {
            out.push_str(&format!(
                "  {:<22} {:>3}  {}\n",
                r.area,
                (r.score * 100.0).round() as i64,
                RiskTone::from_score(r.score).label()
            ));
        }
    }

    out.push_str(&format!(
        "\nProjects: {} | Partnerships: {} ({} active)\n",
        data.projects.len(),
        k.total_partnerships,
        k.active_partnerships
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FetchOutcome;
    use crate::data::sample::default_dataset;
    use crate::domain::Source;

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(1_020_000.0), "$1,020,000.00");
        assert_eq!(format_money(185.0), "$185.00");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-1234.5), "-$1,234.50");
        assert_eq!(format_money(999.999), "$1,000.00");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_pct(0.1209), "+12.1%");
        assert_eq!(format_pct(0.0), "0.0%");
        assert_eq!(format_pct(-0.03), "-3.0%");
        assert_eq!(format_share(0.78), "78%");
        assert_eq!(format_count(60_000), "60,000");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn summary_surfaces_fallback_error() {
        let mut state = DashboardState::new();
        state.apply(FetchOutcome {
            source: Source::Api,
            data: default_dataset(),
            error: Some("Network error: HTTP 500 Internal Server Error".to_string()),
        });
        let text = format_summary(&state);
        assert!(text.contains("Source: API Endpoint"));
        assert!(text.contains("HTTP 500"));
        assert!(text.contains("$4,620,000.00"));
        assert!(text.contains("Donor Concentration"));
    }
}
