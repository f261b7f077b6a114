//! Display-only aggregates derived from the canonical dataset.
//!
//! Every function here tolerates empty lists; missing records read as zero.

use crate::domain::{DashboardData, DonationRecord, ImpactRecord, Project};

/// Risk level bucket for a score in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTone {
    Low,
    Medium,
    High,
}

impl RiskTone {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.66 {
            RiskTone::High
        } else if score >= 0.45 {
            RiskTone::Medium
        } else {
            RiskTone::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTone::Low => "Low",
            RiskTone::Medium => "Medium",
            RiskTone::High => "High Risk",
        }
    }
}

/// Giving cadence toggle on the donations tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationMode {
    #[default]
    OneTime,
    Monthly,
}

impl DonationMode {
    pub fn toggle(self) -> Self {
        match self {
            DonationMode::OneTime => DonationMode::Monthly,
            DonationMode::Monthly => DonationMode::OneTime,
        }
    }

    pub fn suggested_amount(self) -> f64 {
        match self {
            DonationMode::OneTime => 100.0,
            DonationMode::Monthly => 25.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DonationMode::OneTime => "One-time",
            DonationMode::Monthly => "Monthly",
        }
    }
}

/// Headline numbers shown as KPI cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub donation_total: f64,
    pub latest: DonationRecord,
    pub previous: DonationRecord,
    pub yoy: f64,
    pub program_ratio: f64,
    pub admin_ratio: f64,
    pub impact_latest: ImpactRecord,
    pub impact_score_delta: f64,
    pub recurring_share: f64,
    pub active_partnerships: usize,
    pub total_partnerships: usize,
}

const ZERO_DONATION: DonationRecord = DonationRecord { year: 0, amount: 0.0 };
const ZERO_IMPACT: ImpactRecord = ImpactRecord {
    year: 0,
    nonprofits_supported: 0,
    beneficiaries: 0,
    impact_score: 0.0,
};

impl Kpis {
    pub fn from_data(data: &DashboardData) -> Self {
        let donations = &data.donations_by_year;
        let latest = nth_from_end(donations, 0).unwrap_or(ZERO_DONATION);
        let previous = nth_from_end(donations, 1).unwrap_or(ZERO_DONATION);

        let impact_latest = nth_from_end(&data.impact_by_year, 0).unwrap_or(ZERO_IMPACT);
        let impact_previous = nth_from_end(&data.impact_by_year, 1).unwrap_or(ZERO_IMPACT);

        let program_ratio = share_of(&data.expenses_by_category, "Programs");

        Self {
            donation_total: donations.iter().map(|d| d.amount).sum(),
            latest,
            previous,
            yoy: relative_change(latest.amount, previous.amount),
            program_ratio,
            admin_ratio: 1.0 - program_ratio,
            impact_latest,
            impact_score_delta: relative_change(impact_latest.impact_score, impact_previous.impact_score),
            recurring_share: share_of(&data.donation_mix, "Monthly"),
            active_partnerships: data.partnerships.iter().filter(|p| p.active).count(),
            total_partnerships: data.partnerships.len(),
        }
    }
}

/// `(current - previous) / previous`, or 0 when there is no previous value.
pub fn relative_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous
    }
}

/// Value of the entry with `label`, 0 when absent.
pub fn share_of(entries: &[crate::domain::ShareEntry], label: &str) -> f64 {
    entries
        .iter()
        .find(|e| e.label == label)
        .map(|e| e.value)
        .unwrap_or(0.0)
}

/// Projects newest first; ties keep their input order.
pub fn projects_newest_first(projects: &[Project]) -> Vec<&Project> {
    let mut sorted: Vec<&Project> = projects.iter().collect();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));
    sorted
}

pub fn suggested_action(area: &str) -> &'static str {
    match area {
        "Donor Concentration" => "Diversify donor base; grow recurring donors.",
        "Economic Sensitivity" => "Build reserves; expand multi-year commitments.",
        "Donation Volatility" => "Stabilize via monthly giving campaigns.",
        _ => "Keep measuring outcomes + execution milestones.",
    }
}

fn nth_from_end<T: Copy>(items: &[T], n: usize) -> Option<T> {
    items.len().checked_sub(n + 1).map(|idx| items[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{csv_placeholder, default_dataset};

    #[test]
    fn kpis_for_default_dataset() {
        let k = Kpis::from_data(&default_dataset());
        assert_eq!(k.donation_total, 4_620_000.0);
        assert_eq!(k.latest.year, 2024);
        assert_eq!(k.previous.year, 2023);
        assert!((k.yoy - (1_020_000.0 - 910_000.0) / 910_000.0).abs() < 1e-12);
        assert!((k.program_ratio - 0.78).abs() < 1e-12);
        assert!((k.admin_ratio - 0.22).abs() < 1e-12);
        assert_eq!(k.impact_latest.impact_score, 82.0);
        assert!((k.impact_score_delta - 4.0 / 78.0).abs() < 1e-12);
        assert!((k.recurring_share - 0.28).abs() < 1e-12);
        assert_eq!(k.active_partnerships, 3);
        assert_eq!(k.total_partnerships, 4);
    }

    #[test]
    fn kpis_tolerate_empty_lists() {
        let mut data = csv_placeholder();
        data.expenses_by_category.clear();
        let k = Kpis::from_data(&data);
        assert_eq!(k.donation_total, 0.0);
        assert_eq!(k.latest, ZERO_DONATION);
        assert_eq!(k.yoy, 0.0);
        assert_eq!(k.program_ratio, 0.0);
        assert_eq!(k.admin_ratio, 1.0);
        assert_eq!(k.impact_latest, ZERO_IMPACT);
        assert_eq!(k.total_partnerships, 0);
    }

    #[test]
    fn single_year_has_zero_yoy() {
        let mut data = csv_placeholder();
        data.donations_by_year = vec![DonationRecord { year: 2020, amount: 10.0 }];
        let k = Kpis::from_data(&data);
        assert_eq!(k.latest.amount, 10.0);
        assert_eq!(k.previous, ZERO_DONATION);
        assert_eq!(k.yoy, 0.0);
    }

    #[test]
    fn risk_tone_thresholds() {
        assert_eq!(RiskTone::from_score(0.72), RiskTone::High);
        assert_eq!(RiskTone::from_score(0.66), RiskTone::High);
        assert_eq!(RiskTone::from_score(0.48), RiskTone::Medium);
        assert_eq!(RiskTone::from_score(0.45), RiskTone::Medium);
        assert_eq!(RiskTone::from_score(0.38), RiskTone::Low);
    }

    #[test]
    fn projects_sort_newest_first_stably() {
        let data = default_dataset();
        let names: Vec<&str> = projects_newest_first(&data.projects)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Workforce Upskilling Cohort",
                "Nonprofit Finance Toolkit",
                "Youth Mentorship Expansion",
                "Food Access Logistics",
                "Housing Navigation Pilot",
            ]
        );
    }

    #[test]
    fn donation_mode_toggles_suggested_amount() {
        let mode = DonationMode::default();
        assert_eq!(mode.suggested_amount(), 100.0);
        assert_eq!(mode.toggle().suggested_amount(), 25.0);
        assert_eq!(mode.toggle().toggle(), mode);
    }
}
