//! Built-in sample data.
//!
//! `default_dataset` is what the dashboard shows on start-up, what the mock and
//! demo sources serve, and what every failed fetch falls back to.

use crate::domain::{
    DashboardData, DonationRecord, ImpactRecord, Partnership, Project, ProjectStatus, RiskEntry, ShareEntry,
};

/// First placeholder year used when a CSV yields no usable donation rows.
pub const PLACEHOLDER_START_YEAR: i32 = 2023;

fn share(label: &str, value: f64) -> ShareEntry {
    ShareEntry {
        label: label.to_string(),
        value,
    }
}

fn donation(year: i32, amount: f64) -> DonationRecord {
    DonationRecord { year, amount }
}

fn impact(year: i32, nonprofits_supported: u32, beneficiaries: u64, impact_score: f64) -> ImpactRecord {
    ImpactRecord {
        year,
        nonprofits_supported,
        beneficiaries,
        impact_score,
    }
}

fn project(year: i32, name: &str, partner: &str, funding: f64, outcome: &str, status: ProjectStatus) -> Project {
    Project {
        year,
        name: name.to_string(),
        partner: partner.to_string(),
        funding,
        outcome: outcome.to_string(),
        status,
    }
}

fn partnership(name: &str, kind: &str, contribution: &str, active: bool) -> Partnership {
    Partnership {
        name: name.to_string(),
        kind: kind.to_string(),
        contribution: contribution.to_string(),
        active,
    }
}

fn risk(area: &str, score: f64, note: &str) -> RiskEntry {
    RiskEntry {
        area: area.to_string(),
        score,
        note: note.to_string(),
    }
}

/// The fixed fallback dataset.
pub fn default_dataset() -> DashboardData {
    DashboardData {
        donations_by_year: vec![
            donation(2019, 520_000.0),
            donation(2020, 610_000.0),
            donation(2021, 740_000.0),
            donation(2022, 820_000.0),
            donation(2023, 910_000.0),
            donation(2024, 1_020_000.0),
        ],
        donation_mix: vec![
            share("One-time", 0.62),
            share("Monthly", 0.28),
            share("Employer Match", 0.10),
        ],
        expenses_by_category: vec![
            share("Programs", 0.78),
            share("Operations", 0.14),
            share("Fundraising", 0.08),
        ],
        impact_by_year: vec![
            impact(2019, 16, 24_000, 61.0),
            impact(2020, 19, 31_000, 66.0),
            impact(2021, 22, 38_000, 70.0),
            impact(2022, 25, 47_000, 74.0),
            impact(2023, 27, 52_000, 78.0),
            impact(2024, 30, 60_000, 82.0),
        ],
        projects: vec![
            project(
                2024,
                "Workforce Upskilling Cohort",
                "Neighborhood Skills Lab",
                120_000.0,
                "Job placements +18%",
                ProjectStatus::Completed,
            ),
            project(
                2023,
                "Youth Mentorship Expansion",
                "Bridge Futures",
                85_000.0,
                "Students served +1,200",
                ProjectStatus::Completed,
            ),
            project(
                2023,
                "Food Access Logistics",
                "Community Pantry Network",
                70_000.0,
                "Delivery reliability +22%",
                ProjectStatus::Completed,
            ),
            project(
                2022,
                "Housing Navigation Pilot",
                "HomePath",
                95_000.0,
                "Stable housing +140",
                ProjectStatus::Completed,
            ),
            project(
                2024,
                "Nonprofit Finance Toolkit",
                "Civic Growth Studio",
                60_000.0,
                "Runway +4.5 months avg",
                ProjectStatus::InProgress,
            ),
        ],
        partnerships: vec![
            partnership("Corporate Partner A", "Corporate", "Matching Gifts", true),
            partnership("Foundation B", "Foundation", "Multi-year Grant", true),
            partnership("University C", "Academic", "Pro Bono Fellows", true),
            partnership("Consulting D", "Pro Bono", "Strategy & Ops", false),
        ],
        risk: vec![
            risk("Donor Concentration", 0.72, "Top donors contribute large share."),
            risk("Donation Volatility", 0.48, "Yearly variance moderate."),
            risk("Program Execution", 0.38, "Delivery stable across projects."),
            risk("Economic Sensitivity", 0.64, "Downturn could reduce giving."),
        ],
    }
}

/// Shape used for CSV imports: only donations come from the file, the rest is
/// a fixed placeholder.
pub fn csv_placeholder() -> DashboardData {
    DashboardData {
        donations_by_year: Vec::new(),
        donation_mix: vec![
            share("One-time", 0.70),
            share("Monthly", 0.20),
            share("Employer Match", 0.10),
        ],
        expenses_by_category: vec![
            share("Programs", 0.75),
            share("Operations", 0.15),
            share("Fundraising", 0.10),
        ],
        impact_by_year: Vec::new(),
        projects: Vec::new(),
        partnerships: Vec::new(),
        risk: Vec::new(),
    }
}

/// Two zero-amount years so charts never receive an empty series.
pub fn placeholder_donations() -> Vec<DonationRecord> {
    vec![
        donation(PLACEHOLDER_START_YEAR, 0.0),
        donation(PLACEHOLDER_START_YEAR + 1, 0.0),
    ]
}
