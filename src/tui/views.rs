//! Per-tab rendering.
//!
//! Everything here reads `App` and the derived KPIs; nothing mutates state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use super::plotters_chart::YearLineChart;
use super::{App, EditField, Tab};
use crate::domain::{DashboardData, ProjectStatus, ShareEntry, Source};
use crate::report::metrics::{projects_newest_first, suggested_action};
use crate::report::{Kpis, RiskTone, format_count, format_money, format_pct, format_share};

const GOOD: Color = Color::Green;
const WARN: Color = Color::Yellow;
const BAD: Color = Color::Red;

pub(super) fn draw_tab(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let data = &app.state.data;
    let kpis = Kpis::from_data(data);
    match app.tab {
        Tab::Home => draw_home(frame, area, data, &kpis),
        Tab::Donations => draw_donations(frame, area, app, &kpis),
        Tab::Expenses => draw_expenses(frame, area, data, &kpis),
        Tab::Impact => draw_impact(frame, area, data, &kpis),
        Tab::Projects => draw_projects(frame, area, data),
        Tab::Partnerships => draw_partnerships(frame, area, data, &kpis),
        Tab::Risk => draw_risk(frame, area, data),
        Tab::Data => draw_data_source(frame, area, app),
    }
}

fn tone(positive: bool) -> Color {
    if positive { GOOD } else { BAD }
}

fn risk_color(t: RiskTone) -> Color {
    match t {
        RiskTone::Low => GOOD,
        RiskTone::Medium => WARN,
        RiskTone::High => BAD,
    }
}

struct Kpi {
    label: &'static str,
    value: String,
    delta: Option<(String, Color)>,
}

fn kpi(label: &'static str, value: String, delta: Option<(String, Color)>) -> Kpi {
    Kpi { label, value, delta }
}

fn split_kpis_and_body(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

fn columns(area: Rect, n: u32) -> std::rc::Rc<[Rect]> {
    let constraints: Vec<Constraint> = (0..n).map(|_| Constraint::Ratio(1, n)).collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
}

fn draw_kpis(frame: &mut Frame<'_>, area: Rect, cards: &[Kpi]) {
    let cols = columns(area, cards.len() as u32);
    for (card, rect) in cards.iter().zip(cols.iter()) {
        let mut lines = vec![Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))];
        if let Some((delta, color)) = &card.delta {
            lines.push(Line::from(Span::styled(delta.clone(), Style::default().fg(*color))));
        }
        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(Span::styled(card.label, Style::default().fg(Color::Gray)))
                .borders(Borders::ALL),
        );
        frame.render_widget(p, *rect);
    }
}

fn fmt_thousands_usd(v: f64) -> String {
    format!("${:.0}k", v / 1000.0)
}

fn fmt_plain(v: f64) -> String {
    format!("{v:.0}")
}

fn draw_year_line(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    series: &[(f64, f64)],
    y_label: &str,
    fmt_y: fn(f64) -> String,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(YearLineChart::new(series, y_label, fmt_y), inner);
}

fn draw_share_bars(frame: &mut Frame<'_>, area: Rect, title: &str, entries: &[ShareEntry]) {
    let owned: Vec<(String, u64)> = entries
        .iter()
        .map(|e| (e.label.clone(), (e.value * 100.0).round().max(0.0) as u64))
        .collect();
    let bars: Vec<(&str, u64)> = owned.iter().map(|(l, v)| (l.as_str(), *v)).collect();
    let width = bar_width(area, bars.len());
    let chart = BarChart::default()
        .block(Block::default().title(format!("{title} (%)")).borders(Borders::ALL))
        .bar_width(width)
        .bar_gap(1)
        .max(100)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(bars.as_slice());
    frame.render_widget(chart, area);
}

fn draw_year_bars(frame: &mut Frame<'_>, area: Rect, title: &str, points: &[(i32, f64)]) {
    let owned: Vec<(String, u64)> = points
        .iter()
        .map(|(year, v)| (year.to_string(), v.round().max(0.0) as u64))
        .collect();
    let bars: Vec<(&str, u64)> = owned.iter().map(|(l, v)| (l.as_str(), *v)).collect();
    let width = bar_width(area, bars.len());
    let chart = BarChart::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .bar_width(width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta))
        .data(bars.as_slice());
    frame.render_widget(chart, area);
}

fn bar_width(area: Rect, n: usize) -> u16 {
    if n == 0 {
        return 1;
    }
    let usable = area.width.saturating_sub(2) as usize;
    ((usable / n).saturating_sub(1)).clamp(1, 12) as u16
}

fn donation_series(data: &DashboardData) -> Vec<(f64, f64)> {
    data.donations_by_year
        .iter()
        .map(|d| (d.year as f64, d.amount))
        .collect()
}

fn impact_scores(data: &DashboardData) -> Vec<(i32, f64)> {
    data.impact_by_year.iter().map(|r| (r.year, r.impact_score)).collect()
}

fn draw_home(frame: &mut Frame<'_>, area: Rect, data: &DashboardData, k: &Kpis) {
    let (top, body) = split_kpis_and_body(area);
    draw_kpis(
        frame,
        top,
        &[
            kpi(
                "Total Donations (Lifetime)",
                format_money(k.donation_total),
                Some((format_pct(k.yoy), tone(k.yoy >= 0.0))),
            ),
            kpi(
                "Latest Year Donations",
                format_money(k.latest.amount),
                Some((k.latest.year.to_string(), WARN)),
            ),
            kpi(
                "Program Spend Ratio",
                format_share(k.program_ratio),
                Some((format!("Admin: {}", format_share(k.admin_ratio)), GOOD)),
            ),
            kpi(
                "Impact Score (Latest)",
                k.impact_latest.impact_score.to_string(),
                Some((format_pct(k.impact_score_delta), tone(k.impact_score_delta >= 0.0))),
            ),
        ],
    );

    let cols = columns(body, 3);
    let series = donation_series(data);
    draw_year_line(frame, cols[0], "Donations by Year", &series, "USD", fmt_thousands_usd);
    draw_share_bars(frame, cols[1], "Expense Allocation", &data.expenses_by_category);
    draw_year_bars(frame, cols[2], "Impact Score Trend", &impact_scores(data));
}

fn draw_donations(frame: &mut Frame<'_>, area: Rect, app: &App, k: &Kpis) {
    let data = &app.state.data;
    let (top, body) = split_kpis_and_body(area);
    draw_kpis(
        frame,
        top,
        &[
            kpi("Total Raised (Lifetime)", format_money(k.donation_total), None),
            kpi(
                "YoY Growth (Latest)",
                format_pct(k.yoy),
                Some((format!("{} vs {}", k.latest.year, k.previous.year), tone(k.yoy >= 0.0))),
            ),
            kpi(
                "Avg Donation (Demo)",
                format_money(185.0),
                Some(("Estimated".to_string(), WARN)),
            ),
            kpi(
                "Recurring Share",
                format_share(k.recurring_share),
                Some(("Monthly donors".to_string(), GOOD)),
            ),
        ],
    );

    let cols = columns(body, 2);
    let series = donation_series(data);
    draw_year_line(frame, cols[0], "Donations by Year", &series, "USD", fmt_thousands_usd);

    let panel = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(cols[1]);

    let mode = app.donation_mode;
    let lines = vec![
        Line::from(Span::styled("UI demo: no payment is processed.", Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::raw("Mode: "),
            Span::styled(mode.label(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled("  (m to switch)", Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::raw("Suggested amount: "),
            Span::styled(
                format_money(mode.suggested_amount()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled("Enter: continue to payment (demo)", Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(Block::default().title("Donate (Demo)").borders(Borders::ALL)),
        panel[0],
    );

    let rows: Vec<Row> = data
        .donation_mix
        .iter()
        .map(|x| Row::new(vec![x.label.clone(), format_share(x.value)]))
        .collect();
    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(8)])
        .header(header_row(&["Type", "Share"]))
        .block(Block::default().title("Donation mix").borders(Borders::ALL));
    frame.render_widget(table, panel[1]);
}

fn draw_expenses(frame: &mut Frame<'_>, area: Rect, data: &DashboardData, k: &Kpis) {
    let (top, body) = split_kpis_and_body(area);
    draw_kpis(
        frame,
        top,
        &[
            kpi(
                "Program Spend",
                format_share(k.program_ratio),
                Some(("Target: ≥75%".to_string(), GOOD)),
            ),
            kpi(
                "Ops + Fundraising",
                format_share(k.admin_ratio),
                Some(("Efficiency".to_string(), WARN)),
            ),
            kpi(
                "Cost per Nonprofit (Demo)",
                format_money(32_000.0),
                Some(("Estimated".to_string(), WARN)),
            ),
            kpi("Admin Efficiency (Demo)", "High".to_string(), Some(("Benchmarking".to_string(), GOOD))),
        ],
    );

    let cols = columns(body, 2);
    draw_share_bars(frame, cols[0], "Expense Allocation", &data.expenses_by_category);

    let rows: Vec<Row> = data
        .expenses_by_category
        .iter()
        .map(|x| {
            let signal = if x.label == "Programs" {
                Cell::from(Span::styled("High impact", Style::default().fg(GOOD)))
            } else {
                Cell::from(Span::styled("Monitor", Style::default().fg(WARN)))
            };
            Row::new(vec![Cell::from(x.label.clone()), Cell::from(format_share(x.value)), signal])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(14), Constraint::Length(7), Constraint::Length(12)],
    )
    .header(header_row(&["Category", "Share", "Signal"]))
    .block(Block::default().title("Expense Summary").borders(Borders::ALL));
    frame.render_widget(table, cols[1]);
}

fn draw_impact(frame: &mut Frame<'_>, area: Rect, data: &DashboardData, k: &Kpis) {
    let (top, body) = split_kpis_and_body(area);
    let latest = k.impact_latest;
    draw_kpis(
        frame,
        top,
        &[
            kpi(
                "Nonprofits Supported (Latest)",
                latest.nonprofits_supported.to_string(),
                Some((latest.year.to_string(), GOOD)),
            ),
            kpi(
                "Beneficiaries (Latest)",
                format_count(latest.beneficiaries),
                Some(("Estimated".to_string(), WARN)),
            ),
            kpi(
                "Impact Score",
                latest.impact_score.to_string(),
                Some((format_pct(k.impact_score_delta), GOOD)),
            ),
            kpi("Sustainability (Demo)", "84%".to_string(), Some(("Proxy".to_string(), GOOD))),
        ],
    );

    let cols = columns(body, 2);
    let beneficiaries: Vec<(f64, f64)> = data
        .impact_by_year
        .iter()
        .map(|r| (r.year as f64, r.beneficiaries as f64))
        .collect();
    draw_year_line(frame, cols[0], "Beneficiaries by Year", &beneficiaries, "people", fmt_plain);
    draw_year_bars(frame, cols[1], "Impact Score Trend", &impact_scores(data));
}

fn draw_projects(frame: &mut Frame<'_>, area: Rect, data: &DashboardData) {
    let rows: Vec<Row> = projects_newest_first(&data.projects)
        .into_iter()
        .map(|p| {
            let status = match p.status {
                ProjectStatus::Completed => Span::styled(p.status.label(), Style::default().fg(GOOD)),
                ProjectStatus::InProgress => Span::styled(p.status.label(), Style::default().fg(WARN)),
                ProjectStatus::Other => Span::styled(p.status.label(), Style::default().fg(Color::Gray)),
            };
            Row::new(vec![
                Cell::from(p.year.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(p.partner.clone()),
                Cell::from(format_money(p.funding)),
                Cell::from(p.outcome.clone()),
                Cell::from(status),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(26),
            Constraint::Percentage(22),
            Constraint::Length(14),
            Constraint::Percentage(24),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Year", "Project", "Partner", "Funding", "Outcome", "Status"]))
    .block(Block::default().title("Projects accomplished").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn draw_partnerships(frame: &mut Frame<'_>, area: Rect, data: &DashboardData, k: &Kpis) {
    let (top, body) = split_kpis_and_body(area);
    draw_kpis(
        frame,
        top,
        &[
            kpi("Active Partnerships", k.active_partnerships.to_string(), None),
            kpi("Total Partners", k.total_partnerships.to_string(), None),
            kpi("Pro Bono Value (Demo)", format_money(180_000.0), None),
            kpi("Corporate Match Utilization (Demo)", "Medium".to_string(), None),
        ],
    );

    let rows: Vec<Row> = data
        .partnerships
        .iter()
        .map(|p| {
            let status = if p.active {
                Span::styled("Active", Style::default().fg(GOOD))
            } else {
                Span::styled("Inactive", Style::default().fg(WARN))
            };
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.kind.clone()),
                Cell::from(p.contribution.clone()),
                Cell::from(status),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Length(10),
        ],
    )
    .header(header_row(&["Name", "Type", "Contribution", "Status"]))
    .block(Block::default().title("Partners").borders(Borders::ALL));
    frame.render_widget(table, body);
}

fn draw_risk(frame: &mut Frame<'_>, area: Rect, data: &DashboardData) {
    let n = data.risk.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(n.saturating_mul(4).max(3)), Constraint::Min(0)])
        .split(area);

    if data.risk.is_empty() {
        frame.render_widget(
            Paragraph::new("No risk entries in this dataset.")
                .style(Style::default().fg(WARN))
                .block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );
    } else {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(4); data.risk.len()])
            .split(chunks[0]);
        for (r, rect) in data.risk.iter().zip(rows.iter()) {
            let t = RiskTone::from_score(r.score);
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(*rect);
            let gauge = Gauge::default()
                .block(Block::default().title(r.area.clone()).borders(Borders::ALL))
                .gauge_style(Style::default().fg(risk_color(t)))
                .ratio(r.score.clamp(0.0, 1.0))
                .label(format!("{} {}", (r.score * 100.0).round() as i64, t.label()));
            frame.render_widget(gauge, parts[0]);

            let text = Text::from(vec![
                Line::from(Span::styled(r.note.clone(), Style::default().fg(Color::Gray))),
                Line::from(format!("Suggested action: {}", suggested_action(&r.area))),
            ]);
            frame.render_widget(
                Paragraph::new(text)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL)),
                parts[1],
            );
        }
    }

    let actions = [
        ("Increase recurring donations", "to reduce volatility and improve planning."),
        ("Launch employer matching push", "to multiply donations with low overhead."),
        ("Prioritize high-ROI programs", "(impact per dollar) and publish outcomes."),
        ("Improve transparency", "with annual report + audited financial links."),
    ];
    let lines: Vec<Line> = actions
        .iter()
        .map(|(head, tail)| {
            Line::from(vec![
                Span::raw("• "),
                Span::styled(*head, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {tail}"), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().title("Recommended Actions").borders(Borders::ALL)),
        chunks[1],
    );
}

fn draw_data_source(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let cols = columns(area, 2);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(Source::ALL.len() as u16 + 2), Constraint::Min(0)])
        .split(cols[0]);

    let items: Vec<ListItem> = Source::ALL
        .iter()
        .map(|s| {
            let marker = if *s == app.state.source { " (current)" } else { "" };
            ListItem::new(Line::from(vec![
                Span::raw(s.display_name()),
                Span::styled(format!("  {}{marker}", s.description()), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().title("Data Source").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");
    let mut state = ListState::default();
    state.select(Source::ALL.iter().position(|s| *s == app.selected_source));
    frame.render_stateful_widget(list, left[0], &mut state);

    let field_line = |label: &str, field: EditField, value: String| {
        if app.editing == Some(field) {
            Line::from(vec![
                Span::raw(format!("{label}: ")),
                Span::styled(
                    format!("{}▏", app.input),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(format!("{label}: {value}"))
        }
    };
    let csv_path = app
        .config
        .csv_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let inline_csv = if app.config.csv_text.is_empty() {
        "none".to_string()
    } else {
        format!("{} lines", app.config.csv_text.lines().count())
    };
    let refresh = app
        .config
        .refresh
        .map(|d| format!("every {}s", d.as_secs()))
        .unwrap_or_else(|| "disabled".to_string());

    let settings = Text::from(vec![
        field_line("API URL (u)", EditField::ApiUrl, app.config.api_url.clone()),
        field_line("CSV file (c)", EditField::CsvPath, csv_path),
        Line::from(format!("Inline CSV: {inline_csv}")),
        Line::from(format!("Auto-refresh: {refresh}")),
        Line::from(""),
        Line::from(Span::styled(
            "CSV expects columns: year, donations. API should return the full dashboard object.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(
        Paragraph::new(settings)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Settings").borders(Borders::ALL)),
        left[1],
    );

    let data = &app.state.data;
    let preview = serde_json::json!({
        "donationsByYear": data.donations_by_year,
        "expensesByCategory": data.expenses_by_category,
        "projectsCount": data.projects.len(),
        "partnershipsCount": data.partnerships.len(),
    });
    let body = serde_json::to_string_pretty(&preview).unwrap_or_else(|e| format!("preview unavailable: {e}"));
    let title = format!(
        "Current Data Preview ({} years of donation data)",
        data.donations_by_year.len()
    );
    frame.render_widget(
        Paragraph::new(body).block(Block::default().title(title).borders(Borders::ALL)),
        cols[1],
    );
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.to_vec())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .bottom_margin(1)
}
