//! Ratatui-based terminal UI.
//!
//! Tabs mirror the dashboard sections. The Data Source tab picks a source and
//! triggers fetches; fetches run on worker threads so the UI stays responsive,
//! and every completed fetch replaces the dataset (last to finish wins).

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use tracing::{info, warn};

use crate::app::pipeline::{DashboardState, FetchDone, spawn_fetch};
use crate::config::DashboardConfig;
use crate::domain::Source;
use crate::error::AppError;
use crate::io::export::{DEFAULT_EXPORT_FILE, write_snapshot_json};
use crate::report::DonationMode;

mod plotters_chart;
mod views;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Home,
    Donations,
    Expenses,
    Impact,
    Projects,
    Partnerships,
    Risk,
    Data,
}

impl Tab {
    const ALL: [Tab; 8] = [
        Tab::Home,
        Tab::Donations,
        Tab::Expenses,
        Tab::Impact,
        Tab::Projects,
        Tab::Partnerships,
        Tab::Risk,
        Tab::Data,
    ];

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Donations => "Donations",
            Tab::Expenses => "Expenses",
            Tab::Impact => "Impact",
            Tab::Projects => "Projects",
            Tab::Partnerships => "Partnerships",
            Tab::Risk => "Risk & Insights",
            Tab::Data => "Data Source",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let n = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(n);
        Self::ALL[idx as usize]
    }
}

/// Text field being edited on the Data Source tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditField {
    ApiUrl,
    CsvPath,
}

struct App {
    config: DashboardConfig,
    state: DashboardState,
    tab: Tab,
    /// Source highlighted on the Data Source tab; becomes `config.source` on fetch.
    selected_source: Source,
    editing: Option<EditField>,
    input: String,
    donation_mode: DonationMode,
    status: String,
    tx: Sender<FetchDone>,
    rx: Receiver<FetchDone>,
    next_ticket: u64,
    pending: usize,
    last_refresh: Instant,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            selected_source: config.source,
            config,
            state: DashboardState::new(),
            tab: Tab::Home,
            editing: None,
            input: String::new(),
            donation_mode: DonationMode::default(),
            status: String::new(),
            tx,
            rx,
            next_ticket: 0,
            pending: 0,
            last_refresh: Instant::now(),
        };
        if app.config.source != Source::Mock {
            app.start_fetch(app.config.source);
        }
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_fetches() {
                needs_redraw = true;
            }
            if self.maybe_auto_refresh() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply every completed fetch. Returns true when anything changed.
    fn drain_fetches(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(done) => {
                    self.pending = self.pending.saturating_sub(1);
                    self.status = match &done.outcome.error {
                        None => format!(
                            "Loaded {} ({} years of donations).",
                            done.outcome.source.display_name(),
                            done.outcome.data.donations_by_year.len()
                        ),
                        Some(_) => "Fetch failed; showing default data.".to_string(),
                    };
                    info!(ticket = done.ticket, fallback = done.outcome.is_fallback(), "applying fetch");
                    self.state.apply(done.outcome);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                // We hold `tx` ourselves, so this cannot happen while running.
                Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn maybe_auto_refresh(&mut self) -> bool {
        let Some(every) = self.config.refresh else {
            return false;
        };
        // A hung endpoint must not pile up workers, one per tick.
        if self.pending > 0 || self.last_refresh.elapsed() < every {
            return false;
        }
        self.start_fetch(self.config.source);
        true
    }

    fn start_fetch(&mut self, source: Source) {
        self.config.source = source;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending += 1;
        self.last_refresh = Instant::now();
        self.status = format!("Fetching {}...", source.display_name());
        spawn_fetch(ticket, self.config.request_for(source), self.tx.clone());
    }

    fn export(&mut self) {
        let path = PathBuf::from(DEFAULT_EXPORT_FILE);
        match write_snapshot_json(&path, &self.state.snapshot()) {
            Ok(()) => {
                info!(path = %path.display(), "exported snapshot");
                self.status = format!("Exported {}", path.display());
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.offset(1),
            KeyCode::BackTab => self.tab = self.tab.offset(-1),
            KeyCode::Char(c @ '1'..='8') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.start_fetch(self.config.source),
            KeyCode::Char('d') => self.tab = Tab::Donations,
            _ => self.handle_tab_key(code),
        }
        false
    }

    fn handle_tab_key(&mut self, code: KeyCode) {
        match (self.tab, code) {
            (Tab::Donations, KeyCode::Char('m')) => {
                self.donation_mode = self.donation_mode.toggle();
                self.status = format!("Donation mode: {}", self.donation_mode.label());
            }
            (Tab::Donations, KeyCode::Enter) => {
                self.status = "Demo: connect payment processor here.".to_string();
            }
            (Tab::Data, KeyCode::Up | KeyCode::Left) => {
                self.selected_source = self.selected_source.prev();
            }
            (Tab::Data, KeyCode::Down | KeyCode::Right) => {
                self.selected_source = self.selected_source.next();
            }
            (Tab::Data, KeyCode::Enter | KeyCode::Char('f')) => {
                self.start_fetch(self.selected_source);
            }
            (Tab::Data, KeyCode::Char('u')) => {
                self.begin_edit(EditField::ApiUrl, self.config.api_url.clone());
            }
            (Tab::Data, KeyCode::Char('c')) => {
                let current = self
                    .config
                    .csv_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.begin_edit(EditField::CsvPath, current);
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self, field: EditField, current: String) {
        self.editing = Some(field);
        self.input = current;
        self.status = "Editing. Enter to apply, Esc to cancel.".to_string();
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let value = self.input.trim().to_string();
                match self.editing.take() {
                    Some(EditField::ApiUrl) => {
                        self.status = format!("API URL: {value}");
                        self.config.api_url = value;
                        self.selected_source = Source::Api;
                    }
                    Some(EditField::CsvPath) => {
                        if value.is_empty() {
                            self.config.csv_path = None;
                            self.status = "CSV file cleared.".to_string();
                        } else {
                            self.status = format!("CSV file: {value}");
                            self.config.csv_path = Some(PathBuf::from(value));
                        }
                        self.selected_source = Source::Csv;
                    }
                    None => {}
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        views::draw_tab(frame, chunks[2], self);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("tdash", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" — Transparency & Impact Dashboard"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | data last fetched: {}{}",
                self.state.source.display_name(),
                self.state.last_fetched.with_timezone(&Local).format("%H:%M:%S"),
                if self.pending > 0 {
                    format!(" | fetching ({} pending)", self.pending)
                } else {
                    String::new()
                },
            ),
            Style::default().fg(Color::Gray),
        )));
        if let Some(err) = &self.state.last_error {
            lines.push(Line::from(Span::styled(
                format!("⚠ {err}"),
                Style::default().fg(Color::Red),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL))
            .select(self.tab.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match (self.tab, self.editing) {
            (_, Some(_)) => "type to edit  Enter apply  Esc cancel",
            (Tab::Data, None) => "↑/↓ source  Enter fetch  u API URL  c CSV file  e export  q quit",
            (Tab::Donations, None) => "Tab/1-8 tabs  m one-time/monthly  r refresh  e export  q quit",
            _ => "Tab/1-8 tabs  r refresh  e export  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_dataset;

    fn wait_for_fetches(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending > 0 && Instant::now() < deadline {
            app.drain_fetches();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn tab_navigation_wraps() {
        assert_eq!(Tab::Home.offset(-1), Tab::Data);
        assert_eq!(Tab::Data.offset(1), Tab::Home);
        assert_eq!(Tab::Risk.index(), 6);
    }

    #[test]
    fn csv_fetch_replaces_state_from_worker() {
        let mut config = DashboardConfig::default();
        config.csv_text = "year,donations\n2023,100\n2022,50\n".to_string();
        let mut app = App::new(config);
        app.tab = Tab::Data;
        app.selected_source = Source::Csv;

        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.pending, 1);
        wait_for_fetches(&mut app);

        assert_eq!(app.pending, 0);
        assert_eq!(app.state.source, Source::Csv);
        let years: Vec<i32> = app.state.data.donations_by_year.iter().map(|d| d.year).collect();
        assert_eq!(years, vec![2022, 2023]);
    }

    #[test]
    fn failed_fetch_keeps_ui_renderable_and_surfaces_error() {
        let mut app = App::new(DashboardConfig::default());
        app.start_fetch(Source::Csv);
        wait_for_fetches(&mut app);
        assert_eq!(app.state.data, default_dataset());
        assert_eq!(
            app.state.last_error.as_deref(),
            Some("Please paste CSV data or upload a file.")
        );
    }

    #[test]
    fn editing_csv_path_selects_csv_source() {
        let mut app = App::new(DashboardConfig::default());
        app.tab = Tab::Data;
        app.handle_key(KeyCode::Char('c'));
        for c in "gifts.csv".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        // `q` while editing is text, not quit.
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.config.csv_path, Some(PathBuf::from("gifts.csv")));
        assert_eq!(app.selected_source, Source::Csv);
        assert!(app.editing.is_none());
    }

    #[test]
    fn auto_refresh_waits_for_pending_fetches() {
        let mut config = DashboardConfig::default();
        config.refresh = Some(Duration::ZERO);
        let mut app = App::new(config);

        app.pending = 1;
        assert!(!app.maybe_auto_refresh());
        assert_eq!(app.next_ticket, 0);

        app.pending = 0;
        assert!(app.maybe_auto_refresh());
        assert_eq!(app.next_ticket, 1);
        assert_eq!(app.pending, 1);
        wait_for_fetches(&mut app);
    }

    #[test]
    fn donation_mode_toggles_on_donations_tab_only() {
        let mut app = App::new(DashboardConfig::default());
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.donation_mode, DonationMode::OneTime);
        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.donation_mode, DonationMode::Monthly);
    }
}
