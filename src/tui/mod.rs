//! Ratatui-based terminal dashboard.
//!
//! Three tabs mirror the hub operations screen:
//! - **Temps Réel**: simulated live occupancy gauge and line status
//! - **Analyses**: daily footfall per day type, mean per day type, share per day type
//! - **Cartographie**: main footfall hotspots

use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
};
use tracing::{debug, warn};

use crate::app::pipeline::{DashboardView, SeriesMemo, SeriesOutput, dashboard_view, view_for_selection};
use crate::data::hotspots::{HOTSPOTS, bounds as hotspot_bounds};
use crate::data::{live_reading, series_rng};
use crate::domain::{DayLabel, DayRecord, FlowConfig, Hotspot, LiveReading, LoadLevel};
use crate::error::AppError;
use crate::report;

mod plotters_chart;

use plotters_chart::{FlowChart, HotspotMap, LineData};

/// Start the TUI.
pub fn run(config: FlowConfig) -> Result<(), AppError> {
    // Build before touching the terminal so input errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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
    Live,
    Analysis,
    Map,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Live, Tab::Analysis, Tab::Map];

    fn title(self) -> &'static str {
        match self {
            Tab::Live => "Temps Réel",
            Tab::Analysis => "Analyses",
            Tab::Map => "Cartographie",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Live => 0,
            Tab::Analysis => 1,
            Tab::Map => 2,
        }
    }

    fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

struct App {
    config: FlowConfig,
    memo: SeriesMemo,
    series: Rc<SeriesOutput>,
    /// Years kept by the analysis tab; empty shows the whole series.
    selected: Vec<i32>,
    year_cursor: usize,
    view: DashboardView,
    tab: Tab,
    live: LiveReading,
    live_synced: DateTime<Local>,
    live_rng: StdRng,
    status: String,
}

impl App {
    fn new(config: FlowConfig) -> Result<Self, AppError> {
        let mut memo = SeriesMemo::new();
        let series = memo.get_or_build(&config)?;
        let view = view_for_selection(&series, &config.years);
        let selected = view.selected.clone();

        let mut live_rng = series_rng(config.seed);
        let now = Local::now();
        let live = live_reading(now.hour(), &mut live_rng);

        let status = match &series.history_path {
            Some(path) => format!("history: {} ({} rows)", path.display(), series.history_rows),
            None => "no history file, projection only".to_string(),
        };

        Ok(Self {
            config,
            memo,
            series,
            selected,
            year_cursor: 0,
            view,
            tab: Tab::Live,
            live,
            live_synced: now,
            live_rng,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Live,
            KeyCode::Char('2') => self.tab = Tab::Analysis,
            KeyCode::Char('3') => self.tab = Tab::Map,
            KeyCode::Left => {
                self.year_cursor = self.year_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.year_cursor + 1 < self.view.years.len() {
                    self.year_cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(&year) = self.view.years.get(self.year_cursor) {
                    toggle_year(&mut self.selected, year);
                    self.refresh_view();
                    self.status = format!("years: {}", selection_label(&self.selected));
                }
            }
            KeyCode::Char('a') => {
                self.selected.clear();
                self.refresh_view();
                self.status = "years: all".to_string();
            }
            KeyCode::Char('r') => {
                self.refresh_live();
                self.status = format!("live refreshed at {}", self.live_synced.format("%H:%M:%S"));
            }
            KeyCode::Char('s') => self.reseed()?,
            KeyCode::Char('l') => self.reload(),
            _ => {}
        }
        Ok(false)
    }

    fn refresh_view(&mut self) {
        self.view = dashboard_view(&self.series.records, &self.selected);
    }

    fn refresh_live(&mut self) {
        self.live_synced = Local::now();
        self.live = live_reading(self.live_synced.hour(), &mut self.live_rng);
    }

    /// Draw a new projection: a new seed changes the memo key.
    fn reseed(&mut self) -> Result<(), AppError> {
        let seed = match self.config.seed {
            Some(seed) => seed.wrapping_add(1),
            None => self.live_rng.r#gen(),
        };
        self.config.seed = Some(seed);
        let series = self.memo.get_or_build(&self.config)?;
        self.adopt_series(series);
        debug!(seed, "reseeded projection");
        self.status = format!("projection reseeded (seed {seed})");
        Ok(())
    }

    /// Reread the history file. On failure the current series stays on screen.
    fn reload(&mut self) {
        self.memo.invalidate();
        match self.memo.get_or_build(&self.config) {
            Ok(series) => {
                self.status = format!(
                    "reloaded: {} rows ({} historical)",
                    series.records.len(),
                    series.history_rows
                );
                self.adopt_series(series);
            }
            Err(e) => {
                warn!(error = %e, "history reload failed");
                self.status = format!("reload failed: {e}");
            }
        }
    }

    fn adopt_series(&mut self, series: Rc<SeriesOutput>) {
        self.series = series;
        let years = report::available_years(&self.series.records);
        self.selected.retain(|y| years.contains(y));
        self.year_cursor = self.year_cursor.min(years.len().saturating_sub(1));
        self.refresh_view();
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        match self.tab {
            Tab::Live => self.draw_live(frame, chunks[2]),
            Tab::Analysis => self.draw_analysis(frame, chunks[2]),
            Tab::Map => draw_map(frame, chunks[2]),
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "La Défense : Supervision",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(Local::now().format("%d/%m/%Y").to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                format!(
                    "Supervision des flux voyageurs et analyse prédictive | {} jours ({} historiques, {} projetés)",
                    self.series.records.len(),
                    self.series.history_rows,
                    self.series.generated_rows,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
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
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_live(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(6)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(rows[0]);

        let gauge = Gauge::default()
            .block(Block::default().title("Taux d'Occupation (Gare)").borders(Borders::ALL))
            .gauge_style(Style::default().fg(level_color(self.live.level)).bg(Color::Black))
            .percent(u16::from(self.live.load_pct))
            .label(format!("{}% · {}", self.live.load_pct, self.live.level.display_name()));
        frame.render_widget(gauge, cols[0]);

        let metrics = Paragraph::new(vec![
            Line::from("Débit Instantané (Pax/min)"),
            Line::from(Span::styled(
                self.live.pax_per_minute.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Conforme", Style::default().fg(Color::Green))),
            Line::from(""),
            Line::from("Disponibilité Équipements"),
            Line::from(vec![
                Span::styled("100%", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(" Nominal", Style::default().fg(Color::Green)),
            ]),
        ])
        .block(Block::default().title("Indicateurs").borders(Borders::ALL));
        frame.render_widget(metrics, cols[1]);

        let lines = Paragraph::new(vec![
            Line::from(format!("Dernière synchro : {}", self.live_synced.format("%H:%M:%S"))),
            Line::from(""),
            Line::from(Span::styled("Ligne 1 : Trafic Nominal", Style::default().fg(Color::Green))),
            Line::from(Span::styled(
                "RER A : Forte Densité (Nanterre)",
                Style::default().fg(Color::Yellow),
            )),
        ])
        .block(Block::default().title("État du réseau").borders(Borders::ALL));
        frame.render_widget(lines, cols[2]);

        let legend = Paragraph::new(vec![
            legend_line(LoadLevel::Nominal, "<50%", "Fluidité optimale. Aucun incident de circulation."),
            legend_line(
                LoadLevel::Densification,
                "50-80%",
                "Charge soutenue. Ralentissements possibles aux accès.",
            ),
            legend_line(
                LoadLevel::Saturation,
                ">80%",
                "Seuil d'alerte. Activation des mesures de régulation de flux.",
            ),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Légende Opérationnelle").borders(Borders::ALL));
        frame.render_widget(legend, rows[1]);
    }

    fn draw_analysis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(10)])
            .split(area);

        self.draw_year_selector(frame, rows[0]);
        self.draw_flow_chart(frame, rows[1]);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        self.draw_mean_bars(frame, cols[0]);
        self.draw_shares(frame, cols[1]);
    }

    fn draw_year_selector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        for (i, year) in self.view.years.iter().enumerate() {
            let mark = if self.selected.contains(year) { "[x]" } else { "[ ]" };
            let mut style = Style::default().fg(Color::Gray);
            if i == self.year_cursor {
                style = style.fg(Color::Black).bg(Color::White);
            }
            spans.push(Span::styled(format!("{mark} {year}"), style));
            spans.push(Span::raw("  "));
        }
        if self.selected.is_empty() {
            spans.push(Span::styled("(toutes les années)", Style::default().fg(Color::Yellow)));
        }
        let p = Paragraph::new(Line::from(spans))
            .block(Block::default().title("Années à analyser").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_flow_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Évolution du volume voyageurs")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((lines, x_bounds, y_bounds)) = chart_series(&self.view.filtered) else {
            let msg = Paragraph::new("No data for the selected years.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let legend_height = 1;
        let (legend_rect, chart_area) = (
            Rect { height: legend_height, ..inner },
            Rect {
                y: inner.y + legend_height,
                height: inner.height.saturating_sub(legend_height),
                ..inner
            },
        );
        frame.render_widget(Paragraph::new(label_legend(&self.view.filtered)), legend_rect);

        let (chart_rect, insets) = chart_layout(chart_area);
        let widget = FlowChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: "voyageurs",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_thousands,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, chart_area, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_mean_bars(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bars: Vec<Bar> = self
            .view
            .labels
            .iter()
            .map(|s| {
                Bar::default()
                    .label(Line::from(s.label.as_str()))
                    .value(s.mean.round() as u64)
                    .text_value(fmt_axis_thousands(s.mean))
                    .style(Style::default().fg(label_color(s.label)))
            })
            .collect();

        let chart = BarChart::default()
            .block(Block::default().title("Répartition Hebdomadaire (moyenne/jour)").borders(Borders::ALL))
            .data(BarGroup::default().bars(&bars))
            .bar_width(14)
            .bar_gap(2);
        frame.render_widget(chart, area);
    }

    fn draw_shares(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .labels
            .iter()
            .map(|s| {
                let bar_width = 20;
                let filled = ((s.share * bar_width as f64).round() as usize).min(bar_width);
                Row::new(vec![
                    Cell::from(Span::styled(s.label.as_str(), Style::default().fg(label_color(s.label)))),
                    Cell::from(format!("{:>5.1}%", s.share * 100.0)),
                    Cell::from(Span::styled("█".repeat(filled), Style::default().fg(label_color(s.label)))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(16), Constraint::Length(7), Constraint::Min(10)],
        )
        .header(Row::new(vec!["Typologie", "Part", ""]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().title("Segmentation des flux").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-3 onglet  ←/→ année  Espace choisir  a toutes  r actualiser  s reprojeter  l recharger  q quitter";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_map(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let block = Block::default()
        .title("Cartographie des Flux")
        .borders(Borders::ALL);
    let inner = block.inner(cols[0]);
    frame.render_widget(block, cols[0]);
    frame.render_widget(Clear, inner);

    if let Some((x_bounds, y_bounds)) = hotspot_bounds(&HOTSPOTS, 0.001) {
        frame.render_widget(
            HotspotMap {
                hotspots: &HOTSPOTS,
                x_bounds,
                y_bounds,
                max_marker: 4,
                color_for: hotspot_rgb,
            },
            inner,
        );
    }

    let mut by_flux = HOTSPOTS.to_vec();
    by_flux.sort_by(|a, b| b.flux.cmp(&a.flux));
    let rows: Vec<Row> = by_flux
        .iter()
        .map(|h| {
            let (r, g, b) = hotspot_rgb(h);
            Row::new(vec![
                Cell::from(Span::styled(h.name, Style::default().fg(Color::Rgb(r, g, b)))),
                Cell::from(h.kind),
                Cell::from(h.flux.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(12), Constraint::Min(10), Constraint::Length(6)],
    )
    .header(Row::new(vec!["Point", "Type", "Flux"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(
        Block::default()
            .title("Points d'affluence")
            .title_bottom(Line::from("taille ∝ volume estimé").alignment(Alignment::Right))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, cols[1]);
}

/// Add or remove `year`, keeping the selection most-recent first.
fn toggle_year(selected: &mut Vec<i32>, year: i32) {
    if let Some(pos) = selected.iter().position(|y| *y == year) {
        selected.remove(pos);
    } else {
        selected.push(year);
        selected.sort_unstable_by(|a, b| b.cmp(a));
    }
}

fn selection_label(selected: &[i32]) -> String {
    if selected.is_empty() {
        return "all".to_string();
    }
    selected
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// X coordinate used for dates on the footfall chart.
fn date_axis_value(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Build one line per day label plus chart bounds; `None` without rows.
fn chart_series(records: &[DayRecord]) -> Option<(Vec<LineData>, [f64; 2], [f64; 2])> {
    let first = records.first()?;
    let last = records.last()?;

    let mut x_bounds = [date_axis_value(first.date), date_axis_value(last.date)];
    if x_bounds[1] <= x_bounds[0] {
        x_bounds = [x_bounds[0] - 1.0, x_bounds[0] + 1.0];
    }

    let mut lines = Vec::new();
    for label in DayLabel::ALL {
        let points: Vec<(f64, f64)> = records
            .iter()
            .filter(|r| r.label == label)
            .map(|r| (date_axis_value(r.date), r.total as f64))
            .collect();
        if !points.is_empty() {
            lines.push(LineData {
                points,
                rgb: label_rgb(label),
            });
        }
    }

    let y_max = records.iter().map(|r| r.total).max().unwrap_or(0) as f64;
    let y_bounds = if y_max > 0.0 { [0.0, y_max * 1.05] } else { [0.0, 1.0] };

    Some((lines, x_bounds, y_bounds))
}

fn label_legend(records: &[DayRecord]) -> Line<'static> {
    let mut spans = Vec::new();
    for label in DayLabel::ALL {
        if records.iter().any(|r| r.label == label) {
            spans.push(Span::styled("━━ ", Style::default().fg(label_color(label))));
            spans.push(Span::raw(format!("{}  ", label.as_str())));
        }
    }
    Line::from(spans)
}

fn legend_line(level: LoadLevel, range: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} ({range})", level.display_name()),
            Style::default().fg(level_color(level)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" : {text}")),
    ])
}

/// Bold qualitative palette, one colour per day label.
fn label_rgb(label: DayLabel) -> (u8, u8, u8) {
    match label {
        DayLabel::Ouvre => (0x7F, 0x3C, 0x8D),
        DayLabel::Samedi => (0x11, 0xA5, 0x79),
        DayLabel::DimancheFerie => (0x39, 0x69, 0xAC),
        DayLabel::Vacances => (0xF2, 0xB7, 0x01),
        DayLabel::Autre => (0xE7, 0x3F, 0x74),
    }
}

fn label_color(label: DayLabel) -> Color {
    let (r, g, b) = label_rgb(label);
    Color::Rgb(r, g, b)
}

fn hotspot_rgb(hotspot: &Hotspot) -> (u8, u8, u8) {
    match hotspot.kind {
        "Transport" => (0x7F, 0x3C, 0x8D),
        "Commerce/Transport" => (0x11, 0xA5, 0x79),
        "Entrée Piétonne" => (0x39, 0x69, 0xAC),
        "Commerce" => (0xF2, 0xB7, 0x01),
        _ => (0xE7, 0x3F, 0x74),
    }
}

fn level_color(level: LoadLevel) -> Color {
    match level {
        LoadLevel::Nominal => Color::Green,
        LoadLevel::Densification => Color::Yellow,
        LoadLevel::Saturation => Color::Red,
    }
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%m/%Y").to_string())
        .unwrap_or_default()
}

fn fmt_axis_thousands(v: f64) -> String {
    format!("{:.0}k", v / 1000.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 7,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min((inner.x + inner.width).saturating_sub(start)),
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_thousands(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enrich;
    use crate::domain::{DayTypeCode, Observation, YearSelection};

    fn app(years: YearSelection) -> App {
        App::new(FlowConfig {
            input: "no/such/dir/history.csv".into(),
            seed: Some(3),
            years,
        })
        .unwrap()
    }

    fn records() -> Vec<DayRecord> {
        enrich(
            [(1, "JOHV", 300_000), (2, "SA", 120_000), (3, "DIJFP", 90_000), (4, "JOHV", 310_000)]
                .iter()
                .map(|&(d, code, total)| Observation {
                    date: NaiveDate::from_ymd_opt(2022, 3, d).unwrap(),
                    day_type: DayTypeCode::parse(code),
                    total,
                })
                .collect(),
        )
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(Tab::Live.next(), Tab::Analysis);
        assert_eq!(Tab::Analysis.next(), Tab::Map);
        assert_eq!(Tab::Map.next(), Tab::Live);
    }

    #[test]
    fn toggling_years_keeps_descending_order() {
        let mut selected = vec![2025];
        toggle_year(&mut selected, 2023);
        toggle_year(&mut selected, 2024);
        assert_eq!(selected, vec![2025, 2024, 2023]);
        toggle_year(&mut selected, 2025);
        assert_eq!(selected, vec![2024, 2023]);
        assert_eq!(selection_label(&selected), "2024, 2023");
        assert_eq!(selection_label(&[]), "all");
    }

    #[test]
    fn chart_series_splits_by_label() {
        let (lines, x_bounds, y_bounds) = chart_series(&records()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].points.len(), 2);
        assert_eq!(lines[0].rgb, label_rgb(DayLabel::Ouvre));
        assert_eq!(x_bounds[1] - x_bounds[0], 3.0);
        assert_eq!(y_bounds, [0.0, 310_000.0 * 1.05]);
        assert!(chart_series(&[]).is_none());
    }

    #[test]
    fn single_day_chart_has_width() {
        let one = &records()[..1];
        let (_, x_bounds, _) = chart_series(one).unwrap();
        assert!(x_bounds[1] > x_bounds[0]);
    }

    #[test]
    fn date_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(fmt_axis_date(date_axis_value(d)), "02/2024");
        assert_eq!(fmt_axis_thousands(456_000.0), "456k");
    }

    #[test]
    fn chart_layout_insets_only_when_room() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 80, 20));
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(7, 1, 71, 17));
        let small = Rect::new(0, 0, 15, 6);
        assert_eq!(chart_layout(small), (small, None));
    }

    #[test]
    fn app_starts_on_two_latest_years() {
        let app = app(YearSelection::default());
        assert_eq!(app.selected, vec![2025, 2024]);
        assert_eq!(app.view.selected, app.selected);
        assert_eq!(app.view.filtered.len(), 365 + 366);
        assert_eq!(app.tab, Tab::Live);
    }

    #[test]
    fn unmatched_years_start_on_whole_series() {
        let app = app(YearSelection::Explicit(vec![1990]));
        assert!(app.selected.is_empty());
        assert_eq!(app.view.filtered.len(), 1461);
    }

    #[test]
    fn keys_switch_tabs_and_quit() {
        let mut app = app(YearSelection::default());
        assert!(!app.handle_key(KeyCode::Char('3')).unwrap());
        assert_eq!(app.tab, Tab::Map);
        app.handle_key(KeyCode::Tab).unwrap();
        assert_eq!(app.tab, Tab::Live);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn year_keys_toggle_and_clear_selection() {
        let mut app = app(YearSelection::default());
        assert_eq!(app.view.years, vec![2025, 2024, 2023, 2022]);

        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(app.selected, vec![2025, 2024, 2023]);
        assert_eq!(app.view.filtered.len(), 365 + 366 + 365);

        app.handle_key(KeyCode::Left).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(app.selected, vec![2025, 2023]);

        app.handle_key(KeyCode::Char('a')).unwrap();
        assert!(app.selected.is_empty());
        assert_eq!(app.view.filtered.len(), 1461);
        assert_eq!(app.status, "years: all");
    }

    #[test]
    fn reseed_changes_projection_and_keeps_years() {
        let mut app = app(YearSelection::Explicit(vec![2023]));
        let before = Rc::clone(&app.series);

        app.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(app.config.seed, Some(4));
        assert!(!Rc::ptr_eq(&before, &app.series));
        assert_ne!(before.records, app.series.records);
        assert_eq!(app.selected, vec![2023]);
        assert!(app.view.filtered.iter().all(|r| r.year == 2023));
        assert_eq!(app.status, "projection reseeded (seed 4)");
    }

    #[test]
    fn reload_rebuilds_with_the_same_seed() {
        let mut app = app(YearSelection::default());
        let before = Rc::clone(&app.series);

        app.handle_key(KeyCode::Char('l')).unwrap();
        assert!(!Rc::ptr_eq(&before, &app.series));
        assert_eq!(before.records, app.series.records);
        assert_eq!(app.selected, vec![2025, 2024]);
        assert_eq!(app.status, "reloaded: 1461 rows (0 historical)");
    }
}
