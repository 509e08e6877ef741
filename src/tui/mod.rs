//! Ratatui-based terminal dashboard.
//!
//! A year selector drives every year-dependent panel; each panel loads in
//! the background and shows its own loading and error state.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::dashboard::Dashboard;
use crate::app::panel::{Panel, PanelContent};
use crate::app::pipeline::PanelData;
use crate::data::DataSource;
use crate::domain::{ChartData, PanelKind, Rgb, ScatterChart, Summary};
use crate::error::AppError;
use crate::reshape::format_millions;

mod plotters_chart;

use plotters_chart::{CategoryLineChart, ScatterPlot, category_bounds, padded, scatter_bounds};

/// Start the TUI.
pub fn run(source: Arc<dyn DataSource>, preferred_years: &[i32]) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, preferred_years);
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

struct App {
    dashboard: Dashboard,
    preferred_years: Vec<i32>,
    /// Index into the available years.
    cursor: usize,
    status: String,
}

impl App {
    fn new(source: Arc<dyn DataSource>, preferred_years: &[i32]) -> Self {
        let mut app = Self {
            dashboard: Dashboard::new(source),
            preferred_years: preferred_years.to_vec(),
            cursor: 0,
            status: String::new(),
        };
        app.bootstrap();
        app
    }

    fn bootstrap(&mut self) {
        match self.dashboard.bootstrap(&self.preferred_years) {
            Ok(()) => {
                self.status = format!("Loading {} panels...", PanelKind::ALL.len());
            }
            Err(err) => {
                // Year panels stay empty; the forecast does not need years.
                warn!(error = %err, "could not load available years");
                self.status = format!("Available years unavailable: {err}");
                self.dashboard.refresh_all();
            }
        }
        self.cursor = 0;
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.dashboard.poll() > 0 {
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
        info!("dashboard closed");
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let years = self.dashboard.available_years().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor + 1 < years {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(&year) = self.dashboard.available_years().get(self.cursor) {
                    self.dashboard.toggle_year(year);
                    self.status = format!("Years: {}", self.dashboard.selection());
                }
            }
            KeyCode::Char('a') => {
                self.dashboard.select_all();
                self.status = format!("Years: {}", self.dashboard.selection());
            }
            KeyCode::Char('r') => {
                if self.dashboard.available_years().is_empty() {
                    self.bootstrap();
                } else {
                    self.dashboard.refresh_all();
                    self.status = "Refreshing...".to_string();
                }
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_summary(frame, chunks[1]);
        self.draw_charts(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("Wayne Enterprises", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" analytics dashboard"),
        ]));

        let mut years: Vec<Span> = vec![Span::styled("Years: ", Style::default().fg(Color::Gray))];
        if self.dashboard.available_years().is_empty() {
            years.push(Span::styled("none available", Style::default().fg(Color::Yellow)));
        }
        for (i, &year) in self.dashboard.available_years().iter().enumerate() {
            let selected = self.dashboard.selection().contains(year);
            let mark = if selected { "x" } else { " " };
            let mut style = if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if i == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            years.push(Span::styled(format!("[{mark}] {year}"), style));
            years.push(Span::raw(" "));
        }
        lines.push(Line::from(years));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panel = self.dashboard.panel(PanelKind::Summary);
        let block = panel_block(panel);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match panel.data() {
            Some(PanelData::Summary(summary)) => {
                frame.render_widget(Paragraph::new(summary_lines(summary)), inner);
            }
            _ => render_placeholder(frame, inner, panel),
        }
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);
        let split = |rect: Rect| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rect)
        };

        let top = split(rows[0]);
        let middle = split(rows[1]);
        self.draw_panel(frame, top[0], PanelKind::RevenueGvaYoy);
        self.draw_panel(frame, top[1], PanelKind::OutputVsGva);
        self.draw_panel(frame, middle[0], PanelKind::DivisionQuarter);
        self.draw_panel(frame, middle[1], PanelKind::Engagement);
        self.draw_panel(frame, rows[2], PanelKind::Forecast);
    }

    fn draw_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect, kind: PanelKind) {
        let panel = self.dashboard.panel(kind);
        let block = panel_block(panel);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        match (kind, panel.data()) {
            (PanelKind::DivisionQuarter, Some(PanelData::Chart(chart))) => draw_bars(frame, inner, chart),
            (_, Some(PanelData::Chart(chart))) => draw_line_chart(frame, inner, chart),
            (_, Some(PanelData::Scatter(chart))) => draw_scatter(frame, inner, chart),
            _ => render_placeholder(frame, inner, panel),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ year  space toggle  a all  r refresh  q quit";
        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
        ];
        if self.dashboard.is_loading() {
            spans.push(Span::styled("loading… ", Style::default().fg(Color::Cyan)));
        }
        spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow)));
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Panel frame: title, loading marker, last update, and any error.
fn panel_block(panel: &Panel) -> Block<'static> {
    let mut title = vec![Span::raw(format!(" {} ", panel.kind().title()))];
    if panel.is_pending() {
        title.push(Span::styled("(loading) ", Style::default().fg(Color::Cyan)));
    }
    if panel.error().is_some() {
        title.push(Span::styled("! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)));
    }

    let mut block = Block::default().title(Line::from(title)).borders(Borders::ALL);
    if let Some(err) = panel.error() {
        block = block
            .title_bottom(Line::from(Span::styled(format!(" {err} "), Style::default().fg(Color::Red))))
            .border_style(Style::default().fg(Color::Red));
    } else if let Some(at) = panel.updated_at() {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" updated {} ", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    }
    block
}

fn render_placeholder(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    let (msg, color) = match panel.content() {
        PanelContent::Loading => ("Loading...", Color::Yellow),
        PanelContent::NoData if panel.error().is_some() => ("Failed to load.", Color::Red),
        PanelContent::NoData if panel.kind().depends_on_years() => {
            ("No data. Select one or more years.", Color::DarkGray)
        }
        _ => ("No data.", Color::DarkGray),
    };
    frame.render_widget(Paragraph::new(msg).style(Style::default().fg(color)), area);
}

fn summary_lines(summary: &Summary) -> Text<'static> {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut money = vec![
        Span::styled("Total revenue ", label),
        Span::styled(format_millions(summary.total_revenue), value),
        Span::raw("   "),
        Span::styled("Total profit ", label),
        Span::styled(format_millions(summary.total_profit), value),
    ];
    if summary.total_profit < 0.0 {
        if let Some(last) = money.last_mut() {
            last.style = value.fg(Color::Red);
        }
    }

    let mut counters = Vec::new();
    for (name, count) in [
        ("Employees", summary.unique_employees),
        ("Departments", summary.departments),
        ("Suppliers", summary.active_suppliers),
        ("R&D projects", summary.total_rd_projects),
    ] {
        if let Some(count) = count {
            counters.push(Span::styled(format!("{name} "), label));
            counters.push(Span::styled(format!("{count}   "), value));
        }
    }

    Text::from(vec![Line::from(money), Line::from(counters)])
}

fn color_of(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// One colored swatch per series.
fn legend<'a>(entries: impl Iterator<Item = (&'a str, Rgb)>) -> Paragraph<'a> {
    let mut spans = Vec::new();
    for (label, color) in entries {
        spans.push(Span::styled("■ ", Style::default().fg(color_of(color))));
        spans.push(Span::raw(label));
        spans.push(Span::raw("  "));
    }
    Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true })
}

/// Split a panel body into plot area and a legend strip.
fn with_legend(area: Rect, legend_rows: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(legend_rows)])
        .split(area);
    (chunks[0], chunks[1])
}

fn draw_line_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartData) {
    let (plot_area, legend_area) = with_legend(area, legend_rows(chart.datasets.len()));
    frame.render_widget(
        legend(chart.datasets.iter().map(|d| (d.label.as_str(), d.color))),
        legend_area,
    );

    let Some(range) = chart.value_range() else {
        frame.render_widget(Paragraph::new("No data.").style(Style::default().fg(Color::DarkGray)), plot_area);
        return;
    };
    let y_bounds = padded(range);
    let x_bounds = category_bounds(chart.labels.len());

    let (chart_rect, insets) = chart_layout(plot_area);
    frame.render_widget(CategoryLineChart { chart, y_bounds }, chart_rect);
    if let Some(insets) = insets {
        let labels = &chart.labels;
        draw_axis_ticks(frame, plot_area, chart_rect, insets, x_bounds, y_bounds, &|v| {
            category_label(labels, v)
        });
    }
}

fn draw_scatter(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ScatterChart) {
    let (plot_area, legend_area) = with_legend(area, legend_rows(chart.datasets.len()));
    frame.render_widget(
        legend(chart.datasets.iter().map(|d| (d.label.as_str(), d.color))),
        legend_area,
    );

    let Some((x_bounds, y_bounds)) = scatter_bounds(chart) else {
        return;
    };
    let (chart_rect, insets) = chart_layout(plot_area);
    frame.render_widget(ScatterPlot { chart, x_bounds, y_bounds }, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, plot_area, chart_rect, insets, x_bounds, y_bounds, &|v| format!("{v:.1}"));
    }
}

/// Grouped horizontal bars: one group per division, one bar per
/// quarter-year series.
fn draw_bars(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartData) {
    let (plot_area, legend_area) = with_legend(area, legend_rows(chart.datasets.len()));
    frame.render_widget(
        legend(chart.datasets.iter().map(|d| (d.label.as_str(), d.color))),
        legend_area,
    );

    let mut bar_chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1);

    for (i, division) in chart.labels.iter().enumerate() {
        let bars: Vec<Bar> = chart
            .datasets
            .iter()
            .map(|d| {
                let value = d.values.get(i).copied().flatten().unwrap_or(0.0);
                Bar::default()
                    .value(bar_value(value))
                    .text_value(format_millions(value))
                    .style(Style::default().fg(color_of(d.color)))
            })
            .collect();
        bar_chart = bar_chart.data(BarGroup::default().label(Line::from(division.clone())).bars(&bars));
    }

    frame.render_widget(bar_chart, plot_area);
}

/// Bar lengths are whole units; negative values draw as empty bars.
fn bar_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn legend_rows(series: usize) -> u16 {
    match series {
        0 => 0,
        1..=4 => 1,
        _ => 2,
    }
}

/// Label at category position `v`, blank between slots.
fn category_label(labels: &[String], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 0,
        bottom: 1,
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
    fmt_x: &dyn Fn(f64) -> String,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let label = fmt_x(x_val);
        if label.is_empty() {
            continue;
        }
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        let width = label_len.min((inner.x + inner.width).saturating_sub(start));
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_y(y_val);
        let label_len = label.len() as u16;
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

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if v.abs() >= 10.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_slots() {
        let labels = vec!["2024-01".to_string(), "2024-02".to_string()];
        assert_eq!(category_label(&labels, 0.0), "2024-01");
        assert_eq!(category_label(&labels, 1.1), "2024-02");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn bar_values_clamp_and_round() {
        assert_eq!(bar_value(12.6), 13);
        assert_eq!(bar_value(-4.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
    }

    #[test]
    fn y_ticks_stay_short() {
        assert_eq!(fmt_axis_y(2400.0), "2k");
        assert_eq!(fmt_axis_y(42.4), "42");
        assert_eq!(fmt_axis_y(-3.24), "-3.2");
    }

    #[test]
    fn legend_grows_with_series() {
        assert_eq!(legend_rows(0), 0);
        assert_eq!(legend_rows(2), 1);
        assert_eq!(legend_rows(12), 2);
    }

    #[test]
    fn chart_layout_falls_back_when_cramped() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 15, 5));
        assert_eq!(rect, Rect::new(0, 0, 15, 5));
        assert!(insets.is_none());

        let (rect, insets) = chart_layout(Rect::new(0, 0, 60, 20));
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(8, 0, 50, 19));
    }
}
