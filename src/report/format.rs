//! Formatted terminal output for the non-interactive commands.
//!
//! Formatting lives in one place so the reshaping code stays pure and output
//! changes are localized.

use crate::app::pipeline::PanelData;
use crate::domain::{ChartData, PanelKind, ScatterChart, Summary, YearSelection};
use crate::reshape::format_millions;

const LABEL_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 14;

/// Available years, marking the ones in `selected`.
pub fn format_years(available: &[i32], selected: &YearSelection) -> String {
    if available.is_empty() {
        return "No years available.\n".to_string();
    }
    let mut out = String::from("Available years:\n");
    for year in available {
        let mark = if selected.contains(*year) { "x" } else { " " };
        out.push_str(&format!("[{mark}] {year}\n"));
    }
    out
}

/// Key metrics card. Money values are in millions.
pub fn format_summary(summary: &Summary, years: &YearSelection) -> String {
    let mut out = String::new();
    out.push_str("=== Wayne Enterprises - Key Metrics ===\n");
    out.push_str(&format!("Years: {years}\n"));
    out.push_str(&format!("{:<22} {}\n", "Total revenue", format_millions(summary.total_revenue)));
    out.push_str(&format!("{:<22} {}\n", "Total profit", format_millions(summary.total_profit)));

    let counters = [
        ("Employees", summary.unique_employees),
        ("Departments", summary.departments),
        ("Active suppliers", summary.active_suppliers),
        ("R&D projects", summary.total_rd_projects),
    ];
    for (label, value) in counters {
        if let Some(v) = value {
            out.push_str(&format!("{label:<22} {v}\n"));
        }
    }
    out
}

/// One row per category label, one column per dataset. Gaps print as `-`.
pub fn format_chart_table(title: &str, chart: &ChartData) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {title} ===\n"));
    if chart.is_empty() {
        out.push_str("No data.\n");
        return out;
    }

    let mut header = format!("{:<LABEL_WIDTH$}", "label");
    let mut rule = format!("{:-<LABEL_WIDTH$}", "");
    for dataset in &chart.datasets {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", truncate(&dataset.label, VALUE_WIDTH)));
        rule.push_str(&format!(" {:-<VALUE_WIDTH$}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for (i, label) in chart.labels.iter().enumerate() {
        let mut row = format!("{:<LABEL_WIDTH$}", truncate(label, LABEL_WIDTH));
        for dataset in &chart.datasets {
            let cell = match dataset.values.get(i).copied().flatten() {
                Some(v) => format!("{v:.2}"),
                None => "-".to_string(),
            };
            row.push_str(&format!(" {cell:>VALUE_WIDTH$}"));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

pub fn format_scatter(title: &str, chart: &ScatterChart) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {title} ===\n"));
    if chart.is_empty() {
        out.push_str("No data.\n");
        return out;
    }

    out.push_str(&format!("{:<LABEL_WIDTH$} {:>10} {:>10}  color\n", "district", "engagement", "effective"));
    for dataset in &chart.datasets {
        for point in &dataset.points {
            out.push_str(&format!(
                "{:<LABEL_WIDTH$} {:>10.2} {:>10.2}  {}\n",
                truncate(&dataset.label, LABEL_WIDTH),
                point.x,
                point.y,
                dataset.color
            ));
        }
    }
    out
}

/// Render whatever a panel loader produced.
pub fn format_panel(kind: PanelKind, data: Option<&PanelData>, years: &YearSelection) -> String {
    match data {
        None => format!("=== {} ===\nNo data.\n", kind.title()),
        Some(PanelData::Summary(summary)) => format_summary(summary, years),
        Some(PanelData::Chart(chart)) => format_chart_table(kind.title(), chart),
        Some(PanelData::Scatter(chart)) => format_scatter(kind.title(), chart),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, DisplayHints, Rgb, ScatterDataset, ScatterPoint};
    use pretty_assertions::assert_eq;

    fn chart() -> ChartData {
        ChartData {
            labels: vec!["2024-01".into(), "2024-02".into()],
            datasets: vec![Dataset {
                label: "Burnley Actual".into(),
                values: vec![Some(10.0), None],
                color: Rgb(0, 0, 0),
                hints: DisplayHints::default(),
            }],
        }
    }

    #[test]
    fn chart_table_marks_gaps() {
        let table = format_chart_table("Incidents", &chart());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "=== Incidents ===");
        assert!(lines[1].starts_with("label"));
        assert!(lines[1].ends_with("Burnley Actual"));
        assert!(lines[3].starts_with("2024-01") && lines[3].ends_with("10.00"));
        assert!(lines[4].starts_with("2024-02") && lines[4].ends_with('-'));
    }

    #[test]
    fn empty_chart_says_so() {
        let table = format_chart_table("Empty", &ChartData::default());
        assert_eq!(table, "=== Empty ===\nNo data.\n");
    }

    #[test]
    fn summary_prints_money_and_known_counters() {
        let summary = Summary {
            total_revenue: 1234.56,
            total_profit: -12.24,
            unique_employees: Some(4200),
            departments: None,
            active_suppliers: None,
            total_rd_projects: Some(17),
        };
        let text = format_summary(&summary, &YearSelection::new([2022, 2023]));
        assert!(text.contains("Years: 2022, 2023"));
        assert!(text.contains("$1,234.6M"));
        assert!(text.contains("-$12.2M"));
        assert!(text.contains("Employees"));
        assert!(text.contains("R&D projects"));
        assert!(!text.contains("Departments"));
    }

    #[test]
    fn years_list_marks_selection() {
        let text = format_years(&[2021, 2022], &YearSelection::new([2022]));
        assert_eq!(text, "Available years:\n[ ] 2021\n[x] 2022\n");
        assert_eq!(format_years(&[], &YearSelection::default()), "No years available.\n");
    }

    #[test]
    fn scatter_rows_carry_district_color() {
        let chart = ScatterChart {
            datasets: vec![ScatterDataset {
                label: "Old Gotham".into(),
                points: vec![ScatterPoint { x: 1.5, y: 2.0 }],
                color: Rgb(0xff, 0x63, 0x84),
                hints: DisplayHints::default(),
            }],
        };
        let text = format_scatter("Engagement", &chart);
        assert!(text.contains("Old Gotham"));
        assert!(text.contains("#ff6384"));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd.");
    }
}
