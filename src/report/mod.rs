//! Reporting utilities: plain-text renderings of dashboard panels.

pub mod format;

pub use format::{format_chart_table, format_panel, format_scatter, format_summary, format_years};
