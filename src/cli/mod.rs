//! Command-line parsing for the Wayne Enterprises analytics dashboard.
//!
//! Argument parsing and command dispatch stay separate from the data
//! reshaping code.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::data::BASE_URL_ENV;
use crate::domain::PanelKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wayne-dash", version, about = "Wayne Enterprises analytics dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// List the years the analytics API has data for.
    Years(SourceArgs),
    /// Print the key metrics for the selected years.
    Summary(QueryArgs),
    /// Print one chart panel as a table and optionally export it as JSON.
    Chart(ChartArgs),
}

/// Where dashboard data comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Base URL of the analytics API (e.g. http://localhost:8000/api).
    #[arg(long, env = BASE_URL_ENV)]
    pub api_url: Option<String>,

    /// Use deterministic built-in sample data instead of the API.
    #[arg(long)]
    pub offline: bool,

    /// Random seed for the offline sample data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Per-request timeout in seconds (0 disables the timeout).
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl SourceArgs {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Source options plus a year selection.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Year to include (repeatable). Defaults to every available year.
    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Panel to render.
    #[arg(value_enum)]
    pub panel: PanelKind,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Write the reshaped chart input to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Log file for the dashboard session (the terminal is owned by the UI).
    #[arg(long, default_value = "wayne-dash.log")]
    pub log_file: PathBuf,
}
