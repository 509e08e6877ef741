//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - picks the data source (analytics API or offline samples)
//! - runs the dashboard or a one-shot command

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{ChartArgs, Command, QueryArgs, SourceArgs, TuiArgs};
use crate::data::{ApiClient, DataSource, DEFAULT_BASE_URL, SampleSource};
use crate::domain::{PanelKind, YearSelection};
use crate::error::AppError;

pub mod dashboard;
pub mod panel;
pub mod pipeline;
pub mod scheduler;

const DEFAULT_LOG_FILTER: &str = "wayne_dash=info";

/// Entry point for the `wayne-dash` binary.
pub fn run() -> Result<(), AppError> {
    // `wayne-dash` and `wayne-dash --offline` behave like `wayne-dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Years(args) => handle_years(args),
        Command::Summary(args) => handle_summary(args),
        Command::Chart(args) => handle_chart(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    init_file_logging(&args.log_file)?;
    let source = build_source(&args.query.source)?;
    crate::tui::run(source, &args.query.years)
}

fn handle_years(args: SourceArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let source = build_source(&args)?;
    let mut years = source.available_years()?;
    years.sort_unstable();
    years.dedup();
    let selected = YearSelection::new(years.iter().copied());
    print!("{}", crate::report::format_years(&years, &selected));
    Ok(())
}

fn handle_summary(args: QueryArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let source = build_source(&args.source)?;
    let years = resolve_years(source.as_ref(), &args.years)?;
    let data = pipeline::load_panel(source.as_ref(), PanelKind::Summary, &years)?;
    print!("{}", crate::report::format_panel(PanelKind::Summary, data.as_ref(), &years));
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let source = build_source(&args.query.source)?;
    let years = if args.panel.depends_on_years() {
        resolve_years(source.as_ref(), &args.query.years)?
    } else {
        YearSelection::default()
    };

    let data = pipeline::load_panel(source.as_ref(), args.panel, &years)?;
    print!("{}", crate::report::format_panel(args.panel, data.as_ref(), &years));

    if let Some(path) = &args.export {
        let export = crate::io::PanelExport::new(args.panel, &years, data.as_ref());
        crate::io::write_panel_json(path, &export)?;
        info!(path = %path.display(), panel = ?args.panel, "exported chart input");
    }
    Ok(())
}

/// Requested years, or every available year when none were given.
fn resolve_years(source: &dyn DataSource, requested: &[i32]) -> Result<YearSelection, AppError> {
    if !requested.is_empty() {
        return Ok(YearSelection::new(requested.iter().copied()));
    }
    Ok(YearSelection::new(source.available_years()?))
}

fn build_source(args: &SourceArgs) -> Result<Arc<dyn DataSource>, AppError> {
    if args.offline {
        info!(seed = args.seed, "using offline sample data");
        return Ok(Arc::new(SampleSource::new(args.seed)));
    }

    // `--api-url` (or its env var via clap) wins; otherwise `.env` is consulted.
    let client = match &args.api_url {
        Some(url) => ApiClient::new(url.as_str(), args.timeout())?,
        None => ApiClient::from_env(args.timeout())?,
    };
    info!(base_url = client.base_url(), default = DEFAULT_BASE_URL, "using analytics API");
    Ok(Arc::new(client))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_stderr_logging() {
    // Ignore "already initialized" so tests and repeated calls are harmless.
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// The TUI owns the terminal, so logs go to a file.
fn init_file_logging(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init();
    Ok(())
}

/// Rewrite argv so `wayne-dash` defaults to `wayne-dash tui`.
///
/// Rules:
/// - `wayne-dash`                     -> `wayne-dash tui`
/// - `wayne-dash --offline ...`       -> `wayne-dash tui --offline ...`
/// - `wayne-dash --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "years" | "summary" | "chart");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_the_dashboard() {
        assert_eq!(rewrite_args(args(&["wayne-dash"])), args(&["wayne-dash", "tui"]));
        assert_eq!(
            rewrite_args(args(&["wayne-dash", "--offline", "-y", "2023"])),
            args(&["wayne-dash", "tui", "--offline", "-y", "2023"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for argv in [
            args(&["wayne-dash", "--help"]),
            args(&["wayne-dash", "chart", "forecast"]),
            args(&["wayne-dash", "years"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn offline_source_resolves_all_years() {
        let source = build_source(&SourceArgs {
            api_url: None,
            offline: true,
            seed: 7,
            timeout_secs: 0,
        })
        .unwrap();
        let years = resolve_years(source.as_ref(), &[]).unwrap();
        assert_eq!(years.to_vec(), vec![2020, 2021, 2022, 2023, 2024]);
        let picked = resolve_years(source.as_ref(), &[2022]).unwrap();
        assert_eq!(picked.to_vec(), vec![2022]);
    }
}
