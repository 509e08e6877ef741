//! Export reshaped panel data to JSON.
//!
//! The file holds exactly what the renderer consumes (labels, datasets,
//! colors and display hints), so it can be fed to another charting front-end.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::app::pipeline::PanelData;
use crate::domain::{PanelKind, YearSelection};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct PanelExport<'a> {
    pub tool: &'static str,
    pub panel: PanelKind,
    pub title: &'static str,
    pub years: Vec<i32>,
    pub exported_at: DateTime<Local>,
    /// `null` when the panel had nothing to show.
    pub chart: Option<&'a PanelData>,
}

impl<'a> PanelExport<'a> {
    pub fn new(kind: PanelKind, years: &YearSelection, chart: Option<&'a PanelData>) -> Self {
        Self {
            tool: "wayne-dash",
            panel: kind,
            title: kind.title(),
            years: years.to_vec(),
            exported_at: Local::now(),
            chart,
        }
    }
}

/// Write one panel's chart input as pretty JSON.
pub fn write_panel_json(path: &Path, export: &PanelExport<'_>) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(&mut file, export)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    writeln!(file).map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
