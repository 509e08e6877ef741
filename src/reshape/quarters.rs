//! Flatten per-year division x quarter matrices into bar-chart datasets.
//!
//! Every (year, quarter) pair becomes one dataset whose values run over the
//! shared division axis, e.g. `"Q1 2023" = [WayneTech, Wayne Foods, ...]`.

use tracing::warn;

use crate::domain::{
    ChartData, Dataset, DisplayHints, DivisionQuarterByYear, DivisionQuarterMatrix, RawDivisionQuarter,
};
use crate::error::DataError;
use crate::reshape::color::quarter_color;

/// Validate one year's raw payload.
///
/// Returns `Ok(None)` when a required field is missing (the year is skipped),
/// and an error when the matrix shape disagrees with its axes.
pub fn validate_year(year: i32, raw: &RawDivisionQuarter) -> Result<Option<DivisionQuarterMatrix>, DataError> {
    let (Some(divisions), Some(quarters), Some(values)) = (&raw.divisions, &raw.quarters, &raw.values) else {
        return Ok(None);
    };

    if values.len() != divisions.len() {
        return Err(DataError::MatrixRows {
            year,
            expected: divisions.len(),
            actual: values.len(),
        });
    }
    for (division, row) in divisions.iter().zip(values) {
        if row.len() != quarters.len() {
            return Err(DataError::MatrixShape {
                year,
                division: division.clone(),
                expected: quarters.len(),
                actual: row.len(),
            });
        }
    }

    Ok(Some(DivisionQuarterMatrix {
        divisions: divisions.clone(),
        quarters: quarters.clone(),
        values: values.clone(),
    }))
}

/// Flatten all years into one chart, in ascending year order.
///
/// The first complete year fixes the division axis; a later year with a
/// different division list is rejected instead of being drawn against the
/// wrong labels. `null` year entries are skipped like incomplete ones.
pub fn flatten(by_year: &DivisionQuarterByYear) -> Result<ChartData, DataError> {
    let mut base: Option<(i32, Vec<String>)> = None;
    let mut datasets = Vec::new();

    for (&year, raw) in by_year {
        let Some(raw) = raw else {
            warn!(year, "skipping null division/quarter entry");
            continue;
        };
        let Some(matrix) = validate_year(year, raw)? else {
            warn!(year, "skipping division/quarter data with missing fields");
            continue;
        };

        let (base_year, divisions) = base.get_or_insert_with(|| (year, matrix.divisions.clone()));
        if *divisions != matrix.divisions {
            return Err(DataError::DivisionMismatch {
                year,
                base_year: *base_year,
                expected: divisions.clone(),
                actual: matrix.divisions,
            });
        }

        for (q, quarter) in matrix.quarters.iter().enumerate() {
            datasets.push(Dataset {
                label: format!("{quarter} {year}"),
                values: matrix.values.iter().map(|row| Some(row[q])).collect(),
                color: quarter_color(q, year),
                hints: DisplayHints::default(),
            });
        }
    }

    Ok(ChartData {
        labels: base.map(|(_, divisions)| divisions).unwrap_or_default(),
        datasets,
    })
}
