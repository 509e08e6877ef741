//! Summary metrics and the output-vs-GVA panel.
//!
//! Totals are aggregated by the data source in a single round trip; nothing
//! here sums across responses.

use crate::domain::{ChartData, Dataset, DisplayHints, OutputVsGva};
use crate::error::DataError;
use crate::reshape::color::{GVA_GREEN, REVENUE_NAVY};

/// `{periods, revenue, gva}` -> two line series over the periods.
///
/// Arrays of different lengths are rejected rather than truncated.
pub fn output_vs_gva_chart(data: &OutputVsGva) -> Result<ChartData, DataError> {
    let expected = data.periods.len();
    for (field, len) in [("revenue", data.revenue.len()), ("gva", data.gva.len())] {
        if len != expected {
            return Err(DataError::LengthMismatch {
                field,
                expected,
                actual: len,
            });
        }
    }

    let hints = DisplayHints::default().with_point_radius(5.0).with_tension(0.3);
    Ok(ChartData {
        labels: data.periods.clone(),
        datasets: vec![
            Dataset {
                label: "Revenue".to_string(),
                values: data.revenue.iter().copied().map(Some).collect(),
                color: REVENUE_NAVY,
                hints,
            },
            Dataset {
                label: "Gross Value Added (GVA)".to_string(),
                values: data.gva.iter().copied().map(Some).collect(),
                color: GVA_GREEN,
                hints,
            },
        ],
    })
}

/// `$1,234.5M` style money formatting for metric cards and bar labels.
/// Non-finite values render as `-`, the same as a missing table cell.
pub fn format_millions(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = format!("{:.1}", value.abs());
    // Values that round to zero carry no sign.
    let negative = value < 0.0 && rounded != "0.0";
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${grouped}.{frac_part}M", if negative { "-" } else { "" })
}
