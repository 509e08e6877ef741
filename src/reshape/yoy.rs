//! Year-over-year growth panel.
//!
//! Percent changes are computed by the data source; this module only decides
//! which years to ask for and turns the returned rows into two line series.

use std::collections::BTreeSet;

use crate::domain::{ChartData, Dataset, DisplayHints, YearSelection, YoyRecord};
use crate::reshape::color::{BLUE, ORANGE};

/// Years to request so the earliest selected year has a prior-year baseline.
///
/// Adds `min - 1` when it is not already selected. The displayed selection
/// is left untouched.
pub fn adjusted_request_years(selected: &YearSelection) -> BTreeSet<i32> {
    let mut years = selected.years().clone();
    if let Some(min) = selected.min() {
        years.insert(min - 1);
    }
    years
}

/// Rows -> `{labels: periods, datasets: [revenue %, gva %]}`.
pub fn yoy_chart(records: &[YoyRecord]) -> ChartData {
    let hints = DisplayHints::default().with_point_radius(4.0).with_tension(0.3);

    ChartData {
        labels: records.iter().map(|r| r.period.clone()).collect(),
        datasets: vec![
            Dataset {
                label: "REVENUE YoY %".to_string(),
                values: records.iter().map(|r| r.revenue_yoy_pct).collect(),
                color: ORANGE,
                hints,
            },
            Dataset {
                label: "GVA YoY %".to_string(),
                values: records.iter().map(|r| r.gva_yoy_pct).collect(),
                color: BLUE,
                hints,
            },
        ],
    }
}
