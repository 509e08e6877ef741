//! Group district point lists into independent scatter series.

use crate::domain::{DisplayHints, DistrictPoints, Palette, ScatterChart, ScatterDataset};
use crate::reshape::color::assign;

/// Marker size used for every district.
pub const POINT_RADIUS: f64 = 6.0;

/// One series per district, colored by position in `palette`.
pub fn group(districts: &[DistrictPoints], palette: Palette<'_>) -> ScatterChart {
    let datasets = districts
        .iter()
        .enumerate()
        .map(|(idx, d)| ScatterDataset {
            label: d.district.clone(),
            points: d.points.clone(),
            color: assign(idx, palette),
            hints: DisplayHints::default().with_point_radius(POINT_RADIUS),
        })
        .collect();

    ScatterChart { datasets }
}
