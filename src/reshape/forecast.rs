//! Security-incident forecast panel.
//!
//! Each district contributes two series on one shared date axis: its actual
//! counts (solid) and its forecast (dashed), both in the district's color.

use crate::domain::{ChartData, Dataset, DisplayHints, DistrictForecast, Palette};
use crate::reshape::color::assign;
use crate::reshape::timeline::{NamedPoints, align};

/// Dash pattern (on, off) for forecast series.
pub const FORECAST_DASH: [u16; 2] = [5, 5];

pub fn forecast_chart(districts: &[DistrictForecast], palette: Palette<'_>) -> ChartData {
    let actual_labels: Vec<String> = districts.iter().map(|d| format!("{} Actual", d.district)).collect();
    let forecast_labels: Vec<String> = districts.iter().map(|d| format!("{} Forecast", d.district)).collect();

    let mut inputs = Vec::with_capacity(districts.len() * 2);
    for (i, d) in districts.iter().enumerate() {
        inputs.push(NamedPoints::new(&actual_labels[i], &d.actual));
        inputs.push(NamedPoints::new(&forecast_labels[i], &d.forecast));
    }

    let aligned = align(&inputs);

    let solid = DisplayHints::default().with_border_width(2.0).with_tension(0.3);
    let dashed = solid.with_dash(FORECAST_DASH[0], FORECAST_DASH[1]);

    let datasets = aligned
        .series
        .into_iter()
        .enumerate()
        .map(|(i, (label, values))| {
            let district_idx = i / 2;
            let is_forecast = i % 2 == 1;
            Dataset {
                label,
                values,
                color: assign(district_idx, palette),
                hints: if is_forecast { dashed } else { solid },
            }
        })
        .collect();

    ChartData {
        labels: aligned.axis,
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateValuePoint;
    use crate::reshape::color::FORECAST_PALETTE;
    use pretty_assertions::assert_eq;

    fn district(name: &str, actual: &[(&str, f64)], forecast: &[(&str, f64)]) -> DistrictForecast {
        let conv = |raw: &[(&str, f64)]| {
            raw.iter()
                .map(|(d, v)| DateValuePoint::new(*d, Some(*v)))
                .collect::<Vec<_>>()
        };
        DistrictForecast {
            district: name.to_string(),
            actual: conv(actual),
            forecast: conv(forecast),
        }
    }

    #[test]
    fn actual_and_forecast_per_district() {
        let input = vec![district(
            "Gotham Heights",
            &[("2024-01", 10.0)],
            &[("2024-01", 12.0), ("2024-02", 14.0)],
        )];

        let chart = forecast_chart(&input, FORECAST_PALETTE);

        assert_eq!(chart.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Gotham Heights Actual");
        assert_eq!(chart.datasets[0].values, vec![Some(10.0), None]);
        assert_eq!(chart.datasets[1].label, "Gotham Heights Forecast");
        assert_eq!(chart.datasets[1].values, vec![Some(12.0), Some(14.0)]);
        assert_eq!(chart.datasets[0].hints.dash, None);
        assert_eq!(chart.datasets[1].hints.dash, Some(FORECAST_DASH));
        assert_eq!(chart.datasets[0].color, chart.datasets[1].color);
    }

    #[test]
    fn districts_share_the_union_axis() {
        let input = vec![
            district("A", &[("2024-03", 1.0)], &[]),
            district("B", &[("2024-01", 2.0)], &[("2024-02", 3.0)]),
        ];
        let chart = forecast_chart(&input, FORECAST_PALETTE);

        assert_eq!(chart.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(chart.datasets[0].values, vec![None, None, Some(1.0)]);
        assert_eq!(chart.datasets[1].values, vec![None, None, None]);
        assert_eq!(chart.datasets[3].values, vec![None, Some(3.0), None]);
        assert_ne!(chart.datasets[0].color, chart.datasets[2].color);
    }

    #[test]
    fn no_districts_is_an_empty_chart() {
        let chart = forecast_chart(&[], FORECAST_PALETTE);
        assert!(chart.is_empty());
        assert!(chart.labels.is_empty());
    }
}
