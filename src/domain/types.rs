//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight from the analytics API
//! - exported to JSON from the CLI
//! - handed to the TUI renderer without further conversion

use std::collections::{BTreeMap, BTreeSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single observation on a date (or year-quarter) axis.
///
/// `value` is `None` when the API sent `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValuePoint {
    pub date: String,
    pub value: Option<f64>,
}

impl DateValuePoint {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// 24-bit color used for every series.
///
/// Serialized as a `#rrggbb` string so exported charts read the same way
/// the API's palettes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self(r, g, b))
    }

    /// Convert an HSL triple (hue in degrees, saturation/lightness in `[0, 1]`).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match h_prime as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self(channel(r1), channel(g1), channel(b1))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{raw}', expected #rrggbb")))
    }
}

/// An ordered, non-empty list of series colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<'a> {
    colors: &'a [Rgb],
}

impl<'a> Palette<'a> {
    /// Build a palette from a constant list.
    ///
    /// Panics (at compile time when used in a `const`) if `colors` is empty.
    pub const fn new(colors: &'a [Rgb]) -> Self {
        assert!(!colors.is_empty(), "palette must contain at least one color");
        Self { colors }
    }

    pub fn try_new(colors: &'a [Rgb]) -> Result<Self, DataError> {
        if colors.is_empty() {
            return Err(DataError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn colors(&self) -> &'a [Rgb] {
        self.colors
    }
}

/// Presentation parameters carried alongside a series.
///
/// Reshaping never interprets these; the renderer honors the ones a
/// terminal can express (dash pattern, point markers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<[u16; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl DisplayHints {
    pub fn with_dash(mut self, on: u16, off: u16) -> Self {
        self.dash = Some([on, off]);
        self
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = Some(radius);
        self
    }

    pub fn with_border_width(mut self, width: f64) -> Self {
        self.border_width = Some(width);
        self
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }
}

/// One named series aligned to `ChartData::labels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    /// `None` is a gap, never zero.
    pub values: Vec<Option<f64>>,
    pub color: Rgb,
    #[serde(default)]
    pub hints: DisplayHints,
}

/// Normalized input for category-axis charts (line and bar).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// True when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.is_empty()
    }

    /// Min/max over every non-null value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for v in self
            .datasets
            .iter()
            .flat_map(|d| d.values.iter().flatten())
            .filter(|v| v.is_finite())
        {
            range = Some(match range {
                None => (*v, *v),
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
            });
        }
        range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterDataset {
    pub label: String,
    pub points: Vec<ScatterPoint>,
    pub color: Rgb,
    #[serde(default)]
    pub hints: DisplayHints,
}

/// Independently scaled point series; no shared axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub datasets: Vec<ScatterDataset>,
}

impl ScatterChart {
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.points.is_empty())
    }
}

/// Division x quarter revenue for one year, as sent by the API.
///
/// Every field is optional: a year with a missing field is skipped during
/// flattening rather than failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDivisionQuarter {
    #[serde(default)]
    pub divisions: Option<Vec<String>>,
    #[serde(default)]
    pub quarters: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<Vec<f64>>>,
}

/// `revenue-by-division-quarter` response keyed by year. A `null` year entry
/// decodes to `None` and is skipped like an incomplete year.
pub type DivisionQuarterByYear = BTreeMap<i32, Option<RawDivisionQuarter>>;

/// A validated division x quarter matrix.
///
/// Invariant: `values.len() == divisions.len()` and every row has
/// `quarters.len()` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionQuarterMatrix {
    pub divisions: Vec<String>,
    pub quarters: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Key metrics for the selected years.
///
/// Only the two totals are guaranteed; the counters are filled in by
/// backends that also expose HR/supply-chain/R&D data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_employees: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_suppliers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rd_projects: Option<u64>,
}

/// `output-vs-gva` payload: three parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVsGva {
    pub periods: Vec<String>,
    pub revenue: Vec<f64>,
    pub gva: Vec<f64>,
}

/// One row of `revenue-gva-yoy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyRecord {
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "REVENUE_YoY_%")]
    pub revenue_yoy_pct: Option<f64>,
    #[serde(rename = "GVA_YoY_%")]
    pub gva_yoy_pct: Option<f64>,
}

/// Scatter points for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictPoints {
    pub district: String,
    pub points: Vec<ScatterPoint>,
}

/// Actual and forecast incident counts for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictForecast {
    pub district: String,
    #[serde(default)]
    pub actual: Vec<DateValuePoint>,
    #[serde(default)]
    pub forecast: Vec<DateValuePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub results: Option<Vec<DistrictForecast>>,
}

/// The set of years the user has selected.
///
/// Ordered ascending; an empty selection is valid and means "no data".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearSelection {
    years: BTreeSet<i32>,
}

impl YearSelection {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: years.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn min(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Toggle a year in or out; returns whether it is now selected.
    pub fn toggle(&mut self, year: i32) -> bool {
        if self.years.remove(&year) {
            false
        } else {
            self.years.insert(year);
            true
        }
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }
}

impl std::fmt::Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.years.is_empty() {
            return write!(f, "none");
        }
        let parts: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// The dashboard's panels; each owns its fetch cycle and display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    Summary,
    RevenueGvaYoy,
    OutputVsGva,
    DivisionQuarter,
    Engagement,
    Forecast,
}

impl PanelKind {
    pub const ALL: [PanelKind; 6] = [
        PanelKind::Summary,
        PanelKind::RevenueGvaYoy,
        PanelKind::OutputVsGva,
        PanelKind::DivisionQuarter,
        PanelKind::Engagement,
        PanelKind::Forecast,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Summary => "Key Metrics",
            PanelKind::RevenueGvaYoy => "Revenue vs GVA YoY Growth %",
            PanelKind::OutputVsGva => "Company Output vs. GVA Over Time",
            PanelKind::DivisionQuarter => "Revenue by Division - Quarterly",
            PanelKind::Engagement => "Community Engagement vs Crime Prevention Effectiveness",
            PanelKind::Forecast => "Security Incidents: Actual vs Forecast",
        }
    }

    /// Whether the panel is re-fetched when the year selection changes.
    pub fn depends_on_years(self) -> bool {
        !matches!(self, PanelKind::Forecast)
    }

    pub fn index(self) -> usize {
        match self {
            PanelKind::Summary => 0,
            PanelKind::RevenueGvaYoy => 1,
            PanelKind::OutputVsGva => 2,
            PanelKind::DivisionQuarter => 3,
            PanelKind::Engagement => 4,
            PanelKind::Forecast => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_and_print() {
        assert_eq!(Rgb::from_hex("#e6194b"), Some(Rgb(0xe6, 0x19, 0x4b)));
        assert_eq!(Rgb::from_hex("10B981"), Some(Rgb(0x10, 0xb9, 0x81)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb(0x1e, 0x3a, 0x8a).to_hex(), "#1e3a8a");
    }

    #[test]
    fn hsl_primaries_convert() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb(0, 0, 255));
        assert_eq!(Rgb::from_hsl(480.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(Rgb::from_hsl(0.0, 0.0, 1.0), Rgb(255, 255, 255));
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert_eq!(Palette::try_new(&[]), Err(DataError::EmptyPalette));
        assert_eq!(Palette::try_new(&[Rgb(1, 2, 3)]).map(|p| p.len()), Ok(1));
    }

    #[test]
    fn year_selection_toggles_and_orders() {
        let mut years = YearSelection::new([2023, 2021]);
        assert_eq!(years.min(), Some(2021));
        assert!(years.toggle(2022));
        assert!(!years.toggle(2021));
        assert_eq!(years.to_vec(), vec![2022, 2023]);
        assert_eq!(years.to_string(), "2022, 2023");
        assert_eq!(YearSelection::default().to_string(), "none");
    }

    #[test]
    fn chart_value_range_skips_gaps() {
        let chart = ChartData {
            labels: vec!["a".into(), "b".into()],
            datasets: vec![Dataset {
                label: "s".into(),
                values: vec![None, Some(3.0), Some(-1.0)],
                color: Rgb(0, 0, 0),
                hints: DisplayHints::default(),
            }],
        };
        assert_eq!(chart.value_range(), Some((-1.0, 3.0)));
        assert_eq!(ChartData::default().value_range(), None);
        assert!(ChartData::default().is_empty());
    }

    #[test]
    fn yoy_record_reads_api_field_names() {
        let rec: YoyRecord = serde_json::from_str(
            r#"{"Period":"Q1 FY2023","REVENUE_YoY_%":4.5,"GVA_YoY_%":null}"#,
        )
        .unwrap();
        assert_eq!(rec.period, "Q1 FY2023");
        assert_eq!(rec.revenue_yoy_pct, Some(4.5));
        assert_eq!(rec.gva_yoy_pct, None);
    }
}
