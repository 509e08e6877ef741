//! Shared "fetch -> reshape" logic used by both CLI and TUI front-ends.
//!
//! Each panel has one loader: it issues the panel's request(s) against a
//! [`DataSource`] and reshapes the payload into chart input. The CLI calls
//! these directly; the TUI runs them on worker threads via the scheduler.

use serde::Serialize;
use tracing::{info, warn};

use crate::data::DataSource;
use crate::domain::{ChartData, PanelKind, ScatterChart, Summary, YearSelection};
use crate::error::AppError;
use crate::reshape::color::{FORECAST_PALETTE, SCATTER_PALETTE};

/// Reshaped output of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PanelData {
    Summary(Summary),
    Chart(ChartData),
    Scatter(ScatterChart),
}

impl PanelData {
    pub fn as_chart(&self) -> Option<&ChartData> {
        match self {
            PanelData::Chart(chart) => Some(chart),
            _ => None,
        }
    }
}

/// Fetch and reshape one panel.
///
/// `Ok(None)` is the "no data" state: an empty year selection for a
/// year-dependent panel (no request is issued) or an empty payload.
pub fn load_panel(
    source: &dyn DataSource,
    kind: PanelKind,
    years: &YearSelection,
) -> Result<Option<PanelData>, AppError> {
    if kind.depends_on_years() && years.is_empty() {
        return Ok(None);
    }

    match kind {
        PanelKind::Summary => load_summary(source, years),
        PanelKind::RevenueGvaYoy => load_revenue_gva_yoy(source, years),
        PanelKind::OutputVsGva => load_output_vs_gva(source, years),
        PanelKind::DivisionQuarter => load_division_quarter(source, years),
        PanelKind::Engagement => load_engagement(source, years),
        PanelKind::Forecast => load_forecast(source),
    }
}

/// Single round trip with the full year set; totals are used as returned.
pub fn load_summary(source: &dyn DataSource, years: &YearSelection) -> Result<Option<PanelData>, AppError> {
    if years.is_empty() {
        return Ok(None);
    }
    let summary = source.summary(&years.to_vec())?;
    info!(years = %years, total_revenue = summary.total_revenue, "summary loaded");
    Ok(Some(PanelData::Summary(summary)))
}

pub fn load_revenue_gva_yoy(
    source: &dyn DataSource,
    years: &YearSelection,
) -> Result<Option<PanelData>, AppError> {
    let request: Vec<i32> = crate::reshape::adjusted_request_years(years).into_iter().collect();
    if request.is_empty() {
        return Ok(None);
    }
    let records = source.revenue_gva_yoy(&request)?;
    if records.is_empty() {
        warn!(years = %years, "no YoY data for selection");
        return Ok(None);
    }
    Ok(non_empty_chart(crate::reshape::yoy_chart(&records)))
}

pub fn load_output_vs_gva(
    source: &dyn DataSource,
    years: &YearSelection,
) -> Result<Option<PanelData>, AppError> {
    if years.is_empty() {
        return Ok(None);
    }
    let data = source.output_vs_gva(&years.to_vec())?;
    let chart = crate::reshape::output_vs_gva_chart(&data)?;
    Ok(non_empty_chart(chart))
}

pub fn load_division_quarter(
    source: &dyn DataSource,
    years: &YearSelection,
) -> Result<Option<PanelData>, AppError> {
    if years.is_empty() {
        return Ok(None);
    }
    let by_year = source.revenue_by_division_quarter(&years.to_vec())?;
    if by_year.is_empty() {
        warn!(years = %years, "no division/quarter data for selection");
        return Ok(None);
    }
    let chart = crate::reshape::flatten(&by_year)?;
    Ok(non_empty_chart(chart))
}

/// The scatter endpoint takes one year; the earliest selected year is used.
pub fn load_engagement(source: &dyn DataSource, years: &YearSelection) -> Result<Option<PanelData>, AppError> {
    let Some(year) = years.min() else {
        return Ok(None);
    };
    let districts = source.engagement_vs_effectiveness(year)?;
    let chart = crate::reshape::group(&districts, SCATTER_PALETTE);
    if chart.is_empty() {
        return Ok(None);
    }
    Ok(Some(PanelData::Scatter(chart)))
}

pub fn load_forecast(source: &dyn DataSource) -> Result<Option<PanelData>, AppError> {
    let response = source.security_forecasts()?;
    let Some(results) = response.results else {
        warn!("forecast response has no results");
        return Ok(None);
    };
    Ok(non_empty_chart(crate::reshape::forecast_chart(&results, FORECAST_PALETTE)))
}

fn non_empty_chart(chart: ChartData) -> Option<PanelData> {
    if chart.is_empty() {
        None
    } else {
        Some(PanelData::Chart(chart))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake data sources shared by the app-level tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::data::DataSource;
    use crate::domain::*;
    use crate::error::AppError;

    /// Records every call; summary totals echo the first requested year so
    /// tests can tell responses apart. Requests that include `slow_year`
    /// sleep before answering.
    #[derive(Default)]
    pub struct RecordingSource {
        pub calls: AtomicUsize,
        pub requested: Mutex<Vec<(&'static str, Vec<i32>)>>,
        pub slow_year: Option<i32>,
        pub fail: bool,
    }

    impl RecordingSource {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record(&self, endpoint: &'static str, years: &[i32]) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut log) = self.requested.lock() {
                log.push((endpoint, years.to_vec()));
            }
            if self.slow_year.is_some_and(|slow| years.contains(&slow)) {
                std::thread::sleep(Duration::from_millis(300));
            }
            if self.fail {
                return Err(AppError::new(4, format!("Request to {endpoint} failed: connection refused")));
            }
            Ok(())
        }
    }

    impl DataSource for RecordingSource {
        fn available_years(&self) -> Result<Vec<i32>, AppError> {
            self.record("available-years", &[])?;
            Ok(vec![2021, 2022, 2023])
        }

        fn summary(&self, years: &[i32]) -> Result<Summary, AppError> {
            self.record("summary", years)?;
            Ok(Summary {
                total_revenue: years.first().copied().unwrap_or_default() as f64,
                total_profit: 1.0,
                unique_employees: None,
                departments: None,
                active_suppliers: None,
                total_rd_projects: None,
            })
        }

        fn output_vs_gva(&self, years: &[i32]) -> Result<OutputVsGva, AppError> {
            self.record("output-vs-gva", years)?;
            Ok(OutputVsGva {
                periods: vec!["Q1 2023".into()],
                revenue: vec![10.0],
                gva: vec![4.0],
            })
        }

        fn revenue_by_division_quarter(
            &self,
            years: &[i32],
        ) -> Result<DivisionQuarterByYear, AppError> {
            self.record("revenue-by-division-quarter", years)?;
            Ok(years
                .iter()
                .map(|&y| {
                    (
                        y,
                        Some(RawDivisionQuarter {
                            divisions: Some(vec!["Tech".into()]),
                            quarters: Some(vec!["Q1".into(), "Q2".into()]),
                            values: Some(vec![vec![1.0, 2.0]]),
                        }),
                    )
                })
                .collect())
        }

        fn engagement_vs_effectiveness(&self, year: i32) -> Result<Vec<DistrictPoints>, AppError> {
            self.record("community-engagement-vs-effectiveness", &[year])?;
            Ok(vec![DistrictPoints {
                district: "Old Gotham".into(),
                points: vec![ScatterPoint { x: 1.0, y: 2.0 }],
            }])
        }

        fn security_forecasts(&self) -> Result<ForecastResponse, AppError> {
            self.record("security-forecasts", &[])?;
            Ok(ForecastResponse {
                results: Some(vec![DistrictForecast {
                    district: "Burnley".into(),
                    actual: vec![DateValuePoint::new("2024-01", Some(10.0))],
                    forecast: vec![
                        DateValuePoint::new("2024-01", Some(12.0)),
                        DateValuePoint::new("2024-02", Some(14.0)),
                    ],
                }]),
            })
        }

        fn revenue_gva_yoy(&self, years: &[i32]) -> Result<Vec<YoyRecord>, AppError> {
            self.record("revenue-gva-yoy", years)?;
            Ok(vec![YoyRecord {
                period: "Q1 FY2023".into(),
                revenue_yoy_pct: Some(2.0),
                gva_yoy_pct: Some(1.0),
            }])
        }
    }
}
