//! Data sources for the dashboard.
//!
//! - `api`: the analytics HTTP API
//! - `sample`: deterministic synthetic payloads for offline use
//!
//! Both implement [`DataSource`], which is also the seam tests use to count
//! or fake requests.

use crate::domain::{
    DistrictPoints, DivisionQuarterByYear, ForecastResponse, OutputVsGva, Summary, YoyRecord,
};
use crate::error::AppError;

pub mod api;
pub mod sample;

pub use api::{ApiClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use sample::SampleSource;

/// One method per API endpoint. Year parameters are sent as repeated
/// `year=` query pairs.
pub trait DataSource: Send + Sync {
    /// `available-years`
    fn available_years(&self) -> Result<Vec<i32>, AppError>;

    /// `summary?year=..`
    fn summary(&self, years: &[i32]) -> Result<Summary, AppError>;

    /// `output-vs-gva?year=..`
    fn output_vs_gva(&self, years: &[i32]) -> Result<OutputVsGva, AppError>;

    /// `revenue-by-division-quarter?year=..`
    fn revenue_by_division_quarter(
        &self,
        years: &[i32],
    ) -> Result<DivisionQuarterByYear, AppError>;

    /// `community-engagement-vs-effectiveness?year=Y`
    fn engagement_vs_effectiveness(&self, year: i32) -> Result<Vec<DistrictPoints>, AppError>;

    /// `security-forecasts`
    fn security_forecasts(&self) -> Result<ForecastResponse, AppError>;

    /// `revenue-gva-yoy?year=..`
    fn revenue_gva_yoy(&self, years: &[i32]) -> Result<Vec<YoyRecord>, AppError>;
}
