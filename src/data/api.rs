//! HTTP client for the analytics API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::data::DataSource;
use crate::domain::{
    DistrictPoints, DivisionQuarterByYear, ForecastResponse, OutputVsGva, Summary, YoyRecord,
};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const BASE_URL_ENV: &str = "WAYNE_DASH_API_URL";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the base URL from `.env` / the environment, falling back to
    /// the local development server.
    pub fn from_env(timeout: Option<Duration>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, years: &[i32]) -> Result<T, AppError> {
        let url = self.endpoint_url(endpoint);
        debug!(%url, ?years, "GET");

        let resp = self
            .client
            .get(&url)
            .query(&year_query(years))
            .send()
            .map_err(|e| AppError::new(4, format!("Request to {endpoint} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Request to {endpoint} failed with status {}.", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse {endpoint} response: {e}")))
    }
}

/// Repeated `year=Y` pairs, in the order given.
pub fn year_query(years: &[i32]) -> Vec<(&'static str, String)> {
    years.iter().map(|y| ("year", y.to_string())).collect()
}

impl DataSource for ApiClient {
    fn available_years(&self) -> Result<Vec<i32>, AppError> {
        self.get_json("available-years", &[])
    }

    fn summary(&self, years: &[i32]) -> Result<Summary, AppError> {
        self.get_json("summary", years)
    }

    fn output_vs_gva(&self, years: &[i32]) -> Result<OutputVsGva, AppError> {
        self.get_json("output-vs-gva", years)
    }

    fn revenue_by_division_quarter(
        &self,
        years: &[i32],
    ) -> Result<DivisionQuarterByYear, AppError> {
        self.get_json("revenue-by-division-quarter", years)
    }

    fn engagement_vs_effectiveness(&self, year: i32) -> Result<Vec<DistrictPoints>, AppError> {
        self.get_json("community-engagement-vs-effectiveness", &[year])
    }

    fn security_forecasts(&self) -> Result<ForecastResponse, AppError> {
        self.get_json("security-forecasts", &[])
    }

    fn revenue_gva_yoy(&self, years: &[i32]) -> Result<Vec<YoyRecord>, AppError> {
        self.get_json("revenue-gva-yoy", years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_cleanly() {
        let client = ApiClient::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.endpoint_url("/summary"),
            "http://localhost:8000/api/summary"
        );
        assert_eq!(
            client.endpoint_url("available-years"),
            "http://localhost:8000/api/available-years"
        );
    }

    #[test]
    fn years_become_repeated_query_pairs() {
        assert_eq!(
            year_query(&[2022, 2023]),
            vec![("year", "2022".to_string()), ("year", "2023".to_string())]
        );
        assert!(year_query(&[]).is_empty());
    }

    #[test]
    fn unreachable_server_is_a_data_source_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = ApiClient::new("http://127.0.0.1:9/api", Some(Duration::from_millis(500))).unwrap();
        let err = client.available_years().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("available-years"));
    }
}
