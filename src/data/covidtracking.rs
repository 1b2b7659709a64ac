//! COVID Tracking Project API integration.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::info;

use crate::domain::{RawRecord, SourceConfig};
use crate::error::{AppError, ErrorKind};
use crate::io::source::{SourceSnapshot, records_from_json};

pub const DAILY_URL: &str = "https://covidtracking.com/api/v1/states/daily.json";
pub const INFO_URL: &str = "https://covidtracking.com/api/v1/states/info.json";
pub const AGGREGATE_URL: &str = "https://covidtracking.com/api/us/daily";

pub struct CovidTrackingClient {
    client: Client,
}

impl CovidTrackingClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch all documents named in `source`. Any failure aborts the fetch.
    pub fn fetch_snapshot(&self, source: &SourceConfig) -> Result<SourceSnapshot, AppError> {
        let daily = self.fetch_records(&source.daily_url)?;
        let info = self.fetch_records(&source.info_url)?;
        let aggregate = match &source.aggregate_url {
            Some(url) => Some(self.fetch_records(url)?),
            None => None,
        };

        Ok(SourceSnapshot { daily, info, aggregate })
    }

    pub fn fetch_records(&self, url: &str) -> Result<Vec<RawRecord>, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                ErrorKind::Fetch,
                format!("Request to {url} failed with status {}.", resp.status()),
            ));
        }

        let body: Value = resp
            .json()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Failed to parse response from {url}: {e}")))?;

        let records = records_from_json(body, url)?;
        info!(url, records = records.len(), "fetched");
        Ok(records)
    }
}
