//! Shared domain types.
//!
//! These types are built once per run by the normalizer and are read-only
//! afterwards. They are serializable so they can be exported to JSON for an
//! external renderer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// One entry of an external JSON document (field name → value).
pub type RawRecord = serde_json::Map<String, Value>;

/// Region identifier field in the per-state documents.
pub const DEFAULT_REGION_FIELD: &str = "state";
/// Synthetic key for the national aggregate series.
pub const DEFAULT_AGGREGATE_KEY: &str = "US";
/// Observation date field (`YYYYMMDD`).
pub const FIELD_DATE: &str = "date";
/// Display name field in the info document.
pub const FIELD_NAME: &str = "name";

/// Names of the source fields the derived metrics and slopes are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFields {
    /// Cumulative confirmed positives.
    pub cumulative: String,
    /// New positives reported on the day.
    pub increase: String,
    /// New test results reported on the day.
    pub tests_increase: String,
    /// Output name of the derived percent-positive series.
    pub percent_positive: String,
}

impl Default for MetricFields {
    fn default() -> Self {
        Self {
            cumulative: "positive".to_string(),
            increase: "positiveIncrease".to_string(),
            tests_increase: "totalTestResultsIncrease".to_string(),
            percent_positive: "percentPositive".to_string(),
        }
    }
}

/// Per-region, oldest-first numeric sequences of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeriesSet {
    region: String,
    len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    dates: Option<Vec<NaiveDate>>,
    fields: BTreeMap<String, Vec<f64>>,
}

impl RegionSeriesSet {
    pub fn new(region: impl Into<String>, len: usize) -> Self {
        Self {
            region: region.into(),
            len,
            dates: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Number of observation days.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.last().copied())
    }

    /// Add (or replace) a sequence. Rejects sequences of a different length.
    pub fn insert_field(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), AppError> {
        let name = name.into();
        if values.len() != self.len {
            return Err(AppError::malformed_input(format!(
                "Series `{name}` for region {} has {} values, expected {}.",
                self.region,
                values.len(),
                self.len
            )));
        }
        self.fields.insert(name, values);
        Ok(())
    }

    pub fn set_dates(&mut self, dates: Vec<NaiveDate>) -> Result<(), AppError> {
        if dates.len() != self.len {
            return Err(AppError::malformed_input(format!(
                "Region {} has {} dates, expected {}.",
                self.region,
                dates.len(),
                self.len
            )));
        }
        self.dates = Some(dates);
        Ok(())
    }
}

/// A region with a single raw entry: flat field → scalar, no time dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSnapshot {
    region: String,
    values: BTreeMap<String, Value>,
}

impl RegionSnapshot {
    pub fn new(region: impl Into<String>, values: BTreeMap<String, Value>) -> Self {
        Self {
            region: region.into(),
            values,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(Value::as_f64)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Shape of one region's data, decided once at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RegionData {
    Snapshot(RegionSnapshot),
    Series(RegionSeriesSet),
}

impl RegionData {
    pub fn region(&self) -> &str {
        match self {
            RegionData::Snapshot(s) => s.region(),
            RegionData::Series(s) => s.region(),
        }
    }

    pub fn as_series(&self) -> Option<&RegionSeriesSet> {
        match self {
            RegionData::Series(s) => Some(s),
            RegionData::Snapshot(_) => None,
        }
    }

    pub fn as_snapshot(&self) -> Option<&RegionSnapshot> {
        match self {
            RegionData::Snapshot(s) => Some(s),
            RegionData::Series(_) => None,
        }
    }
}

/// All regions of one normalized source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionDataset {
    regions: BTreeMap<String, RegionData>,
}

impl RegionDataset {
    pub fn new(regions: BTreeMap<String, RegionData>) -> Self {
        Self { regions }
    }

    pub fn into_regions(self) -> BTreeMap<String, RegionData> {
        self.regions
    }

    pub fn get(&self, region: &str) -> Option<&RegionData> {
        self.regions.get(region)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    pub fn series(&self, region: &str) -> Option<&RegionSeriesSet> {
        self.get(region).and_then(RegionData::as_series)
    }

    pub fn snapshot(&self, region: &str) -> Option<&RegionSnapshot> {
        self.get(region).and_then(RegionData::as_snapshot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionData)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_series(&self) -> impl Iterator<Item = &RegionSeriesSet> {
        self.regions.values().filter_map(RegionData::as_series)
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Latest observation date across all series regions, if any carry dates.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.iter_series().filter_map(RegionSeriesSet::latest_date).max()
    }
}

/// Region id → trailing regression slope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlopeTable {
    slopes: BTreeMap<String, f64>,
}

impl SlopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: impl Into<String>, slope: f64) {
        self.slopes.insert(region.into(), slope);
    }

    pub fn get(&self, region: &str) -> Option<f64> {
        self.slopes.get(region).copied()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.slopes.contains_key(region)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.slopes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }
}

/// One row of a ranking: region and the scalar it was sorted by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegion {
    pub region: String,
    pub value: f64,
}

/// Smoothed (cumulative, daily increase) pairs for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthCurve {
    pub region: String,
    pub cumulative: Vec<f64>,
    pub increase: Vec<f64>,
}

impl GrowthCurve {
    pub fn latest_cumulative(&self) -> Option<f64> {
        self.cumulative.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

/// Slope next to recent test positivity for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub region: String,
    pub name: Option<String>,
    pub slope: f64,
    pub percent_positive: f64,
}

/// Where the three source documents come from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub daily_url: String,
    pub info_url: String,
    pub aggregate_url: Option<String>,
    pub timeout: Duration,
    /// Read `daily.json`, `info.json` and `us_daily.json` from here instead of HTTP.
    pub from_dir: Option<PathBuf>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub source: SourceConfig,
    pub region_field: String,
    pub aggregate_key: String,
    pub fields: MetricFields,

    pub focus_region: String,
    pub comparison_regions: Vec<String>,

    /// Moving-average window (days).
    pub avg_window: usize,
    /// Trailing points used for the slope fit.
    pub slope_window: usize,
    /// Trailing days averaged for percent-positive.
    pub pct_window: usize,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.avg_window == 0 {
            return Err(AppError::config("Moving-average window must be >= 1."));
        }
        if self.slope_window < 2 {
            return Err(AppError::config("Slope window must be >= 2."));
        }
        if self.pct_window == 0 {
            return Err(AppError::config("Percent-positive window must be >= 1."));
        }
        if self.region_field.trim().is_empty() {
            return Err(AppError::config("Region field name must not be empty."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn series_set_rejects_mismatched_length() {
        let mut set = RegionSeriesSet::new("NM", 3);
        set.insert_field("positive", vec![1.0, 2.0, 3.0]).unwrap();
        let err = set.insert_field("death", vec![1.0]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput);
        assert!(!set.has_field("death"));
    }

    #[test]
    fn snapshot_accessors() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), json!("New Mexico"));
        values.insert("fips".to_string(), json!(35));
        let snap = RegionSnapshot::new("NM", values);
        assert_eq!(snap.text("name"), Some("New Mexico"));
        assert_eq!(snap.number("fips"), Some(35.0));
        assert_eq!(snap.number("name"), None);
    }

    #[test]
    fn dataset_branches_on_shape() {
        let mut regions = BTreeMap::new();
        regions.insert(
            "AK".to_string(),
            RegionData::Snapshot(RegionSnapshot::new("AK", BTreeMap::new())),
        );
        regions.insert("NM".to_string(), RegionData::Series(RegionSeriesSet::new("NM", 2)));
        let ds = RegionDataset::new(regions);
        assert!(ds.series("AK").is_none());
        assert!(ds.snapshot("AK").is_some());
        assert!(ds.series("NM").is_some());
        assert_eq!(ds.iter_series().count(), 1);
    }

    #[test]
    fn config_rejects_zero_windows() {
        let mut cfg = AnalysisConfig {
            source: SourceConfig {
                daily_url: String::new(),
                info_url: String::new(),
                aggregate_url: None,
                timeout: Duration::from_secs(1),
                from_dir: None,
            },
            region_field: DEFAULT_REGION_FIELD.to_string(),
            aggregate_key: DEFAULT_AGGREGATE_KEY.to_string(),
            fields: MetricFields::default(),
            focus_region: "NM".to_string(),
            comparison_regions: Vec::new(),
            avg_window: 5,
            slope_window: 15,
            pct_window: 15,
            export_json: None,
            export_csv: None,
        };
        assert!(cfg.validate().is_ok());
        cfg.avg_window = 0;
        assert!(cfg.validate().is_err());
    }
}
