//! Record normalization.
//!
//! Turns flat, newest-first JSON records (many regions interleaved) into one
//! `RegionData` per region:
//!
//! - one record  → `RegionSnapshot` (flat field → scalar)
//! - many records → `RegionSeriesSet` (oldest-first, one sequence per field)
//!
//! Missing and null values become `0.0` so every sequence keeps the same
//! length and index `i` refers to the same day across fields.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{FIELD_DATE, RawRecord, RegionData, RegionDataset, RegionSeriesSet, RegionSnapshot};
use crate::error::AppError;

/// Normalize one source document keyed by `region_field`.
pub fn normalize_records(records: Vec<RawRecord>, region_field: &str) -> Result<RegionDataset, AppError> {
    let groups = group_by_region(records, region_field)?;

    let mut regions = BTreeMap::new();
    for (region, group) in groups {
        let data = normalize_group(&region, group)?;
        regions.insert(region, data);
    }

    Ok(RegionDataset::new(regions))
}

/// Normalize a per-region document plus an optional aggregate document that
/// has no region field. The aggregate lands under `aggregate_key`.
pub fn normalize_with_aggregate(
    records: Vec<RawRecord>,
    aggregate: Option<Vec<RawRecord>>,
    region_field: &str,
    aggregate_key: &str,
) -> Result<RegionDataset, AppError> {
    let dataset = normalize_records(records, region_field)?;
    let Some(aggregate) = aggregate else {
        return Ok(dataset);
    };
    if aggregate.is_empty() {
        warn!(key = aggregate_key, "aggregate source returned no records; skipping");
        return Ok(dataset);
    }

    let mut regions = dataset.into_regions();
    let data = normalize_group(aggregate_key, aggregate)?;
    if regions.insert(aggregate_key.to_string(), data).is_some() {
        warn!(key = aggregate_key, "aggregate source replaced a region with the same key");
    }
    Ok(RegionDataset::new(regions))
}

/// Group records by region, keeping the source's relative order in each group.
fn group_by_region(
    records: Vec<RawRecord>,
    region_field: &str,
) -> Result<BTreeMap<String, Vec<RawRecord>>, AppError> {
    let mut groups: BTreeMap<String, Vec<RawRecord>> = BTreeMap::new();
    for record in records {
        let region = region_id(&record, region_field)?;
        groups.entry(region).or_default().push(record);
    }
    Ok(groups)
}

fn region_id(record: &RawRecord, region_field: &str) -> Result<String, AppError> {
    match record.get(region_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(AppError::malformed_input(format!(
            "Record has an invalid region field `{region_field}` ({other}); available fields: {}",
            format_fields(record)
        ))),
        None => Err(AppError::malformed_input(format!(
            "Record is missing region field `{region_field}`; available fields: {}",
            format_fields(record)
        ))),
    }
}

fn format_fields(record: &RawRecord) -> String {
    let names: Vec<&str> = record.keys().map(String::as_str).collect();
    format!("[{}]", names.join(", "))
}

/// `group` is newest-first, as delivered by the source.
fn normalize_group(region: &str, mut group: Vec<RawRecord>) -> Result<RegionData, AppError> {
    if group.len() == 1 {
        let values: BTreeMap<String, Value> = group.pop().into_iter().flatten().collect();
        debug!(region, "single entry; stored as snapshot");
        return Ok(RegionData::Snapshot(RegionSnapshot::new(region, values)));
    }

    group.reverse();
    let series = build_series(region, &group)?;
    debug!(region, days = series.len(), fields = series.field_names().count(), "built series");
    Ok(RegionData::Series(series))
}

/// `records` is oldest-first. The newest record's keys define the field set.
fn build_series(region: &str, records: &[RawRecord]) -> Result<RegionSeriesSet, AppError> {
    let mut set = RegionSeriesSet::new(region, records.len());
    let Some(newest) = records.last() else {
        return Ok(set);
    };

    for field in newest.keys() {
        match numeric_column(records, field) {
            Some(values) => set.insert_field(field.as_str(), values)?,
            None => debug!(region, field = field.as_str(), "non-numeric field; no series"),
        }
    }

    if let Some(dates) = date_column(records) {
        set.set_dates(dates)?;
    }

    Ok(set)
}

/// Numeric sequence for `field`, or `None` if any record holds a text value.
fn numeric_column(records: &[RawRecord], field: &str) -> Option<Vec<f64>> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let v = match record.get(field) {
            None | Some(Value::Null) => 0.0,
            Some(Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            Some(Value::String(s)) if s.is_empty() => 0.0,
            Some(Value::String(_)) | Some(Value::Array(_)) | Some(Value::Object(_)) => return None,
        };
        out.push(v);
    }
    Some(out)
}

fn date_column(records: &[RawRecord]) -> Option<Vec<NaiveDate>> {
    records
        .iter()
        .map(|r| r.get(FIELD_DATE).and_then(parse_date))
        .collect()
}

/// Accepts `20200405`, `"20200405"` and `"2020-04-05"`.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => NaiveDate::parse_from_str(&n.as_i64()?.to_string(), "%Y%m%d").ok(),
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
                .ok()
        }
        _ => None,
    }
}
