//! Raw source documents: JSON → records, and offline loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::domain::RawRecord;
use crate::error::{AppError, ErrorKind};

/// File names used by the offline source.
pub const DAILY_FILE: &str = "daily.json";
pub const INFO_FILE: &str = "info.json";
pub const AGGREGATE_FILE: &str = "us_daily.json";

/// The three documents one run works from.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    /// Per-region, per-day records (newest first).
    pub daily: Vec<RawRecord>,
    /// One record per region with static information.
    pub info: Vec<RawRecord>,
    /// National series, keyed under the aggregate key.
    pub aggregate: Option<Vec<RawRecord>>,
}

/// Accepts an array of objects or a single object.
pub fn records_from_json(value: Value, what: &str) -> Result<Vec<RawRecord>, AppError> {
    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(AppError::malformed_input(format!(
                    "{what}: entry {idx} is not an object ({})",
                    json_kind(&other)
                ))),
            })
            .collect(),
        other => Err(AppError::malformed_input(format!(
            "{what}: expected a JSON array or object, got {}",
            json_kind(&other)
        ))),
    }
}

pub fn parse_records(text: &str, what: &str) -> Result<Vec<RawRecord>, AppError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::malformed_input(format!("{what}: invalid JSON: {e}")))?;
    records_from_json(value, what)
}

/// Load `daily.json`, `info.json` and (if present) `us_daily.json` from `dir`.
pub fn load_snapshot_from_dir(dir: &Path) -> Result<SourceSnapshot, AppError> {
    let daily = read_records(&dir.join(DAILY_FILE))?;
    let info = read_records(&dir.join(INFO_FILE))?;

    let aggregate_path = dir.join(AGGREGATE_FILE);
    let aggregate = if aggregate_path.exists() {
        Some(read_records(&aggregate_path)?)
    } else {
        None
    };

    info!(
        dir = %dir.display(),
        daily = daily.len(),
        info = info.len(),
        aggregate = aggregate.as_ref().map_or(0, Vec::len),
        "loaded snapshot from disk"
    );
    Ok(SourceSnapshot { daily, info, aggregate })
}

fn read_records(path: &Path) -> Result<Vec<RawRecord>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to read '{}': {e}", path.display())))?;
    parse_records(&text, &path.display().to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
