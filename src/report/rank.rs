//! Region ranking and comparison-region selection.
//!
//! Rankings are ascending by value. Regions that do not carry the sort key are
//! left out of the listing rather than given a sentinel value.

use crate::domain::{RankedRegion, RegionData, RegionDataset, SlopeTable};
use crate::error::AppError;

/// Rank regions by the mean of the trailing `window` values of `field`.
///
/// Snapshot regions contribute their scalar value. A series shorter than
/// `window` is averaged over all its values.
pub fn rank_by_field_average(
    dataset: &RegionDataset,
    field: &str,
    window: usize,
) -> Result<Vec<RankedRegion>, AppError> {
    if window == 0 {
        return Err(AppError::config("Ranking window must be >= 1."));
    }

    let mut out: Vec<RankedRegion> = dataset
        .iter()
        .filter_map(|(region, data)| {
            let value = match data {
                RegionData::Series(series) => trailing_mean(series.field(field)?, window)?,
                RegionData::Snapshot(snapshot) => snapshot.number(field)?,
            };
            value.is_finite().then(|| RankedRegion {
                region: region.to_string(),
                value,
            })
        })
        .collect();

    sort_ascending(&mut out);
    Ok(out)
}

/// The same ascending listing straight from a slope table.
pub fn rank_slopes(table: &SlopeTable) -> Vec<RankedRegion> {
    let mut out: Vec<RankedRegion> = table
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(region, value)| RankedRegion {
            region: region.to_string(),
            value,
        })
        .collect();
    sort_ascending(&mut out);
    out
}

/// Aggregate first, then the focus region, then the comparisons (focus removed).
///
/// The aggregate is included only when the dataset has it. Any other unknown
/// region is a configuration error.
pub fn select_regions(
    dataset: &RegionDataset,
    focus: &str,
    comparisons: &[String],
    aggregate_key: &str,
) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(comparisons.len() + 2);
    if dataset.contains(aggregate_key) {
        out.push(aggregate_key.to_string());
    }

    for region in std::iter::once(focus).chain(comparisons.iter().map(String::as_str)) {
        let region = region.trim();
        if region.is_empty() || out.iter().any(|r| r == region) {
            continue;
        }
        if !dataset.contains(region) {
            let known: Vec<&str> = dataset.region_ids().collect();
            return Err(AppError::config(format!(
                "Unknown region `{region}`; known regions: [{}]",
                known.join(", ")
            )));
        }
        out.push(region.to_string());
    }

    Ok(out)
}

pub(crate) fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let tail = &values[values.len().saturating_sub(window)..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

fn sort_ascending(rows: &mut [RankedRegion]) {
    // Stable: ties keep region-id order.
    rows.sort_by(|a, b| a.value.total_cmp(&b.value));
}
