//! Ratio-based derived series.

use tracing::debug;

use crate::domain::{MetricFields, RegionData, RegionDataset, RegionSeriesSet};
use crate::error::AppError;

/// `num[i] / den[i]` where `den[i] > 0`, else `0.0`.
pub fn ratio_series(num: &[f64], den: &[f64]) -> Vec<f64> {
    num.iter()
        .zip(den)
        .map(|(&n, &d)| if d > 0.0 { n / d } else { 0.0 })
        .collect()
}

/// Add the percent-positive series to one region, if both inputs exist.
///
/// Returns whether the series was added.
pub fn add_percent_positive(series: &mut RegionSeriesSet, fields: &MetricFields) -> Result<bool, AppError> {
    let (Some(pos), Some(tests)) = (series.field(&fields.increase), series.field(&fields.tests_increase)) else {
        debug!(region = series.region(), "percent-positive inputs missing; omitted");
        return Ok(false);
    };
    let values = ratio_series(pos, tests);
    series.insert_field(fields.percent_positive.as_str(), values)?;
    Ok(true)
}

/// Apply all derived metrics to every series region. Snapshots pass through.
pub fn with_derived_metrics(dataset: RegionDataset, fields: &MetricFields) -> Result<RegionDataset, AppError> {
    let mut regions = dataset.into_regions();
    for data in regions.values_mut() {
        if let RegionData::Series(series) = data {
            add_percent_positive(series, fields)?;
        }
    }
    Ok(RegionDataset::new(regions))
}
