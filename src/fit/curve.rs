//! Smoothed growth curves: moving-averaged cumulative counts paired with
//! moving-averaged daily increases, one curve per series region.

use tracing::debug;

use crate::domain::{GrowthCurve, MetricFields, RegionDataset, RegionSeriesSet};
use crate::error::AppError;
use crate::math::moving_average_cumsum;

/// Build the smoothed curve for one region.
///
/// Returns `Ok(None)` when the region lacks either input field.
pub fn growth_curve(
    series: &RegionSeriesSet,
    fields: &MetricFields,
    avg_window: usize,
) -> Result<Option<GrowthCurve>, AppError> {
    let (Some(cumulative), Some(increase)) = (series.field(&fields.cumulative), series.field(&fields.increase)) else {
        return Ok(None);
    };

    let cumulative = moving_average_cumsum(cumulative, avg_window).map_err(|e| with_region(e, series.region()))?;
    let increase = moving_average_cumsum(increase, avg_window).map_err(|e| with_region(e, series.region()))?;

    Ok(Some(GrowthCurve {
        region: series.region().to_string(),
        cumulative,
        increase,
    }))
}

/// Build curves for every series region that has both input fields and a
/// positive latest cumulative count. Regions without signal are skipped
/// before smoothing, so a short all-zero series never fails the run.
pub fn growth_curves(
    dataset: &RegionDataset,
    fields: &MetricFields,
    avg_window: usize,
) -> Result<Vec<GrowthCurve>, AppError> {
    let mut out = Vec::new();
    for series in dataset.iter_series() {
        let latest = series
            .field(&fields.cumulative)
            .and_then(|values| values.last().copied())
            .unwrap_or(0.0);
        if latest <= 0.0 {
            debug!(region = series.region(), latest, "no positive signal; no curve");
            continue;
        }

        match growth_curve(series, fields, avg_window)? {
            Some(curve) => out.push(curve),
            None => debug!(region = series.region(), "growth inputs missing; no curve"),
        }
    }
    Ok(out)
}

fn with_region(err: AppError, region: &str) -> AppError {
    AppError::new(err.kind(), format!("Region {region}: {}", err.message()))
}
