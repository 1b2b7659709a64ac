//! Trailing-window slope estimation.
//!
//! The slope of smoothed daily increase against smoothed cumulative count over
//! the most recent `k` points is the deceleration indicator: a steady positive
//! slope means exponential growth, a falling or negative one means the number
//! of new cases per day is shrinking.

use tracing::{debug, warn};

use crate::domain::{GrowthCurve, SlopeTable};
use crate::error::AppError;
use crate::math::fit_line;

/// OLS slope of `y` against `x` over the last `k` points.
///
/// Returns `Ok(None)` when the trailing `x` values have no spread.
pub fn trailing_slope(x: &[f64], y: &[f64], k: usize) -> Result<Option<f64>, AppError> {
    if x.len() != y.len() {
        return Err(AppError::malformed_input(format!(
            "Slope inputs differ in length ({} vs {}).",
            x.len(),
            y.len()
        )));
    }
    if k < 2 {
        return Err(AppError::config("Slope window must be >= 2."));
    }
    if k > x.len() {
        return Err(AppError::insufficient_data(format!(
            "Slope window {k} exceeds series length {}.",
            x.len()
        )));
    }

    let start = x.len() - k;
    Ok(fit_line(&x[start..], &y[start..]).map(|(_, slope)| slope))
}

/// Slope per region for every curve with a positive latest cumulative value.
pub fn slope_table(curves: &[GrowthCurve], k: usize) -> Result<SlopeTable, AppError> {
    let mut table = SlopeTable::new();
    for curve in curves {
        let latest = curve.latest_cumulative().unwrap_or(0.0);
        if latest <= 0.0 {
            debug!(region = curve.region.as_str(), latest, "no positive signal; skipped");
            continue;
        }

        let slope = trailing_slope(&curve.cumulative, &curve.increase, k)
            .map_err(|e| AppError::new(e.kind(), format!("Region {}: {}", curve.region, e.message())))?;
        match slope {
            Some(slope) => table.insert(curve.region.as_str(), slope),
            None => warn!(region = curve.region.as_str(), "cumulative count flat over slope window; skipped"),
        }
    }
    Ok(table)
}
