//! Moving averages with "valid" convolution semantics.
//!
//! A window of `n` over `L` values yields `L - n + 1` outputs and no padding:
//! `out[i] = mean(data[i..i + n])`.

use crate::error::AppError;

/// Direct windowed mean.
pub fn moving_average(data: &[f64], n: usize) -> Result<Vec<f64>, AppError> {
    check_window(data.len(), n)?;
    let denom = n as f64;
    Ok(data.windows(n).map(|w| w.iter().sum::<f64>() / denom).collect())
}

/// Same result as [`moving_average`] via a running prefix sum.
pub fn moving_average_cumsum(data: &[f64], n: usize) -> Result<Vec<f64>, AppError> {
    check_window(data.len(), n)?;

    let mut prefix = Vec::with_capacity(data.len() + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &v in data {
        acc += v;
        prefix.push(acc);
    }

    let denom = n as f64;
    Ok((n..=data.len()).map(|end| (prefix[end] - prefix[end - n]) / denom).collect())
}

fn check_window(len: usize, n: usize) -> Result<(), AppError> {
    if n == 0 {
        return Err(AppError::config("Moving-average window must be >= 1."));
    }
    if n > len {
        return Err(AppError::insufficient_data(format!(
            "Moving-average window {n} exceeds series length {len}."
        )));
    }
    Ok(())
}
