//! Small numeric helpers shared by the analytics.
//!
//! Every function here returns `None` instead of dividing by zero.

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Coefficient of variation (std-dev over mean).
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    if avg.abs() < f64::EPSILON {
        return None;
    }
    Some(std_dev(values)? / avg)
}

/// Least-squares slope of `values` against their index.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| i as f64 * y)
        .sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_xx - sum_x.powi(2);
    if denominator.abs() < 1e-10 {
        return None;
    }

    Some((n * sum_xy - sum_x * sum_y) / denominator)
}

/// Extend the regression line `steps_ahead` steps past the last value.
pub fn linear_projection(values: &[f64], steps_ahead: f64) -> Option<f64> {
    let last = *values.last()?;
    match linear_slope(values) {
        Some(slope) => Some(last + slope * steps_ahead),
        None => Some(last),
    }
}
