//! Shared numeric normalization
//!
//! Scores are reported rounded to two places unless a component says
//! otherwise. Every aggregate over a possibly empty slice has an explicit
//! default so no `NaN` leaks into a report.

/// Round half away from zero to `places` decimals
#[inline]
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Round to two decimals
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to three decimals
#[inline]
#[must_use]
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// Clamp into `[min, max]`, mapping `NaN` to `min`
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Arithmetic mean, or `default` when empty
#[must_use]
pub fn mean_or(values: &[f64], default: f64) -> f64 {
    if values.is_empty() {
        return default;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
