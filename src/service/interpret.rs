//! Response interpretation
//!
//! Derives what the results panel shows from a received assessment without
//! re-deriving any scoring logic. Every function here is pure and total.

use crate::model::{AssessmentResult, Driver, SeriesPoint, Severity, UnsafeZone};

/// Number of drivers shown by default
pub const DEFAULT_TOP_DRIVERS: usize = 8;

/// Severity band of a score; each band is closed on its lower bound
pub fn classify_severity(score: f64) -> Severity {
    if score < 25.0 {
        Severity::Low
    } else if score < 50.0 {
        Severity::Medium
    } else if score < 75.0 {
        Severity::High
    } else {
        Severity::Critical
    }
}

/// Round to two decimals for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Zip the sampled curve into chart points
///
/// One point per `x_values` entry. A missing `r`/`r_prime` at an index is
/// shown as `0`.
pub fn build_series(result: &AssessmentResult) -> Vec<SeriesPoint> {
    result
        .x_values
        .iter()
        .enumerate()
        .map(|(i, &x)| SeriesPoint {
            x: round2(x),
            r: round2(result.r_values.get(i).copied().unwrap_or(0.0)),
            r_prime: round2(result.r_prime_values.get(i).copied().unwrap_or(0.0)),
        })
        .collect()
}

/// Largest sampled x, if any samples exist
pub fn max_x(result: &AssessmentResult) -> Option<f64> {
    result.x_values.iter().copied().reduce(f64::max)
}

pub fn min_x(result: &AssessmentResult) -> Option<f64> {
    result.x_values.iter().copied().reduce(f64::min)
}

/// Region from the unsafe growth start to the end of the sampled domain
///
/// `start` is taken as received, even when it lies past the last sample.
/// Without samples the zone collapses to `start`.
pub fn unsafe_zone(result: &AssessmentResult) -> Option<UnsafeZone> {
    let start = result.x_unsafe_start?;
    Some(UnsafeZone {
        start,
        end: max_x(result).unwrap_or(start),
    })
}

/// First `n` drivers in the order the scoring service ranked them
pub fn top_drivers(result: &AssessmentResult, n: usize) -> Vec<Driver> {
    result.drivers.iter().take(n).cloned().collect()
}
