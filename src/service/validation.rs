//! Response contract checks
//!
//! Runs right after decoding so a malformed curve never reaches the chart
//! layer. Errors reject the response; warnings are only logged.

use std::cmp::Ordering;

use crate::model::AssessmentResult;

/// Result of contract validation
#[derive(Debug)]
pub struct ContractValidationResult {
    /// Whether the response can be interpreted
    pub is_valid: bool,
    /// Broken invariants
    pub errors: Vec<String>,
    /// Suspicious but interpretable values
    pub warnings: Vec<String>,
}

impl ContractValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate a decoded assessment against the response invariants
///
/// Checks:
/// 1. The sampled sequences have equal length
/// 2. `x_values` is strictly increasing
/// 3. Score and samples are finite
/// 4. Score within [0, 100] and unsafe start within the sampled domain (warnings)
pub fn validate_result(result: &AssessmentResult) -> ContractValidationResult {
    let mut validation = ContractValidationResult::valid();

    let len = result.x_values.len();
    if result.r_values.len() != len || result.r_prime_values.len() != len {
        validation.add_error(format!(
            "Sequence lengths differ: x_values={}, r_values={}, r_prime_values={}",
            len,
            result.r_values.len(),
            result.r_prime_values.len()
        ));
    }

    if !result.r_double_prime_values.is_empty() && result.r_double_prime_values.len() != len {
        validation.add_error(format!(
            "r_double_prime_values has {} samples but x_values has {}",
            result.r_double_prime_values.len(),
            len
        ));
    }

    if let Some(i) = result
        .x_values
        .windows(2)
        .position(|pair| pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater))
    {
        validation.add_error(format!(
            "x_values not strictly increasing at index {} ({} then {})",
            i + 1,
            result.x_values[i],
            result.x_values[i + 1]
        ));
    }

    if !result.x_score.is_finite() {
        validation.add_error(format!("x_score is not finite: {}", result.x_score));
    } else if !(0.0..=100.0).contains(&result.x_score) {
        validation.add_warning(format!("x_score {} outside [0, 100]", result.x_score));
    }

    for (name, values) in [
        ("x_values", &result.x_values),
        ("r_values", &result.r_values),
        ("r_prime_values", &result.r_prime_values),
    ] {
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            validation.add_error(format!("{}[{}] is not finite", name, i));
        }
    }

    if let Some(start) = result.x_unsafe_start {
        match domain(&result.x_values) {
            Some((min, max)) if start < min || start > max => {
                validation.add_warning(format!(
                    "x_unsafe_start {} outside sampled domain [{}, {}]",
                    start, min, max
                ));
            }
            None => {
                validation.add_warning(format!(
                    "x_unsafe_start {} given without sampled values",
                    start
                ));
            }
            _ => {}
        }
    }

    for driver in &result.drivers {
        if !driver.points.is_finite() {
            validation.add_warning(format!("Driver '{}' has non-finite points", driver.factor));
        }
    }

    validation
}

fn domain(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
