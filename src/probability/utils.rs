//! Parameter and domain checks
//!
//! Shared by every process constructor so that malformed inputs are rejected
//! at the boundary, before any trial runs.

use crate::error::{Result, SimError};

/// Accepts `p` in [0, 1]; NaN is rejected.
///
/// # Examples
///
/// ```
/// use stochsim::probability::utils::check_probability;
///
/// assert!(check_probability("p00", 0.95).is_ok());
/// assert!(check_probability("p00", 1.5).is_err());
/// ```
#[inline]
pub fn check_probability(name: &str, p: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(SimError::invalid(name, format!("probability {p} outside [0, 1]")))
    }
}

/// Accepts finite, strictly positive values.
#[inline]
pub fn check_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, format!("{value} must be positive and finite")))
    }
}

#[inline]
pub fn check_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(name, format!("{value} must be finite")))
    }
}

/// Guards a quantity produced during sampling (variance, precision, rate).
///
/// Unlike the `check_*` helpers this reports a [`SimError::NumericDomain`]:
/// the inputs were valid but the draw left the admissible range.
#[inline]
pub fn ensure_positive(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::NumericDomain { quantity, value })
    }
}
