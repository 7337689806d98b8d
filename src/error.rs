//! Simulation errors.

use thiserror::Error;

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while configuring or running a simulation.
///
/// Every variant aborts the run it occurs in; there are no partial results.
#[derive(Error, Debug)]
pub enum SimError {
    /// Malformed trial/step count, out-of-range probability, bad hyper-parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A sampled variance or precision left its domain
    #[error("Numeric domain error: {quantity} = {value} (must be positive and finite)")]
    NumericDomain { quantity: &'static str, value: f64 },

    /// Input file absent, column absent, or no observations
    #[error("Missing data source: {0}")]
    MissingDataSource(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying config crate error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SimError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = SimError::invalid("trials", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter 'trials': must be at least 1");
    }

    #[test]
    fn test_numeric_domain_message() {
        let err = SimError::NumericDomain {
            quantity: "variance",
            value: -1.0,
        };
        assert!(err.to_string().contains("variance = -1"));
    }
}
