//! Summary statistics over plain `f64` slices
//!
//! Used to reduce per-trial summaries and to summarize posterior draws.
//!
//! # Examples
//!
//! ```
//! use stochsim::stats::{mean, percentile};
//!
//! let draws = [0.9, 1.1, 1.0, 1.2, 0.8];
//! assert!((mean(&draws) - 1.0).abs() < 1e-12);
//! assert_eq!(percentile(&draws, 0.5), Some(1.0));
//! ```

pub mod core;

pub use self::core::{mean, mean_variance, percentile, stddev, sum_sq_dev, variance};
