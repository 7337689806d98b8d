//! External data sources
//!
//! The only input the crate reads is a single numeric CSV column of
//! observations for the normal-model Gibbs sampler.

mod observations;

pub use observations::{Observations, DEFAULT_COLUMN};
