//! Trial execution and aggregation
//!
//! - [`trial`]: one trial, stepped from its initial state to completion
//! - [`aggregate`]: reducers folding per-trial summaries into one result

pub mod aggregate;
pub mod trial;

pub use aggregate::{AggregateResult, Reducer};
pub use trial::{run_trial, Trial, TrialPhase, TrialRun};
