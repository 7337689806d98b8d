//! # stochsim
//!
//! Monte Carlo trials of small stochastic processes.
//!
//! ## Design
//!
//! - **One process abstraction**: a [`Process`](probability::Process) maps the
//!   previous state and an RNG to the next state
//! - **Independent trials**: every trial owns its RNG stream, derived from a
//!   base seed and the trial index, so runs reproduce with or without rayon
//! - **Explicit reduction**: per-trial summaries fold into a proportion, a
//!   mean or the raw samples
//!
//! ## Modules
//!
//! - `probability`: process trait, Monte Carlo engine, branching process, Gibbs sampler
//! - `regime`: two-state Markov chains
//! - `simulation`: trial state machine and reducers
//! - `stats`: summary statistics
//! - `data`: CSV observation loader
//! - `config`: layered settings
//! - `cli`: the `stochsim` command
//!
//! ## Example
//!
//! ```rust
//! use stochsim::prelude::*;
//!
//! let engine = MonteCarloEngine::new(Some(42));
//!
//! // A supercritical branching process still dies out some of the time
//! let p = extinction_probability(&engine, 2.0, 10, 300).unwrap();
//! assert!(p > 0.05 && p < 0.4);
//!
//! // Chain path from a fixed start
//! let spec = ProcessSpec::new(TwoStateChain::lake_default(), ChainState::Zero, 1000).unwrap();
//! let trial = run_trial(&spec, &mut MonteCarloEngine::trial_rng(42, 0)).unwrap();
//! assert_eq!(trial.len(), 1000);
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod probability;
pub mod regime;
pub mod simulation;
pub mod stats;

pub use error::{Result, SimError};

/// Common imports
pub mod prelude {
    pub use crate::error::{Result, SimError};

    // Processes and the trial engine
    pub use crate::probability::{
        extinction_probability,
        theoretical_extinction_probability,
        BranchingProcess,
        MonteCarlo,
        MonteCarloEngine,
        Process,
        ProcessSpec,
    };

    // Bayesian inference
    pub use crate::probability::{GibbsSampler, NormalPrior, PosteriorDraw, PosteriorSamples};

    // Regime
    pub use crate::regime::{
        occupancy,
        self_transition_frequencies,
        switch_count,
        ChainState,
        TwoStateChain,
    };

    // Trials
    pub use crate::simulation::{run_trial, AggregateResult, Reducer, Trial, TrialPhase, TrialRun};

    pub use crate::data::Observations;
}
