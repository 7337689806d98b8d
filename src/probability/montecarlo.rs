//! Monte Carlo trial runner
//!
//! Runs many independent trials of a [`Process`] and reduces one summary per
//! trial into an aggregate: the fraction of trials satisfying a predicate, the
//! mean of a per-trial statistic, or the full list of summaries.
//!
//! # Example: extinction of a branching process
//!
//! ```
//! use stochsim::probability::montecarlo::MonteCarloEngine;
//! use stochsim::probability::{BranchingProcess, MonteCarlo, ProcessSpec};
//! use stochsim::simulation::Reducer;
//!
//! // Each individual has Poisson(0.8) children; start from one ancestor.
//! let process = BranchingProcess::new(0.8).unwrap();
//! let spec = ProcessSpec::new(process, 1, 10).unwrap();
//!
//! let mc = MonteCarloEngine::new(Some(42));
//! let result = mc
//!     .run_trials(&spec, 300, |trial| *trial.final_state() == 0, &Reducer::proportion(|&dead| dead))
//!     .unwrap();
//!
//! let p = result.proportion().unwrap();
//! assert!(p > 0.5);
//! ```
//!
//! # Seeding
//!
//! Trial `i` draws from its own generator seeded with `base + i` (wrapping),
//! where `base` is the engine seed or, without one, a single draw from OS
//! entropy per run. Summaries are always collected in trial-index order, so a
//! seeded run gives identical aggregates sequentially and on the rayon pool.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::probability::{MonteCarlo, Process, ProcessSpec};
use crate::simulation::{run_trial, AggregateResult, Reducer, Trial};
use crate::stats::core::mean;

/// Monte Carlo simulation engine
///
/// # Fields
///
/// - `seed`: Optional base seed for reproducible runs (useful for tests)
/// - `parallel`: Run trials on the rayon pool instead of the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloEngine {
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl MonteCarloEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Base seed for one run: the configured seed, or fresh entropy.
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(s) => s,
            None => StdRng::from_entropy().next_u64(),
        }
    }

    /// Generator owned by trial `index` of a run with base seed `base`.
    #[inline]
    pub fn trial_rng(base: u64, index: usize) -> StdRng {
        StdRng::seed_from_u64(base.wrapping_add(index as u64))
    }

    /// Runs every trial and returns one summary per trial, in trial-index order.
    ///
    /// The first failing trial aborts the run.
    pub fn summarize<P, T, F>(&self, spec: &ProcessSpec<P>, trials: usize, summary: F) -> Result<Vec<T>>
    where
        P: Process + Sync,
        T: Send,
        F: Fn(&Trial<P::State>) -> T + Send + Sync,
    {
        if trials == 0 {
            return Err(SimError::invalid("trials", "at least one trial is required"));
        }

        let base = self.resolve_seed();
        debug!(
            trials,
            steps = spec.steps(),
            parallel = self.parallel,
            base_seed = base,
            "running trials"
        );

        let run_one = |trial_index: usize| -> Result<T> {
            let mut rng = Self::trial_rng(base, trial_index);
            let trial = run_trial(spec, &mut rng)?;
            Ok(summary(&trial))
        };

        if self.parallel {
            (0..trials).into_par_iter().map(run_one).collect()
        } else {
            (0..trials).map(run_one).collect()
        }
    }

    /// Fraction of trials whose summary satisfies `predicate`.
    pub fn proportion<P, F>(&self, spec: &ProcessSpec<P>, trials: usize, predicate: F) -> Result<f64>
    where
        P: Process + Sync,
        F: Fn(&Trial<P::State>) -> bool + Send + Sync,
    {
        let hits = self
            .summarize(spec, trials, predicate)?
            .into_iter()
            .filter(|&hit| hit)
            .count();
        Ok(hits as f64 / trials as f64)
    }

    /// Arithmetic mean of a per-trial statistic.
    pub fn mean<P, F>(&self, spec: &ProcessSpec<P>, trials: usize, statistic: F) -> Result<f64>
    where
        P: Process + Sync,
        F: Fn(&Trial<P::State>) -> f64 + Send + Sync,
    {
        let values = self.summarize(spec, trials, statistic)?;
        Ok(mean(&values))
    }
}

impl MonteCarlo for MonteCarloEngine {
    fn simulate<P>(&self, spec: &ProcessSpec<P>, trials: usize) -> Result<Vec<Trial<P::State>>>
    where
        P: Process + Sync,
    {
        self.summarize(spec, trials, |trial| trial.clone())
    }

    fn run_trials<P, T, F>(
        &self,
        spec: &ProcessSpec<P>,
        trials: usize,
        summary: F,
        reducer: &Reducer<T>,
    ) -> Result<AggregateResult<T>>
    where
        P: Process + Sync,
        T: Send,
        F: Fn(&Trial<P::State>) -> T + Send + Sync,
    {
        let summaries = self.summarize(spec, trials, summary)?;
        Ok(reducer.reduce(summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::BranchingProcess;
    use crate::regime::{ChainState, TwoStateChain};

    #[test]
    fn test_zero_trials_rejected() {
        let spec = ProcessSpec::new(BranchingProcess::new(1.0).unwrap(), 1, 5).unwrap();
        let mc = MonteCarloEngine::new(Some(1));
        let result = mc.proportion(&spec, 0, |t| *t.final_state() == 0);
        assert!(matches!(result, Err(SimError::InvalidParameter { .. })));
    }

    #[test]
    fn test_simulate_returns_every_path() {
        let spec = ProcessSpec::new(BranchingProcess::new(1.5).unwrap(), 1, 8).unwrap();
        let mc = MonteCarloEngine::new(Some(7));
        let paths = mc.simulate(&spec, 25).unwrap();

        assert_eq!(paths.len(), 25);
        assert!(paths.iter().all(|p| p.len() == 8));
        assert!(paths.iter().all(|p| *p.initial_state() == 1));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let spec = ProcessSpec::new(BranchingProcess::new(1.2).unwrap(), 1, 10).unwrap();
        let mc = MonteCarloEngine::new(Some(99));

        let a = mc.summarize(&spec, 50, |t| *t.final_state()).unwrap();
        let b = mc.summarize(&spec, 50, |t| *t.final_state()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let chain = TwoStateChain::new(0.7, 0.6).unwrap();
        let spec = ProcessSpec::new(chain, ChainState::Zero, 200).unwrap();

        let sequential = MonteCarloEngine::new(Some(2024));
        let parallel = sequential.with_parallel(true);

        let seq = sequential
            .summarize(&spec, 64, |t| t.states().to_vec())
            .unwrap();
        let par = parallel.summarize(&spec, 64, |t| t.states().to_vec()).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_trials_use_distinct_streams() {
        let chain = TwoStateChain::new(0.5, 0.5).unwrap();
        let spec = ProcessSpec::new(chain, ChainState::Zero, 64).unwrap();
        let mc = MonteCarloEngine::new(Some(3));

        let paths = mc.simulate(&spec, 2).unwrap();
        assert_ne!(paths[0].states(), paths[1].states());
    }

    #[test]
    fn test_mean_of_constant_statistic() {
        let spec = ProcessSpec::new(BranchingProcess::new(0.0).unwrap(), 4, 3).unwrap();
        let mc = MonteCarloEngine::new(Some(5));
        let m = mc.mean(&spec, 10, |t| *t.final_state() as f64).unwrap();
        assert_eq!(m, 0.0);
    }
}
