mod gibbs;
pub mod montecarlo;
pub mod stochastic;
pub mod utils;

pub use gibbs::{GibbsSampler, NormalPrior, PosteriorDraw, PosteriorSamples};
pub use montecarlo::MonteCarloEngine;
pub use stochastic::{extinction_probability, theoretical_extinction_probability, BranchingProcess};

use std::fmt::Debug;

use rand::Rng;

use crate::error::{Result, SimError};
use crate::simulation::{AggregateResult, Reducer, Trial};

pub trait Process {
    /// Value carried from one discrete step to the next.
    type State: Clone + Debug + Send + Sync;

    /// Derives the next state from the previous one, drawing randomness only from `rng`.
    fn step<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Result<Self::State>;
}

pub trait MonteCarlo {
    /// Simulates `trials` independent trials of `spec` and returns every path.
    fn simulate<P>(&self, spec: &ProcessSpec<P>, trials: usize) -> Result<Vec<Trial<P::State>>>
    where
        P: Process + Sync;

    /// Simulates `trials` independent trials, summarizes each one and reduces the summaries.
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
        F: Fn(&Trial<P::State>) -> T + Send + Sync;
}

/// A process together with its starting point and horizon.
///
/// Immutable once built: `steps` is the length of every trial produced from it,
/// initial state included.
#[derive(Debug, Clone)]
pub struct ProcessSpec<P: Process> {
    process: P,
    initial_state: P::State,
    steps: usize,
}

impl<P: Process> ProcessSpec<P> {
    pub fn new(process: P, initial_state: P::State, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(SimError::invalid("steps", "a trial needs at least one step"));
        }
        Ok(Self {
            process,
            initial_state,
            steps,
        })
    }

    #[inline(always)]
    pub fn process(&self) -> &P {
        &self.process
    }

    #[inline(always)]
    pub fn initial_state(&self) -> &P::State {
        &self.initial_state
    }

    #[inline(always)]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Counter;

    impl Process for Counter {
        type State = u32;

        fn step<R: Rng + ?Sized>(&self, state: &u32, _rng: &mut R) -> Result<u32> {
            Ok(state + 1)
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let result = ProcessSpec::new(Counter, 0, 0);
        assert!(matches!(result, Err(SimError::InvalidParameter { .. })));
    }

    #[test]
    fn test_accessors() {
        let spec = ProcessSpec::new(Counter, 7, 3).unwrap();
        assert_eq!(*spec.initial_state(), 7);
        assert_eq!(spec.steps(), 3);
    }
}
