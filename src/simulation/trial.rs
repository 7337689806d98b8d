//! Step-at-a-time trial driver
//!
//! A [`TrialRun`] walks one trial through its life cycle:
//!
//! ```text
//! Initialized --advance--> Stepping --advance--> ... --advance--> Completed
//! ```
//!
//! The run holds every state produced so far. Once the sequence reaches the
//! spec's step count the run is `Completed` and can only be turned into a
//! [`Trial`]; it cannot be restarted or rewound.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use stochsim::probability::ProcessSpec;
//! use stochsim::regime::{ChainState, TwoStateChain};
//! use stochsim::simulation::{TrialPhase, TrialRun};
//!
//! let chain = TwoStateChain::new(0.95, 0.99).unwrap();
//! let spec = ProcessSpec::new(chain, ChainState::Zero, 3).unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let mut run = TrialRun::new(&spec);
//! assert_eq!(run.phase(), TrialPhase::Initialized);
//! assert_eq!(run.advance(&mut rng).unwrap(), TrialPhase::Stepping);
//! assert_eq!(run.advance(&mut rng).unwrap(), TrialPhase::Completed);
//! assert_eq!(run.finish(&mut rng).unwrap().len(), 3);
//! ```

use rand::Rng;

use crate::error::Result;
use crate::probability::{Process, ProcessSpec};

/// Where a trial is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    Initialized,
    Stepping,
    Completed,
}

/// A completed trial: the ordered states for steps `0..n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<S> {
    states: Vec<S>,
}

impl<S> Trial<S> {
    #[inline(always)]
    pub fn states(&self) -> &[S] {
        &self.states
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false; a trial holds at least its initial state.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn initial_state(&self) -> &S {
        &self.states[0]
    }

    #[inline]
    pub fn final_state(&self) -> &S {
        &self.states[self.states.len() - 1]
    }

    pub fn into_states(self) -> Vec<S> {
        self.states
    }
}

/// In-flight trial of a process.
///
/// # Fields
///
/// - `spec`: The process, its initial state and its step count
/// - `states`: States produced so far, initial state first
/// - `phase`: Current life-cycle phase
pub struct TrialRun<'a, P: Process> {
    spec: &'a ProcessSpec<P>,
    states: Vec<P::State>,
    phase: TrialPhase,
}

impl<'a, P: Process> TrialRun<'a, P> {
    pub fn new(spec: &'a ProcessSpec<P>) -> Self {
        let mut states = Vec::with_capacity(spec.steps());
        states.push(spec.initial_state().clone());

        // A one-step spec is already complete: the initial state is the whole trial.
        let phase = if spec.steps() == 1 {
            TrialPhase::Completed
        } else {
            TrialPhase::Initialized
        };

        Self { spec, states, phase }
    }

    #[inline(always)]
    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    /// Most recent state.
    #[inline]
    pub fn state(&self) -> &P::State {
        &self.states[self.states.len() - 1]
    }

    /// Index of the most recent state.
    #[inline(always)]
    pub fn step_index(&self) -> usize {
        self.states.len() - 1
    }

    /// Produces the next state. A completed run is left untouched and draws nothing.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TrialPhase> {
        if self.phase == TrialPhase::Completed {
            return Ok(TrialPhase::Completed);
        }

        let next = self.spec.process().step(self.state(), rng)?;
        self.states.push(next);

        self.phase = if self.states.len() == self.spec.steps() {
            TrialPhase::Completed
        } else {
            TrialPhase::Stepping
        };
        Ok(self.phase)
    }

    /// Runs the remaining steps and hands back the completed trial.
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Trial<P::State>> {
        while self.phase != TrialPhase::Completed {
            self.advance(rng)?;
        }
        Ok(Trial {
            states: self.states,
        })
    }
}

/// Runs one trial of `spec` to completion, drawing only from `rng`.
///
/// The returned sequence has exactly `spec.steps()` states, the first being
/// the spec's initial state.
pub fn run_trial<P, R>(spec: &ProcessSpec<P>, rng: &mut R) -> Result<Trial<P::State>>
where
    P: Process,
    R: Rng + ?Sized,
{
    TrialRun::new(spec).finish(rng)
}
