use rand::Rng;

use crate::error::{Result, SimError};
use crate::probability::utils::check_probability;
use crate::probability::Process;

/// State of a two-state chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    Zero,
    One,
}

impl ChainState {
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            ChainState::Zero => 0,
            ChainState::One => 1,
        }
    }

    #[inline(always)]
    pub fn flipped(self) -> Self {
        match self {
            ChainState::Zero => ChainState::One,
            ChainState::One => ChainState::Zero,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(ChainState::Zero),
            1 => Ok(ChainState::One),
            other => Err(SimError::invalid(
                "initial_state",
                format!("{other} is not a state of a two-state chain (expected 0 or 1)"),
            )),
        }
    }

    /// Uniformly random state.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            ChainState::One
        } else {
            ChainState::Zero
        }
    }
}

impl From<ChainState> for u8 {
    fn from(state: ChainState) -> u8 {
        state.index() as u8
    }
}

/// Two-state, first-order Markov chain
///
/// Each step draws u ~ Uniform(0, 1): the chain stays in state s when
/// u ≤ p_ss and flips to the other state otherwise. The next state depends on
/// the current one only.
///
/// Transition matrix, P[i][j] = P(state_t = j | state_{t-1} = i):
///
/// ```text
///          to 0       to 1
/// from 0 [ p00      1 - p00 ]
/// from 1 [ 1 - p11  p11     ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoStateChain {
    // Self-transition probabilities: [p00, p11]
    stay: [f64; 2],
}

impl TwoStateChain {
    /// Create from self-transition probabilities
    #[inline]
    pub fn new(p00: f64, p11: f64) -> Result<Self> {
        Ok(Self {
            stay: [check_probability("p00", p00)?, check_probability("p11", p11)?],
        })
    }

    /// Lake/no-lake example: state 0 persists with 0.95, state 1 with 0.99
    #[inline]
    pub fn lake_default() -> Self {
        Self {
            stay: [0.95, 0.99],
        }
    }

    #[inline(always)]
    pub fn p00(&self) -> f64 {
        self.stay[0]
    }

    #[inline(always)]
    pub fn p11(&self) -> f64 {
        self.stay[1]
    }

    #[inline(always)]
    pub fn stay_probability(&self, state: ChainState) -> f64 {
        self.stay[state.index()]
    }

    #[inline]
    pub fn transition_matrix(&self) -> [[f64; 2]; 2] {
        [
            [self.stay[0], 1.0 - self.stay[0]],
            [1.0 - self.stay[1], self.stay[1]],
        ]
    }

    /// Long-run fraction of time in each state.
    ///
    /// `None` when both states are absorbing (p00 = p11 = 1): the chain never
    /// mixes and the limit depends on where it starts.
    pub fn stationary_distribution(&self) -> Option<[f64; 2]> {
        let leave_zero = 1.0 - self.stay[0];
        let leave_one = 1.0 - self.stay[1];
        let total = leave_zero + leave_one;
        if total <= 0.0 {
            return None;
        }
        Some([leave_one / total, leave_zero / total])
    }
}

impl Default for TwoStateChain {
    fn default() -> Self {
        Self::lake_default()
    }
}

impl Process for TwoStateChain {
    type State = ChainState;

    #[inline]
    fn step<R: Rng + ?Sized>(&self, state: &ChainState, rng: &mut R) -> Result<ChainState> {
        let u: f64 = rng.gen();
        if u <= self.stay_probability(*state) {
            Ok(*state)
        } else {
            Ok(state.flipped())
        }
    }
}

/// Empirical self-transition frequencies [p̂00, p̂11] of a path.
///
/// An entry is `None` when its state never occurs before the final step, so
/// no transition out of it was observed.
pub fn self_transition_frequencies(states: &[ChainState]) -> [Option<f64>; 2] {
    let mut visits = [0usize; 2];
    let mut stays = [0usize; 2];

    for pair in states.windows(2) {
        let from = pair[0].index();
        visits[from] += 1;
        if pair[0] == pair[1] {
            stays[from] += 1;
        }
    }

    let freq = |s: usize| {
        if visits[s] == 0 {
            None
        } else {
            Some(stays[s] as f64 / visits[s] as f64)
        }
    };
    [freq(0), freq(1)]
}

/// Fraction of a path spent in `state`. Zero for an empty path.
pub fn occupancy(states: &[ChainState], state: ChainState) -> f64 {
    if states.is_empty() {
        return 0.0;
    }
    states.iter().filter(|&&s| s == state).count() as f64 / states.len() as f64
}

/// Number of state changes along a path.
pub fn switch_count(states: &[ChainState]) -> usize {
    states.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::ProcessSpec;
    use crate::simulation::run_trial;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_bad_probabilities() {
        assert!(TwoStateChain::new(1.2, 0.5).is_err());
        assert!(TwoStateChain::new(0.5, -0.1).is_err());
        assert!(TwoStateChain::new(f64::NAN, 0.5).is_err());
        assert!(TwoStateChain::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_absorbing_chain_is_constant() {
        let chain = TwoStateChain::new(1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for initial in [ChainState::Zero, ChainState::One] {
            let spec = ProcessSpec::new(chain, initial, 100).unwrap();
            let trial = run_trial(&spec, &mut rng).unwrap();
            assert_eq!(trial.len(), 100);
            assert!(trial.states().iter().all(|&s| s == initial));
        }
    }

    #[test]
    fn test_zero_stay_always_flips() {
        let chain = TwoStateChain::new(0.0, 0.0).unwrap();
        let spec = ProcessSpec::new(chain, ChainState::Zero, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let trial = run_trial(&spec, &mut rng).unwrap();

        assert_eq!(switch_count(trial.states()), 19);
    }

    #[test]
    fn test_self_transition_convergence() {
        let chain = TwoStateChain::new(0.8, 0.6).unwrap();
        let spec = ProcessSpec::new(chain, ChainState::Zero, 50_000).unwrap();
        let mut rng = StdRng::seed_from_u64(2718);
        let trial = run_trial(&spec, &mut rng).unwrap();

        let [p00_hat, p11_hat] = self_transition_frequencies(trial.states());
        assert!((p00_hat.unwrap() - 0.8).abs() < 0.02);
        assert!((p11_hat.unwrap() - 0.6).abs() < 0.02);

        let pi = chain.stationary_distribution().unwrap();
        assert!((occupancy(trial.states(), ChainState::One) - pi[1]).abs() < 0.02);
    }

    #[test]
    fn test_stationary_distribution() {
        let pi = TwoStateChain::lake_default().stationary_distribution().unwrap();
        // π1 = 0.05 / (0.05 + 0.01)
        assert!((pi[1] - 5.0 / 6.0).abs() < 1e-12);
        assert!((pi[0] + pi[1] - 1.0).abs() < 1e-12);

        assert_eq!(TwoStateChain::new(1.0, 1.0).unwrap().stationary_distribution(), None);
    }

    #[test]
    fn test_transition_matrix_rows_sum_to_one() {
        let chain = TwoStateChain::new(0.3, 0.9).unwrap();
        for row in chain.transition_matrix() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_frequencies_unvisited_state() {
        let path = [ChainState::Zero, ChainState::Zero, ChainState::One];
        assert_eq!(self_transition_frequencies(&path), [Some(0.5), None]);
    }

    #[test]
    fn test_state_index_round_trip() {
        assert_eq!(ChainState::from_index(0).unwrap(), ChainState::Zero);
        assert_eq!(ChainState::from_index(1).unwrap(), ChainState::One);
        assert!(ChainState::from_index(2).is_err());
        assert_eq!(u8::from(ChainState::One), 1);
        assert_eq!(ChainState::One.flipped(), ChainState::Zero);
    }
}
