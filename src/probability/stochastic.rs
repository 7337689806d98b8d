//! Galton–Watson branching process with Poisson offspring
//!
//! Each generation, every living individual independently has a
//! Poisson(λ)-distributed number of children; the next generation's size is the
//! sum of those counts. A population of zero stays at zero forever.
//!
//! # Extinction
//!
//! The family dies out when some generation has size zero. Starting from one
//! ancestor, the probability that this has happened by generation `n` is
//! estimated by running many independent trials and counting the ones whose
//! final generation is empty:
//!
//! ```
//! use stochsim::probability::montecarlo::MonteCarloEngine;
//! use stochsim::probability::extinction_probability;
//!
//! let mc = MonteCarloEngine::new(Some(42));
//! let p = extinction_probability(&mc, 2.0, 10, 300).unwrap();
//! assert!(p > 0.05 && p < 0.4);
//! ```
//!
//! # Mathematical Background
//!
//! With offspring generating function G(s) = exp(λ(s − 1)), the eventual
//! extinction probability q is the smallest root of q = G(q) in [0, 1]:
//!
//! - λ ≤ 1: q = 1 (the family dies out almost surely)
//! - λ > 1: q < 1, e.g. λ = 2 gives q ≈ 0.2032
//!
//! The finite-horizon Monte Carlo estimate approaches q from below as the
//! number of generations grows.
//!
//! # Conventions
//!
//! - λ ≤ 0 means no individual ever has children (Poisson(0) ≡ 0).
//! - A non-finite λ is rejected.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::error::{Result, SimError};
use crate::probability::montecarlo::MonteCarloEngine;
use crate::probability::utils::check_finite;
use crate::probability::{Process, ProcessSpec};

/// Poisson(λ) branching process over population sizes.
///
/// # Fields
///
/// - `lambda`: Mean number of children per individual
/// - `offspring`: Offspring distribution, absent when λ ≤ 0
#[derive(Debug, Clone)]
pub struct BranchingProcess {
    lambda: f64,
    offspring: Option<Poisson<f64>>,
}

impl BranchingProcess {
    pub fn new(lambda: f64) -> Result<Self> {
        check_finite("lambda", lambda)?;
        let offspring = if lambda > 0.0 {
            let poisson = Poisson::new(lambda)
                .map_err(|e| SimError::invalid("lambda", e.to_string()))?;
            Some(poisson)
        } else {
            None
        };
        Ok(Self { lambda, offspring })
    }

    #[inline(always)]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl Process for BranchingProcess {
    type State = u64;

    fn step<R: Rng + ?Sized>(&self, population: &u64, rng: &mut R) -> Result<u64> {
        // Extinct stays extinct, and draws nothing.
        if *population == 0 {
            return Ok(0);
        }
        let Some(offspring) = &self.offspring else {
            return Ok(0);
        };

        let mut next_generation: u64 = 0;
        for _individual in 0..*population {
            let children: f64 = offspring.sample(rng);
            next_generation = next_generation.saturating_add(children as u64);
        }
        Ok(next_generation)
    }
}

/// Fraction of `trials` families, each started from one ancestor, that are
/// extinct at generation `generations - 1`.
///
/// `generations` counts the ancestor's generation, matching the length of each
/// trial.
pub fn extinction_probability(
    engine: &MonteCarloEngine,
    lambda: f64,
    generations: usize,
    trials: usize,
) -> Result<f64> {
    let spec = ProcessSpec::new(BranchingProcess::new(lambda)?, 1, generations)?;
    engine.proportion(&spec, trials, |trial| *trial.final_state() == 0)
}

/// Eventual extinction probability q from the fixed point q = exp(λ(q − 1)).
///
/// Iterates from q = 0, which converges monotonically to the smallest root.
pub fn theoretical_extinction_probability(lambda: f64) -> f64 {
    const TOLERANCE: f64 = 1e-12;
    const MAX_ITER: usize = 100_000;

    if !(lambda > 1.0) {
        return 1.0;
    }

    let mut q = 0.0_f64;
    for _ in 0..MAX_ITER {
        let next = (lambda * (q - 1.0)).exp();
        if (next - q).abs() < TOLERANCE {
            return next;
        }
        q = next;
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::run_trial;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_non_finite_lambda() {
        assert!(BranchingProcess::new(f64::NAN).is_err());
        assert!(BranchingProcess::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_extinct_population_is_absorbing() {
        let process = BranchingProcess::new(3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(process.step(&0, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_extinct_step_draws_nothing() {
        let process = BranchingProcess::new(3.0).unwrap();
        let mut used = StdRng::seed_from_u64(5);
        let mut fresh = StdRng::seed_from_u64(5);

        process.step(&0, &mut used).unwrap();
        assert_eq!(used.gen::<u64>(), fresh.gen::<u64>());
    }

    #[test]
    fn test_non_positive_lambda_never_grows() {
        for lambda in [0.0, -1.0, -0.5] {
            let process = BranchingProcess::new(lambda).unwrap();
            let mut rng = StdRng::seed_from_u64(9);
            assert_eq!(process.step(&1_000, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_trial_absorption() {
        let spec = ProcessSpec::new(BranchingProcess::new(0.9).unwrap(), 1, 30).unwrap();
        let mut rng = StdRng::seed_from_u64(77);

        for _ in 0..50 {
            let trial = run_trial(&spec, &mut rng).unwrap();
            assert_eq!(trial.len(), 30);
            if let Some(first_zero) = trial.states().iter().position(|&z| z == 0) {
                assert!(trial.states()[first_zero..].iter().all(|&z| z == 0));
            }
        }
    }

    #[test]
    fn test_offspring_mean() {
        // one generation from a large population: Z1 / Z0 ≈ λ
        let process = BranchingProcess::new(2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(123);
        let next = process.step(&10_000, &mut rng).unwrap();
        let ratio = next as f64 / 10_000.0;
        assert!((ratio - 2.0).abs() < 0.1, "ratio = {}", ratio);
    }

    #[test]
    fn test_theoretical_extinction() {
        assert_eq!(theoretical_extinction_probability(0.5), 1.0);
        assert_eq!(theoretical_extinction_probability(1.0), 1.0);
        assert_eq!(theoretical_extinction_probability(-2.0), 1.0);

        let q = theoretical_extinction_probability(2.0);
        assert!((q - 0.2031878699).abs() < 1e-8, "q = {}", q);
        assert!((q - (2.0 * (q - 1.0)).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_zero_lambda_extinction_is_certain() {
        let mc = MonteCarloEngine::new(Some(0));
        assert_eq!(extinction_probability(&mc, 0.0, 10, 300).unwrap(), 1.0);
    }
}
