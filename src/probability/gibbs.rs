//! Two-block Gibbs sampler for a normal model with unknown mean and variance
//!
//! # Model
//!
//! ```text
//! x_i | mu, s²  ~ N(mu, s²)          i = 1..N
//! mu            ~ N(nu, tau)          (tau is a variance)
//! 1 / s²        ~ Gamma(a, rate = b)
//! ```
//!
//! # Conditional posteriors
//!
//! ```text
//! mu | s², x    ~ N( (s²·nu + N·tau·x̄) / (N·tau + s²),  s²·tau / (N·tau + s²) )
//! 1/s² | mu, x  ~ Gamma( N/2 + a,  rate = b + ½·Σ(x_i − mu)² )
//! ```
//!
//! Each step draws mu given the current variance, then the precision given the
//! new mu, and stores the variance as 1 / precision. `tau = ∞` is a flat prior
//! on mu: the conditional mean becomes x̄ and the conditional variance s²/N.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use stochsim::data::Observations;
//! use stochsim::probability::{GibbsSampler, NormalPrior, PosteriorDraw};
//!
//! let obs = Observations::new(vec![1.9, 2.4, 2.1, 1.7, 2.3, 2.0, 2.2, 1.8]).unwrap();
//! let sampler = GibbsSampler::new(&obs, NormalPrior::default()).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let samples = sampler.sample(PosteriorDraw::new(0.5, 4.0), 300, &mut rng).unwrap();
//!
//! // Discard the first 100 draws as burn-in
//! let mu_hat = samples.mean_mu(100).unwrap();
//! assert!(mu_hat > 1.0 && mu_hat < 2.5);
//! ```

use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};
use tracing::debug;

use crate::data::Observations;
use crate::error::{Result, SimError};
use crate::probability::montecarlo::MonteCarloEngine;
use crate::probability::utils::{check_finite, check_positive, ensure_positive};
use crate::probability::{Process, ProcessSpec};
use crate::simulation::run_trial;
use crate::stats::core::{mean, percentile};

/// Prior hyper-parameters
///
/// # Fields
///
/// - `nu`: Prior mean of mu
/// - `tau`: Prior variance of mu (`f64::INFINITY` for a flat prior)
/// - `a`: Shape of the Gamma prior on the precision
/// - `b`: Rate of the Gamma prior on the precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPrior {
    pub nu: f64,
    pub tau: f64,
    pub a: f64,
    pub b: f64,
}

impl NormalPrior {
    pub fn new(nu: f64, tau: f64, a: f64, b: f64) -> Result<Self> {
        let prior = Self { nu, tau, a, b };
        prior.validate()?;
        Ok(prior)
    }

    /// Flat prior on mu with the given Gamma(a, b) prior on the precision.
    pub fn flat_mean(a: f64, b: f64) -> Result<Self> {
        Self::new(0.0, f64::INFINITY, a, b)
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("nu", self.nu)?;
        if !(self.tau > 0.0) {
            return Err(SimError::invalid("tau", format!("prior variance {} must be positive", self.tau)));
        }
        check_positive("a", self.a)?;
        check_positive("b", self.b)?;
        Ok(())
    }

    #[inline(always)]
    pub fn is_flat(&self) -> bool {
        self.tau.is_infinite()
    }
}

impl Default for NormalPrior {
    fn default() -> Self {
        Self {
            nu: 0.0,
            tau: 1.0,
            a: 0.1,
            b: 0.1,
        }
    }
}

/// One joint draw of (mu, variance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosteriorDraw {
    pub mu: f64,
    pub variance: f64,
}

impl PosteriorDraw {
    pub fn new(mu: f64, variance: f64) -> Self {
        Self { mu, variance }
    }
}

/// Gibbs sampler over (mu, variance) given a fixed set of observations.
///
/// Keeps only the sufficient statistics (N, x̄, Σ(x − x̄)²), so cloning it
/// into a [`ProcessSpec`] is cheap.
#[derive(Debug, Clone)]
pub struct GibbsSampler {
    prior: NormalPrior,
    count: f64,
    sample_mean: f64,
    sum_sq_dev: f64,
}

impl GibbsSampler {
    pub fn new(observations: &Observations, prior: NormalPrior) -> Result<Self> {
        prior.validate()?;
        Ok(Self {
            prior,
            count: observations.len() as f64,
            sample_mean: observations.mean(),
            sum_sq_dev: observations.sum_sq_dev(),
        })
    }

    #[inline(always)]
    pub fn prior(&self) -> &NormalPrior {
        &self.prior
    }

    /// (mean, std) of mu given the variance.
    pub fn mu_conditional(&self, variance: f64) -> Result<(f64, f64)> {
        let variance = ensure_positive("variance", variance)?;
        let n = self.count;

        let (cond_mean, cond_var) = if self.prior.is_flat() {
            (self.sample_mean, variance / n)
        } else {
            let tau = self.prior.tau;
            let denom = n * tau + variance;
            (
                (variance * self.prior.nu + n * tau * self.sample_mean) / denom,
                variance * tau / denom,
            )
        };

        let cond_std = ensure_positive("conditional std of mu", cond_var.sqrt())?;
        Ok((cond_mean, cond_std))
    }

    /// (shape, rate) of the precision given mu.
    pub fn precision_conditional(&self, mu: f64) -> Result<(f64, f64)> {
        let shape = self.count / 2.0 + self.prior.a;
        let shift = self.sample_mean - mu;
        let sum_sq = self.sum_sq_dev + self.count * shift * shift;
        let rate = ensure_positive("precision rate", self.prior.b + 0.5 * sum_sq)?;
        Ok((shape, rate))
    }

    /// Draws `draws` joint samples starting from `initial`.
    ///
    /// The initial point is not part of the output. Burn-in is applied
    /// afterwards through [`PosteriorSamples::after_burn_in`].
    pub fn sample<R: Rng + ?Sized>(
        &self,
        initial: PosteriorDraw,
        draws: usize,
        rng: &mut R,
    ) -> Result<PosteriorSamples> {
        let spec = self.chain_spec(initial, draws)?;
        let (m, s) = self.mu_conditional(initial.variance)?;
        debug!(draws, cond_mean = m, cond_std = s, "starting Gibbs chain");

        let trial = run_trial(&spec, rng)?;
        Ok(PosteriorSamples::from_chain(trial.into_states()))
    }

    /// Runs `chains` independent chains on the engine, one seeded stream each.
    pub fn sample_chains(
        &self,
        engine: &MonteCarloEngine,
        initial: PosteriorDraw,
        draws: usize,
        chains: usize,
    ) -> Result<Vec<PosteriorSamples>> {
        let spec = self.chain_spec(initial, draws)?;
        engine.summarize(&spec, chains, |trial| {
            PosteriorSamples::from_chain(trial.states().to_vec())
        })
    }

    fn chain_spec(&self, initial: PosteriorDraw, draws: usize) -> Result<ProcessSpec<Self>> {
        if draws == 0 {
            return Err(SimError::invalid("draws", "at least one draw is required"));
        }
        check_finite("initial mu", initial.mu)?;
        check_positive("initial variance", initial.variance)?;
        // +1: the trial also holds the initial point
        ProcessSpec::new(self.clone(), initial, draws + 1)
    }
}

impl Process for GibbsSampler {
    type State = PosteriorDraw;

    fn step<R: Rng + ?Sized>(&self, current: &PosteriorDraw, rng: &mut R) -> Result<PosteriorDraw> {
        let (cond_mean, cond_std) = self.mu_conditional(current.variance)?;
        let mu_dist = Normal::new(cond_mean, cond_std).map_err(|_| SimError::NumericDomain {
            quantity: "conditional std of mu",
            value: cond_std,
        })?;
        let mu = mu_dist.sample(rng);

        let (shape, rate) = self.precision_conditional(mu)?;
        let precision_dist = Gamma::new(shape, 1.0 / rate).map_err(|_| SimError::NumericDomain {
            quantity: "precision rate",
            value: rate,
        })?;
        let precision = ensure_positive("precision", precision_dist.sample(rng))?;
        let variance = ensure_positive("variance", 1.0 / precision)?;

        Ok(PosteriorDraw { mu, variance })
    }
}

/// Ordered output of one Gibbs chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorSamples {
    draws: Vec<PosteriorDraw>,
}

impl PosteriorSamples {
    /// Drops the chain's initial point.
    fn from_chain(chain: Vec<PosteriorDraw>) -> Self {
        Self {
            draws: chain.into_iter().skip(1).collect(),
        }
    }

    #[inline(always)]
    pub fn draws(&self) -> &[PosteriorDraw] {
        &self.draws
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Draws after discarding the first `burn_in`; empty if `burn_in >= len`.
    #[inline]
    pub fn after_burn_in(&self, burn_in: usize) -> &[PosteriorDraw] {
        &self.draws[burn_in.min(self.draws.len())..]
    }

    pub fn mus(&self, burn_in: usize) -> Vec<f64> {
        self.after_burn_in(burn_in).iter().map(|d| d.mu).collect()
    }

    pub fn variances(&self, burn_in: usize) -> Vec<f64> {
        self.after_burn_in(burn_in).iter().map(|d| d.variance).collect()
    }

    /// Posterior mean of mu; `None` when burn-in leaves nothing.
    pub fn mean_mu(&self, burn_in: usize) -> Option<f64> {
        let mus = self.mus(burn_in);
        (!mus.is_empty()).then(|| mean(&mus))
    }

    pub fn mean_variance(&self, burn_in: usize) -> Option<f64> {
        let variances = self.variances(burn_in);
        (!variances.is_empty()).then(|| mean(&variances))
    }

    /// Equal-tailed credible interval for mu at `level` (e.g. 0.95).
    pub fn mu_interval(&self, burn_in: usize, level: f64) -> Option<(f64, f64)> {
        let mus = self.mus(burn_in);
        let tail = (1.0 - level) / 2.0;
        Some((percentile(&mus, tail)?, percentile(&mus, 1.0 - tail)?))
    }
}
