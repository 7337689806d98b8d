//! Gibbs command implementation

use std::fmt;

use tracing::{info, warn};

use crate::config::GibbsConfig;
use crate::data::Observations;
use crate::error::Result;
use crate::probability::montecarlo::MonteCarloEngine;
use crate::probability::{GibbsSampler, NormalPrior, PosteriorDraw, PosteriorSamples};

#[derive(Debug, Clone)]
pub struct GibbsReport {
    pub observations: usize,
    pub sample_mean: f64,
    pub draws: usize,
    pub burn_in: usize,
    pub samples: PosteriorSamples,
}

impl GibbsReport {
    pub fn kept(&self) -> usize {
        self.samples.after_burn_in(self.burn_in).len()
    }

    pub fn mean_mu(&self) -> Option<f64> {
        self.samples.mean_mu(self.burn_in)
    }

    pub fn mean_variance(&self) -> Option<f64> {
        self.samples.mean_variance(self.burn_in)
    }
}

impl fmt::Display for GibbsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Normal-model Gibbs sampler")?;
        writeln!(f, "==========================")?;
        writeln!(f, "  observations:   {}", self.observations)?;
        writeln!(f, "  sample mean:    {:.4}", self.sample_mean)?;
        writeln!(f, "  draws:          {} ({} burn-in, {} kept)", self.draws, self.burn_in, self.kept())?;
        match (self.mean_mu(), self.mean_variance()) {
            (Some(mu), Some(variance)) => {
                writeln!(f, "  E[mu]:          {:.4}", mu)?;
                write!(f, "  E[variance]:    {:.4}", variance)?;
                if let Some((lo, hi)) = self.samples.mu_interval(self.burn_in, 0.95) {
                    write!(f, "\n  mu 95% CI:      [{:.4}, {:.4}]", lo, hi)?;
                }
                Ok(())
            }
            _ => write!(f, "  no draws left after burn-in"),
        }
    }
}

pub fn execute(cfg: &GibbsConfig, engine: &MonteCarloEngine) -> Result<GibbsReport> {
    if cfg.burn_in >= cfg.draws {
        warn!(burn_in = cfg.burn_in, draws = cfg.draws, "burn-in discards every draw");
    }

    let observations = Observations::from_csv(&cfg.data_path, &cfg.column)?;
    let prior = NormalPrior::new(cfg.nu, cfg.tau, cfg.a, cfg.b)?;
    let sampler = GibbsSampler::new(&observations, prior)?;

    let mut rng = MonteCarloEngine::trial_rng(engine.resolve_seed(), 0);
    let initial = PosteriorDraw::new(cfg.initial_mu, cfg.initial_variance);
    let samples = sampler.sample(initial, cfg.draws, &mut rng)?;

    let report = GibbsReport {
        observations: observations.len(),
        sample_mean: observations.mean(),
        draws: cfg.draws,
        burn_in: cfg.burn_in,
        samples,
    };
    info!(
        observations = report.observations,
        mean_mu = report.mean_mu(),
        mean_variance = report.mean_variance(),
        "posterior summary"
    );
    Ok(report)
}

/// Run the gibbs command
pub fn run(cfg: &GibbsConfig, engine: &MonteCarloEngine) -> Result<()> {
    let report = execute(cfg, engine)?;
    println!("{report}");
    Ok(())
}
