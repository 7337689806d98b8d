//! Settings and configuration structures.
//!
//! Defaults reproduce the classic setups: λ = 2 over 10 generations and 300
//! trials; 300 Gibbs draws with 100 burn-in; a 1000-step chain with
//! p00 = 0.95, p11 = 0.99.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::DEFAULT_COLUMN;
use crate::error::Result;
use crate::probability::montecarlo::MonteCarloEngine;

/// Main application settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Trial runner configuration
    #[serde(default)]
    pub engine: EngineConfig,
    /// Branching-process extinction estimate
    #[serde(default)]
    pub extinction: ExtinctionConfig,
    /// Normal-model Gibbs sampler
    #[serde(default)]
    pub gibbs: GibbsConfig,
    /// Two-state Markov chain
    #[serde(default)]
    pub markov: MarkovConfig,
}

impl Settings {
    /// Load settings from a configuration file and environment variables.
    ///
    /// Sources, later overriding earlier:
    /// 1. built-in defaults
    /// 2. `path` if given (must exist), else `config/default.toml` if present
    /// 3. environment variables `STOCHSIM__<SECTION>__<KEY>`, e.g. `STOCHSIM__ENGINE__SEED=7`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("config/default").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("STOCHSIM").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}

/// Trial runner configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// Base seed; fresh entropy per run when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Run trials on the rayon pool
    #[serde(default)]
    pub parallel: bool,
    /// Rayon pool size, 0 for rayon's default
    #[serde(default)]
    pub threads: usize,
}

impl EngineConfig {
    pub fn engine(&self) -> MonteCarloEngine {
        MonteCarloEngine::new(self.seed).with_parallel(self.parallel)
    }
}

/// Branching-process configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ExtinctionConfig {
    /// Mean offspring per individual
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Generations per trial, the ancestor included
    #[serde(default = "default_generations")]
    pub generations: usize,
    #[serde(default = "default_trials")]
    pub trials: usize,
}

impl Default for ExtinctionConfig {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            generations: default_generations(),
            trials: default_trials(),
        }
    }
}

fn default_lambda() -> f64 {
    2.0
}

fn default_generations() -> usize {
    10
}

fn default_trials() -> usize {
    300
}

/// Gibbs sampler configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct GibbsConfig {
    /// CSV file holding the observations
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Column to read
    #[serde(default = "default_column")]
    pub column: String,
    #[serde(default = "default_draws")]
    pub draws: usize,
    #[serde(default = "default_burn_in")]
    pub burn_in: usize,
    /// Prior mean of mu
    #[serde(default)]
    pub nu: f64,
    /// Prior variance of mu (`inf` for a flat prior)
    #[serde(default = "default_tau")]
    pub tau: f64,
    #[serde(default = "default_gamma_param")]
    pub a: f64,
    #[serde(default = "default_gamma_param")]
    pub b: f64,
    #[serde(default = "default_initial_mu")]
    pub initial_mu: f64,
    #[serde(default = "default_initial_variance")]
    pub initial_variance: f64,
}

impl Default for GibbsConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            column: default_column(),
            draws: default_draws(),
            burn_in: default_burn_in(),
            nu: 0.0,
            tau: default_tau(),
            a: default_gamma_param(),
            b: default_gamma_param(),
            initial_mu: default_initial_mu(),
            initial_variance: default_initial_variance(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/data.csv")
}

fn default_column() -> String {
    DEFAULT_COLUMN.to_string()
}

fn default_draws() -> usize {
    300
}

fn default_burn_in() -> usize {
    100
}

fn default_tau() -> f64 {
    1.0
}

fn default_gamma_param() -> f64 {
    0.1
}

fn default_initial_mu() -> f64 {
    0.5
}

fn default_initial_variance() -> f64 {
    4.0
}

/// Two-state chain configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MarkovConfig {
    #[serde(default = "default_p00")]
    pub p00: f64,
    #[serde(default = "default_p11")]
    pub p11: f64,
    #[serde(default = "default_markov_steps")]
    pub steps: usize,
    /// 0 or 1; drawn uniformly when absent
    #[serde(default)]
    pub initial_state: Option<usize>,
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self {
            p00: default_p00(),
            p11: default_p11(),
            steps: default_markov_steps(),
            initial_state: None,
        }
    }
}

fn default_p00() -> f64 {
    0.95
}

fn default_p11() -> f64 {
    0.99
}

fn default_markov_steps() -> usize {
    1000
}
