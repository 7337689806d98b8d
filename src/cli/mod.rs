//! Command-line entry point
//!
//! One subcommand per simulation. Settings are layered as defaults → config
//! file → `STOCHSIM__*` environment → command-line flags.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "stochsim")]
#[command(author, version, about = "Monte Carlo trials of small stochastic processes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base seed for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Run trials on the rayon thread pool
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Settings file (TOML); defaults to config/default.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate the extinction probability of a Poisson branching process
    Extinction(ExtinctionArgs),
    /// Sample the (mu, variance) posterior of a normal model
    Gibbs(GibbsArgs),
    /// Simulate a two-state Markov chain
    Markov(MarkovArgs),
}

#[derive(Args, Debug, Default)]
pub struct ExtinctionArgs {
    /// Mean offspring per individual
    #[arg(long, allow_negative_numbers = true)]
    pub lambda: Option<f64>,
    /// Generations per trial, the ancestor included
    #[arg(long)]
    pub generations: Option<usize>,
    #[arg(long)]
    pub trials: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct GibbsArgs {
    /// CSV file with the observations
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Column holding the observations
    #[arg(long)]
    pub column: Option<String>,
    #[arg(long)]
    pub draws: Option<usize>,
    #[arg(long)]
    pub burn_in: Option<usize>,
    /// Prior variance of mu; `inf` for a flat prior
    #[arg(long)]
    pub tau: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub struct MarkovArgs {
    #[arg(long)]
    pub p00: Option<f64>,
    #[arg(long)]
    pub p11: Option<f64>,
    #[arg(long)]
    pub steps: Option<usize>,
    /// 0 or 1; drawn at random when omitted
    #[arg(long)]
    pub initial_state: Option<usize>,
    /// Print the full state series as `t,state` lines
    #[arg(long)]
    pub series: bool,
}

/// Run the CLI with process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        settings.engine.seed = cli.seed;
    }
    if cli.parallel {
        settings.engine.parallel = true;
    }
    init_thread_pool(settings.engine.threads);
    debug!(?settings, "resolved settings");

    let engine = settings.engine.engine();
    match cli.command {
        Command::Extinction(args) => {
            args.apply(&mut settings);
            commands::extinction::run(&settings.extinction, &engine)?;
        }
        Command::Gibbs(args) => {
            args.apply(&mut settings);
            commands::gibbs::run(&settings.gibbs, &engine)?;
        }
        Command::Markov(args) => {
            let series = args.series;
            args.apply(&mut settings);
            commands::markov::run(&settings.markov, &engine, series)?;
        }
    }
    Ok(())
}

impl ExtinctionArgs {
    fn apply(self, settings: &mut Settings) {
        let cfg = &mut settings.extinction;
        cfg.lambda = self.lambda.unwrap_or(cfg.lambda);
        cfg.generations = self.generations.unwrap_or(cfg.generations);
        cfg.trials = self.trials.unwrap_or(cfg.trials);
    }
}

impl GibbsArgs {
    fn apply(self, settings: &mut Settings) {
        let cfg = &mut settings.gibbs;
        if let Some(data) = self.data {
            cfg.data_path = data;
        }
        if let Some(column) = self.column {
            cfg.column = column;
        }
        cfg.draws = self.draws.unwrap_or(cfg.draws);
        cfg.burn_in = self.burn_in.unwrap_or(cfg.burn_in);
        cfg.tau = self.tau.unwrap_or(cfg.tau);
    }
}

impl MarkovArgs {
    fn apply(self, settings: &mut Settings) {
        let cfg = &mut settings.markov;
        cfg.p00 = self.p00.unwrap_or(cfg.p00);
        cfg.p11 = self.p11.unwrap_or(cfg.p11);
        cfg.steps = self.steps.unwrap_or(cfg.steps);
        if self.initial_state.is_some() {
            cfg.initial_state = self.initial_state;
        }
    }
}

/// Logs go to stderr so stdout carries only results. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "stochsim=debug" } else { "stochsim=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // May already be installed when the CLI runs more than once in a process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Sizes the global rayon pool; an already-built pool is kept.
fn init_thread_pool(threads: usize) {
    if threads == 0 {
        return;
    }
    if rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .is_err()
    {
        debug!(threads, "rayon pool already initialized");
    }
}
