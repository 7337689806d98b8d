//! Extinction command implementation

use std::fmt;

use tracing::info;

use crate::config::ExtinctionConfig;
use crate::error::Result;
use crate::probability::montecarlo::MonteCarloEngine;
use crate::probability::{extinction_probability, theoretical_extinction_probability};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtinctionReport {
    pub lambda: f64,
    pub generations: usize,
    pub trials: usize,
    pub estimate: f64,
    pub theoretical: f64,
}

impl fmt::Display for ExtinctionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Branching process extinction")?;
        writeln!(f, "============================")?;
        writeln!(f, "  lambda:        {}", self.lambda)?;
        writeln!(f, "  generations:   {}", self.generations)?;
        writeln!(f, "  trials:        {}", self.trials)?;
        writeln!(f, "  P(extinct):    {:.4}", self.estimate)?;
        write!(f, "  eventual q:    {:.4}", self.theoretical)
    }
}

pub fn execute(cfg: &ExtinctionConfig, engine: &MonteCarloEngine) -> Result<ExtinctionReport> {
    let estimate = extinction_probability(engine, cfg.lambda, cfg.generations, cfg.trials)?;
    let theoretical = theoretical_extinction_probability(cfg.lambda);
    info!(lambda = cfg.lambda, estimate, theoretical, "extinction estimate");

    Ok(ExtinctionReport {
        lambda: cfg.lambda,
        generations: cfg.generations,
        trials: cfg.trials,
        estimate,
        theoretical,
    })
}

/// Run the extinction command
pub fn run(cfg: &ExtinctionConfig, engine: &MonteCarloEngine) -> Result<()> {
    let report = execute(cfg, engine)?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_zero_lambda_report() {
        let cfg = ExtinctionConfig {
            lambda: 0.0,
            ..Default::default()
        };
        let report = execute(&cfg, &MonteCarloEngine::new(Some(1))).unwrap();
        assert_eq!(report.estimate, 1.0);
        assert_eq!(report.theoretical, 1.0);
        assert!(report.to_string().contains("P(extinct):    1.0000"));
    }

    #[test]
    fn test_invalid_counts() {
        let engine = MonteCarloEngine::new(Some(1));
        let cfg = ExtinctionConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(matches!(execute(&cfg, &engine), Err(SimError::InvalidParameter { .. })));

        let cfg = ExtinctionConfig {
            generations: 0,
            ..Default::default()
        };
        assert!(matches!(execute(&cfg, &engine), Err(SimError::InvalidParameter { .. })));
    }
}
