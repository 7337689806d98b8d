//! Markov command implementation

use std::fmt;

use tracing::info;

use crate::config::MarkovConfig;
use crate::error::Result;
use crate::probability::montecarlo::MonteCarloEngine;
use crate::probability::ProcessSpec;
use crate::regime::{occupancy, self_transition_frequencies, switch_count, ChainState, TwoStateChain};
use crate::simulation::{run_trial, Trial};

#[derive(Debug, Clone)]
pub struct MarkovReport {
    pub chain: TwoStateChain,
    pub trial: Trial<ChainState>,
}

impl MarkovReport {
    pub fn switches(&self) -> usize {
        switch_count(self.trial.states())
    }

    pub fn occupancy(&self, state: ChainState) -> f64 {
        occupancy(self.trial.states(), state)
    }

    /// `t,state` lines for the full path.
    pub fn series(&self) -> String {
        let mut out = String::from("t,state\n");
        for (t, state) in self.trial.states().iter().enumerate() {
            out.push_str(&format!("{},{}\n", t, state.index()));
        }
        out
    }
}

fn fmt_freq(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

impl fmt::Display for MarkovReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = self.trial.states();
        let [p00_hat, p11_hat] = self_transition_frequencies(states);

        writeln!(f, "Two-state Markov chain")?;
        writeln!(f, "======================")?;
        writeln!(f, "  p00 / p11:       {} / {}", self.chain.p00(), self.chain.p11())?;
        writeln!(f, "  steps:           {}", self.trial.len())?;
        writeln!(f, "  initial state:   {}", self.trial.initial_state().index())?;
        writeln!(f, "  final state:     {}", self.trial.final_state().index())?;
        writeln!(f, "  switches:        {}", self.switches())?;
        writeln!(
            f,
            "  time in 0 / 1:   {:.4} / {:.4}",
            self.occupancy(ChainState::Zero),
            self.occupancy(ChainState::One)
        )?;
        write!(f, "  observed p00/p11: {} / {}", fmt_freq(p00_hat), fmt_freq(p11_hat))?;
        if let Some([pi0, pi1]) = self.chain.stationary_distribution() {
            write!(f, "\n  stationary:      {:.4} / {:.4}", pi0, pi1)?;
        }
        Ok(())
    }
}

pub fn execute(cfg: &MarkovConfig, engine: &MonteCarloEngine) -> Result<MarkovReport> {
    let chain = TwoStateChain::new(cfg.p00, cfg.p11)?;
    let mut rng = MonteCarloEngine::trial_rng(engine.resolve_seed(), 0);

    let initial = match cfg.initial_state {
        Some(index) => ChainState::from_index(index)?,
        None => ChainState::random(&mut rng),
    };

    let spec = ProcessSpec::new(chain, initial, cfg.steps)?;
    let trial = run_trial(&spec, &mut rng)?;
    info!(
        initial = initial.index(),
        last = trial.final_state().index(),
        switches = switch_count(trial.states()),
        "chain simulated"
    );

    Ok(MarkovReport { chain, trial })
}

/// Run the markov command
pub fn run(cfg: &MarkovConfig, engine: &MonteCarloEngine, series: bool) -> Result<()> {
    let report = execute(cfg, engine)?;
    if series {
        print!("{}", report.series());
    } else {
        println!("{report}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_absorbing_chain_report() {
        let cfg = MarkovConfig {
            p00: 1.0,
            p11: 1.0,
            steps: 50,
            initial_state: Some(1),
        };
        let report = execute(&cfg, &MonteCarloEngine::new(Some(9))).unwrap();
        assert_eq!(report.trial.len(), 50);
        assert_eq!(report.switches(), 0);
        assert_eq!(report.occupancy(ChainState::One), 1.0);
        assert!(report.to_string().contains("observed p00/p11: n/a / 1.0000"));
    }

    #[test]
    fn test_series_output() {
        let cfg = MarkovConfig {
            p00: 0.0,
            p11: 0.0,
            steps: 3,
            initial_state: Some(0),
        };
        let report = execute(&cfg, &MonteCarloEngine::new(Some(9))).unwrap();
        assert_eq!(report.series(), "t,state\n0,0\n1,1\n2,0\n");
    }

    #[test]
    fn test_rejects_bad_initial_state() {
        let cfg = MarkovConfig {
            initial_state: Some(2),
            ..Default::default()
        };
        let result = execute(&cfg, &MonteCarloEngine::new(Some(9)));
        assert!(matches!(result, Err(SimError::InvalidParameter { .. })));
    }

    #[test]
    fn test_same_seed_same_path() {
        let cfg = MarkovConfig::default();
        let engine = MonteCarloEngine::new(Some(21));
        let a = execute(&cfg, &engine).unwrap();
        let b = execute(&cfg, &engine).unwrap();
        assert_eq!(a.trial, b.trial);
    }
}
