//! Two-state Markov chains

mod markov;

pub use markov::{occupancy, self_transition_frequencies, switch_count, ChainState, TwoStateChain};
