//! Subcommand implementations
//!
//! Each command splits into `execute`, which returns a printable report, and
//! `run`, which prints it.

pub mod extinction;
pub mod gibbs;
pub mod markov;
