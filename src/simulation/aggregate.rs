//! Reduction of per-trial summaries

use crate::stats::core::mean;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Extractor<T> = Box<dyn Fn(&T) -> f64 + Send + Sync>;

/// How per-trial summaries are folded into one [`AggregateResult`].
///
/// All three reductions ignore the order in which trials finished.
pub enum Reducer<T> {
    /// Fraction of summaries satisfying a predicate
    Proportion(Predicate<T>),
    /// Arithmetic mean of a value extracted from each summary
    Mean(Extractor<T>),
    /// Keep every summary, in trial-index order
    Collect,
}

impl<T> Reducer<T> {
    pub fn proportion(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Reducer::Proportion(Box::new(predicate))
    }

    pub fn mean(extract: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Reducer::Mean(Box::new(extract))
    }

    pub fn collect() -> Self {
        Reducer::Collect
    }

    pub fn reduce(&self, summaries: Vec<T>) -> AggregateResult<T> {
        let trials = summaries.len();
        match self {
            Reducer::Proportion(predicate) => AggregateResult::Proportion {
                hits: summaries.iter().filter(|s| predicate(*s)).count(),
                trials,
            },
            Reducer::Mean(extract) => {
                let values: Vec<f64> = summaries.iter().map(|s| extract(s)).collect();
                AggregateResult::Mean {
                    mean: mean(&values),
                    trials,
                }
            }
            Reducer::Collect => AggregateResult::Samples(summaries),
        }
    }
}

impl<T> std::fmt::Debug for Reducer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reducer::Proportion(_) => f.write_str("Reducer::Proportion"),
            Reducer::Mean(_) => f.write_str("Reducer::Mean"),
            Reducer::Collect => f.write_str("Reducer::Collect"),
        }
    }
}

/// Outcome of a multi-trial run.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult<T> {
    Proportion { hits: usize, trials: usize },
    Mean { mean: f64, trials: usize },
    Samples(Vec<T>),
}

impl<T> AggregateResult<T> {
    #[inline]
    pub fn trials(&self) -> usize {
        match self {
            AggregateResult::Proportion { trials, .. } | AggregateResult::Mean { trials, .. } => *trials,
            AggregateResult::Samples(samples) => samples.len(),
        }
    }

    /// `hits / trials` for a proportion, `None` otherwise.
    pub fn proportion(&self) -> Option<f64> {
        match self {
            AggregateResult::Proportion { hits, trials } => Some(*hits as f64 / *trials as f64),
            _ => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        match self {
            AggregateResult::Mean { mean, .. } => Some(*mean),
            _ => None,
        }
    }

    pub fn samples(&self) -> Option<&[T]> {
        match self {
            AggregateResult::Samples(samples) => Some(samples.as_slice()),
            _ => None,
        }
    }

    pub fn into_samples(self) -> Option<Vec<T>> {
        match self {
            AggregateResult::Samples(samples) => Some(samples),
            _ => None,
        }
    }
}
