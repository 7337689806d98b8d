//! Observation loader for the normal-model sampler.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SimError};
use crate::stats::core::{mean, sum_sq_dev};

/// Column read when none is configured.
pub const DEFAULT_COLUMN: &str = "data";

/// Non-empty sequence of finite observations with cached summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    values: Vec<f64>,
    mean: f64,
    sum_sq_dev: f64,
}

impl Observations {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SimError::MissingDataSource("no observations".to_string()));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(SimError::invalid(
                "observations",
                format!("value {} at index {} is not finite", values[pos], pos),
            ));
        }
        Ok(Self {
            mean: mean(&values),
            sum_sq_dev: sum_sq_dev(&values),
            values,
        })
    }

    /// Load one numeric column of a CSV file with a header row.
    ///
    /// Blank cells are skipped. A missing file, a missing column, or a column
    /// without values is reported as [`SimError::MissingDataSource`].
    pub fn from_csv<P: AsRef<Path>>(path: P, column: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SimError::MissingDataSource(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::read_column(reader, column, &path.display().to_string())
    }

    /// Same as [`Observations::from_csv`] over any reader; `source` names it in errors.
    pub fn from_reader<R: Read>(reader: R, column: &str, source: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::read_column(reader, column, source)
    }

    fn read_column<R: Read>(mut reader: csv::Reader<R>, column: &str, source: &str) -> Result<Self> {
        let index = reader
            .headers()?
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| {
                SimError::MissingDataSource(format!("column '{column}' not found in {source}"))
            })?;

        let mut values = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let cell = record.get(index).unwrap_or("");
            if cell.is_empty() {
                debug!(row = row + 1, "skipping blank cell");
                continue;
            }
            let value = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    SimError::invalid(column, format!("row {}: '{}' is not a finite number", row + 1, cell))
                })?;
            values.push(value);
        }

        if values.is_empty() {
            return Err(SimError::MissingDataSource(format!(
                "column '{column}' in {source} has no values"
            )));
        }

        debug!(source, column, count = values.len(), "loaded observations");
        Self::new(values)
    }

    #[inline(always)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; construction rejects empty data.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Σ (x_i − x̄)²
    #[inline(always)]
    pub fn sum_sq_dev(&self) -> f64 {
        self.sum_sq_dev
    }

    /// Σ (x_i − mu)², from the cached summaries.
    #[inline]
    pub fn sum_sq_about(&self, mu: f64) -> f64 {
        let shift = self.mean - mu;
        self.sum_sq_dev + self.values.len() as f64 * shift * shift
    }
}
