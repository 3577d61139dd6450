//! Normalization errors.

use klinebase_types::KlinebaseError;
use thiserror::Error;

/// Errors raised by normalization.
///
/// Numeric anomalies are always repaired, so the only failure is a table
/// that lacks a column the normalizer needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Target columns are absent from the raw table.
    #[error("Missing target columns: {}", missing.join(", "))]
    Structural {
        /// Names of the absent columns.
        missing: Vec<String>,
    },
}

impl From<NormalizeError> for KlinebaseError {
    fn from(e: NormalizeError) -> Self {
        Self::Structural(e.to_string())
    }
}
