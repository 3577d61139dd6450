//! Storage errors.

use chrono::NaiveDate;
use klinebase_types::{Interval, KlinebaseError, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading partitions.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet encoding or decoding error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow conversion error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A requested day has no partition on disk.
    #[error("No {symbol} {interval} partition for {date} (expected {})", path.display())]
    PartitionNotFound {
        /// Requested symbol.
        symbol: String,
        /// Requested interval.
        interval: Interval,
        /// Missing day.
        date: NaiveDate,
        /// Path that was checked.
        path: PathBuf,
    },

    /// A partition exists but does not hold what its path says.
    #[error("Corrupt partition {}: {reason}", path.display())]
    Corrupt {
        /// Partition path.
        path: PathBuf,
        /// What did not match.
        reason: String,
    },

    /// The frame handed to the writer belongs to another symbol.
    #[error("Frame for {found} cannot be written to a {expected} partition")]
    SymbolMismatch {
        /// Symbol of the partition key.
        expected: String,
        /// Symbol of the frame.
        found: String,
    },

    /// The requested range is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<StoreError> for KlinebaseError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => Self::Validation(v),
            other => Self::Storage(other.to_string()),
        }
    }
}
