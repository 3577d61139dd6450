//! Error types for klinebase.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for klinebase operations.
pub type Result<T> = std::result::Result<T, KlinebaseError>;

/// Errors that can end a unit of ingestion work.
///
/// Crate-level errors (`DownloadError`, `ArchiveError`, `ParseError`,
/// `NormalizeError`, `StoreError`) convert into this type at the daily
/// pipeline boundary, keeping the category of the failure.
#[derive(Error, Debug)]
pub enum KlinebaseError {
    /// A pre-flight check rejected the request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// HTTP status, request or timeout failure after all retries.
    #[error("Network error: {0}")]
    Network(String),

    /// The downloaded payload was not in the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    /// The parsed table is missing columns the normalizer needs.
    #[error("Structural error: {0}")]
    Structural(String),

    /// Writing or reading a partition failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A background task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KlinebaseError {
    /// Returns a short category name, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Format(_) => "format",
            Self::Structural(_) => "structural",
            Self::Storage(_) => "storage",
            Self::Task(_) => "task",
            Self::Io(_) => "io",
        }
    }
}

/// Pre-flight validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The interval is not in the allow-list.
    #[error("Invalid interval '{value}'. Available intervals are: {allowed}")]
    InvalidInterval {
        /// The rejected interval.
        value: String,
        /// Comma-separated list of accepted intervals.
        allowed: String,
    },

    /// The date range is reversed or reaches into the future.
    #[error(transparent)]
    InvalidDateRange(#[from] DateRangeError),

    /// A date string is not `YYYY-MM-DD`.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The archive has no data for the symbol.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// End date is today or later; only completed days are archived.
    #[error("End date {end} must be before {today}")]
    EndNotInPast {
        /// The requested end date.
        end: NaiveDate,
        /// The current UTC date.
        today: NaiveDate,
    },
}
