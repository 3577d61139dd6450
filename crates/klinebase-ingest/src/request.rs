//! Batch request definitions.

use klinebase_types::KlinebaseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Inclusive date range of one `(symbol, interval)` pair, as `YYYY-MM-DD`
/// strings. Dates are validated when the batch is planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day (inclusive).
    pub start_date: String,
    /// Last day (inclusive).
    pub end_date: String,
}

/// Symbols, intervals and date ranges to ingest.
///
/// The JSON layout is
///
/// ```json
/// {"symbols": {"BTCUSDT": {"1h": {"start_date": "2024-01-01", "end_date": "2024-01-31"}}}}
/// ```
///
/// Other top-level keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// symbol → interval → date span.
    #[serde(default)]
    pub symbols: BTreeMap<String, BTreeMap<String, DateSpan>>,
}

/// Errors that can occur while loading a batch request.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The file could not be read.
    #[error("Failed to read batch file: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not a valid batch.
    #[error("Invalid batch JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RequestError> for KlinebaseError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Io(io) => Self::Io(io),
            RequestError::Json(json) => Self::Format(json.to_string()),
        }
    }
}

impl BatchRequest {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a batch from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the batch layout.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a batch file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Adds a pair, replacing any previous span for it.
    #[must_use]
    pub fn with(
        mut self,
        symbol: impl Into<String>,
        interval: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        self.symbols.entry(symbol.into()).or_default().insert(
            interval.into(),
            DateSpan {
                start_date: start_date.into(),
                end_date: end_date.into(),
            },
        );
        self
    }

    /// Iterates over `(symbol, interval, span)` triples.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &DateSpan)> {
        self.symbols.iter().flat_map(|(symbol, intervals)| {
            intervals
                .iter()
                .map(move |(interval, span)| (symbol.as_str(), interval.as_str(), span))
        })
    }

    /// Returns the number of `(symbol, interval)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the batch has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
