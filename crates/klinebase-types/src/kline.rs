//! Normalized kline rows and the keyed frame that holds them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A single normalized candlestick.
///
/// Market-activity fields are always present (missing values are filled
/// with zero). Prices are `None` only when the whole partition had no
/// usable price sample to fill from. Timestamps are `None` when the
/// resolution of the raw column could not be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Bar open time (UTC).
    pub timestamp: Option<DateTime<Utc>>,
    /// Open price.
    pub open: Option<f64>,
    /// High price.
    pub high: Option<f64>,
    /// Low price.
    pub low: Option<f64>,
    /// Close price.
    pub close: Option<f64>,
    /// Base asset volume.
    pub volume: f64,
    /// Bar close time (UTC).
    pub close_time: Option<DateTime<Utc>>,
    /// Quote asset volume.
    pub quote_asset_volume: f64,
    /// Number of trades.
    pub trades: i64,
    /// Taker buy base asset volume.
    pub taker_buy_base: f64,
    /// Taker buy quote asset volume.
    pub taker_buy_quote: f64,
}

impl Kline {
    /// Returns the calendar date of the bar open time.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }
}

/// Normalized rows of one symbol, indexed by `(symbol, timestamp)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KlineFrame {
    symbol: String,
    rows: Vec<Kline>,
}

/// Frames for different symbols cannot be concatenated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot concatenate {found} rows onto {expected} frame")]
pub struct SymbolMismatch {
    /// Symbol of the frame being extended.
    pub expected: String,
    /// Symbol of the frame that was appended.
    pub found: String,
}

impl KlineFrame {
    /// Index column names, in key order.
    pub const INDEX_COLUMNS: [&'static str; 2] = ["symbol", "timestamp"];

    /// Creates a frame from rows belonging to `symbol`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, rows: Vec<Kline>) -> Self {
        Self {
            symbol: symbol.into(),
            rows,
        }
    }

    /// Returns the symbol every row belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Kline] {
        &self.rows
    }

    /// Consumes the frame, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Kline> {
        self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the `(symbol, timestamp)` index.
    pub fn index(&self) -> impl Iterator<Item = (&str, Option<DateTime<Utc>>)> + '_ {
        self.rows
            .iter()
            .map(move |row| (self.symbol.as_str(), row.timestamp))
    }

    /// Appends the rows of another frame of the same symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if `other` belongs to a different symbol.
    pub fn extend(&mut self, other: Self) -> Result<(), SymbolMismatch> {
        if self.symbol.is_empty() && self.rows.is_empty() {
            self.symbol = other.symbol;
        } else if self.symbol != other.symbol {
            return Err(SymbolMismatch {
                expected: self.symbol.clone(),
                found: other.symbol,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Sorts rows ascending by index. The sort is stable, so rows with equal
    /// timestamps keep their relative order.
    pub fn sort_by_index(&mut self) {
        self.rows.sort_by_key(|row| row.timestamp);
    }

    /// Returns true if the index is non-decreasing.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.rows
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Returns the distinct calendar dates covered by the bar open times.
    #[must_use]
    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.rows.iter().filter_map(Kline::date).collect()
    }

    /// Returns the first and last bar open time, if any.
    #[must_use]
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut stamps = self.rows.iter().filter_map(|row| row.timestamp);
        let first = stamps.next()?;
        let (min, max) = stamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Some((min, max))
    }
}
