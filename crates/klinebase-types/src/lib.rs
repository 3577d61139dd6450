//! Core types for the klinebase kline ingester.
//!
//! This crate provides the data structures shared by every stage of the
//! ingestion and read paths:
//!
//! - [`Kline`] - A normalized candlestick row
//! - [`KlineFrame`] - Normalized rows keyed by `(symbol, timestamp)`
//! - [`RawTable`] - Untyped columns straight from the archive CSV
//! - [`Interval`] - The closed set of supported kline intervals
//! - [`DateRange`] - Inclusive calendar range with day iteration
//! - [`PartitionKey`] - `(symbol, interval, date)` identity of a daily unit
//! - [`KlinebaseError`] - Umbrella error for the whole workspace

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod interval;
mod kline;
mod partition;
pub mod raw;

pub use date_range::{DATE_FORMAT, DateRange, DayIterator, parse_date};
pub use error::{DateRangeError, KlinebaseError, Result, ValidationError};
pub use interval::{Interval, IntervalParseError};
pub use kline::{Kline, KlineFrame, SymbolMismatch};
pub use partition::PartitionKey;
pub use raw::RawTable;
