//! HTTP client, archive unwrapping and CSV parsing for the klinebase
//! kline ingester.
//!
//! This crate provides the download half of the daily pipeline:
//!
//! - [`url::archive_url`] - Constructs Binance daily archive URLs
//! - [`DownloadClient`] - HTTP client with connection pooling and retries
//! - [`RetryPolicy`] - Clamped exponential backoff shared by every call
//! - [`unwrap_archive`] - Zip unwrapping into CSV text
//! - [`parse_klines`] - Tolerant CSV parsing into a raw table
//! - [`validate`] - Interval, date range and symbol pre-flight checks

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod client;
mod parse;
mod retry;
pub mod url;
pub mod validate;

pub use archive::{ArchiveError, unwrap_archive};
pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use parse::{ParseError, check_columns, parse_klines};
pub use retry::{RetryPolicy, Retryable, retry};
pub use validate::{async_validate_symbol, validate_dates, validate_dates_at, validate_interval};
