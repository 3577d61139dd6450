//! Partitioned Parquet storage for the klinebase kline ingester.
//!
//! One file holds one `(symbol, interval, day)`:
//!
//! ```text
//! <root>/<symbol>/<YYYY>/<MM>/<interval>/<YYYY-MM-DD>.parquet
//! ```
//!
//! - [`partition_path`] - Deterministic path of a partition
//! - [`PartitionStore::write`] - Atomic, idempotent partition writes
//! - [`PartitionStore::load_range`] - Reassembles a contiguous series
//! - [`write_csv`] - Exports a loaded frame as CSV

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod export;
mod loader;
mod path;
mod schema;
mod store;
mod writer;

pub use error::StoreError;
pub use export::write_csv;
pub use path::{PARTITION_EXTENSION, partition_path};
pub use schema::{INDEX_METADATA_KEY, INTERVAL_METADATA_KEY, kline_schema};
pub use store::PartitionStore;
