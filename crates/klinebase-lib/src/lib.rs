//! Binance daily kline ingestion into a partitioned Parquet store.
//!
//! This is a facade crate that re-exports the klinebase workspace crates.
//!
//! # Quick Start
//!
//! ```ignore
//! use klinebase_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DownloadClient::with_defaults()?;
//!     let store = PartitionStore::new("data/klines");
//!     let orchestrator = Orchestrator::new(client, store.clone(), IngestConfig::default());
//!
//!     let batch = BatchRequest::new().with("BTCUSDT", "1h", "2024-01-01", "2024-01-31");
//!     let report = orchestrator.run(&batch).await;
//!     println!("{report}");
//!
//!     let frame = store.load_range("BTCUSDT", Interval::Hour1, "2024-01-01", "2024-01-31").await?;
//!     println!("Loaded {} bars", frame.len());
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use klinebase_types::*;

#[cfg(feature = "fetch")]
pub use klinebase_fetch::{
    ArchiveError, ClientConfig, DownloadClient, DownloadError, ParseError, RetryPolicy,
    async_validate_symbol, parse_klines, unwrap_archive, validate_dates, validate_interval,
};

#[cfg(feature = "normalize")]
pub use klinebase_normalize::{
    FixedUnit, ModalDigitLength, NormalizeError, Normalizer, TimeUnit, TimeUnitInference,
};

#[cfg(feature = "store")]
pub use klinebase_store::{PartitionStore, StoreError, partition_path, write_csv};

#[cfg(feature = "ingest")]
pub use klinebase_ingest::{
    BatchObserver, BatchReport, BatchRequest, DailyPipeline, IngestConfig, Orchestrator, Plan,
    RejectedRequest, RequestError, TaskOutcome,
};

/// Prelude module for convenient imports.
///
/// ```
/// use klinebase_lib::prelude::*;
/// ```
pub mod prelude {
    pub use klinebase_types::{
        DateRange, DateRangeError, Interval, Kline, KlineFrame, KlinebaseError, PartitionKey,
        Result, ValidationError,
    };

    #[cfg(feature = "fetch")]
    pub use klinebase_fetch::{ClientConfig, DownloadClient, RetryPolicy};

    #[cfg(feature = "normalize")]
    pub use klinebase_normalize::Normalizer;

    #[cfg(feature = "store")]
    pub use klinebase_store::{PartitionStore, write_csv};

    #[cfg(feature = "ingest")]
    pub use klinebase_ingest::{
        BatchObserver, BatchReport, BatchRequest, IngestConfig, Orchestrator, Plan, TaskOutcome,
    };
}
