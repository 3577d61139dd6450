//! Daily ingestion pipeline and batch orchestrator for the klinebase kline
//! ingester.
//!
//! - [`BatchRequest`] - Symbols, intervals and date ranges to fetch
//! - [`Orchestrator`] - Validates a batch and fans it out into daily tasks
//! - [`DailyPipeline`] - Download, unwrap, parse, normalize and write one day
//! - [`BatchReport`] - Tagged outcomes of every task and rejected pair

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod orchestrator;
mod pipeline;
mod report;
mod request;

#[cfg(test)]
mod test_server;

pub use orchestrator::{BatchObserver, IngestConfig, Orchestrator, Plan};
pub use pipeline::DailyPipeline;
pub use report::{BatchReport, RejectedRequest, TaskOutcome};
pub use request::{BatchRequest, DateSpan, RequestError};
