//! Normalization of raw kline tables for the klinebase kline ingester.
//!
//! Normalization runs in three stages, each usable on its own:
//!
//! - [`coerce`] - Keeps the target columns and casts them to numbers
//! - [`repair`] - Converts epoch columns and applies the fill policies
//! - [`assign_key`] - Attaches the symbol, producing a [`KlineFrame`]
//!
//! [`Normalizer`] runs all three with a pluggable [`TimeUnitInference`].
//!
//! [`KlineFrame`]: klinebase_types::KlineFrame

#![doc(issue_tracker_base_url = "https://github.com/klinebase/klinebase/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod error;
mod inference;
mod normalizer;
mod repair;

pub use coerce::{CoercedTable, coerce};
pub use error::NormalizeError;
pub use inference::{FixedUnit, ModalDigitLength, TimeUnit, TimeUnitInference};
pub use normalizer::{Normalizer, assign_key};
pub use repair::{fill_activity, fill_prices, repair};
