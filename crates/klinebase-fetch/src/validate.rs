//! Pre-flight checks run once per request before it is expanded into
//! daily tasks.

use chrono::{NaiveDate, Utc};
use klinebase_types::{DateRange, DateRangeError, Interval, IntervalParseError, ValidationError};

use crate::{DownloadClient, DownloadError};

/// Checks that `interval` is one of the archived intervals.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInterval`] listing the allowed values.
pub fn validate_interval(interval: &str) -> Result<Interval, ValidationError> {
    interval
        .parse()
        .map_err(|e: IntervalParseError| ValidationError::InvalidInterval {
            value: e.value().to_string(),
            allowed: Interval::allowed(),
        })
}

/// Checks that `start <= end` and that `end` is strictly before today (UTC).
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateRange`] if either check fails.
pub fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ValidationError> {
    validate_dates_at(start, end, Utc::now().date_naive())
}

/// Like [`validate_dates`], with the current date supplied by the caller.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateRange`] if either check fails.
pub fn validate_dates_at(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<DateRange, ValidationError> {
    let range = DateRange::new(start, end)?;
    if end >= today {
        return Err(DateRangeError::EndNotInPast { end, today }.into());
    }
    Ok(range)
}

/// Probes the archive for `symbol`.
///
/// Returns `Ok(false)` when the archive answers not-found.
///
/// # Errors
///
/// Returns a [`DownloadError`] if the probe keeps failing after retries.
pub async fn async_validate_symbol(
    client: &DownloadClient,
    symbol: &str,
) -> Result<bool, DownloadError> {
    client.symbol_exists(symbol).await
}
