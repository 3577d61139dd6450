//! Binance public-data URL construction.

use chrono::NaiveDate;
use klinebase_types::{DATE_FORMAT, Interval};

/// Root of the spot daily kline archive.
pub const BASE_URL: &str = "https://data.binance.vision/data/spot/daily/klines";

/// Builds the URL of one day's kline archive.
///
/// URL format: `{base}/{SYMBOL}/{INTERVAL}/{SYMBOL}-{INTERVAL}-{YYYY-MM-DD}.zip`
///
/// # Example
///
/// ```
/// use klinebase_fetch::url::{BASE_URL, archive_url};
/// use klinebase_types::Interval;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let url = archive_url(BASE_URL, "BTCUSDT", Interval::Hour1, date);
/// assert_eq!(
///     url,
///     "https://data.binance.vision/data/spot/daily/klines/BTCUSDT/1h/BTCUSDT-1h-2024-01-15.zip"
/// );
/// ```
#[must_use]
pub fn archive_url(base: &str, symbol: &str, interval: Interval, date: NaiveDate) -> String {
    format!(
        "{}/{symbol}/{interval}/{symbol}-{interval}-{}.zip",
        base.trim_end_matches('/'),
        date.format(DATE_FORMAT),
    )
}

/// Bucket listing of the spot daily kline prefix.
///
/// The archive is an object store, so a symbol "directory" is only visible
/// through the listing endpoint.
pub const LISTING_URL: &str = "https://data.binance.vision/?prefix=data/spot/daily/klines";

/// Builds the listing URL probed to check that a symbol exists.
///
/// URL format: `{listing}/{SYMBOL}/`
#[must_use]
pub fn symbol_url(listing: &str, symbol: &str) -> String {
    format!("{}/{symbol}/", listing.trim_end_matches('/'))
}
