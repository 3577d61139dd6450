//! CSV export of loaded frames.

use chrono::{DateTime, SecondsFormat, Utc};
use klinebase_types::KlineFrame;
use serde::Serialize;
use std::io::Write;

use crate::StoreError;

#[derive(Serialize)]
struct CsvRow<'a> {
    symbol: &'a str,
    timestamp: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: f64,
    close_time: Option<String>,
    quote_asset_volume: f64,
    trades: i64,
    taker_buy_base: f64,
    taker_buy_quote: f64,
}

/// Writes `frame` as CSV with a header row, in partition column order.
///
/// Timestamps are RFC 3339 in UTC; nulls are empty fields.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(frame: &KlineFrame, writer: W) -> Result<(), StoreError> {
    let format = |ts: Option<DateTime<Utc>>| ts.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true));

    let mut csv = csv::Writer::from_writer(writer);
    for row in frame.rows() {
        csv.serialize(CsvRow {
            symbol: frame.symbol(),
            timestamp: format(row.timestamp),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            close_time: format(row.close_time),
            quote_asset_volume: row.quote_asset_volume,
            trades: row.trades,
            taker_buy_base: row.taker_buy_base,
            taker_buy_quote: row.taker_buy_quote,
        })?;
    }
    csv.flush()?;
    Ok(())
}
