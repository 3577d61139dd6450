//! Arrow schema of a partition and conversions between frames and batches.

use arrow::array::{Array, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use klinebase_types::{Kline, KlineFrame};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::StoreError;

/// Key-value metadata key recording the index columns.
pub const INDEX_METADATA_KEY: &str = "klinebase.index";

/// Key-value metadata key recording the kline interval.
pub const INTERVAL_METADATA_KEY: &str = "klinebase.interval";

static SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    let timestamp = || DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()));
    Arc::new(Schema::new(vec![
        Field::new("symbol", DataType::Utf8, false),
        Field::new("timestamp", timestamp(), true),
        Field::new("open", DataType::Float64, true),
        Field::new("high", DataType::Float64, true),
        Field::new("low", DataType::Float64, true),
        Field::new("close", DataType::Float64, true),
        Field::new("volume", DataType::Float64, false),
        Field::new("close_time", timestamp(), true),
        Field::new("quote_asset_volume", DataType::Float64, false),
        Field::new("trades", DataType::Int64, false),
        Field::new("taker_buy_base", DataType::Float64, false),
        Field::new("taker_buy_quote", DataType::Float64, false),
    ]))
});

/// Returns the Arrow schema of a partition file.
///
/// The index columns `symbol` and `timestamp` come first.
#[must_use]
pub fn kline_schema() -> SchemaRef {
    Arc::clone(&SCHEMA)
}

/// Converts a frame to a record batch in partition column order.
pub(crate) fn frame_to_batch(frame: &KlineFrame) -> Result<RecordBatch, StoreError> {
    let rows = frame.rows();
    let micros = |ts: Option<DateTime<Utc>>| ts.map(|t| t.timestamp_micros());

    let symbols = StringArray::from(vec![frame.symbol(); rows.len()]);
    let timestamps: TimestampMicrosecondArray = rows.iter().map(|r| micros(r.timestamp)).collect();
    let close_times: TimestampMicrosecondArray =
        rows.iter().map(|r| micros(r.close_time)).collect();

    let batch = RecordBatch::try_new(
        kline_schema(),
        vec![
            Arc::new(symbols),
            Arc::new(timestamps.with_timezone("UTC")),
            Arc::new(rows.iter().map(|r| r.open).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.high).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.low).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.close).collect::<Float64Array>()),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.volume))),
            Arc::new(close_times.with_timezone("UTC")),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.quote_asset_volume),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.trades))),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.taker_buy_base),
            )),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.taker_buy_quote),
            )),
        ],
    )?;
    Ok(batch)
}

/// Column accessors resolved once per batch.
struct KlineColumns<'a> {
    symbol: &'a StringArray,
    timestamp: &'a TimestampMicrosecondArray,
    open: &'a Float64Array,
    high: &'a Float64Array,
    low: &'a Float64Array,
    close: &'a Float64Array,
    volume: &'a Float64Array,
    close_time: &'a TimestampMicrosecondArray,
    quote_asset_volume: &'a Float64Array,
    trades: &'a Int64Array,
    taker_buy_base: &'a Float64Array,
    taker_buy_quote: &'a Float64Array,
}

impl<'a> KlineColumns<'a> {
    fn resolve(batch: &'a RecordBatch, path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            symbol: column(batch, "symbol", path)?,
            timestamp: column(batch, "timestamp", path)?,
            open: column(batch, "open", path)?,
            high: column(batch, "high", path)?,
            low: column(batch, "low", path)?,
            close: column(batch, "close", path)?,
            volume: column(batch, "volume", path)?,
            close_time: column(batch, "close_time", path)?,
            quote_asset_volume: column(batch, "quote_asset_volume", path)?,
            trades: column(batch, "trades", path)?,
            taker_buy_base: column(batch, "taker_buy_base", path)?,
            taker_buy_quote: column(batch, "taker_buy_quote", path)?,
        })
    }
}

/// Reads the rows of `batch`, checking that each belongs to `symbol`.
pub(crate) fn batch_to_rows(
    batch: &RecordBatch,
    symbol: &str,
    path: &Path,
) -> Result<Vec<Kline>, StoreError> {
    let cols = KlineColumns::resolve(batch, path)?;

    (0..batch.num_rows())
        .map(|i| {
            let found = if cols.symbol.is_null(i) {
                ""
            } else {
                cols.symbol.value(i)
            };
            if found != symbol {
                return Err(corrupt(path, format!("row {i} belongs to '{found}', not {symbol}")));
            }

            Ok(Kline {
                timestamp: timestamp_value(cols.timestamp, i),
                open: float(cols.open, i),
                high: float(cols.high, i),
                low: float(cols.low, i),
                close: float(cols.close, i),
                volume: float(cols.volume, i).unwrap_or_default(),
                close_time: timestamp_value(cols.close_time, i),
                quote_asset_volume: float(cols.quote_asset_volume, i).unwrap_or_default(),
                trades: int(cols.trades, i).unwrap_or_default(),
                taker_buy_base: float(cols.taker_buy_base, i).unwrap_or_default(),
                taker_buy_quote: float(cols.taker_buy_quote, i).unwrap_or_default(),
            })
        })
        .collect()
}

fn column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    path: &Path,
) -> Result<&'a T, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| corrupt(path, format!("missing column '{name}'")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| corrupt(path, format!("column '{name}' has an unexpected type")))
}

fn float(array: &Float64Array, i: usize) -> Option<f64> {
    (!array.is_null(i)).then(|| array.value(i))
}

fn int(array: &Int64Array, i: usize) -> Option<i64> {
    (!array.is_null(i)).then(|| array.value(i))
}

fn timestamp_value(array: &TimestampMicrosecondArray, i: usize) -> Option<DateTime<Utc>> {
    if array.is_null(i) {
        return None;
    }
    DateTime::from_timestamp_micros(array.value(i))
}

fn corrupt(path: &Path, reason: String) -> StoreError {
    StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}
