//! Column selection and numeric casting.

use klinebase_types::RawTable;
use klinebase_types::raw::TARGET_COLUMNS;

use crate::NormalizeError;

/// The target columns cast to numbers, still column-oriented.
///
/// Cells that could not be cast are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoercedTable {
    /// Bar open time as a raw epoch integer.
    pub timestamp: Vec<Option<i64>>,
    /// Open price.
    pub open: Vec<Option<f64>>,
    /// High price.
    pub high: Vec<Option<f64>>,
    /// Low price.
    pub low: Vec<Option<f64>>,
    /// Close price.
    pub close: Vec<Option<f64>>,
    /// Base asset volume.
    pub volume: Vec<Option<f64>>,
    /// Bar close time as a raw epoch integer.
    pub close_time: Vec<Option<i64>>,
    /// Quote asset volume.
    pub quote_asset_volume: Vec<Option<f64>>,
    /// Number of trades.
    pub trades: Vec<Option<i64>>,
    /// Taker buy base asset volume.
    pub taker_buy_base: Vec<Option<f64>>,
    /// Taker buy quote asset volume.
    pub taker_buy_quote: Vec<Option<f64>>,
}

impl CoercedTable {
    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.timestamp.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }
}

/// Keeps the target columns of `raw` and casts their cells.
///
/// Extra columns (including `ignore`) are dropped. `timestamp`,
/// `close_time` and `trades` are cast to integers, everything else to
/// floats. A cell that does not cast becomes `None`.
///
/// # Errors
///
/// Returns [`NormalizeError::Structural`] if a target column is missing.
pub fn coerce(raw: &RawTable) -> Result<CoercedTable, NormalizeError> {
    let missing = raw.missing_columns(&TARGET_COLUMNS);
    if !missing.is_empty() {
        return Err(NormalizeError::Structural { missing });
    }

    let ints = |name: &str| cast_column(raw, name, parse_int);
    let floats = |name: &str| cast_column(raw, name, parse_float);

    Ok(CoercedTable {
        timestamp: ints("timestamp"),
        open: floats("open"),
        high: floats("high"),
        low: floats("low"),
        close: floats("close"),
        volume: floats("volume"),
        close_time: ints("close_time"),
        quote_asset_volume: floats("quote_asset_volume"),
        trades: ints("trades"),
        taker_buy_base: floats("taker_buy_base"),
        taker_buy_quote: floats("taker_buy_quote"),
    })
}

fn cast_column<T>(raw: &RawTable, name: &str, cast: fn(&str) -> Option<T>) -> Vec<Option<T>> {
    raw.column(name)
        .map(|cells| {
            cells
                .iter()
                .map(|cell| cell.as_deref().and_then(cast))
                .collect()
        })
        .unwrap_or_default()
}

/// Parses an integer cell, accepting float notation without a fraction
/// (`"12.0"`).
fn parse_int(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<i64>() {
        return Some(value);
    }

    let value = parse_float(cell)?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn parse_float(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
