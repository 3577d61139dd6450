//! Epoch conversion and per-column fill policies.

use chrono::{DateTime, Utc};
use klinebase_types::Kline;
use tracing::debug;

use crate::{CoercedTable, TimeUnitInference};

/// Converts epoch columns and fills gaps, producing typed rows.
///
/// - `timestamp` and `close_time` are converted with the unit chosen by
///   `inference`; a column with no inferable unit becomes entirely null.
/// - Market-activity columns fill gaps with zero.
/// - Price columns treat zero as missing, then forward-fill, then back-fill.
///
/// Columns are expected to have equal lengths, as [`coerce`](crate::coerce)
/// produces them; rows beyond the shortest column are dropped.
#[must_use]
pub fn repair(coerced: CoercedTable, inference: &dyn TimeUnitInference) -> Vec<Kline> {
    let timestamp = to_datetimes("timestamp", &coerced.timestamp, inference);
    let close_time = to_datetimes("close_time", &coerced.close_time, inference);

    let open = fill_prices(coerced.open);
    let high = fill_prices(coerced.high);
    let low = fill_prices(coerced.low);
    let close = fill_prices(coerced.close);

    let volume = fill_activity(coerced.volume);
    let quote_asset_volume = fill_activity(coerced.quote_asset_volume);
    let trades = fill_activity(coerced.trades);
    let taker_buy_base = fill_activity(coerced.taker_buy_base);
    let taker_buy_quote = fill_activity(coerced.taker_buy_quote);

    let rows = [
        timestamp.len(),
        close_time.len(),
        open.len(),
        high.len(),
        low.len(),
        close.len(),
        volume.len(),
        quote_asset_volume.len(),
        trades.len(),
        taker_buy_base.len(),
        taker_buy_quote.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    (0..rows)
        .map(|i| Kline {
            timestamp: timestamp[i],
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
            close_time: close_time[i],
            quote_asset_volume: quote_asset_volume[i],
            trades: trades[i],
            taker_buy_base: taker_buy_base[i],
            taker_buy_quote: taker_buy_quote[i],
        })
        .collect()
}

/// Replaces missing activity values with zero.
#[must_use]
pub fn fill_activity<T: Default>(values: Vec<Option<T>>) -> Vec<T> {
    values.into_iter().map(Option::unwrap_or_default).collect()
}

/// Treats zero prices as missing, then forward-fills and back-fills.
///
/// The result is all `None` only when the column has no non-zero sample.
#[must_use]
pub fn fill_prices(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    let mut values: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| v.filter(|price| *price != 0.0))
        .collect();

    let mut last = None;
    for value in &mut values {
        match *value {
            Some(price) => last = Some(price),
            None => *value = last,
        }
    }

    let mut next = None;
    for value in values.iter_mut().rev() {
        match *value {
            Some(price) => next = Some(price),
            None => *value = next,
        }
    }

    values
}

fn to_datetimes(
    column: &str,
    values: &[Option<i64>],
    inference: &dyn TimeUnitInference,
) -> Vec<Option<DateTime<Utc>>> {
    let Some(unit) = inference.infer(values) else {
        if values.iter().any(Option::is_some) {
            debug!(column, "No time unit inferred, nulling column");
        }
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|value| value.and_then(|v| unit.to_datetime(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedUnit, ModalDigitLength, TimeUnit};
    use approx::assert_relative_eq;

    fn table(n: usize) -> CoercedTable {
        CoercedTable {
            timestamp: (0..n as i64).map(|i| Some(1_704_067_200_000 + i * 3_600_000)).collect(),
            open: vec![Some(1.0); n],
            high: vec![Some(1.0); n],
            low: vec![Some(1.0); n],
            close: vec![Some(1.0); n],
            volume: vec![Some(1.0); n],
            close_time: (0..n as i64).map(|i| Some(1_704_070_799_999 + i * 3_600_000)).collect(),
            quote_asset_volume: vec![Some(1.0); n],
            trades: vec![Some(1); n],
            taker_buy_base: vec![Some(1.0); n],
            taker_buy_quote: vec![Some(1.0); n],
        }
    }

    #[test]
    fn test_single_anchor_fills_whole_column() {
        let filled = fill_prices(vec![None, Some(0.0), Some(42.5), None, Some(0.0)]);
        assert!(filled.iter().all(Option::is_some));
        for price in filled.into_iter().flatten() {
            assert_relative_eq!(price, 42.5);
        }
    }

    #[test]
    fn test_forward_fill_before_back_fill() {
        let filled = fill_prices(vec![None, Some(10.0), Some(0.0), Some(12.0), None]);
        assert_eq!(
            filled,
            vec![Some(10.0), Some(10.0), Some(10.0), Some(12.0), Some(12.0)]
        );
    }

    #[test]
    fn test_all_zero_prices_stay_null() {
        let filled = fill_prices(vec![Some(0.0), None, Some(0.0)]);
        assert_eq!(filled, vec![None, None, None]);
    }

    #[test]
    fn test_activity_fills_zero_not_forward() {
        let filled = fill_activity(vec![Some(5.0), None, Some(7.0), None]);
        assert_eq!(filled, vec![5.0, 0.0, 7.0, 0.0]);

        let trades = fill_activity(vec![None, Some(3_i64)]);
        assert_eq!(trades, vec![0, 3]);
    }

    #[test]
    fn test_repair_converts_millis() {
        let rows = repair(table(3), &ModalDigitLength);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].timestamp.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            rows[2].close_time.unwrap().to_rfc3339(),
            "2024-01-01T02:59:59.999+00:00"
        );
    }

    #[test]
    fn test_repair_nulls_uninferable_column() {
        let mut coerced = table(2);
        coerced.timestamp = vec![Some(1_704_067_200), Some(1_704_070_800)];

        let rows = repair(coerced, &ModalDigitLength);

        assert!(rows.iter().all(|r| r.timestamp.is_none()));
        assert!(rows.iter().all(|r| r.close_time.is_some()));
    }

    #[test]
    fn test_repair_with_fixed_unit() {
        let mut coerced = table(1);
        coerced.timestamp = vec![Some(1_704_067_200_000_000)];
        coerced.close_time = vec![Some(1_704_070_799_999_999)];

        let rows = repair(coerced, &FixedUnit(TimeUnit::Microseconds));

        assert_eq!(
            rows[0].timestamp.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_repair_fills_gaps() {
        let mut coerced = table(3);
        coerced.open = vec![Some(0.0), Some(2.0), None];
        coerced.volume = vec![None, Some(4.0), None];
        coerced.trades = vec![Some(9), None, None];

        let rows = repair(coerced, &ModalDigitLength);

        assert_eq!(rows.iter().map(|r| r.open).collect::<Vec<_>>(), vec![Some(2.0); 3]);
        assert_relative_eq!(rows[0].volume, 0.0);
        assert_relative_eq!(rows[1].volume, 4.0);
        assert_relative_eq!(rows[2].volume, 0.0);
        assert_eq!(rows[2].trades, 0);
    }
}
