//! Synthetic archive contents for klinebase benchmarks.

use chrono::{NaiveDate, NaiveTime};

/// Open-time precision of a generated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 13-digit epoch milliseconds.
    Millis,
    /// 16-digit epoch microseconds, as published from 2025 on.
    Micros,
}

impl Precision {
    const fn per_second(self) -> i64 {
        match self {
            Self::Millis => 1_000,
            Self::Micros => 1_000_000,
        }
    }
}

/// Builds one day of raw archive CSV with `bars` equally spaced bars.
///
/// Every 50th bar carries a zero close so the price repair path is
/// exercised.
#[must_use]
pub fn day_csv(date: NaiveDate, bars: u32, precision: Precision) -> String {
    let unit = precision.per_second();
    let day_start = date.and_time(NaiveTime::MIN).and_utc().timestamp() * unit;
    let step = 86_400 * unit / i64::from(bars.max(1));

    let mut csv = String::with_capacity(bars as usize * 120);
    for i in 0..i64::from(bars) {
        let open_time = day_start + i * step;
        let base = 42_000.0 + (i % 97) as f64;
        let close = if i % 50 == 49 { 0.0 } else { base + 0.5 };
        csv.push_str(&format!(
            "{open_time},{base:.2},{:.2},{:.2},{close:.2},{:.4},{},{:.2},{},{:.4},{:.2},0\n",
            base + 1.0,
            base - 1.0,
            1.5 + (i % 7) as f64,
            open_time + step - 1,
            base * 1.5,
            10 + i % 13,
            0.75,
            base * 0.75,
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_csv_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let csv = day_csv(date, 24, Precision::Millis);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 24);
        assert!(lines[0].starts_with("1704067200000,"));
        assert_eq!(lines[0].split(',').count(), 12);

        let micros = day_csv(date, 24, Precision::Micros);
        assert!(micros.starts_with("1704067200000000,"));
    }
}
