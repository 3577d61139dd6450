//! Identity of a daily ingestion unit.

use chrono::{Datelike, NaiveDate};

use crate::{DATE_FORMAT, Interval};

/// `(symbol, interval, date)` of one daily archive and its partition file.
///
/// `date` always comes from the request, never from row content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    /// Trading pair symbol (e.g. `BTCUSDT`).
    pub symbol: String,
    /// Kline interval.
    pub interval: Interval,
    /// Calendar day (UTC).
    pub date: NaiveDate,
}

impl PartitionKey {
    /// Creates a new partition key.
    #[must_use]
    pub fn new(symbol: impl Into<String>, interval: Interval, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            date,
        }
    }

    /// Returns the date as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Returns the four-digit year directory name.
    #[must_use]
    pub fn year_str(&self) -> String {
        format!("{:04}", self.date.year())
    }

    /// Returns the two-digit month directory name.
    #[must_use]
    pub fn month_str(&self) -> String {
        format!("{:02}", self.date.month())
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.symbol, self.interval, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_components() {
        let key = PartitionKey::new(
            "BTCUSDT",
            Interval::Hour1,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        );

        assert_eq!(key.date_str(), "2024-03-07");
        assert_eq!(key.year_str(), "2024");
        assert_eq!(key.month_str(), "03");
        assert_eq!(key.to_string(), "BTCUSDT 1h 2024-03-07");
    }
}
