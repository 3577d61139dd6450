//! Kline interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kline interval published by the daily archive.
///
/// The set is closed: anything else is rejected before a request is
/// expanded into daily tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    /// 1-second bars.
    #[serde(rename = "1s")]
    Second1,
    /// 1-minute bars.
    #[serde(rename = "1m")]
    Minute1,
    /// 3-minute bars.
    #[serde(rename = "3m")]
    Minute3,
    /// 5-minute bars.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "30m")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "1h")]
    Hour1,
    /// 2-hour bars.
    #[serde(rename = "2h")]
    Hour2,
    /// 4-hour bars.
    #[serde(rename = "4h")]
    Hour4,
    /// 6-hour bars.
    #[serde(rename = "6h")]
    Hour6,
    /// 8-hour bars.
    #[serde(rename = "8h")]
    Hour8,
    /// 12-hour bars.
    #[serde(rename = "12h")]
    Hour12,
}

impl Interval {
    /// Returns the bar duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Second1 => 1,
            Self::Minute1 => 60,
            Self::Minute3 => 180,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour2 => 7200,
            Self::Hour4 => 14400,
            Self::Hour6 => 21600,
            Self::Hour8 => 28800,
            Self::Hour12 => 43200,
        }
    }

    /// Returns the number of bars in a complete UTC day.
    #[must_use]
    pub const fn bars_per_day(&self) -> u64 {
        86_400 / self.seconds()
    }

    /// Returns the interval as used in archive paths (e.g. `"15m"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "1s",
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour8 => "8h",
            Self::Hour12 => "12h",
        }
    }

    /// Returns all supported intervals, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Second1,
            Self::Minute1,
            Self::Minute3,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour2,
            Self::Hour4,
            Self::Hour6,
            Self::Hour8,
            Self::Hour12,
        ]
    }

    /// Returns the allow-list as a comma-separated string.
    #[must_use]
    pub fn allowed() -> String {
        Self::all()
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| IntervalParseError(s.to_string()))
    }
}

/// Error returned when parsing an interval outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl IntervalParseError {
    /// Returns the rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: {}",
            self.0,
            Interval::allowed()
        )
    }
}

impl std::error::Error for IntervalParseError {}
