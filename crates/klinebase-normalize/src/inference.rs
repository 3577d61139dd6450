//! Resolution inference for integer epoch columns.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Debug;

/// Resolution of an integer epoch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Milliseconds since the Unix epoch (13 digits for current dates).
    Milliseconds,
    /// Microseconds since the Unix epoch (16 digits for current dates).
    Microseconds,
}

impl TimeUnit {
    /// Converts an epoch value in this unit to a UTC timestamp.
    ///
    /// Returns `None` if the result is outside the representable range.
    #[must_use]
    pub fn to_datetime(self, value: i64) -> Option<DateTime<Utc>> {
        match self {
            Self::Milliseconds => DateTime::from_timestamp_millis(value),
            Self::Microseconds => DateTime::from_timestamp_micros(value),
        }
    }

    /// Maps a decimal digit count to the unit that produces it.
    #[must_use]
    pub const fn from_digit_length(digits: u32) -> Option<Self> {
        match digits {
            13 => Some(Self::Milliseconds),
            16 => Some(Self::Microseconds),
            _ => None,
        }
    }
}

/// Strategy that picks the unit of an epoch column.
///
/// Returning `None` means the column cannot be interpreted; every value in
/// it becomes null.
pub trait TimeUnitInference: Debug + Send + Sync {
    /// Infers the unit from the column's values.
    fn infer(&self, values: &[Option<i64>]) -> Option<TimeUnit>;
}

/// Infers the unit from the most common digit length of the non-null values.
///
/// Ties resolve to the shorter length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModalDigitLength;

impl TimeUnitInference for ModalDigitLength {
    fn infer(&self, values: &[Option<i64>]) -> Option<TimeUnit> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for value in values.iter().flatten() {
            *counts.entry(digit_length(*value)).or_default() += 1;
        }

        let (modal, _) = counts
            .into_iter()
            .max_by(|(len_a, n_a), (len_b, n_b)| n_a.cmp(n_b).then(len_b.cmp(len_a)))?;

        TimeUnit::from_digit_length(modal)
    }
}

/// Uses the same unit for every column.
#[derive(Debug, Clone, Copy)]
pub struct FixedUnit(pub TimeUnit);

impl TimeUnitInference for FixedUnit {
    fn infer(&self, _values: &[Option<i64>]) -> Option<TimeUnit> {
        Some(self.0)
    }
}

/// Decimal digits of `value`, ignoring the sign.
const fn digit_length(value: i64) -> u32 {
    match value.unsigned_abs().checked_ilog10() {
        Some(log) => log + 1,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_length() {
        assert_eq!(digit_length(0), 1);
        assert_eq!(digit_length(9), 1);
        assert_eq!(digit_length(-42), 2);
        assert_eq!(digit_length(1_704_067_200_000), 13);
        assert_eq!(digit_length(1_704_067_200_000_000), 16);
        assert_eq!(digit_length(i64::MIN), 19);
    }

    #[test]
    fn test_modal_millis_and_micros() {
        let millis = [Some(1_704_067_200_000), Some(1_704_070_800_000)];
        let micros = [Some(1_735_689_600_000_000), None];

        assert_eq!(ModalDigitLength.infer(&millis), Some(TimeUnit::Milliseconds));
        assert_eq!(ModalDigitLength.infer(&micros), Some(TimeUnit::Microseconds));
    }

    #[test]
    fn test_modal_ignores_minority_lengths() {
        let values = [
            Some(1_704_067_200_000),
            Some(1_704_070_800_000),
            Some(1_704_074_400_000_000),
        ];
        assert_eq!(ModalDigitLength.infer(&values), Some(TimeUnit::Milliseconds));
    }

    #[test]
    fn test_tie_prefers_shorter_length() {
        let values = [Some(1_704_067_200_000_000), Some(1_704_067_200_000)];
        assert_eq!(ModalDigitLength.infer(&values), Some(TimeUnit::Milliseconds));
    }

    #[test]
    fn test_unmapped_or_empty() {
        // Seconds (10 digits) are not a published resolution
        assert_eq!(ModalDigitLength.infer(&[Some(1_704_067_200)]), None);
        assert_eq!(ModalDigitLength.infer(&[None, None]), None);
        assert_eq!(ModalDigitLength.infer(&[]), None);
    }

    #[test]
    fn test_fixed_unit() {
        let inference = FixedUnit(TimeUnit::Microseconds);
        assert_eq!(inference.infer(&[Some(1)]), Some(TimeUnit::Microseconds));
    }

    #[test]
    fn test_to_datetime() {
        let ts = TimeUnit::Milliseconds.to_datetime(1_704_067_200_000).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let ts = TimeUnit::Microseconds.to_datetime(1_704_067_200_000_000).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        assert!(TimeUnit::Milliseconds.to_datetime(i64::MAX).is_none());
    }
}
