//! Partition path scheme.

use klinebase_types::PartitionKey;
use std::path::{Path, PathBuf};

/// File extension of partition files.
pub const PARTITION_EXTENSION: &str = "parquet";

/// Returns the path of the partition for `key` under `root`.
///
/// Year and month come from the key's date, never from row content.
///
/// ```
/// use chrono::NaiveDate;
/// use klinebase_store::partition_path;
/// use klinebase_types::{Interval, PartitionKey};
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// let key = PartitionKey::new("BTCUSDT", Interval::Hour1, date);
/// assert_eq!(
///     partition_path(Path::new("/data"), &key),
///     Path::new("/data/BTCUSDT/2024/03/1h/2024-03-07.parquet"),
/// );
/// ```
#[must_use]
pub fn partition_path(root: &Path, key: &PartitionKey) -> PathBuf {
    root.join(&key.symbol)
        .join(key.year_str())
        .join(key.month_str())
        .join(key.interval.as_str())
        .join(format!("{}.{PARTITION_EXTENSION}", key.date_str()))
}

/// Sibling path a partition is written to before it is renamed into place.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    path.with_extension(format!("{PARTITION_EXTENSION}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use klinebase_types::Interval;

    fn key(symbol: &str, interval: Interval, y: i32, m: u32, d: u32) -> PartitionKey {
        PartitionKey::new(symbol, interval, NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_partition_path_layout() {
        let path = partition_path(Path::new("klines"), &key("ETHUSDT", Interval::Minute15, 2023, 12, 31));
        assert_eq!(path, Path::new("klines/ETHUSDT/2023/12/15m/2023-12-31.parquet"));
    }

    #[test]
    fn test_partition_path_is_deterministic() {
        let root = Path::new("/tmp/store");
        let a = partition_path(root, &key("BTCUSDT", Interval::Second1, 2024, 1, 2));
        let b = partition_path(root, &key("BTCUSDT", Interval::Second1, 2024, 1, 2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let path = partition_path(Path::new("/s"), &key("BTCUSDT", Interval::Hour1, 2024, 1, 2));
        let staging = staging_path(&path);
        assert_eq!(staging.parent(), path.parent());
        assert_eq!(
            staging.file_name().unwrap().to_str().unwrap(),
            "2024-01-02.parquet.tmp"
        );
    }
}
