//! The partition store handle.

use klinebase_types::PartitionKey;
use std::path::{Path, PathBuf};

use crate::partition_path;

/// A directory of daily kline partitions.
///
/// Writing lives in the `writer` module, reading in `loader`. Cloning is
/// cheap.
#[derive(Debug, Clone)]
pub struct PartitionStore {
    root: PathBuf,
    row_group_size: usize,
    read_concurrency: usize,
}

impl PartitionStore {
    /// Creates a store rooted at `root`. Nothing is created on disk until
    /// the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            row_group_size: 100_000,
            read_concurrency: 8,
        }
    }

    /// Sets the maximum rows per Parquet row group.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets how many partitions a range load reads at once.
    #[must_use]
    pub const fn with_read_concurrency(mut self, concurrency: usize) -> Self {
        self.read_concurrency = concurrency;
        self
    }

    /// Returns the store root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the partition for `key`.
    #[must_use]
    pub fn path_for(&self, key: &PartitionKey) -> PathBuf {
        partition_path(&self.root, key)
    }

    /// Returns true if the partition for `key` exists on disk.
    #[must_use]
    pub fn contains(&self, key: &PartitionKey) -> bool {
        self.path_for(key).is_file()
    }

    pub(crate) const fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    pub(crate) const fn read_concurrency(&self) -> usize {
        if self.read_concurrency == 0 {
            1
        } else {
            self.read_concurrency
        }
    }
}
