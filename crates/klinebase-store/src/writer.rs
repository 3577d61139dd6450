//! Partition writer.

use klinebase_types::{KlineFrame, PartitionKey};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::path::staging_path;
use crate::schema::{INDEX_METADATA_KEY, INTERVAL_METADATA_KEY, frame_to_batch, kline_schema};
use crate::{PartitionStore, StoreError};

impl PartitionStore {
    /// Writes `frame` as the partition for `key`, returning its path.
    ///
    /// Missing directories are created. The file is written to a sibling
    /// staging file and renamed over the target, so a re-run replaces the
    /// previous partition and a failed write leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame belongs to another symbol or if
    /// encoding or any filesystem operation fails.
    pub fn write(&self, key: &PartitionKey, frame: &KlineFrame) -> Result<PathBuf, StoreError> {
        if frame.symbol() != key.symbol {
            return Err(StoreError::SymbolMismatch {
                expected: key.symbol.clone(),
                found: frame.symbol().to_string(),
            });
        }

        let path = self.path_for(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let staging = staging_path(&path);
        if let Err(e) = self.encode(key, frame, &staging) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        debug!(partition = %key, rows = frame.len(), path = %path.display(), "Wrote partition");
        Ok(path)
    }

    fn encode(&self, key: &PartitionKey, frame: &KlineFrame, target: &Path) -> Result<(), StoreError> {
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .set_max_row_group_size(self.row_group_size())
            .set_key_value_metadata(Some(vec![
                KeyValue::new(
                    INDEX_METADATA_KEY.to_string(),
                    KlineFrame::INDEX_COLUMNS.join(","),
                ),
                KeyValue::new(
                    INTERVAL_METADATA_KEY.to_string(),
                    key.interval.as_str().to_string(),
                ),
            ]))
            .build();

        let file = File::create(target)?;
        let mut writer = ArrowWriter::try_new(file, kline_schema(), Some(props))?;
        writer.write(&frame_to_batch(frame)?)?;
        let file = writer.into_inner()?;
        file.sync_all()?;
        Ok(())
    }
}
