//! Range loader.

use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt, stream};
use klinebase_types::{DateRange, Interval, KlineFrame, PartitionKey, ValidationError, parse_date};
use parquet::arrow::ParquetRecordBatchStreamBuilder;
use std::io::ErrorKind;
use tokio::fs::File;
use tracing::debug;

use crate::schema::{INDEX_METADATA_KEY, batch_to_rows};
use crate::{PartitionStore, StoreError};

impl PartitionStore {
    /// Reads the partition of one day.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] if the file does not exist
    /// and [`StoreError::Corrupt`] if it does not hold `symbol` klines.
    pub async fn load_day(
        &self,
        symbol: &str,
        interval: Interval,
        date: NaiveDate,
    ) -> Result<KlineFrame, StoreError> {
        let key = PartitionKey::new(symbol, interval, date);
        let path = self.path_for(&key);

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::PartitionNotFound {
                    symbol: key.symbol,
                    interval,
                    date,
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let builder = ParquetRecordBatchStreamBuilder::new(file).await?;
        let indexed = builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .is_some_and(|kv| kv.iter().any(|e| e.key == INDEX_METADATA_KEY));
        if !indexed {
            return Err(StoreError::Corrupt {
                path,
                reason: format!("missing '{INDEX_METADATA_KEY}' metadata"),
            });
        }

        let batches: Vec<_> = builder.build()?.try_collect().await?;

        let mut rows = Vec::new();
        for batch in &batches {
            rows.extend(batch_to_rows(batch, symbol, &path)?);
        }

        debug!(partition = %key, rows = rows.len(), "Loaded partition");
        Ok(KlineFrame::new(key.symbol, rows))
    }

    /// Loads every day from `start` to `end` (inclusive, `YYYY-MM-DD`) and
    /// concatenates them sorted by `(symbol, timestamp)`.
    ///
    /// Duplicate timestamps within a day are kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed or reversed dates, and
    /// [`StoreError::PartitionNotFound`] for the first day with no partition.
    pub async fn load_range(
        &self,
        symbol: &str,
        interval: Interval,
        start: &str,
        end: &str,
    ) -> Result<KlineFrame, StoreError> {
        let range = DateRange::new(parse_date(start)?, parse_date(end)?)
            .map_err(ValidationError::from)?;
        self.load_dates(symbol, interval, range).await
    }

    /// Like [`load_range`](Self::load_range) with an already parsed range.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] for the first missing day.
    pub async fn load_dates(
        &self,
        symbol: &str,
        interval: Interval,
        range: DateRange,
    ) -> Result<KlineFrame, StoreError> {
        let mut frame = stream::iter(range.days())
            .map(|date| self.load_day(symbol, interval, date))
            .buffered(self.read_concurrency())
            .try_fold(KlineFrame::new(symbol, Vec::new()), |mut acc, day| async move {
                acc.extend(day).map_err(|e| StoreError::SymbolMismatch {
                    expected: e.expected,
                    found: e.found,
                })?;
                Ok::<_, StoreError>(acc)
            })
            .await?;

        frame.sort_by_index();
        Ok(frame)
    }
}
