//! Download-to-partition pipeline for a single day.

use klinebase_fetch::{DownloadClient, parse_klines, unwrap_archive};
use klinebase_normalize::Normalizer;
use klinebase_store::PartitionStore;
use klinebase_types::{KlinebaseError, PartitionKey};
use std::path::PathBuf;
use tracing::{debug, error, warn};

use crate::TaskOutcome;

/// Turns one `(symbol, interval, date)` into one partition file.
///
/// Every failure is contained here: [`run`](Self::run) always returns a
/// [`TaskOutcome`] and never writes a partition for a failed unit.
#[derive(Debug, Clone)]
pub struct DailyPipeline {
    client: DownloadClient,
    normalizer: Normalizer,
    store: PartitionStore,
}

impl DailyPipeline {
    /// Creates a pipeline with the default normalizer.
    #[must_use]
    pub fn new(client: DownloadClient, store: PartitionStore) -> Self {
        Self::with_normalizer(client, store, Normalizer::new())
    }

    /// Creates a pipeline with a custom normalizer.
    #[must_use]
    pub const fn with_normalizer(
        client: DownloadClient,
        store: PartitionStore,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            client,
            normalizer,
            store,
        }
    }

    /// Returns the partition store.
    #[must_use]
    pub const fn store(&self) -> &PartitionStore {
        &self.store
    }

    /// Runs the pipeline for `key`.
    pub async fn run(&self, key: PartitionKey) -> TaskOutcome {
        match self.process(&key).await {
            Ok((path, rows)) => {
                debug!(
                    symbol = %key.symbol,
                    interval = %key.interval,
                    date = %key.date,
                    rows,
                    "Partition written"
                );
                TaskOutcome::Written { key, path, rows }
            }
            Err(e) => {
                error!(
                    symbol = %key.symbol,
                    interval = %key.interval,
                    date = %key.date,
                    kind = e.kind(),
                    error = %e,
                    "Error processing daily klines"
                );
                TaskOutcome::Failed { key, error: e }
            }
        }
    }

    async fn process(&self, key: &PartitionKey) -> Result<(PathBuf, usize), KlinebaseError> {
        let compressed = self
            .client
            .download_archive(&key.symbol, key.interval, key.date)
            .await?;

        let normalizer = self.normalizer.clone();
        let store = self.store.clone();
        let task_key = key.clone();

        // Unwrapping, parsing, normalizing and encoding are CPU-bound
        let (path, rows) = tokio::task::spawn_blocking(move || {
            let csv = unwrap_archive(&compressed)?;
            let raw = parse_klines(&csv)?;
            let frame = normalizer.normalize(&raw, &task_key.symbol)?;
            let path = store.write(&task_key, &frame)?;
            Ok::<_, KlinebaseError>((path, frame.len()))
        })
        .await
        .map_err(|e| KlinebaseError::Task(format!("spawn_blocking failed: {e}")))??;

        let expected = key.interval.bars_per_day();
        if rows as u64 != expected {
            warn!(
                symbol = %key.symbol,
                interval = %key.interval,
                date = %key.date,
                rows,
                expected,
                "Unexpected number of bars for a full day"
            );
        }

        Ok((path, rows))
    }
}
