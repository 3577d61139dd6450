//! Fetch command implementation.
//!
//! Validates a batch file, runs one daily pipeline per planned day and
//! reports per-task outcomes.

use crate::config::Settings;
use crate::display::{TaskProgress, print_report};
use anyhow::{Context, Result, bail};
use klinebase_lib::prelude::*;
use std::path::Path;
use tracing::info;

/// Ingests every pair of the batch file at `path`.
///
/// Returns an error when any pair was rejected or any task failed, so the
/// process exits non-zero.
pub(crate) async fn fetch(
    settings: &Settings,
    path: &Path,
    concurrency: Option<usize>,
    verify_symbols: bool,
    quiet: bool,
) -> Result<()> {
    let batch = BatchRequest::from_path(path)
        .with_context(|| format!("Failed to load batch file {}", path.display()))?;
    if batch.is_empty() {
        bail!("Batch file {} lists no symbols", path.display());
    }

    let client = DownloadClient::new(settings.client_config()?)
        .context("Failed to create HTTP client")?;
    let mut config =
        IngestConfig::for_client(client.config()).with_verify_symbols(verify_symbols);
    if let Some(concurrency) = concurrency {
        config = config.with_concurrency(concurrency);
    }

    let orchestrator = Orchestrator::new(client, settings.store(), config);
    info!(
        root = %orchestrator.store().root().display(),
        pairs = batch.len(),
        "Fetching klines"
    );

    let mut progress = TaskProgress::new(quiet);
    let report = orchestrator.run_with(&batch, &mut progress).await;
    progress.finish();

    print_report(&report);

    if !report.is_success() {
        bail!("{report}");
    }
    Ok(())
}
