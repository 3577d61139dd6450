//! Store and client settings shared by every command.
//!
//! Each flag falls back to an environment variable so existing `.env`
//! deployments keep working.

use anyhow::{Context, Result};
use clap::Args;
use directories::ProjectDirs;
use klinebase_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub(crate) struct Settings {
    /// Root directory of the partition store
    #[arg(long, env = "KLINES_DIR", global = true)]
    klines_dir: Option<PathBuf>,

    /// Per-request timeout, in seconds
    #[arg(long, env = "HTTPX_TIMEOUT", default_value_t = 30.0, global = true)]
    timeout: f64,

    /// Total attempts per request, including the first
    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = 5, global = true)]
    retry_attempts: u32,

    /// Backoff multiplier, in seconds
    #[arg(long, env = "RETRY_MULTIPLIER", default_value_t = 1.0, global = true)]
    retry_multiplier: f64,

    /// Shortest wait between attempts, in seconds
    #[arg(long, env = "RETRY_MIN_WAIT", default_value_t = 1.0, global = true)]
    retry_min_wait: f64,

    /// Longest wait between attempts, in seconds
    #[arg(long, env = "RETRY_MAX_WAIT", default_value_t = 10.0, global = true)]
    retry_max_wait: f64,

    /// Maximum rows per Parquet row group when writing partitions
    #[arg(long, default_value_t = 100_000, global = true)]
    row_group_size: usize,

    /// Partitions read at once when loading a range
    #[arg(long, default_value_t = 8, global = true)]
    read_concurrency: usize,
}

impl Settings {
    /// Returns the store root, defaulting to the platform data directory.
    pub(crate) fn store_root(&self) -> PathBuf {
        self.klines_dir.clone().unwrap_or_else(default_store_root)
    }

    pub(crate) fn store(&self) -> PartitionStore {
        PartitionStore::new(self.store_root())
            .with_row_group_size(self.row_group_size.max(1))
            .with_read_concurrency(self.read_concurrency)
    }

    pub(crate) fn client_config(&self) -> Result<ClientConfig> {
        let retry = RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            multiplier: seconds("RETRY_MULTIPLIER", self.retry_multiplier)?,
            min_wait: seconds("RETRY_MIN_WAIT", self.retry_min_wait)?,
            max_wait: seconds("RETRY_MAX_WAIT", self.retry_max_wait)?,
        };
        Ok(ClientConfig {
            timeout: seconds("HTTPX_TIMEOUT", self.timeout)?,
            retry,
            ..ClientConfig::default()
        })
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{name} must be a non-negative number of seconds, got {value}"))
}

fn default_store_root() -> PathBuf {
    ProjectDirs::from("", "", "klinebase").map_or_else(
        || PathBuf::from("data").join("klines"),
        |dirs| dirs.data_dir().join("klines"),
    )
}
