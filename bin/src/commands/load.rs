//! Load command implementation.

use crate::config::Settings;
use crate::display::print_frame_summary;
use anyhow::{Context, Result};
use klinebase_lib::prelude::*;
use klinebase_lib::validate_interval;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Loads `[start, end]` for one `(symbol, interval)` and prints a summary,
/// or writes the rows as CSV when `output` is given.
pub(crate) async fn load(
    settings: &Settings,
    symbol: &str,
    interval: &str,
    start: &str,
    end: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let interval = validate_interval(interval)?;
    let store = settings.store();

    let frame = store
        .load_range(symbol, interval, start, end)
        .await
        .with_context(|| format!("Failed to load {symbol} {interval} {start}..{end}"))?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&frame, BufWriter::new(file))?;
            println!("Wrote {} rows to {}", frame.len(), path.display());
        }
        None => print_frame_summary(&frame, interval),
    }
    Ok(())
}
