//! Terminal output for the klinebase CLI.

use indicatif::{ProgressBar, ProgressStyle};
use klinebase_lib::prelude::*;

/// Progress bar over the daily tasks of a batch, hidden in quiet mode.
pub(crate) struct TaskProgress {
    bar: ProgressBar,
}

impl TaskProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchObserver for TaskProgress {
    fn planned(&mut self, plan: &Plan) {
        self.bar.set_length(plan.keys.len() as u64);
    }

    fn completed(&mut self, outcome: &TaskOutcome) {
        self.bar.set_message(outcome.key().to_string());
        self.bar.inc(1);
    }
}

/// Prints rejected pairs and failed tasks, then the summary line.
pub(crate) fn print_report(report: &BatchReport) {
    for rejected in &report.rejected {
        eprintln!(
            "  rejected {} {} [{}]: {}",
            rejected.symbol,
            rejected.interval,
            rejected.error.kind(),
            rejected.error
        );
    }
    for (key, error) in report.failures() {
        eprintln!("  failed   {key} [{}]: {error}", error.kind());
    }

    println!(
        "{report} ({} partitions, {} rows, {:.1}s)",
        report.succeeded(),
        report.rows_written(),
        report.elapsed.as_secs_f64()
    );
}

/// Prints a one-screen summary of a loaded frame.
pub(crate) fn print_frame_summary(frame: &KlineFrame, interval: Interval) {
    println!("Symbol:   {}", frame.symbol());
    println!("Interval: {interval}");
    println!("Rows:     {}", frame.len());
    println!("Days:     {}", frame.distinct_dates().len());
    if let Some((first, last)) = frame.time_span() {
        println!("First:    {}", first.to_rfc3339());
        println!("Last:     {}", last.to_rfc3339());
    }
    if let Some(last) = frame.rows().last() {
        let price = |p: Option<f64>| p.map_or_else(|| "-".to_string(), |v| format!("{v}"));
        println!(
            "Last bar: O {} H {} L {} C {} V {}",
            price(last.open),
            price(last.high),
            price(last.low),
            price(last.close),
            last.volume
        );
    }
}
