//! Intervals command implementation.

use klinebase_lib::prelude::*;

/// Prints every supported interval with its bar count per day.
pub(crate) fn list_intervals() {
    println!("{:<10} {:>10} {:>12}", "INTERVAL", "SECONDS", "BARS/DAY");
    println!("{}", "-".repeat(34));
    for interval in Interval::all() {
        println!(
            "{:<10} {:>10} {:>12}",
            interval.as_str(),
            interval.seconds(),
            interval.bars_per_day()
        );
    }
}
