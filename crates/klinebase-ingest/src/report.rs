//! Task outcomes and batch reports.

use klinebase_types::{KlinebaseError, PartitionKey};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result of one daily pipeline run.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The partition was written.
    Written {
        /// Partition that was produced.
        key: PartitionKey,
        /// Path of the written file.
        path: PathBuf,
        /// Number of rows written.
        rows: usize,
    },
    /// The unit failed; no partition was written.
    Failed {
        /// Partition that was not produced.
        key: PartitionKey,
        /// Cause of the failure.
        error: KlinebaseError,
    },
}

impl TaskOutcome {
    /// Returns the partition key of the task.
    #[must_use]
    pub const fn key(&self) -> &PartitionKey {
        match self {
            Self::Written { key, .. } | Self::Failed { key, .. } => key,
        }
    }

    /// Returns true if the partition was written.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    /// Returns the failure cause, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&KlinebaseError> {
        match self {
            Self::Written { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// A `(symbol, interval)` pair that failed validation and was never
/// expanded into tasks.
#[derive(Debug)]
pub struct RejectedRequest {
    /// Requested symbol.
    pub symbol: String,
    /// Requested interval, as given.
    pub interval: String,
    /// Why the pair was rejected.
    pub error: KlinebaseError,
}

/// Aggregated outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcome of every scheduled task, in completion order.
    pub outcomes: Vec<TaskOutcome>,
    /// Pairs rejected before scheduling.
    pub rejected: Vec<RejectedRequest>,
    /// Wall-clock time of the batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Creates a report with the given rejected pairs and no outcomes yet.
    #[must_use]
    pub const fn new(rejected: Vec<RejectedRequest>) -> Self {
        Self {
            outcomes: Vec::new(),
            rejected,
            elapsed: Duration::ZERO,
        }
    }

    /// Records a task outcome.
    pub fn record(&mut self, outcome: TaskOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the number of scheduled tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of partitions written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    /// Returns the number of failed tasks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Returns the total number of rows written.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                TaskOutcome::Written { rows, .. } => *rows,
                TaskOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Iterates over the failed tasks.
    pub fn failures(&self) -> impl Iterator<Item = (&PartitionKey, &KlinebaseError)> {
        self.outcomes.iter().filter_map(|o| match o {
            TaskOutcome::Failed { key, error } => Some((key, error)),
            TaskOutcome::Written { .. } => None,
        })
    }

    /// Returns true if every task succeeded and no pair was rejected.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.rejected.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed() == 0 {
            write!(f, "all {} tasks succeeded", self.total())?;
        } else {
            write!(f, "{} of {} tasks failed", self.failed(), self.total())?;
        }
        if !self.rejected.is_empty() {
            write!(f, ", {} pairs rejected", self.rejected.len())?;
        }
        Ok(())
    }
}
