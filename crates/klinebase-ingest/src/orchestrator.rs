//! Batch validation and concurrent fan-out of daily pipelines.

use futures::stream::{self, Stream, StreamExt};
use klinebase_fetch::{
    ClientConfig, DownloadClient, async_validate_symbol, validate_dates, validate_interval,
};
use klinebase_normalize::Normalizer;
use klinebase_store::PartitionStore;
use klinebase_types::{
    DateRange, Interval, KlinebaseError, PartitionKey, ValidationError, parse_date,
};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::{BatchReport, BatchRequest, DailyPipeline, RejectedRequest, TaskOutcome};

/// Orchestrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Maximum daily pipelines (and symbol probes) in flight.
    pub concurrency: usize,
    /// Probe the archive for each symbol before scheduling its days.
    pub verify_symbols: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::for_client(&ClientConfig::default())
    }
}

impl IngestConfig {
    /// Settings whose concurrency matches the client's connection pool.
    #[must_use]
    pub const fn for_client(config: &ClientConfig) -> Self {
        Self {
            concurrency: config.pool_size,
            verify_symbols: true,
        }
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enables or disables symbol probes.
    #[must_use]
    pub const fn with_verify_symbols(mut self, verify: bool) -> Self {
        self.verify_symbols = verify;
        self
    }
}

/// Validated work of a batch.
#[derive(Debug, Default)]
pub struct Plan {
    /// One key per day of every accepted pair.
    pub keys: Vec<PartitionKey>,
    /// Pairs that failed validation.
    pub rejected: Vec<RejectedRequest>,
}

/// Receives progress from [`Orchestrator::run_with`].
///
/// Both methods default to doing nothing.
pub trait BatchObserver {
    /// Called once the batch is planned, before any task starts.
    fn planned(&mut self, _plan: &Plan) {}

    /// Called as each task completes.
    fn completed(&mut self, _outcome: &TaskOutcome) {}
}

impl BatchObserver for () {}

/// A pair that passed the offline checks and awaits its symbol probe.
struct Candidate {
    symbol: String,
    interval: Interval,
    range: DateRange,
}

/// Validates batches and runs their daily pipelines with bounded
/// concurrency.
///
/// The HTTP client is injected; the orchestrator holds no global state.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    client: DownloadClient,
    pipeline: DailyPipeline,
    config: IngestConfig,
}

impl Orchestrator {
    /// Creates an orchestrator writing into `store`.
    #[must_use]
    pub fn new(client: DownloadClient, store: PartitionStore, config: IngestConfig) -> Self {
        Self::with_normalizer(client, store, Normalizer::new(), config)
    }

    /// Creates an orchestrator with a custom normalizer.
    #[must_use]
    pub fn with_normalizer(
        client: DownloadClient,
        store: PartitionStore,
        normalizer: Normalizer,
        config: IngestConfig,
    ) -> Self {
        let pipeline = DailyPipeline::with_normalizer(client.clone(), store, normalizer);
        Self {
            client,
            pipeline,
            config,
        }
    }

    /// Returns the settings.
    #[must_use]
    pub const fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Returns the partition store.
    #[must_use]
    pub const fn store(&self) -> &PartitionStore {
        self.pipeline.store()
    }

    const fn concurrency(&self) -> usize {
        if self.config.concurrency == 0 {
            1
        } else {
            self.config.concurrency
        }
    }

    /// Validates every pair of `batch` and expands the accepted ones into
    /// daily keys.
    ///
    /// Interval and dates are checked first; each remaining symbol is then
    /// probed once, concurrently. A pair failing any check is rejected as a
    /// whole and logged; the other pairs are unaffected.
    pub async fn plan(&self, batch: &BatchRequest) -> Plan {
        let mut plan = Plan::default();
        let mut candidates = Vec::new();

        for (symbol, interval, span) in batch.pairs() {
            match check_offline(interval, &span.start_date, &span.end_date) {
                Ok((interval, range)) => candidates.push(Candidate {
                    symbol: symbol.to_string(),
                    interval,
                    range,
                }),
                Err(e) => reject(&mut plan, symbol, interval, e.into()),
            }
        }

        let probes = self.probe_symbols(&candidates).await;

        for candidate in candidates {
            match probes.get(&candidate.symbol) {
                Some(failure) => reject(
                    &mut plan,
                    &candidate.symbol,
                    candidate.interval.as_str(),
                    failure.to_error(&candidate.symbol),
                ),
                None => {
                    debug!(
                        symbol = %candidate.symbol,
                        interval = %candidate.interval,
                        range = %candidate.range,
                        days = candidate.range.total_days(),
                        "Accepted kline request"
                    );
                    plan.keys.extend(candidate.range.days().map(|date| {
                        PartitionKey::new(&candidate.symbol, candidate.interval, date)
                    }));
                }
            }
        }

        plan
    }

    /// Probes each distinct symbol once, returning the symbols that failed.
    async fn probe_symbols(&self, candidates: &[Candidate]) -> HashMap<String, ProbeFailure> {
        if !self.config.verify_symbols {
            return HashMap::new();
        }

        let symbols: BTreeSet<&str> = candidates.iter().map(|c| c.symbol.as_str()).collect();

        stream::iter(symbols)
            .map(|symbol| async move {
                let failure = match async_validate_symbol(&self.client, symbol).await {
                    Ok(true) => None,
                    Ok(false) => Some(ProbeFailure::Unknown),
                    Err(e) => Some(ProbeFailure::Network(e.to_string())),
                };
                failure.map(|f| (symbol.to_string(), f))
            })
            .buffer_unordered(self.concurrency())
            .filter_map(|failure| async move { failure })
            .collect()
            .await
    }

    /// Runs the daily pipeline for every key, at most
    /// [`IngestConfig::concurrency`] at a time, yielding outcomes as they
    /// complete.
    pub fn execute(&self, keys: Vec<PartitionKey>) -> impl Stream<Item = TaskOutcome> + '_ {
        stream::iter(keys)
            .map(|key| self.pipeline.run(key))
            .buffer_unordered(self.concurrency())
    }

    /// Plans and executes `batch`, returning the aggregated report.
    pub async fn run(&self, batch: &BatchRequest) -> BatchReport {
        self.run_with(batch, &mut ()).await
    }

    /// Like [`run`](Self::run), reporting the plan and every outcome to
    /// `observer` as they happen.
    pub async fn run_with(
        &self,
        batch: &BatchRequest,
        observer: &mut impl BatchObserver,
    ) -> BatchReport {
        let started = Instant::now();
        info!(pairs = batch.len(), "Starting kline batch");

        let plan = self.plan(batch).await;
        observer.planned(&plan);
        let mut report = BatchReport::new(plan.rejected);

        let mut outcomes = std::pin::pin!(self.execute(plan.keys));
        while let Some(outcome) = outcomes.next().await {
            observer.completed(&outcome);
            report.record(outcome);
        }
        report.elapsed = started.elapsed();

        info!(
            tasks = report.total(),
            failed = report.failed(),
            rejected = report.rejected.len(),
            rows = report.rows_written(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Finished kline batch: {report}"
        );
        report
    }
}

/// Why a symbol probe rejected its pairs.
#[derive(Debug, Clone)]
enum ProbeFailure {
    Unknown,
    Network(String),
}

impl ProbeFailure {
    fn to_error(&self, symbol: &str) -> KlinebaseError {
        match self {
            Self::Unknown => ValidationError::UnknownSymbol(symbol.to_string()).into(),
            Self::Network(message) => KlinebaseError::Network(message.clone()),
        }
    }
}

fn check_offline(
    interval: &str,
    start: &str,
    end: &str,
) -> Result<(Interval, DateRange), ValidationError> {
    let interval = validate_interval(interval)?;
    let range = validate_dates(parse_date(start)?, parse_date(end)?)?;
    Ok((interval, range))
}

fn reject(plan: &mut Plan, symbol: &str, interval: &str, error: KlinebaseError) {
    error!(symbol, interval, kind = error.kind(), error = %error, "Rejected kline request");
    plan.rejected.push(RejectedRequest {
        symbol: symbol.to_string(),
        interval: interval.to_string(),
        error,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{TestServer, archive, hourly_csv, listing_path};
    use chrono::NaiveDate;

    async fn archive_server() -> TestServer {
        TestServer::start(|method, path, _| match (method, path) {
            ("HEAD", p) if p == listing_path("BTCUSDT") || p == listing_path("ETHUSDT") => {
                (200, Vec::new())
            }
            ("HEAD", _) => (404, Vec::new()),
            (_, p) if p.ends_with("2024-01-02.zip") => (500, Vec::new()),
            (_, p) if p.ends_with("2024-01-01.zip") => (200, archive("d.csv", &hourly_csv(0, 24))),
            (_, p) if p.ends_with("2024-01-03.zip") => (200, archive("d.csv", &hourly_csv(2, 24))),
            _ => (404, Vec::new()),
        })
        .await
    }

    fn orchestrator(server: &TestServer, dir: &std::path::Path) -> Orchestrator {
        Orchestrator::new(
            server.client(2),
            PartitionStore::new(dir),
            IngestConfig::default().with_concurrency(4),
        )
    }

    #[test]
    fn test_default_concurrency_matches_pool() {
        let config = IngestConfig::default();
        assert_eq!(config.concurrency, ClientConfig::default().pool_size);
        assert!(config.verify_symbols);
    }

    #[tokio::test]
    async fn test_plan_rejects_invalid_pairs_only() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let batch = BatchRequest::new()
            .with("BTCUSDT", "1h", "2024-01-01", "2024-01-03")
            .with("BTCUSDT", "7m", "2024-01-01", "2024-01-03")
            .with("ETHUSDT", "1h", "2024-01-05", "2024-01-01")
            .with("ETHUSDT", "4h", "2024-01-01", "2999-01-01")
            .with("NOPE", "1h", "2024-01-01", "2024-01-01");

        let plan = orchestrator(&server, dir.path()).plan(&batch).await;

        assert_eq!(plan.keys.len(), 3);
        assert!(plan.keys.iter().all(|k| k.symbol == "BTCUSDT" && k.interval == Interval::Hour1));

        let mut rejected: Vec<_> = plan
            .rejected
            .iter()
            .map(|r| (r.symbol.as_str(), r.interval.as_str(), r.error.kind()))
            .collect();
        rejected.sort_unstable();
        assert_eq!(
            rejected,
            vec![
                ("BTCUSDT", "7m", "validation"),
                ("ETHUSDT", "1h", "validation"),
                ("ETHUSDT", "4h", "validation"),
                ("NOPE", "1h", "validation"),
            ]
        );
    }

    #[tokio::test]
    async fn test_each_symbol_checked_once() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let batch = BatchRequest::new()
            .with("BTCUSDT", "1h", "2024-01-01", "2024-01-01")
            .with("BTCUSDT", "15m", "2024-01-01", "2024-01-01")
            .with("BTCUSDT", "4h", "2024-01-01", "2024-01-01");

        let plan = orchestrator(&server, dir.path()).plan(&batch).await;

        assert_eq!(plan.keys.len(), 3);
        assert_eq!(server.hits(&listing_path("BTCUSDT")), 1);
    }

    #[tokio::test]
    async fn test_failing_symbol_check_rejects_pairs_as_network_errors() {
        let server = TestServer::start(|method, path, _| match method {
            "HEAD" if path == listing_path("ETHUSDT") => (500, Vec::new()),
            "HEAD" => (200, Vec::new()),
            _ => (404, Vec::new()),
        })
        .await;
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            server.client(3),
            PartitionStore::new(dir.path()),
            IngestConfig::default(),
        );
        let batch = BatchRequest::new()
            .with("ETHUSDT", "1h", "2024-01-01", "2024-01-02")
            .with("ETHUSDT", "4h", "2024-01-01", "2024-01-02")
            .with("BTCUSDT", "1h", "2024-01-01", "2024-01-02");

        let plan = orchestrator.plan(&batch).await;

        assert_eq!(server.hits(&listing_path("ETHUSDT")), 3);
        assert_eq!(plan.keys.len(), 2);
        assert!(plan.keys.iter().all(|k| k.symbol == "BTCUSDT"));
        assert_eq!(plan.rejected.len(), 2);
        assert!(
            plan.rejected
                .iter()
                .all(|r| r.symbol == "ETHUSDT" && r.error.kind() == "network")
        );
    }

    #[tokio::test]
    async fn test_symbol_checks_can_be_skipped() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            server.client(1),
            PartitionStore::new(dir.path()),
            IngestConfig::default().with_verify_symbols(false),
        );

        let plan = orchestrator
            .plan(&BatchRequest::new().with("NOPE", "1h", "2024-01-01", "2024-01-02"))
            .await;

        assert_eq!(plan.keys.len(), 2);
        assert_eq!(server.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_run_isolates_failed_days() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(&server, dir.path());

        let report = orchestrator
            .run(&BatchRequest::new().with("BTCUSDT", "1h", "2024-01-01", "2024-01-03"))
            .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.rows_written(), 48);
        assert!(!report.is_success());

        let (failed, error) = report.failures().next().unwrap();
        assert_eq!(failed.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(error.kind(), "network");

        let store = orchestrator.store();
        for (day, present) in [(1, true), (2, false), (3, true)] {
            let key = PartitionKey::new(
                "BTCUSDT",
                Interval::Hour1,
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            );
            assert_eq!(store.contains(&key), present, "day {day}");
        }
    }

    #[tokio::test]
    async fn test_execute_yields_one_outcome_per_key() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(&server, dir.path());
        let keys: Vec<_> = (1..=3)
            .map(|d| {
                PartitionKey::new(
                    "BTCUSDT",
                    Interval::Hour1,
                    NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                )
            })
            .collect();

        let outcomes: Vec<_> = orchestrator.execute(keys).collect().await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.is_written()).count(), 2);
    }

    #[derive(Default)]
    struct Recorder {
        planned: Option<usize>,
        completed: Vec<bool>,
    }

    impl BatchObserver for Recorder {
        fn planned(&mut self, plan: &Plan) {
            self.planned = Some(plan.keys.len());
        }

        fn completed(&mut self, outcome: &TaskOutcome) {
            self.completed.push(outcome.is_written());
        }
    }

    #[tokio::test]
    async fn test_run_with_reports_progress() {
        let server = archive_server().await;
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(&server, dir.path());
        let mut recorder = Recorder::default();

        let report = orchestrator
            .run_with(
                &BatchRequest::new().with("BTCUSDT", "1h", "2024-01-01", "2024-01-03"),
                &mut recorder,
            )
            .await;

        assert_eq!(recorder.planned, Some(3));
        assert_eq!(recorder.completed.len(), 3);
        assert_eq!(recorder.completed.iter().filter(|w| **w).count(), report.succeeded());
        assert_eq!(report.to_string(), "1 of 3 tasks failed");
    }
}
