//! In-process archive double for pipeline and orchestrator tests.

use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use klinebase_fetch::{ClientConfig, DownloadClient, RetryPolicy};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Canned response: status and body.
pub(crate) type Response = (u16, Vec<u8>);

type Handler = dyn Fn(&str, &str, usize) -> Response + Send + Sync;
type Delay = dyn Fn(usize) -> Option<Duration> + Send + Sync;

/// Prefix of the listing URL handed to test clients.
const LISTING_PREFIX: &str = "/?prefix=klines";

struct Shared {
    handler: Box<Handler>,
    delay: Box<Delay>,
    hits: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl Shared {
    /// Counts the request, then answers it after the configured delay.
    async fn respond(&self, method: Method, uri: Uri) -> (StatusCode, Vec<u8>) {
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string);
        let hit = {
            let mut hits = self.hits.lock().unwrap();
            let count = hits.entry(path.clone()).or_insert(0);
            *count += 1;
            *count
        };
        self.total.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = (self.delay)(hit) {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = (self.handler)(method.as_str(), &path, hit);
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, body)
    }
}

/// Serves responses chosen by a handler of `(method, path, hit_count)`.
///
/// `path` includes the query string and `hit_count` is the 1-based number
/// of requests seen for that path.
pub(crate) struct TestServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl TestServer {
    pub(crate) async fn start(
        handler: impl Fn(&str, &str, usize) -> Response + Send + Sync + 'static,
    ) -> Self {
        Self::start_with_delay(handler, |_| None).await
    }

    /// Like [`start`](Self::start), holding each answer back by
    /// `delay(hit_count)` when it returns a duration.
    pub(crate) async fn start_with_delay(
        handler: impl Fn(&str, &str, usize) -> Response + Send + Sync + 'static,
        delay: impl Fn(usize) -> Option<Duration> + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Arc::new(Shared {
            handler: Box::new(handler),
            delay: Box::new(delay),
            hits: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
        });

        let state = Arc::clone(&shared);
        let app = Router::new().fallback(move |method: Method, uri: Uri| {
            let state = Arc::clone(&state);
            async move { state.respond(method, uri).await }
        });
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, shared }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client pointed at this server that retries without waiting.
    pub(crate) fn client(&self, attempts: u32) -> DownloadClient {
        self.client_with_timeout(attempts, Duration::from_secs(5))
    }

    pub(crate) fn client_with_timeout(&self, attempts: u32, timeout: Duration) -> DownloadClient {
        DownloadClient::new(ClientConfig {
            base_url: self.base_url(),
            listing_url: format!("{}{LISTING_PREFIX}", self.base_url()),
            retry: RetryPolicy::immediate(attempts),
            timeout,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    pub(crate) fn hits(&self, path: &str) -> usize {
        self.shared.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub(crate) fn total_hits(&self) -> usize {
        self.shared.total.load(Ordering::SeqCst)
    }
}

/// Path and query of the listing request that probes `symbol`.
pub(crate) fn listing_path(symbol: &str) -> String {
    format!("{LISTING_PREFIX}/{symbol}/")
}

/// Zips `csv` the way the archive publishes a day.
pub(crate) fn archive(name: &str, csv: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(name, SimpleFileOptions::default()).unwrap();
    writer.write_all(csv.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// CSV text of `hours` hourly bars starting at midnight of 2024-01-01 + `day_offset`.
pub(crate) fn hourly_csv(day_offset: i64, hours: i64) -> String {
    let day_start = 1_704_067_200_000 + day_offset * 86_400_000;
    (0..hours)
        .map(|h| {
            let open = day_start + h * 3_600_000;
            format!(
                "{open},100.0,101.0,99.0,100.5,10.0,{},1000.0,5,4.0,400.0,0\n",
                open + 3_599_999
            )
        })
        .collect()
}
