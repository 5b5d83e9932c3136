use crate::extract::extract_from_body;
use crate::fetcher::Fetcher;
use crate::gate::CompletionGate;
use crate::normalize::{CrawlTarget, NormalizedUrl};
use crate::result::{CrawlResult, CrawlStats, PageSource, StatCounters};
use crate::store::PageStore;
use crate::visited::VisitedSet;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, error, info, warn};

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;
pub type ResultCallback = Arc<dyn Fn(CrawlResult) + Send + Sync>;

/// Everything one finished crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub results: Vec<CrawlResult>,
    pub stats: CrawlStats,
}

/// Mirrors every in-scope page reachable from the target's seed.
///
/// Each discovered link is processed by its own task; nothing bounds the
/// fan-out unless [`Crawler::with_max_concurrency`] is set, in which case only
/// the fetch/store work is throttled.
pub struct Crawler {
    target: CrawlTarget,
    store: Arc<dyn PageStore>,
    fetcher: Fetcher,
    max_concurrency: Option<usize>,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
}

impl Crawler {
    pub fn new(target: CrawlTarget, store: Arc<dyn PageStore>, fetcher: Fetcher) -> Self {
        Self {
            target,
            store,
            fetcher,
            max_concurrency: None,
            progress_callback: None,
            result_callback: None,
        }
    }

    /// Bound the number of pages loading or downloading at once. `0` is
    /// treated as unbounded.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = (limit > 0).then_some(limit);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Crawl from the seed and return once every spawned task has finished.
    ///
    /// Page-level failures are logged and recorded on the results; they never
    /// abort the crawl.
    pub async fn crawl(&self) -> CrawlOutcome {
        let seed = self.target.seed().key();
        match self.max_concurrency {
            Some(limit) => info!("Starting mirror of {} ({} concurrent pages)", seed, limit),
            None => info!("Starting mirror of {}", seed),
        }

        let run = Arc::new(CrawlRun {
            target: self.target.clone(),
            store: self.store.clone(),
            fetcher: self.fetcher.clone(),
            limiter: self.max_concurrency.map(Semaphore::new),
            progress_callback: self.progress_callback.clone(),
            result_callback: self.result_callback.clone(),
            visited: VisitedSet::new(),
            results: Mutex::new(Vec::new()),
            stats: StatCounters::default(),
            gate: CompletionGate::new(),
        });

        run.spawn(seed);
        run.gate.wait().await;

        let results = std::mem::take(&mut *run.results.lock().await);
        let stats = run.stats.snapshot();
        info!(
            "Mirror complete. {} pages: {} downloaded, {} from cache, {} failed",
            stats.claimed, stats.fetched, stats.cache_hits, stats.fetch_failures
        );

        CrawlOutcome { results, stats }
    }
}

/// State scoped to a single `crawl` call.
struct CrawlRun {
    target: CrawlTarget,
    store: Arc<dyn PageStore>,
    fetcher: Fetcher,
    limiter: Option<Semaphore>,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
    visited: VisitedSet,
    results: Mutex<Vec<CrawlResult>>,
    stats: StatCounters,
    gate: CompletionGate,
}

impl CrawlRun {
    /// Dispatch `process(url)` as an independent task tracked by the gate.
    fn spawn(self: &Arc<Self>, url: String) {
        let ticket = self.gate.ticket();
        let run = Arc::clone(self);

        tokio::spawn(async move {
            let _ticket = ticket;
            let task = AssertUnwindSafe(run.process(url.clone())).catch_unwind();
            if task.await.is_err() {
                error!("Crawl task for {} panicked", url);
            }
        });
    }

    fn process(self: Arc<Self>, raw_url: String) -> BoxFuture<'static, ()> {
        async move {
            let url = match NormalizedUrl::parse(&raw_url) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping {}: {}", raw_url, e);
                    return;
                }
            };
            let key = url.key();

            if !self.visited.try_claim(&key).await {
                StatCounters::bump(&self.stats.duplicates);
                debug!("Already claimed {}", key);
                return;
            }
            StatCounters::bump(&self.stats.claimed);

            if let Some(ref callback) = self.progress_callback {
                callback(key.clone());
            }

            let started = Instant::now();
            let (body, mut result) = self.load_or_fetch(&url).await;

            let links = extract_from_body(&body, &url, &self.target);
            debug!("Found {} links on {}", links.len(), key);

            result.links_found = links.clone();
            result.elapsed = started.elapsed();
            self.record(result).await;

            for link in links {
                self.spawn(link);
            }
        }
        .boxed()
    }

    /// Cache hit, or download and save. A failed download yields an empty body.
    async fn load_or_fetch(&self, url: &NormalizedUrl) -> (Vec<u8>, CrawlResult) {
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        let key = url.key();
        let path = url.path().to_string();

        match self.store.load(url.path()).await {
            Ok(Some(body)) => {
                StatCounters::bump(&self.stats.cache_hits);
                debug!("Loaded {} from the mirror", key);
                let mut result = CrawlResult::new(key, path, PageSource::Cache);
                result.content_length = body.len();
                return (body, result);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read mirrored copy of {}: {}", key, e),
        }

        let body = match self.fetcher.fetch(&key).await {
            Ok(body) => body,
            Err(e) => {
                self.stats.record_failure(&e);
                warn!("Failed to download {}: {}", key, e);
                return (Vec::new(), CrawlResult::with_error(key, path, e.to_string()));
            }
        };
        StatCounters::bump(&self.stats.fetched);
        info!("Downloaded {} ({} bytes)", key, body.len());

        let mut result = CrawlResult::new(key.clone(), path, PageSource::Network);
        result.content_length = body.len();

        match self.store.save(url.path(), &body).await {
            Ok(location) => {
                StatCounters::bump(&self.stats.saved);
                result.saved_to = Some(location);
            }
            Err(e) => {
                self.stats.record_failure(&e);
                warn!("Failed to save {}: {}", key, e);
                result.error = Some(e.to_string());
            }
        }

        (body, result)
    }

    async fn record(&self, result: CrawlResult) {
        if let Some(ref callback) = self.result_callback {
            callback(result.clone());
        }
        self.results.lock().await.push(result);
    }
}
