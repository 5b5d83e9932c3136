use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Where a page's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSource {
    /// Loaded from the mirror directory, no request made.
    Cache,
    /// Downloaded during this run.
    Network,
    /// Download failed; the page contributed no links.
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub path: String,
    pub source: PageSource,
    pub content_length: usize,
    pub links_found: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl CrawlResult {
    pub fn new(url: String, path: String, source: PageSource) -> Self {
        Self {
            url,
            path,
            source,
            content_length: 0,
            links_found: Vec::new(),
            saved_to: None,
            error: None,
            elapsed: Duration::from_secs(0),
        }
    }

    pub fn with_error(url: String, path: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url, path, PageSource::Unavailable)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Live counters, updated by crawl tasks.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    pub claimed: AtomicUsize,
    pub duplicates: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub fetched: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub saved: AtomicUsize,
    pub store_failures: AtomicUsize,
}

impl StatCounters {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a page-level failure against its error class.
    pub fn record_failure(&self, error: &ScanError) {
        if error.is_fetch_error() {
            Self::bump(&self.fetch_failures);
        } else if error.is_store_error() {
            Self::bump(&self.store_failures);
        }
    }

    pub fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            claimed: self.claimed.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a crawl's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages claimed for processing.
    pub claimed: usize,
    /// Dispatches rejected because the page was already claimed.
    pub duplicates: usize,
    pub cache_hits: usize,
    /// Successful downloads.
    pub fetched: usize,
    pub fetch_failures: usize,
    pub saved: usize,
    pub store_failures: usize,
}
