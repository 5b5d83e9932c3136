use crate::report::display_path;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use webmirror_scanner::{
    CrawlOutcome, CrawlResult, CrawlTarget, Crawler, Fetcher, FsPageStore, PageSource,
};

/// Options for a mirror run
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub url: String,
    pub dir: PathBuf,
    /// `None` keeps the fan-out unbounded.
    pub max_concurrency: Option<usize>,
    /// `None` means requests never time out.
    pub timeout: Option<Duration>,
    pub show_progress_bars: bool,
}

impl MirrorOptions {
    pub fn new(url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dir: dir.into(),
            max_concurrency: None,
            timeout: None,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting notable events (failed pages) while mirroring
pub type MirrorProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Run one mirror session: validate the seed, wire up the store and the
/// crawler, and crawl to completion.
///
/// Only setup problems (bad seed, HTTP client construction) are errors.
pub async fn execute_mirror(
    options: MirrorOptions,
    progress_callback: Option<MirrorProgressCallback>,
) -> Result<CrawlOutcome> {
    let MirrorOptions {
        url,
        dir,
        max_concurrency,
        timeout,
        show_progress_bars,
    } = options;

    let target = CrawlTarget::from_seed(&url).context("Invalid seed URL")?;

    let fetcher = match timeout {
        Some(timeout) => Fetcher::with_timeout(timeout),
        None => Fetcher::new(),
    }
    .context("Failed to create HTTP client")?;

    debug!("Mirroring {} into {}", target.seed(), dir.display());
    let store = Arc::new(FsPageStore::new(dir));

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting mirror...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let mut crawler = Crawler::new(target, store, fetcher);
    if let Some(limit) = max_concurrency {
        crawler = crawler.with_max_concurrency(limit);
    }

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = processed_count.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("Mirroring... {} pages ({})", count, url));
        }));
    }

    if let Some(callback) = progress_callback {
        let pb_clone = progress_bar.clone();
        crawler = crawler.with_result_callback(Arc::new(move |result: CrawlResult| {
            if let Some(message) = failure_message(&result) {
                match pb_clone {
                    Some(ref pb) => pb.suspend(|| callback(message)),
                    None => callback(message),
                }
            }
        }));
    }

    let outcome = crawler.crawl().await;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Mirror complete! {} pages processed",
            outcome.stats.claimed
        ));
    }

    Ok(outcome)
}

fn failure_message(result: &CrawlResult) -> Option<String> {
    let error = result.error.as_ref()?;
    let what = match result.source {
        PageSource::Unavailable => "download",
        PageSource::Network | PageSource::Cache => "save",
    };
    Some(format!(
        "[!] Failed to {} {}: {}",
        what,
        display_path(&result.path),
        error
    ))
}
