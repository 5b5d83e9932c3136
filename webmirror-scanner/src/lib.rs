pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod gate;
pub mod normalize;
pub mod result;
pub mod store;
pub mod visited;

pub use crawler::{CrawlOutcome, Crawler, ProgressCallback, ResultCallback};
pub use error::{Result, ScanError};
pub use fetcher::Fetcher;
pub use normalize::{CrawlTarget, NormalizedUrl, in_scope, normalize_href};
pub use result::{CrawlResult, CrawlStats, PageSource};
pub use store::{FsPageStore, PageStore};
pub use visited::VisitedSet;
