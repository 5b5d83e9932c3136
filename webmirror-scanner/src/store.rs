use crate::error::{Result, ScanError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Blob store for downloaded pages, keyed by normalized URL path.
///
/// Doubles as the crawl cache: a page that loads successfully is not
/// downloaded again.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Where the page for `url_path` lives.
    fn location(&self, url_path: &str) -> PathBuf;

    /// `Ok(None)` when nothing has been saved for `url_path` yet.
    async fn load(&self, url_path: &str) -> Result<Option<Vec<u8>>>;

    /// Write `body`, creating parent directories and overwriting silently.
    async fn save(&self, url_path: &str, body: &[u8]) -> Result<PathBuf>;
}

/// Mirror directory tree: `<root><url_path>/<basename>.html`.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PageStore for FsPageStore {
    fn location(&self, url_path: &str) -> PathBuf {
        // `.` and `..` would escape the mirror root
        let segments: Vec<&str> = url_path
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();

        let mut location = self.root.clone();
        for segment in &segments {
            location.push(segment);
        }

        let basename = segments.last().copied().unwrap_or("index");
        location.push(format!("{}.html", basename));
        location
    }

    async fn load(&self, url_path: &str) -> Result<Option<Vec<u8>>> {
        let location = self.location(url_path);
        match tokio::fs::read(&location).await {
            Ok(body) => {
                debug!("{} already exists", location.display());
                Ok(Some(body))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist", location.display());
                Ok(None)
            }
            Err(e) => Err(ScanError::Io(e)),
        }
    }

    async fn save(&self, url_path: &str, body: &[u8]) -> Result<PathBuf> {
        let location = self.location(url_path);

        if let Some(parent) = location.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ScanError::Store {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&location, body)
            .await
            .map_err(|source| ScanError::Store {
                path: location.clone(),
                source,
            })?;

        debug!("Saved {} ({} bytes)", location.display(), body.len());
        Ok(location)
    }
}
