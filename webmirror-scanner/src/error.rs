use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// True for the fetch class of errors (transport failure or non-2xx status).
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ScanError::Http(_) | ScanError::Status { .. })
    }

    /// True for the store class of errors (directory creation or write failure).
    pub fn is_store_error(&self) -> bool {
        matches!(self, ScanError::Io(_) | ScanError::Store { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
