use std::path::PathBuf;
use thiserror::Error;

// * Unified Error type for the page fetch step.
// * Every variant aborts the whole analysis; none is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Page navigation failed: {0}")]
    Navigation(String),

    #[error("Page navigation timed out after {0}ms")]
    NavigationTimeout(u64),

    #[error("Listing content did not appear within {0}ms")]
    ContentTimeout(u64),

    #[error("Content extraction failed: {0}")]
    ContentExtraction(String),

    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid marketplace URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    // * True for the two bounded-wait failures
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::NavigationTimeout(_) | FetchError::ContentTimeout(_))
    }
}
