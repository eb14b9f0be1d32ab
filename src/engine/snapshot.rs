// * Snapshot fetcher: serves a saved search results page from disk.
// * Lets an analysis run offline against a page captured earlier.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::engine::fetcher::{FetchSession, PageFetcher};
use crate::network::errors::FetchError;

#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    path: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageFetcher for SnapshotFetcher {
    type Session = SnapshotSession;

    async fn open_session(&self) -> Result<SnapshotSession, FetchError> {
        Ok(SnapshotSession {
            path: self.path.clone(),
        })
    }
}

#[derive(Debug)]
pub struct SnapshotSession {
    path: PathBuf,
}

impl FetchSession for SnapshotSession {
    // * The URL is ignored; the snapshot already is the rendered page
    async fn fetch_html(&mut self, url: &str) -> Result<String, FetchError> {
        debug!(url, path = %self.path.display(), "Serving snapshot");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Snapshot {
                path: self.path.clone(),
                source,
            })
    }

    async fn release(self) {}
}
