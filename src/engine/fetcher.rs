// * Page fetcher seam
// * The core only consumes rendered HTML; how it was produced is up to the implementation.

use std::future::Future;

use crate::network::errors::FetchError;

/// Produces one isolated fetch session per analysis
pub trait PageFetcher {
    type Session: FetchSession;

    /// Acquires a fresh session. Sessions are never shared between analyses.
    fn open_session(&self) -> impl Future<Output = Result<Self::Session, FetchError>>;
}

/// A live fetch session. Callers must `release` it on every exit path.
pub trait FetchSession {
    /// Returns fully rendered HTML of the search results page at `url`
    fn fetch_html(&mut self, url: &str) -> impl Future<Output = Result<String, FetchError>>;

    /// Tears down the session's resources
    fn release(self) -> impl Future<Output = ()>;
}
