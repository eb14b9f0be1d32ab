// * Slow Path - Headless Browser Rendering
// * Uses ChromiumOxide to render marketplace search pages that need JavaScript.
// * One browser per session; sessions are never shared across analyses.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::constants::LISTING_SELECTOR;
use crate::config::FetchSettings;
use crate::engine::fetcher::{FetchSession, PageFetcher};
use crate::network::errors::FetchError;
use crate::network::identity::BrowserIdentity;

// * Stealth payload to mask WebDriver detection, installed before any page script runs
const STEALTH_PAYLOAD: &str = r#"
(() => {
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });

    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
        configurable: true
    });

    Object.defineProperty(navigator, 'hardwareConcurrency', {
        get: () => 4,
        configurable: true
    });
})();
"#;

/// Launches a dedicated headless browser per analysis
#[derive(Debug, Clone, Default)]
pub struct BrowserFetcher {
    identity: BrowserIdentity,
    settings: FetchSettings,
    chrome_executable: Option<PathBuf>,
}

impl BrowserFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity: BrowserIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Uses a specific Chrome/Chromium binary instead of auto-detection
    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.settings.navigation_timeout())
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        for arg in self.identity.launch_args() {
            builder = builder.arg(arg);
        }

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(FetchError::BrowserLaunch)
    }
}

impl PageFetcher for BrowserFetcher {
    type Session = BrowserSession;

    async fn open_session(&self) -> Result<BrowserSession, FetchError> {
        let config = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::BrowserLaunch(e.to_string()))?;

        // * The CDP handler must be polled for the browser to make progress
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler event error");
                }
            }
        });

        info!("Browser session opened");

        Ok(BrowserSession {
            browser: Some(browser),
            handler: Some(handle),
            settings: self.settings.clone(),
        })
    }
}

/// A live headless browser owned by one analysis
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<tokio::task::JoinHandle<()>>,
    settings: FetchSettings,
}

impl BrowserSession {
    async fn render(&self, browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        let result = self.render_on(&page, url).await;

        if let Err(e) = page.close().await {
            debug!(error = %e, "Page close failed");
        }

        result
    }

    async fn render_on(&self, page: &Page, url: &str) -> Result<String, FetchError> {
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_PAYLOAD))
            .await
            .map_err(|e| FetchError::Navigation(format!("stealth script: {}", e)))?;

        // * Navigate with timeout
        let nav_started = Instant::now();
        match tokio::time::timeout(self.settings.navigation_timeout(), page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(FetchError::Navigation(e.to_string())),
            Err(_) => return Err(FetchError::NavigationTimeout(self.settings.navigation_timeout_ms)),
        }
        debug!(url, elapsed_ms = nav_started.elapsed().as_millis() as u64, "Navigation complete");

        // * Wait for listing markup; search pages hydrate results after load
        let poll = self.settings.content_poll_interval();
        let wait_for_listings = async {
            while page.find_element(LISTING_SELECTOR).await.is_err() {
                tokio::time::sleep(poll).await;
            }
        };
        if tokio::time::timeout(self.settings.content_timeout(), wait_for_listings)
            .await
            .is_err()
        {
            return Err(FetchError::ContentTimeout(self.settings.content_timeout_ms));
        }

        page.content()
            .await
            .map_err(|e| FetchError::ContentExtraction(e.to_string()))
    }
}

impl FetchSession for BrowserSession {
    async fn fetch_html(&mut self, url: &str) -> Result<String, FetchError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| FetchError::BrowserLaunch("session already released".to_string()))?;

        self.render(browser, url).await
    }

    // * Closes the browser, killing it when it does not go quietly
    async fn release(mut self) {
        let outcome = match self.browser.take() {
            Some(mut browser) => shut_down(&mut browser, self.settings.navigation_timeout()).await,
            None => Teardown::Closed,
        };
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        info!(?outcome, "Browser session released");
    }
}

/// How a browser process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    Closed,
    Killed,
    TimedOut,
}

// * Process-level teardown steps of a browser
trait BrowserProcess {
    fn close_gracefully(&mut self) -> impl Future<Output = Result<(), String>>;
    fn reap(&mut self) -> impl Future<Output = Result<(), String>>;
    fn force_kill(&mut self) -> impl Future<Output = ()>;
}

impl BrowserProcess for Browser {
    async fn close_gracefully(&mut self) -> Result<(), String> {
        self.close().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn reap(&mut self) -> Result<(), String> {
        self.wait().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn force_kill(&mut self) {
        if let Some(Err(e)) = self.kill().await {
            warn!(error = %e, "Browser kill failed");
        }
    }
}

// ! A wedged browser can ignore close and never exit. Only reap after a clean
// ! close, and bound the whole teardown so release always returns.
async fn shut_down<P: BrowserProcess>(process: &mut P, budget: Duration) -> Teardown {
    let graceful = async {
        match process.close_gracefully().await {
            Ok(()) => {
                if let Err(e) = process.reap().await {
                    warn!(error = %e, "Browser process wait failed");
                }
                Teardown::Closed
            }
            Err(e) => {
                warn!(error = %e, "Browser close failed, killing process");
                process.force_kill().await;
                Teardown::Killed
            }
        }
    };
    let finished = tokio::time::timeout(budget, graceful).await;

    match finished {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(budget_ms = budget.as_millis() as u64, "Browser teardown timed out, killing process");
            process.force_kill().await;
            Teardown::TimedOut
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // * Best effort cleanup - can't await in drop; the browser child is killed on drop
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}
