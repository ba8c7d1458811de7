//! Chrome browser sessions.
//!
//! Uses chromiumoxide (CDP) to launch a local Chrome/Chromium or attach to a
//! remote DevTools endpoint, and exposes one page per session.

mod config;
#[cfg(feature = "browser")]
mod hudle;
#[cfg(feature = "browser")]
mod probes;

pub use config::BrowserEngineConfig;
#[cfg(feature = "browser")]
pub use hudle::HudleAdapter;

use std::time::Duration;

use async_trait::async_trait;

use super::adapter::{AdapterError, AdapterResult, PageAdapter, SessionFactory};
use crate::config::SiteSelectors;

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, info};

/// One browser process (or remote connection) with a single working page.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    launched: bool,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Launch a browser, or connect to `remote_url` when configured.
    pub async fn open(config: &BrowserEngineConfig) -> AdapterResult<Self> {
        let (browser, handler, launched) = match config.remote_url.as_deref() {
            Some(remote_url) if config.is_remote() => {
                let (browser, handler) =
                    Self::connect_remote(remote_url, config.request_timeout()).await?;
                (browser, handler, false)
            }
            _ => {
                let (browser, handler) = Self::launch(config).await?;
                (browser, handler, true)
            }
        };

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(AdapterError::browser)?;

        Ok(Self {
            browser,
            page,
            handler,
            launched,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Find Chrome executable.
    fn find_chrome() -> AdapterResult<std::path::PathBuf> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in [
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(path) = which::which(cmd) {
                debug!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(AdapterError::Browser(
            "Chrome/Chromium not found. Please install it:\n\
             - Arch/Manjaro: sudo pacman -S chromium\n\
             - Ubuntu/Debian: sudo apt install chromium-browser\n\
             - Fedora: sudo dnf install chromium\n\
             - Or download from: https://www.google.com/chrome/"
                .to_string(),
        ))
    }

    async fn launch(config: &BrowserEngineConfig) -> AdapterResult<(Browser, JoinHandle<()>)> {
        info!("Launching browser (headless={})", config.headless);

        let chrome_path = Self::find_chrome()?;
        let (width, height) = config.window_size;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(config.request_timeout())
            .window_size(width, height);

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        for arg in config.launch_args() {
            builder = builder.arg(arg);
        }

        let browser_config = builder.build().map_err(|e| {
            AdapterError::Browser(format!("Failed to build browser config: {}", e))
        })?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| AdapterError::Browser(format!("Failed to launch browser: {}", e)))?;

        Ok((browser, spawn_handler(handler)))
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(
        url: &str,
        timeout: Duration,
    ) -> AdapterResult<(Browser, JoinHandle<()>)> {
        info!("Connecting to remote browser at {} (timeout: {:?})", url, timeout);

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdapterError::browser)?;
        let resp: serde_json::Value = client
            .get(&version_url)
            .send()
            .await
            .map_err(|e| AdapterError::Browser(format!("Failed to reach remote browser: {}", e)))?
            .json()
            .await
            .map_err(|e| AdapterError::Browser(format!("Invalid browser version info: {}", e)))?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AdapterError::Browser("No webSocketDebuggerUrl in response".into()))?;

        debug!("Connecting to WebSocket: {}", ws_url);

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: timeout,
            ..Default::default()
        };

        let (browser, handler) = Browser::connect_with_config(ws_url, handler_config)
            .await
            .map_err(|e| {
                AdapterError::Browser(format!("Failed to connect to remote browser: {}", e))
            })?;

        Ok((browser, spawn_handler(handler)))
    }

    /// Close the page and, for launched browsers, the browser process.
    pub async fn close(mut self) -> AdapterResult<()> {
        let mut result = self.page.close().await.map_err(AdapterError::browser);

        if self.launched {
            if let Err(e) = self.browser.close().await {
                result = result.and(Err(AdapterError::browser(e)));
            }
            let _ = self.browser.wait().await;
        }

        self.handler.abort();
        result
    }
}

/// Drive the CDP connection until it ends.
#[cfg(feature = "browser")]
fn spawn_handler(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    })
}

/// Opens a Chrome session per scrape, wrapped in the Hudle page adapter.
pub struct ChromeSessionFactory {
    config: BrowserEngineConfig,
    selectors: SiteSelectors,
    poll_interval: Duration,
}

impl ChromeSessionFactory {
    pub fn new(
        config: BrowserEngineConfig,
        selectors: SiteSelectors,
        poll_interval: Duration,
    ) -> Self {
        Self {
            config,
            selectors,
            poll_interval,
        }
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> AdapterResult<Box<dyn PageAdapter>> {
        let session = BrowserSession::open(&self.config).await?;
        Ok(Box::new(HudleAdapter::new(
            session,
            self.selectors.clone(),
            self.poll_interval,
        )))
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> AdapterResult<Box<dyn PageAdapter>> {
        let _ = (&self.config, &self.selectors, self.poll_interval);
        Err(AdapterError::Unsupported(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }
}
