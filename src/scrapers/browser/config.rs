//! Browser launch configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Flags passed to every launched browser.
const BASE_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-plugins",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-gpu",
];

/// How the scraper gets a browser: launched locally or attached remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserEngineConfig {
    /// Run without a visible window. Set to false to watch a scrape.
    pub headless: bool,

    /// DevTools request timeout in seconds.
    pub timeout: u64,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    pub proxy: Option<String>,

    /// Extra Chrome arguments, appended after the built-in ones.
    pub chrome_args: Vec<String>,

    /// DevTools endpoint of an already running browser (e.g., "ws://localhost:9222").
    /// When set nothing is launched, and closing a session leaves that browser running.
    pub remote_url: Option<String>,

    /// Window size as (width, height). Booking tables collapse on narrow viewports.
    pub window_size: (u32, u32),

    /// Load images. Slot tables are text only, so this is off by default.
    pub load_images: bool,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: 30,
            proxy: None,
            chrome_args: Vec::new(),
            remote_url: None,
            window_size: (1920, 1080),
            load_images: false,
        }
    }
}

impl BrowserEngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn is_remote(&self) -> bool {
        self.remote_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Command-line flags for a launched browser.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|a| a.to_string()).collect();
        if !self.load_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if let Some(proxy) = &self.proxy {
            args.push(format!("--proxy-server={}", proxy));
        }
        args.extend(self.chrome_args.iter().cloned());
        args
    }
}
