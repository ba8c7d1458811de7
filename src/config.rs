//! Configuration management for courtslots.
//!
//! Settings are read from a TOML file. Every field has a default, so an empty
//! or missing file yields a working configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scrapers::BrowserEngineConfig;

/// Hard cap on courts scraped per venue.
pub const MAX_COURTS: usize = 3;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "courtslots.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COURTSLOTS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub browser: BrowserEngineConfig,
    pub navigation: NavigationSettings,
    pub selectors: SiteSelectors,
}

/// Wait bounds and limits for venue navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Seconds to wait for the booking control and the court list.
    pub element_timeout_secs: u64,
    /// Seconds to wait for a court's table to render.
    pub render_timeout_secs: u64,
    /// Seconds to wait for the court list after navigating back.
    pub return_timeout_secs: u64,
    /// Milliseconds between render checks.
    pub poll_interval_ms: u64,
    /// Courts to scrape per venue; values above [`MAX_COURTS`] are clamped.
    pub max_courts: usize,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            element_timeout_secs: 10,
            render_timeout_secs: 5,
            return_timeout_secs: 5,
            poll_interval_ms: 250,
            max_courts: MAX_COURTS,
        }
    }
}

impl NavigationSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn return_timeout(&self) -> Duration {
        Duration::from_secs(self.return_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn court_limit(&self) -> usize {
        self.max_courts.min(MAX_COURTS)
    }
}

/// Markup hooks for the booking site.
///
/// Class values are substrings matched against an element's `class`
/// attribute, since the site's class names carry build hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Class fragment of the venue page's booking button.
    pub activity_button_class: String,
    /// Class fragment of each court's booking button.
    pub court_button_class: String,
    /// Text shown on both booking buttons.
    pub button_text: String,
    /// Class fragment of the card wrapping a court button.
    pub court_card_class: String,
    /// Selector for the court name inside its card.
    pub court_name_selector: String,
    /// Selector for the slot table.
    pub table_selector: String,
    /// Selector for day-of-month header elements inside the table.
    pub date_selector: String,
    /// Selector shown when a venue has no bookable courts.
    pub empty_courts_selector: Option<String>,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            activity_button_class: "style_btnBook__vzqXl".to_string(),
            court_button_class: "style_btnBook__M3MFK".to_string(),
            button_text: "Book".to_string(),
            court_card_class: "court-card".to_string(),
            court_name_selector: "h3".to_string(),
            table_selector: ".style_table__gYUfm".to_string(),
            date_selector: ".style_date__vVFsu".to_string(),
            empty_courts_selector: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load settings from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from an explicit path or the first discovered file.
    ///
    /// Falls back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match discover_config() {
                Some(path) => {
                    debug!("Loading config from {}", path.display());
                    Self::load_file(&path)
                }
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Find a config file: `$COURTSLOTS_CONFIG`, then `./courtslots.toml`, then the
/// user config directory.
pub fn discover_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("courtslots").join("config.toml"))
        .filter(|path| path.exists())
}
