//! Venue scrape entry point.
//!
//! Owns the browser session for the length of one scrape and turns every
//! outcome into a [`VenueResult`]; nothing is raised to the caller.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::adapter::SessionFactory;
use super::events::{EventSink, ScrapeEvent, TracingSink};
use super::navigator::{CourtNavigator, ScrapeError};
use crate::config::{NavigationSettings, Settings};
use crate::models::VenueResult;

/// Scrapes venues, one exclusive browser session per call.
pub struct VenueScraper {
    sessions: Arc<dyn SessionFactory>,
    navigation: NavigationSettings,
    sink: Arc<dyn EventSink>,
}

impl VenueScraper {
    pub fn new(sessions: Arc<dyn SessionFactory>, navigation: NavigationSettings) -> Self {
        Self {
            sessions,
            navigation,
            sink: Arc::new(TracingSink),
        }
    }

    /// Send events to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Scrape a venue's courts.
    ///
    /// The session is closed before returning whenever it was opened.
    pub async fn scrape(&self, venue_url: &str, venue_name: &str) -> VenueResult {
        let sink = self.sink.as_ref();

        let mut session = match self.sessions.open().await {
            Ok(session) => session,
            Err(e) => {
                sink.emit(ScrapeEvent::SessionOpenFailed {
                    error: e.to_string(),
                });
                let error = ScrapeError::Session(e);
                sink.emit(ScrapeEvent::ScrapeFailed {
                    error: error.to_string(),
                });
                return VenueResult::error(venue_name, venue_url, error.to_string());
            }
        };
        sink.emit(ScrapeEvent::SessionOpened);

        let outcome = AssertUnwindSafe(
            CourtNavigator::new(session.as_mut(), &self.navigation, sink)
                .run(venue_url, venue_name),
        )
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ScrapeError::Panicked(panic_message(panic.as_ref()))));

        match session.close().await {
            Ok(()) => sink.emit(ScrapeEvent::SessionClosed),
            Err(e) => sink.emit(ScrapeEvent::SessionCloseFailed {
                error: e.to_string(),
            }),
        }

        match outcome {
            Ok(courts) => {
                sink.emit(ScrapeEvent::ScrapeFinished {
                    courts: courts.len(),
                });
                VenueResult::success(venue_name, venue_url, courts)
            }
            Err(e) => {
                sink.emit(ScrapeEvent::ScrapeFailed {
                    error: e.to_string(),
                });
                VenueResult::error(venue_name, venue_url, e.to_string())
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Scrape a venue with settings from the discovered config file (or defaults),
/// a launched Chrome session and `tracing` events.
pub async fn scrape_venue_slots(venue_url: &str, venue_name: &str) -> VenueResult {
    let settings = match Settings::load(None) {
        Ok(settings) => settings,
        Err(e) => return VenueResult::error(venue_name, venue_url, e.to_string()),
    };
    scraper_for(&settings).scrape(venue_url, venue_name).await
}

/// Build a scraper backed by Chrome from `settings`.
pub fn scraper_for(settings: &Settings) -> VenueScraper {
    let sessions = super::ChromeSessionFactory::new(
        settings.browser.clone(),
        settings.selectors.clone(),
        settings.navigation.poll_interval(),
    );
    VenueScraper::new(Arc::new(sessions), settings.navigation.clone())
}
