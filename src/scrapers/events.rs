//! Structured scrape events.
//!
//! Each component reports stage transitions and skipped work to an injected
//! [`EventSink`] instead of writing status text, so behaviour can be asserted
//! on directly.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info, warn};

/// States of the venue navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    PageLoaded,
    ActivityOpened,
    CourtListed,
    CourtSelected,
    TableRendered,
    CourtResultReady,
    Done,
}

impl NavigationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLoaded => "page_loaded",
            Self::ActivityOpened => "activity_opened",
            Self::CourtListed => "court_listed",
            Self::CourtSelected => "court_selected",
            Self::TableRendered => "table_rendered",
            Self::CourtResultReady => "court_result_ready",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a table row produced no slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowSkip {
    /// Row has no cells.
    Empty,
    /// First cell is not an AM/PM time label.
    NotATimeRow { label: String },
    /// Reading the row failed.
    Failed { error: String },
}

/// One observable step of a scrape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScrapeEvent {
    SessionOpened,
    SessionOpenFailed {
        error: String,
    },
    Stage {
        state: NavigationState,
        court: Option<String>,
    },
    CourtsListed {
        listed: usize,
        selected: usize,
    },
    CourtNameFallback {
        index: usize,
        name: String,
        error: String,
    },
    CourtSkipped {
        index: usize,
        court: String,
        error: String,
    },
    ReturnFailed {
        court: String,
        error: String,
    },
    DatesFound {
        court: String,
        dates: Vec<String>,
    },
    RowSkipped {
        court: String,
        row: usize,
        reason: RowSkip,
    },
    DuplicateSlot {
        court: String,
        date: String,
        time: String,
    },
    CourtExtracted {
        court: String,
        total: usize,
        available: usize,
    },
    ScrapeFailed {
        error: String,
    },
    ScrapeFinished {
        courts: usize,
    },
    SessionClosed,
    SessionCloseFailed {
        error: String,
    },
}

/// Receiver for scrape events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::SessionOpened => info!("Browser session opened"),
            ScrapeEvent::SessionOpenFailed { error } => {
                warn!(%error, "Failed to open browser session")
            }
            ScrapeEvent::Stage { state, court } => match court {
                Some(court) => debug!(%state, %court, "Navigation stage"),
                None => info!(%state, "Navigation stage"),
            },
            ScrapeEvent::CourtsListed { listed, selected } => {
                info!(listed, selected, "Found courts")
            }
            ScrapeEvent::CourtNameFallback { index, name, error } => {
                debug!(index, %name, %error, "Court name not found, using placeholder")
            }
            ScrapeEvent::CourtSkipped {
                index,
                court,
                error,
            } => warn!(index, %court, %error, "Skipping court"),
            ScrapeEvent::ReturnFailed { court, error } => {
                warn!(%court, %error, "Failed to return to court list")
            }
            ScrapeEvent::DatesFound { court, dates } => {
                debug!(%court, ?dates, "Available dates")
            }
            ScrapeEvent::RowSkipped { court, row, reason } => match reason {
                RowSkip::Failed { error } => warn!(%court, row, %error, "Skipping row"),
                other => debug!(%court, row, reason = ?other, "Skipping row"),
            },
            ScrapeEvent::DuplicateSlot { court, date, time } => {
                debug!(%court, %date, %time, "Duplicate slot ignored")
            }
            ScrapeEvent::CourtExtracted {
                court,
                total,
                available,
            } => info!(
                %court,
                total,
                available,
                unavailable = total - available,
                "Extracted slots"
            ),
            ScrapeEvent::ScrapeFailed { error } => warn!(%error, "Venue scrape failed"),
            ScrapeEvent::ScrapeFinished { courts } => info!(courts, "Venue scrape finished"),
            ScrapeEvent::SessionClosed => debug!("Browser session closed"),
            ScrapeEvent::SessionCloseFailed { error } => {
                warn!(%error, "Failed to close browser session")
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far.
    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, predicate: impl Fn(&ScrapeEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: ScrapeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sends every event to two sinks.
pub struct Tee<'a> {
    first: &'a dyn EventSink,
    second: &'a dyn EventSink,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a dyn EventSink, second: &'a dyn EventSink) -> Self {
        Self { first, second }
    }
}

impl EventSink for Tee<'_> {
    fn emit(&self, event: ScrapeEvent) {
        self.first.emit(event.clone());
        self.second.emit(event);
    }
}
