//! Page adapter boundary.
//!
//! Everything that knows about a booking site's markup sits behind
//! [`PageAdapter`] and [`BookingTable`]. Navigation, extraction and
//! classification only talk to these traits, so they can be retargeted to
//! another site or driven by fakes in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a page adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("element not found: {0}")]
    NotFound(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("row {row} unreadable: {reason}")]
    Row { row: usize, reason: String },

    #[error("{0}")]
    Unsupported(String),
}

impl AdapterError {
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout,
        }
    }

    pub fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Text and visual attributes of one rendered table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub classes: String,
    pub style: String,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = classes.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// A rendered booking table for one court.
pub trait BookingTable: Send {
    /// Texts of the date header elements, in column order, unfiltered.
    fn date_labels(&self) -> Vec<String>;

    /// Number of rows, including the header row at index 0.
    fn row_count(&self) -> usize;

    /// Cells of one row, time cell first.
    fn read_row(&self, index: usize) -> AdapterResult<Vec<TableCell>>;
}

/// Site-specific navigation over one open browser session.
///
/// Courts are addressed by their position in the court list so that handles
/// never go stale across page transitions.
#[async_trait]
pub trait PageAdapter: Send {
    /// Load the venue page.
    async fn open_venue(&mut self, url: &str) -> AdapterResult<()>;

    /// Wait for the booking activation control to become clickable and click it.
    async fn activate_booking(&mut self, timeout: Duration) -> AdapterResult<()>;

    /// Wait for the court list to render and return the number of courts.
    ///
    /// `Ok(0)` only when the page positively shows an empty list; a list that
    /// never renders within `timeout` is a timeout error.
    async fn list_courts(&mut self, timeout: Duration) -> AdapterResult<usize>;

    /// Human-readable name of the court at `index`.
    async fn court_name(&mut self, index: usize) -> AdapterResult<String>;

    /// Click the booking control of the court at `index`.
    async fn select_court(&mut self, index: usize) -> AdapterResult<()>;

    /// Wait until the selected court's table has rendered and snapshot it.
    async fn wait_for_table(&mut self, timeout: Duration)
        -> AdapterResult<Box<dyn BookingTable>>;

    /// Navigate back to the court list and wait for it to render again.
    async fn return_to_courts(&mut self, timeout: Duration) -> AdapterResult<()>;

    /// Release the underlying browser session.
    async fn close(&mut self) -> AdapterResult<()>;
}

/// Opens one exclusive browser session per scrape.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> AdapterResult<Box<dyn PageAdapter>>;
}
