//! Venue slot scraping.
//!
//! Layered leaf-first: [`classify`] maps one cell to an availability label,
//! [`table`] walks a court's booking table, [`navigator`] drives the booking
//! flow across courts, and [`orchestrator`] owns the browser session and
//! produces the final [`VenueResult`](crate::models::VenueResult).

pub mod adapter;
pub mod browser;
pub mod classify;
pub mod events;
pub mod html_table;
pub mod navigator;
pub mod orchestrator;
pub mod table;

pub use adapter::{
    AdapterError, AdapterResult, BookingTable, PageAdapter, SessionFactory, TableCell,
};
#[cfg(feature = "browser")]
pub use browser::{BrowserSession, HudleAdapter};
pub use browser::{BrowserEngineConfig, ChromeSessionFactory};
pub use classify::{classify, CellClassification};
pub use events::{EventSink, MemorySink, NavigationState, RowSkip, ScrapeEvent, TracingSink};
pub use html_table::HtmlTable;
pub use navigator::{placeholder_name, CourtNavigator, NavigationStage, ScrapeError};
pub use orchestrator::{scrape_venue_slots, scraper_for, VenueScraper};
pub use table::{extract_court, extract_slots};
