//! courtslots - court availability scraping for venue booking pages.
//!
//! Drives a browser through a venue's booking flow, reads each court's slot
//! table and reports every slot with its price and availability.

pub mod config;
pub mod models;
pub mod scrapers;

pub use config::Settings;
pub use models::{CourtResult, ScrapeStatus, SlotRecord, VenueResult};
pub use scrapers::{scrape_venue_slots, VenueScraper};
