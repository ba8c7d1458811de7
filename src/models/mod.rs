//! Data models for scraped venue availability.

mod slot;
mod venue;

pub use slot::{CourtResult, SlotRecord};
pub use venue::{ScrapeStatus, VenueFailure, VenueReport, VenueResult};
