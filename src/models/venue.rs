//! Venue-level scrape result.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CourtResult;

/// Outcome status of a venue scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Success,
    Error,
}

impl ScrapeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Courts scraped from a venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueReport {
    pub venue_name: String,
    pub venue_url: String,
    pub total_courts: usize,
    pub courts: Vec<CourtResult>,
    pub scraped_at: DateTime<Utc>,
}

/// A scrape that could not complete. Carries no court data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueFailure {
    pub error: String,
    pub venue_name: String,
    pub venue_url: String,
}

/// Result document returned to callers of a venue scrape.
///
/// Serializes with a `status` tag of `"success"` or `"error"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VenueResult {
    Success(VenueReport),
    Error(VenueFailure),
}

impl VenueResult {
    pub fn success(
        venue_name: impl Into<String>,
        venue_url: impl Into<String>,
        courts: Vec<CourtResult>,
    ) -> Self {
        Self::Success(VenueReport {
            venue_name: venue_name.into(),
            venue_url: venue_url.into(),
            total_courts: courts.len(),
            courts,
            scraped_at: Utc::now(),
        })
    }

    pub fn error(
        venue_name: impl Into<String>,
        venue_url: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::Error(VenueFailure {
            error: error.into(),
            venue_name: venue_name.into(),
            venue_url: venue_url.into(),
        })
    }

    pub fn status(&self) -> ScrapeStatus {
        match self {
            Self::Success(_) => ScrapeStatus::Success,
            Self::Error(_) => ScrapeStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn venue_name(&self) -> &str {
        match self {
            Self::Success(r) => &r.venue_name,
            Self::Error(f) => &f.venue_name,
        }
    }

    pub fn venue_url(&self) -> &str {
        match self {
            Self::Success(r) => &r.venue_url,
            Self::Error(f) => &f.venue_url,
        }
    }

    /// Scraped courts; always empty for an error result.
    pub fn courts(&self) -> &[CourtResult] {
        match self {
            Self::Success(r) => &r.courts,
            Self::Error(_) => &[],
        }
    }

    pub fn total_courts(&self) -> usize {
        match self {
            Self::Success(r) => r.total_courts,
            Self::Error(_) => 0,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error(f) => Some(&f.error),
        }
    }
}
