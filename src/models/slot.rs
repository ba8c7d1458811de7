//! Slot and per-court result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (date, time) booking opportunity for one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub venue: String,
    pub court: String,
    /// Day-of-month label taken from the table header.
    pub date: String,
    /// Time label from the row's first cell (e.g. "6:00 AM").
    pub time: String,
    pub price: Option<String>,
    /// Human-readable availability label.
    pub availability: String,
    pub is_available: bool,
    /// Cell text as rendered.
    pub raw_data: String,
    pub cell_classes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cell_style: String,
    pub scraped_at: DateTime<Utc>,
}

/// All slots scraped from one court's booking table.
///
/// Counts are derived from the slot list at construction and the list cannot
/// be modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourtResult {
    court_name: String,
    total_slots: usize,
    available_slots: usize,
    slots: Vec<SlotRecord>,
    scraped_at: DateTime<Utc>,
}

impl CourtResult {
    /// Freeze a court's slot list into a result, stamped with the current time.
    pub fn new(court_name: impl Into<String>, slots: Vec<SlotRecord>) -> Self {
        Self::at(court_name, slots, Utc::now())
    }

    /// Same as [`CourtResult::new`] with an explicit timestamp.
    pub fn at(
        court_name: impl Into<String>,
        slots: Vec<SlotRecord>,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        let available_slots = slots.iter().filter(|s| s.is_available).count();
        Self {
            court_name: court_name.into(),
            total_slots: slots.len(),
            available_slots,
            slots,
            scraped_at,
        }
    }

    pub fn court_name(&self) -> &str {
        &self.court_name
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn available_slots(&self) -> usize {
        self.available_slots
    }

    pub fn unavailable_slots(&self) -> usize {
        self.total_slots - self.available_slots
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }
}
