//! Booking table extraction.
//!
//! Walks one court's rendered table row by row, pairs each cell with its date
//! column and time row, and turns classified cells into [`SlotRecord`]s.

use std::collections::HashSet;

use chrono::Utc;

use super::adapter::BookingTable;
use super::classify::classify;
use super::events::{EventSink, RowSkip, ScrapeEvent};
use crate::models::{CourtResult, SlotRecord};

/// Whether a header text is a day-of-month label ("1" through "31").
pub fn is_date_label(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.len() <= 2 && text.chars().all(|c| c.is_ascii_digit())
}

/// Whether a row label looks like a time slot.
pub fn is_time_label(text: &str) -> bool {
    !text.is_empty() && (text.contains("AM") || text.contains("PM"))
}

/// Extract every slot from a court's table.
///
/// Rows that cannot be read are reported to `sink` and skipped; they never
/// abort the table.
pub fn extract_slots(
    table: &dyn BookingTable,
    venue_name: &str,
    court_name: &str,
    sink: &dyn EventSink,
) -> Vec<SlotRecord> {
    let dates: Vec<String> = table
        .date_labels()
        .iter()
        .map(|d| d.trim())
        .filter(|d| is_date_label(d))
        .map(str::to_string)
        .collect();

    sink.emit(ScrapeEvent::DatesFound {
        court: court_name.to_string(),
        dates: dates.clone(),
    });

    let mut slots = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    // Row 0 is the header
    for row_index in 1..table.row_count() {
        let cells = match table.read_row(row_index) {
            Ok(cells) => cells,
            Err(e) => {
                sink.emit(ScrapeEvent::RowSkipped {
                    court: court_name.to_string(),
                    row: row_index,
                    reason: RowSkip::Failed {
                        error: e.to_string(),
                    },
                });
                continue;
            }
        };

        let Some((time_cell, data_cells)) = cells.split_first() else {
            sink.emit(ScrapeEvent::RowSkipped {
                court: court_name.to_string(),
                row: row_index,
                reason: RowSkip::Empty,
            });
            continue;
        };

        let time = time_cell.text.trim();
        if !is_time_label(time) {
            sink.emit(ScrapeEvent::RowSkipped {
                court: court_name.to_string(),
                row: row_index,
                reason: RowSkip::NotATimeRow {
                    label: time.to_string(),
                },
            });
            continue;
        }

        for (cell, date) in data_cells.iter().zip(dates.iter()) {
            let text = cell.text.trim();
            if text.is_empty() || text == "-" {
                continue;
            }

            let classification = classify(text, &cell.classes, &cell.style);
            if !classification.is_meaningful() {
                continue;
            }

            if !seen.insert((date.clone(), time.to_string())) {
                sink.emit(ScrapeEvent::DuplicateSlot {
                    court: court_name.to_string(),
                    date: date.clone(),
                    time: time.to_string(),
                });
                continue;
            }

            slots.push(SlotRecord {
                venue: venue_name.to_string(),
                court: court_name.to_string(),
                date: date.clone(),
                time: time.to_string(),
                price: classification.price,
                availability: classification.label,
                is_available: classification.is_available,
                raw_data: text.to_string(),
                cell_classes: cell.classes.clone(),
                cell_style: cell.style.clone(),
                scraped_at: Utc::now(),
            });
        }
    }

    slots
}

/// Extract a court's table and freeze it into a [`CourtResult`].
pub fn extract_court(
    table: &dyn BookingTable,
    venue_name: &str,
    court_name: &str,
    sink: &dyn EventSink,
) -> CourtResult {
    let slots = extract_slots(table, venue_name, court_name, sink);
    let court = CourtResult::new(court_name, slots);

    sink.emit(ScrapeEvent::CourtExtracted {
        court: court_name.to_string(),
        total: court.total_slots(),
        available: court.available_slots(),
    });

    court
}
