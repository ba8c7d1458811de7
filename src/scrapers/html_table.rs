//! Booking tables parsed from rendered HTML.
//!
//! The browser adapter snapshots a table's `outerHTML` once it has rendered;
//! this module turns that snapshot into an owned [`BookingTable`].

use scraper::{ElementRef, Html, Selector};

use super::adapter::{AdapterError, AdapterResult, BookingTable, TableCell};

/// A parsed booking table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    date_labels: Vec<String>,
    rows: Vec<Vec<TableCell>>,
}

impl HtmlTable {
    /// Parse a table fragment.
    ///
    /// Date labels are read from elements matching `date_selector`; when none
    /// match, the header row's cells are used instead.
    pub fn parse(html: &str, date_selector: &str) -> AdapterResult<Self> {
        let fragment = Html::parse_fragment(html);

        let date_sel = parse_selector(date_selector)?;
        let row_sel = parse_selector("tr")?;
        let data_sel = parse_selector("td")?;
        let cell_sel = parse_selector("td, th")?;

        let rows: Vec<Vec<TableCell>> = fragment
            .select(&row_sel)
            .map(|row| row.select(&data_sel).map(cell_snapshot).collect())
            .collect();

        let mut date_labels: Vec<String> =
            fragment.select(&date_sel).map(visible_text).collect();
        if date_labels.is_empty() {
            if let Some(header) = fragment.select(&row_sel).next() {
                date_labels = header.select(&cell_sel).map(visible_text).collect();
            }
        }

        Ok(Self { date_labels, rows })
    }
}

impl BookingTable for HtmlTable {
    fn date_labels(&self) -> Vec<String> {
        self.date_labels.clone()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn read_row(&self, index: usize) -> AdapterResult<Vec<TableCell>> {
        self.rows.get(index).cloned().ok_or_else(|| AdapterError::Row {
            row: index,
            reason: "no such row".to_string(),
        })
    }
}

fn parse_selector(selector: &str) -> AdapterResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| AdapterError::NotFound(format!("invalid selector '{}': {}", selector, e)))
}

fn cell_snapshot(cell: ElementRef<'_>) -> TableCell {
    TableCell {
        text: visible_text(cell),
        classes: cell.value().attr("class").unwrap_or_default().to_string(),
        style: cell.value().attr("style").unwrap_or_default().to_string(),
    }
}

/// Element text with whitespace runs collapsed, approximating rendered text.
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
