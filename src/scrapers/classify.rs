//! Cell availability classification.
//!
//! Maps one booking-table cell's text and visual attributes to a price and an
//! availability label. Rules are checked in order and the first match wins:
//! styling (disabled classes, low opacity) is more authoritative than text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Currency marker preceding a slot price.
pub const CURRENCY_MARKER: char = '₹';

/// Class-name fragments marking a cell as disabled.
const DISABLED_CLASS_KEYWORDS: &[&str] = &[
    "disabled",
    "unavailable",
    "booked",
    "inactive",
    "grey",
    "gray",
];

/// Text fragments marking a slot as taken.
const UNAVAILABLE_TEXT_KEYWORDS: &[&str] = &["booked", "unavailable", "closed", "full", "sold out"];

/// Cells rendered below this opacity are grayed out.
const OPACITY_THRESHOLD: f64 = 0.5;

pub const LABEL_DISABLED: &str = "Unavailable (Disabled)";
pub const LABEL_GRAYED_OUT: &str = "Unavailable (Grayed Out)";
pub const LABEL_FULLY_BOOKED: &str = "Fully Booked";
pub const LABEL_AVAILABLE: &str = "Available";
pub const LABEL_BOOKED: &str = "Booked";
pub const LABEL_NOT_AVAILABLE: &str = "Not Available";

static OPACITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[;\s])opacity\s*:\s*([^;]*)").unwrap());

static ZERO_LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^0-9])0\s*left").unwrap());

static N_LEFT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\d+\s*left").unwrap());

/// Classification of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellClassification {
    pub price: Option<String>,
    pub label: String,
    pub is_available: bool,
}

impl CellClassification {
    fn unavailable(label: impl Into<String>) -> Self {
        Self {
            price: None,
            label: label.into(),
            is_available: false,
        }
    }

    /// Whether this classification carries anything worth recording.
    pub fn is_meaningful(&self) -> bool {
        self.price.is_some() || !self.label.is_empty()
    }
}

/// Classify a cell from its text, `class` attribute and `style` attribute.
pub fn classify(cell_text: &str, cell_classes: &str, cell_style: &str) -> CellClassification {
    let classes = cell_classes.to_lowercase();
    if DISABLED_CLASS_KEYWORDS.iter().any(|k| classes.contains(k)) {
        return CellClassification::unavailable(LABEL_DISABLED);
    }

    if parse_opacity(cell_style).is_some_and(|o| o < OPACITY_THRESHOLD) {
        return CellClassification::unavailable(LABEL_GRAYED_OUT);
    }

    let lower = cell_text.to_lowercase();

    if let Some((before, after)) = cell_text.split_once(CURRENCY_MARKER) {
        let price = parse_price(after);

        if !lower.contains("left") {
            return CellClassification {
                price,
                label: LABEL_AVAILABLE.to_string(),
                is_available: true,
            };
        }

        if ZERO_LEFT_RE.is_match(cell_text) {
            return CellClassification {
                price,
                label: LABEL_FULLY_BOOKED.to_string(),
                is_available: false,
            };
        }

        let mut label = before.trim().to_string();
        if label.is_empty() {
            if let Some(m) = N_LEFT_RE.find(cell_text) {
                label = m.as_str().to_string();
            }
        }
        return CellClassification {
            price,
            label,
            is_available: true,
        };
    }

    if UNAVAILABLE_TEXT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return CellClassification::unavailable(LABEL_BOOKED);
    }

    let trimmed = cell_text.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "N/A" {
        return CellClassification::unavailable(LABEL_NOT_AVAILABLE);
    }

    CellClassification::unavailable(format!("Unknown ({})", cell_text))
}

/// Extract an `opacity` declaration from an inline style.
///
/// Returns `None` for missing or non-numeric values (e.g. percentages).
pub fn parse_opacity(style: &str) -> Option<f64> {
    let caps = OPACITY_RE.captures(style)?;
    caps.get(1)?.as_str().trim().parse::<f64>().ok()
}

/// Numeric price token immediately following the currency marker.
fn parse_price(after_marker: &str) -> Option<String> {
    let token: String = after_marker
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let token = token.trim_end_matches([',', '.']);
    if token.is_empty() {
        None
    } else {
        Some(format!("{}{}", CURRENCY_MARKER, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_class_wins_over_price() {
        let c = classify("₹500", "slot Slot_Disabled", "");
        assert!(!c.is_available);
        assert_eq!(c.label, LABEL_DISABLED);
        assert_eq!(c.price, None);

        let c = classify("₹500, 3 left", "cell grey", "");
        assert_eq!(c.label, LABEL_DISABLED);
    }

    #[test]
    fn test_low_opacity_wins_over_price() {
        let c = classify("₹500", "", "color: red; opacity: 0.3;");
        assert!(!c.is_available);
        assert_eq!(c.label, LABEL_GRAYED_OUT);
    }

    #[test]
    fn test_opacity_fall_through() {
        let c = classify("₹500", "", "opacity: 0.5");
        assert!(c.is_available);
        assert_eq!(c.label, LABEL_AVAILABLE);

        let c = classify("₹500", "", "opacity: half");
        assert!(c.is_available);

        let c = classify("₹500", "", "opacity:");
        assert!(c.is_available);
    }

    #[test]
    fn test_parse_opacity() {
        assert_eq!(parse_opacity("opacity: 0.4"), Some(0.4));
        assert_eq!(parse_opacity("width: 10px;OPACITY:1"), Some(1.0));
        assert_eq!(parse_opacity("opacity: 40%"), None);
        assert_eq!(parse_opacity("filter: opacity(0.2)"), None);
        assert_eq!(parse_opacity(""), None);
    }

    #[test]
    fn test_zero_left_is_fully_booked() {
        let c = classify("₹500, 0 left", "", "");
        assert!(!c.is_available);
        assert_eq!(c.label, LABEL_FULLY_BOOKED);
        assert_eq!(c.price.as_deref(), Some("₹500"));
    }

    #[test]
    fn test_ten_left_is_not_zero_left() {
        let c = classify("10 left ₹500", "", "");
        assert!(c.is_available);
        assert_eq!(c.label, "10 left");
    }

    #[test]
    fn test_n_left_uses_leading_fragment() {
        let c = classify("3 left ₹500", "", "");
        assert!(c.is_available);
        assert_eq!(c.label, "3 left");
        assert_eq!(c.price.as_deref(), Some("₹500"));

        // Leading fragment kept verbatim apart from trimming
        let c = classify("  2 left, ₹1,200", "", "");
        assert_eq!(c.label, "2 left,");
        assert_eq!(c.price.as_deref(), Some("₹1,200"));
    }

    #[test]
    fn test_n_left_after_price() {
        let c = classify("₹500, 3 left", "", "");
        assert!(c.is_available);
        assert!(c.label.contains("3 left"));
        assert_eq!(c.price.as_deref(), Some("₹500"));
    }

    #[test]
    fn test_price_alone_is_available() {
        let c = classify("₹500", "", "");
        assert!(c.is_available);
        assert_eq!(c.label, LABEL_AVAILABLE);
        assert_eq!(c.price.as_deref(), Some("₹500"));

        let c = classify("₹ 750.50", "", "");
        assert_eq!(c.price.as_deref(), Some("₹750.50"));
    }

    #[test]
    fn test_marker_without_number() {
        let c = classify("₹", "", "");
        assert!(c.is_available);
        assert_eq!(c.price, None);
        assert!(c.is_meaningful());
    }

    #[test]
    fn test_unavailable_keywords() {
        for text in ["Sold Out", "BOOKED", "Closed today", "Full"] {
            let c = classify(text, "", "");
            assert!(!c.is_available, "{}", text);
            assert_eq!(c.label, LABEL_BOOKED, "{}", text);
        }
    }

    #[test]
    fn test_placeholders() {
        for text in ["", "-", "N/A", "  "] {
            let c = classify(text, "", "");
            assert!(!c.is_available);
            assert_eq!(c.label, LABEL_NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_unknown_text_is_conservative() {
        let c = classify("xyz", "", "");
        assert!(!c.is_available);
        assert_eq!(c.label, "Unknown (xyz)");
        assert_eq!(c.price, None);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let inputs = [
            ("₹500, 3 left", "", ""),
            ("xyz", "cell", "opacity: 0.9"),
            ("Sold Out", "", ""),
        ];
        let first: Vec<_> = inputs.iter().map(|(t, c, s)| classify(t, c, s)).collect();
        let second: Vec<_> = inputs
            .iter()
            .rev()
            .map(|(t, c, s)| classify(t, c, s))
            .collect();
        let second: Vec<_> = second.into_iter().rev().collect();
        assert_eq!(first, second);
    }
}
