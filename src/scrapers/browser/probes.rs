//! JavaScript probes evaluated in the booking page.
//!
//! Each probe is a self-contained expression; selector values are embedded as
//! JSON string literals.

use serde::Deserialize;

use crate::config::SiteSelectors;

fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Expression yielding the booking buttons whose class contains `class_fragment`.
fn buttons_expr(class_fragment: &str, text: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll('button')).filter(b => \
         (b.getAttribute('class') || '').includes({}) && b.textContent.trim() === {})",
        js_str(class_fragment),
        js_str(text)
    )
}

/// Click the venue's booking button if it is visible and enabled.
pub fn click_activity(selectors: &SiteSelectors) -> String {
    format!(
        "(() => {{ \
           const btn = {}.find(b => !b.disabled && b.offsetParent !== null); \
           if (!btn) return false; \
           btn.click(); \
           return true; \
         }})()",
        buttons_expr(&selectors.activity_button_class, &selectors.button_text)
    )
}

/// Court list state as seen by [`court_list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CourtListProbe {
    pub count: usize,
    pub empty: bool,
}

impl CourtListProbe {
    /// Courts have rendered, or the page says there are none.
    ///
    /// Zero buttons without the empty marker means the list is still loading.
    pub fn is_settled(&self) -> bool {
        self.count > 0 || self.empty
    }
}

/// Count court booking buttons and check for the empty-list marker.
pub fn court_list(selectors: &SiteSelectors) -> String {
    let empty = match selectors.empty_courts_selector.as_deref() {
        Some(sel) => format!("document.querySelector({}) !== null", js_str(sel)),
        None => "false".to_string(),
    };
    format!(
        "(() => ({{ count: {}.length, empty: {} }}))()",
        buttons_expr(&selectors.court_button_class, &selectors.button_text),
        empty
    )
}

/// Name of the court card holding the `index`th court button, or null.
pub fn court_name(selectors: &SiteSelectors, index: usize) -> String {
    format!(
        "(() => {{ \
           const btn = {}[{}]; \
           if (!btn) return null; \
           const card = btn.closest('div[class*=' + JSON.stringify({}) + ']'); \
           if (!card) return null; \
           const title = card.querySelector({}); \
           return title ? title.textContent.trim() : null; \
         }})()",
        buttons_expr(&selectors.court_button_class, &selectors.button_text),
        index,
        js_str(&selectors.court_card_class),
        js_str(&selectors.court_name_selector)
    )
}

/// Click the `index`th court button.
pub fn click_court(selectors: &SiteSelectors, index: usize) -> String {
    format!(
        "(() => {{ \
           const btn = {}[{}]; \
           if (!btn) return false; \
           btn.click(); \
           return true; \
         }})()",
        buttons_expr(&selectors.court_button_class, &selectors.button_text),
        index
    )
}

/// `outerHTML` of the slot table once a data row has rendered, or null.
///
/// The header row can appear before the body, so a table without any `td`
/// is not ready.
pub fn table_html(selectors: &SiteSelectors) -> String {
    format!(
        "(() => {{ \
           const table = document.querySelector({}); \
           if (!table || table.querySelector('tr td') === null) return null; \
           return table.outerHTML; \
         }})()",
        js_str(&selectors.table_selector)
    )
}

pub const HISTORY_BACK: &str = "(() => { history.back(); return true; })()";
