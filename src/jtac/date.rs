// src/jtac/date.rs

use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Formats seen in the "last updated" columns over time. Month-name forms
/// first; the numeric forms cover older table revisions.
static DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // March 3, 2023
    "%b %d, %Y", // Mar 3, 2023
    "%B %d %Y",  // March 3 2023
    "%d %B %Y",  // 3 March 2023
    "%d %b %Y",  // 3 Mar 2023
    "%d-%b-%Y",  // 3-Mar-2023
    "%Y-%m-%d",  // 2023-03-03
    "%m/%d/%Y",  // 03/03/2023
];

/// Parse a free-text date cell.
///
/// Empty and blank cells yield `None`. A non-empty cell that matches none of
/// the known formats is a hard error so that vendor table-format changes
/// surface immediately instead of silently dropping dates.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let text = raw.replace('\u{a0}', " ");
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(Some(date));
        }
    }
    bail!("unparseable date text `{}`", text)
}

/// The QFX table pads its date cells with extra interior whitespace; collapse
/// space runs before handing the text to `parse_date`.
pub fn collapse_spaces(raw: &str) -> String {
    let mut text = raw.to_string();
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text
}
