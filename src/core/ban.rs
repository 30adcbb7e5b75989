//! # Ban Expiry
//!
//! The ban form has a human-facing date field (`#ban_expires`), a hidden
//! numeric twin (`#ban_expires_data`, Unix seconds, UTC) and a timing
//! control (`#ban_timepick`). The twin is recomputed on every input; text
//! that does not parse writes `NaN` so a stale timestamp never survives.
//! Changing the timing control clears both fields and only shows the date
//! field for temporary bans.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use super::dom::{Display, Document};

pub const EXPIRES_FIELD_ID: &str = "ban_expires";
pub const EXPIRES_DATA_ID: &str = "ban_expires_data";
pub const TIMING_CONTROL_ID: &str = "ban_timepick";
pub const TEMPORARY_BAN: &str = "ban_temp";

/// Written into the numeric field when the date text does not parse.
pub const INDETERMINATE: &str = "NaN";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses date/time text into Unix seconds. Zone-less input is taken as UTC.
pub fn expiry_epoch(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// The numeric field's text for a given date field text.
pub fn derived_value(text: &str) -> String {
    match expiry_epoch(text) {
        Some(epoch) => epoch.to_string(),
        None => INDETERMINATE.to_string(),
    }
}

/// Recomputes `#ban_expires_data` from `#ban_expires`.
///
/// Missing fields leave the page untouched.
pub fn refresh_expiry(doc: &mut Document) {
    let Some(text) = doc
        .by_id(EXPIRES_FIELD_ID)
        .and_then(|k| doc.get(k))
        .map(|e| e.value.clone())
    else {
        debug!("No #{} on page", EXPIRES_FIELD_ID);
        return;
    };
    let value = derived_value(&text);
    match doc.by_id(EXPIRES_DATA_ID).and_then(|k| doc.get_mut(k)) {
        Some(data) => data.value = value,
        None => debug!("No #{} on page", EXPIRES_DATA_ID),
    }
}

/// Reacts to the timing control switching to `mode`.
pub fn timing_changed(doc: &mut Document, mode: &str) {
    if let Some(data) = doc.by_id(EXPIRES_DATA_ID).and_then(|k| doc.get_mut(k)) {
        data.value.clear();
    }
    if let Some(field) = doc.by_id(EXPIRES_FIELD_ID).and_then(|k| doc.get_mut(k)) {
        field.value.clear();
        field.display = if mode == TEMPORARY_BAN {
            Display::InlineBlock
        } else {
            Display::None
        };
    }
    debug!("Ban timing changed to {}", mode);
}
