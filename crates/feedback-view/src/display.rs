//! Presentation-neutral formatting shared by every front end.

use chrono::{DateTime, Utc};

const KEY_PREVIEW_CHARS: usize = 8;

/// First character of `name`, upper-cased; `'?'` when empty.
pub fn avatar_initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|first| first.to_uppercase().next())
        .unwrap_or('?')
}

/// Abbreviated key for list cards: the first eight characters and `...`.
pub fn key_preview(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let head: String = key.chars().take(KEY_PREVIEW_CHARS).collect();
    Some(format!("{head}..."))
}

/// `Jan 5, 2024`; empty when the timestamp is unknown.
pub fn format_instance_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `Jan 5, 2024, 03:04 PM`; empty when the timestamp is unknown.
pub fn format_feedback_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.format("%b %-d, %Y, %I:%M %p").to_string())
        .unwrap_or_default()
}
