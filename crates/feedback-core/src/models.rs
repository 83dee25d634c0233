//! Domain entities exchanged with the feedback backend.
//!
//! The backend is document-store backed and is loose about field spelling:
//! identifiers arrive as `id` or `_id`, timestamps may be ISO strings or
//! epoch milliseconds. Wire structs absorb those variations so the rest of
//! the workspace sees one canonical shape.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Display name used for feedback submitted without a name.
pub const ANONYMOUS_NAME: &str = "Anonymous";

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Rating stored for feedback that arrived without a usable rating. Only the
/// "All" filter shows it.
pub const UNRATED: i64 = 0;

/// A feedback collection instance.
///
/// `key` is immutable once the server assigns it; `id` and `key` are both
/// unique across instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireInstance", rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single piece of feedback submitted through an instance's public URL.
///
/// Read-only from the dashboard's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireFeedbackItem", rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: String,
    /// Back-reference to the owning instance's `key`, when the server sends it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Expected in `1..=5`; the server is authoritative and it is not checked here.
    /// Missing or unreadable ratings decode as [`UNRATED`].
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FeedbackItem {
    /// Author name for display, falling back to [`ANONYMOUS_NAME`].
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_NAME)
    }

    pub fn has_rating_in_range(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Default for Envelope<T> {
    /// What an empty response body stands for: no success, no data.
    fn default() -> Self {
        Self {
            success: false,
            data: None,
            message: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Payload of a successful response; `None` when `success` is false or
    /// `data` is absent.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Body of `POST /api/feedback/instance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInstanceRequest {
    pub name: String,
}

/// Star-rating filter applied to an instance's feedback list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatingFilter {
    #[default]
    All,
    Exactly(i64),
}

/// Selectable filter values in display order; `0` means no filter.
pub const RATING_FILTER_OPTIONS: [i64; 6] = [0, 5, 4, 3, 2, 1];

impl RatingFilter {
    /// Map a raw filter value: anything `<= 0` disables filtering, any
    /// positive value keeps items with exactly that rating.
    pub fn from_value(value: i64) -> Self {
        if value > 0 {
            Self::Exactly(value)
        } else {
            Self::All
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Self::All => 0,
            Self::Exactly(rating) => rating,
        }
    }

    pub fn matches(self, item: &FeedbackItem) -> bool {
        match self {
            Self::All => true,
            Self::Exactly(rating) => item.rating == rating,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::All => "All ratings".to_string(),
            Self::Exactly(rating) => format!("{} ({rating})", stars(rating)),
        }
    }
}

impl std::fmt::Display for RatingFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Five-glyph star bar with `rating` filled stars (clamped to `0..=5`).
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let mut out = String::with_capacity(MAX_RATING as usize * 3);
    for idx in 0..MAX_RATING as usize {
        out.push(if idx < filled { '★' } else { '☆' });
    }
    out
}

/// Parse a backend timestamp. Unparseable input is treated as absent.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

// -- wire shapes --

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Text(String),
    Millis(i64),
    Other(serde::de::IgnoredAny),
}

impl WireTimestamp {
    fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(raw) => parse_timestamp(&raw),
            Self::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
            Self::Other(_) => None,
        }
    }
}

/// Ratings arrive as integers, floats or numeric strings; anything else
/// counts as unrated.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRating {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl WireRating {
    fn into_rating(self) -> i64 {
        match self {
            Self::Int(rating) => rating,
            Self::Float(rating) => round_rating(rating),
            Self::Text(raw) => raw.trim().parse::<f64>().map_or(UNRATED, round_rating),
            Self::Other(_) => UNRATED,
        }
    }
}

fn round_rating(rating: f64) -> i64 {
    if rating.is_finite() {
        rating.round() as i64
    } else {
        UNRATED
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInstance {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<WireTimestamp>,
}

impl TryFrom<WireInstance> for Instance {
    type Error = String;

    fn try_from(wire: WireInstance) -> Result<Self, Self::Error> {
        let id = pick_id(wire.mongo_id, wire.id).ok_or("instance is missing an id")?;
        Ok(Self {
            id,
            key: wire.key.unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            created_at: wire.created_at.and_then(WireTimestamp::into_datetime),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFeedbackItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default, alias = "key")]
    instance_key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    rating: Option<WireRating>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    created_at: Option<WireTimestamp>,
}

impl TryFrom<WireFeedbackItem> for FeedbackItem {
    type Error = String;

    fn try_from(wire: WireFeedbackItem) -> Result<Self, Self::Error> {
        let id = pick_id(wire.id, wire.mongo_id).ok_or("feedback item is missing an id")?;
        Ok(Self {
            id,
            instance_key: wire.instance_key,
            name: wire.name,
            user_email: wire.user_email,
            rating: wire.rating.map_or(UNRATED, WireRating::into_rating),
            message: wire.message,
            created_at: wire.created_at.and_then(WireTimestamp::into_datetime),
        })
    }
}

/// First non-blank identifier, in caller preference order.
fn pick_id(first: Option<String>, second: Option<String>) -> Option<String> {
    first
        .filter(|id| !id.trim().is_empty())
        .or_else(|| second.filter(|id| !id.trim().is_empty()))
}
