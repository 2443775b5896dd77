use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::backend::Document;

/// Sort orders accepted by the catalog listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    ViewsDesc,
    DurationDesc,
}

/// Display-ready video shape handed to the storefront.
///
/// Normalization from a raw document is total: malformed or missing fields
/// fall back to safe defaults and never produce an error. The struct keeps
/// one canonical field per concept; the legacy attribute keys that predate
/// the file-reference rename are emitted as aliases during serialization.
#[derive(Clone, Debug)]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// "MM:SS", switching to "HH:MM:SS" at the one-hour mark.
    pub duration: String,
    pub video_file_id: Option<String>,
    pub thumbnail_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub views: u64,
    pub product_link: Option<String>,
    /// Always non-empty: a resolved view URL or the placeholder.
    pub thumbnail_url: String,
}

impl Serialize for VideoView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VideoView", 14)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("duration", &self.duration)?;
        state.serialize_field("video_file_id", &self.video_file_id)?;
        state.serialize_field("thumbnail_file_id", &self.thumbnail_file_id)?;
        state.serialize_field("created_at", &self.created_at)?;
        state.serialize_field("is_active", &self.is_active)?;
        state.serialize_field("views", &self.views)?;
        state.serialize_field("product_link", &self.product_link)?;
        state.serialize_field("thumbnail_url", &self.thumbnail_url)?;
        // Aliases kept for storefront clients that predate the rename of the
        // file-reference attributes.
        state.serialize_field("videoId", &self.video_file_id)?;
        state.serialize_field("thumbnailId", &self.thumbnail_file_id)?;
        state.end()
    }
}

impl VideoView {
    pub fn from_document(doc: &Document, placeholder_url: &str) -> Self {
        let data = &doc.data;

        let title = data
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Untitled")
            .to_string();
        let description = data
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let created_at = data
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or(doc.created_at)
            .unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            id: doc.id.clone(),
            title,
            description,
            price: coerce_price(data.get("price")),
            duration: format_duration(coerce_count(data.get("duration"))),
            video_file_id: first_string(data, &["video_file_id", "videoId"]),
            thumbnail_file_id: first_string(data, &["thumbnail_file_id", "thumbnailId"]),
            created_at,
            is_active: data.get("is_active").and_then(Value::as_bool).unwrap_or(true),
            views: coerce_count(data.get("views")),
            product_link: first_string(data, &["product_link"]),
            thumbnail_url: placeholder_url.to_string(),
        }
    }
}

/// First non-empty string among the given attribute keys.
fn first_string(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        data.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn coerce_price(value: Option<&Value>) -> f64 {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// Non-negative integer out of whatever the backend stored. Used for both
/// duration seconds and view counts.
fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.max(0) as u64
            } else if let Some(u) = n.as_u64() {
                u
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f > 0.0 => f as u64,
                    _ => 0,
                }
            }
        }
        _ => 0,
    }
}

/// Renders seconds as "MM:SS", or "HH:MM:SS" once the hour mark is reached.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Inverse of [`format_duration`]. Two parts read as minutes:seconds, three
/// as hours:minutes:seconds; anything else is treated as zero seconds.
pub fn parse_duration(display: &str) -> u64 {
    let parts: Vec<&str> = display.trim().split(':').collect();
    let nums: Option<Vec<u64>> = parts.iter().map(|p| p.parse().ok()).collect();
    match nums.as_deref() {
        Some([minutes, seconds]) => minutes * 60 + seconds,
        Some([hours, minutes, seconds]) => hours * 3600 + minutes * 60 + seconds,
        _ => 0,
    }
}
