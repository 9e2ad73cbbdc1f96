//! Gallery records.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved transform: the original, the result, and when and how it was made.
///
/// Serialized as `{id, original, transformed, styleName, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Unique id, assigned once at creation.
    pub id: String,
    /// Data URI of the source image.
    pub original: String,
    /// Data URI of the transformed image.
    pub transformed: String,
    /// Style display name at creation time.
    pub style_name: String,
    /// Creation instant, UTC with millisecond precision.
    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
}

impl GalleryItem {
    /// Create a record with a fresh id and the current time.
    pub fn new(
        original: impl Into<String>,
        transformed: impl Into<String>,
        style_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original: original.into(),
            transformed: transformed.into(),
            style_name: style_name.into(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    /// Timestamp as written to storage.
    pub fn timestamp_string(&self) -> String {
        iso8601_millis::format(&self.timestamp)
    }

    /// Suggested filename when exporting the transformed image.
    pub fn download_name(&self) -> String {
        let slug: String = self
            .style_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let short_id: String = self.id.chars().take(8).collect();
        format!("toonify-{}-{}.jpg", slug.trim_matches('-'), short_id)
    }
}

/// `2024-05-01T12:00:00.000Z`
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
