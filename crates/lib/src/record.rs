use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::category::Category;

/// One entry of the posts manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(serialize_with = "serialize_iso")]
    pub date: DateTime<Utc>,
    pub author: String,
    pub summary: String,
    pub excerpt: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Site-relative path of the source file, always `/` separated.
    pub content_file: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_label: Option<String>,
}

/// `2024-01-05T09:30:00.000Z`
#[must_use]
pub fn to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso(date))
}
