use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::{category::Category, config::IndexConfig, markup, record::ArticleRecord};

const MAX_SLUG_LENGTH: usize = 120;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern must compile"));

/// Everything the deriver needs to know about one article file.
#[derive(Debug, Clone)]
pub struct ArticleSource<'a> {
    pub frontmatter: &'a Mapping,
    pub body: &'a str,
    /// File name without its extension.
    pub file_stem: &'a str,
    pub content_file: String,
    pub modified: DateTime<Utc>,
}

/// Tags arrive either as a list or as one comma separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    StringList(Vec<String>),
    CommaString(String),
}

impl Tags {
    fn into_list(self) -> Vec<String> {
        let tags: Vec<String> = match self {
            Tags::StringList(list) => list,
            Tags::CommaString(joined) => joined.split(',').map(str::to_owned).collect(),
        };
        tags.into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[must_use]
pub fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|value| serde_yaml::from_value::<Tags>(value.clone()).ok())
        .map(Tags::into_list)
        .unwrap_or_default()
}

/// Lowercase, hyphen separated, at most 120 characters.
#[must_use]
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let hyphenated = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let capped: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LENGTH)
        .collect();
    let slug = capped.trim_end_matches('-');
    if slug.is_empty() {
        "untitled".to_owned()
    } else {
        slug.to_owned()
    }
}

#[must_use]
pub fn humanize_slug(slug: &str) -> String {
    slug.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts RFC 3339, a few naive date-time layouts read as UTC, a bare date
/// (UTC midnight), or epoch milliseconds.
///
/// Years outside 0..=9999 have no plain ISO-8601 form and count as unparsable.
#[must_use]
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let date = match value {
        Value::String(text) => parse_date_str(text.trim()),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }?;
    (0..=9999).contains(&date.year()).then_some(date)
}

fn parse_date_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for layout in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(date) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(date.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

// Blank strings count as absent. Numbers are accepted as text.
fn text(frontmatter: &Mapping, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        Value::String(value) => {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn body_prefix(body: &str, max: usize) -> Option<String> {
    let prefix = markup::truncate_chars(&markup::strip_html(body), max);
    (!prefix.is_empty()).then_some(prefix)
}

/// Fills every field of a record, falling back to heuristics wherever the
/// frontmatter is silent.
#[must_use]
pub fn derive_record(source: &ArticleSource<'_>, config: &IndexConfig) -> ArticleRecord {
    let fm = source.frontmatter;

    let slug = text(fm, "slug").unwrap_or_else(|| slugify(source.file_stem));
    let tags = normalize_tags(fm.get("tags"));
    let category = Category::resolve(text(fm, "category").as_deref(), &tags, &slug);
    let date = fm
        .get("date")
        .and_then(parse_date)
        .unwrap_or(source.modified);

    let summary = text(fm, "summary")
        .or_else(|| body_prefix(source.body, config.summary_length))
        .unwrap_or_else(|| config.summary_fallback.clone());
    let excerpt = text(fm, "excerpt")
        .or_else(|| text(fm, "summary"))
        .or_else(|| body_prefix(source.body, config.excerpt_length))
        .unwrap_or_else(|| config.excerpt_fallback.clone());
    let image_url = text(fm, "imageUrl")
        .or_else(|| markup::first_image_src(source.body).map(str::to_owned))
        .unwrap_or_else(|| config.fallback_image.clone());

    ArticleRecord {
        id: text(fm, "id").unwrap_or_else(|| slug.clone()),
        title: text(fm, "title").unwrap_or_else(|| humanize_slug(&slug)),
        date,
        author: text(fm, "author").unwrap_or_else(|| config.default_author.clone()),
        summary,
        excerpt,
        category,
        tags,
        content_file: source.content_file.clone(),
        image_url,
        is_featured: fm.get("isFeatured").and_then(Value::as_bool),
        series: text(fm, "series"),
        series_label: text(fm, "seriesLabel"),
        slug,
    }
}
