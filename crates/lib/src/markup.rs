use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern must compile"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src="([^"]+)""#).expect("img pattern must compile")
});

pub fn json_to_yaml(
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<serde_yaml::Mapping, serde_yaml::Error> {
    match serde_yaml::to_value(object)? {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        _ => Ok(serde_yaml::Mapping::new()),
    }
}

/// Replaces every tag with a space and collapses runs of whitespace.
pub fn strip_html(markup: &str) -> String {
    let text = HTML_TAG.replace_all(markup, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_owned()
}

/// Keeps at most `max` characters, then trims.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim().to_owned()
}

pub fn first_image_src(markup: &str) -> Option<&str> {
    IMG_SRC
        .captures(markup)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
