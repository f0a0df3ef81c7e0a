use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Mapping;
use tracing::warn;

use crate::markup;

static YAML_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\s*\r?\n(.*?)\r?\n---\s*").expect("frontmatter pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    None,
}

#[derive(Debug, Clone)]
pub struct Parsed {
    pub frontmatter: Mapping,
    pub body: String,
    pub format: Format,
}

impl Parsed {
    fn body_only(body: &str) -> Self {
        Parsed {
            frontmatter: Mapping::new(),
            body: body.to_owned(),
            format: Format::None,
        }
    }
}

/// Splits raw article text into its frontmatter and body.
///
/// Accepts a `---` delimited YAML block or a leading JSON object. Malformed
/// frontmatter is logged and the whole text is treated as body, so this never
/// fails.
pub fn parse(text: &str) -> Parsed {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if let Some(captures) = YAML_BLOCK.captures(text) {
        let block = captures.get(1).map_or("", |m| m.as_str());
        let body = &text[captures.get(0).map_or(0, |m| m.end())..];
        match serde_yaml::from_str::<serde_yaml::Value>(block) {
            Ok(serde_yaml::Value::Mapping(frontmatter)) => {
                return Parsed {
                    frontmatter,
                    body: body.to_owned(),
                    format: Format::Yaml,
                };
            }
            Ok(serde_yaml::Value::Null) => {
                return Parsed {
                    frontmatter: Mapping::new(),
                    body: body.to_owned(),
                    format: Format::Yaml,
                };
            }
            Ok(other) => {
                warn!("YAML frontmatter is not a mapping, ignoring it: {other:?}");
                return Parsed {
                    frontmatter: Mapping::new(),
                    body: body.to_owned(),
                    format: Format::Yaml,
                };
            }
            Err(err) => {
                warn!("Failed to parse YAML frontmatter: {err}");
                return Parsed::body_only(text);
            }
        }
    }

    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        let Some(end) = find_matching_brace(trimmed) else {
            warn!("JSON frontmatter has no closing brace");
            return Parsed::body_only(text);
        };
        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
            &trimmed[..=end],
        ) {
            Ok(object) => match markup::json_to_yaml(&object) {
                Ok(frontmatter) => {
                    return Parsed {
                        frontmatter,
                        body: trimmed[end + 1..].to_owned(),
                        format: Format::Json,
                    };
                }
                Err(err) => warn!("Failed to convert JSON frontmatter: {err}"),
            },
            Err(err) => warn!("Failed to parse JSON frontmatter: {err}"),
        }
    }

    Parsed::body_only(text)
}

/// Byte index of the `}` closing the object that opens `text`.
///
/// Braces inside JSON string literals do not count.
fn find_matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => (),
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => (),
        }
    }
    None
}
