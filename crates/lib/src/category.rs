use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The fixed set of sections the site renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[default]
    Lifestyle,
    Technology,
    Travel,
    Sports,
}

impl Category {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Lifestyle => "Lifestyle",
            Category::Technology => "Technology",
            Category::Travel => "Travel",
            Category::Sports => "Sports",
        }
    }

    /// Looks a free-text label up in the alias dictionary.
    ///
    /// Canonical labels map to themselves, so this is idempotent.
    #[must_use]
    pub fn normalize(label: &str) -> Option<Self> {
        let category = match label.trim().to_lowercase().as_str() {
            "lifestyle" | "life" | "ritual" | "home" | "calm" | "home & life" => {
                Category::Lifestyle
            }
            "technology" | "tech" | "ai" | "systems" | "gadget" | "gaming" => {
                Category::Technology
            }
            "travel" | "trips" | "journey" | "mobility" => Category::Travel,
            "sports" | "sport" | "performance" | "athlete" => Category::Sports,
            _ => return None,
        };
        Some(category)
    }

    /// Explicit label, then the first recognised tag, then slug keywords,
    /// then the default.
    #[must_use]
    pub fn resolve(explicit: Option<&str>, tags: &[String], slug: &str) -> Self {
        explicit
            .and_then(Category::normalize)
            .or_else(|| tags.iter().find_map(|tag| Category::normalize(tag)))
            .or_else(|| Category::from_slug(slug))
            .unwrap_or_default()
    }

    fn from_slug(slug: &str) -> Option<Self> {
        SLUG_RULES
            .iter()
            .find(|rule| rule.pattern.is_match(slug))
            .map(|rule| rule.category)
    }
}

struct SlugRule {
    category: Category,
    pattern: Regex,
}

// Checked in order; a slug matching several groups takes the first.
static SLUG_RULES: LazyLock<Vec<SlugRule>> = LazyLock::new(|| {
    [
        (
            Category::Lifestyle,
            "lifestyle|thanksgiving|holiday|gift|shopping|grain|home|kitchen|ritual|family|hosting",
        ),
        (
            Category::Travel,
            "travel|city|guide|flight|train|road|itinerary|alps|italy|korea|slow-travel",
        ),
        (
            Category::Technology,
            "tech|ai|stack|device|gadget|automation|ps5|gaming|console|signal|systems",
        ),
        (
            Category::Sports,
            "sport|football|basketball|marathon|athlete|training|performance|nfl|nba",
        ),
    ]
    .into_iter()
    .map(|(category, keywords)| SlugRule {
        category,
        pattern: Regex::new(&format!("(?i)({keywords})")).expect("slug rule must compile"),
    })
    .collect()
});
