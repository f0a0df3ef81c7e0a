use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

pub const DEFAULT_AUTHOR: &str = "Nexairi Editorial";
pub const FALLBACK_IMAGE: &str = "/images/fallback-post.jpg";
pub const SUMMARY_FALLBACK: &str = "Further analysis coming soon.";
pub const EXCERPT_FALLBACK: &str = "High-signal intelligence dispatch coming online.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file ({path}): {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file ({path}): {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Content directory ({content_dir}) must live under the site root ({site_root})")]
    ContentOutsideRoot {
        content_dir: Utf8PathBuf,
        site_root: Utf8PathBuf,
    },
    #[error("Site root ({0}) is missing or is not a directory")]
    SiteRootMissing(Utf8PathBuf),
}

/// Settings for one index build.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IndexConfig {
    /// Directory the site is served from. `contentFile` paths are relative to it.
    pub site_root: Utf8PathBuf,
    /// Defaults to `<site-root>/content`.
    pub content_dir: Option<Utf8PathBuf>,
    /// Defaults to `<site-root>/posts.json`.
    pub output: Option<Utf8PathBuf>,
    pub default_author: String,
    pub fallback_image: String,
    /// Character budget for summaries derived from the body.
    pub summary_length: usize,
    /// Character budget for excerpts derived from the body.
    pub excerpt_length: usize,
    pub summary_fallback: String,
    pub excerpt_fallback: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            site_root: Utf8PathBuf::from("public"),
            content_dir: None,
            output: None,
            default_author: DEFAULT_AUTHOR.to_owned(),
            fallback_image: FALLBACK_IMAGE.to_owned(),
            summary_length: 320,
            excerpt_length: 200,
            summary_fallback: SUMMARY_FALLBACK.to_owned(),
            excerpt_fallback: EXCERPT_FALLBACK.to_owned(),
        }
    }
}

impl IndexConfig {
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn content_dir(&self) -> Utf8PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(|| self.site_root.join("content"))
    }

    #[must_use]
    pub fn output(&self) -> Utf8PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.site_root.join("posts.json"))
    }

    /// Checks the path layout before any file is touched.
    pub fn check(&self) -> Result<(), ConfigError> {
        let content_dir = self.content_dir();
        if !content_dir.starts_with(&self.site_root) {
            return Err(ConfigError::ContentOutsideRoot {
                content_dir,
                site_root: self.site_root.clone(),
            });
        }
        Ok(())
    }
}
