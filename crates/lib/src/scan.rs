use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::{
    config::IndexConfig,
    derive::{derive_record, ArticleSource},
    frontmatter,
    fs::{self, ARTICLE_EXTENSIONS},
    record::ArticleRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to read content directory ({path}): {source}")]
    Walk {
        path: Utf8PathBuf,
        source: walkdir::Error,
    },
}

/// Why a single article was left out of the index.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path is non-UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
    #[error("File ({0}) is not under the site root")]
    OutsideSiteRoot(Utf8PathBuf),
}

#[derive(Debug, Default)]
pub struct ScanReport {
    /// In encounter order.
    pub records: Vec<ArticleRecord>,
    pub skipped: Vec<(PathBuf, FileError)>,
}

/// Reads one article file into a fully populated record.
pub fn read_article(
    path: &Utf8Path,
    site_root: &Utf8Path,
    config: &IndexConfig,
) -> Result<ArticleRecord, FileError> {
    let text = std::fs::read_to_string(path)?;
    let modified: DateTime<Utc> = std::fs::metadata(path)?.modified()?.into();
    let content_file = path
        .strip_prefix(site_root)
        .map_err(|_| FileError::OutsideSiteRoot(path.to_owned()))?
        .as_str()
        .replace('\\', "/");

    let parsed = frontmatter::parse(&text);
    debug!("Parsed {path} with {:?} frontmatter", parsed.format);
    let source = ArticleSource {
        frontmatter: &parsed.frontmatter,
        body: &parsed.body,
        file_stem: path.file_stem().unwrap_or_default(),
        content_file,
        modified,
    };
    Ok(derive_record(&source, config))
}

/// Indexes every article under the configured content directory.
///
/// A directory that cannot be walked aborts the scan. A file that cannot be
/// read is logged and skipped.
pub fn scan(config: &IndexConfig) -> Result<ScanReport, ScanError> {
    let content_dir = config.content_dir();
    let paths = fs::filepaths_with_extensions(&content_dir, ARTICLE_EXTENSIONS).map_err(
        |source| ScanError::Walk {
            path: content_dir.clone(),
            source,
        },
    )?;
    if paths.is_empty() {
        warn!("No content files found under {content_dir}");
    }

    let mut report = ScanReport::default();
    for path in paths {
        let result = match Utf8PathBuf::try_from(path.clone()) {
            Ok(utf8_path) => read_article(&utf8_path, &config.site_root, config),
            Err(_) => Err(FileError::NonUtf8Path(path.clone())),
        };
        match result {
            Ok(record) => {
                debug!("Indexed {} as {}", path.display(), record.slug);
                report.records.push(record);
            }
            Err(err) => {
                error!("Failed to process {}: {err}", path.display());
                report.skipped.push((path, err));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod test {
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{read_article, scan, FileError, ScanError};
    use crate::{category::Category, config::IndexConfig};

    struct Site {
        _dir: TempDir,
        config: IndexConfig,
    }

    impl Site {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
            std::fs::create_dir_all(root.join("content")).unwrap();
            Site {
                _dir: dir,
                config: IndexConfig {
                    site_root: root,
                    ..IndexConfig::default()
                },
            }
        }

        fn write(&self, name: &str, contents: impl AsRef<[u8]>) {
            let path = self.config.content_dir().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, contents).unwrap();
        }
    }

    fn valid(i: usize) -> String {
        format!("---\ntitle: Post {i}\ndate: 2024-01-{:02}\n---\n<p>Body {i}</p>\n", i + 1)
    }

    #[test]
    fn malformed_frontmatter_is_kept_with_fallbacks() {
        let site = Site::new();
        for i in 0..9 {
            site.write(&format!("post-{i}.md"), valid(i));
        }
        site.write("travel-broken.html", "---\ntitle: [oops\n---\n<p>Broken</p>");

        let report = scan(&site.config).unwrap();
        assert_eq!(10, report.records.len());
        assert!(report.skipped.is_empty());

        let broken = report
            .records
            .iter()
            .find(|record| record.slug == "travel-broken")
            .unwrap();
        assert_eq!("Travel Broken", broken.title);
        assert_eq!(Category::Travel, broken.category);
        assert_eq!("content/travel-broken.html", broken.content_file);
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let site = Site::new();
        for i in 0..9 {
            site.write(&format!("post-{i}.md"), valid(i));
        }
        site.write("binary.html", b"\xff\xfe\x00\xc3");

        let report = scan(&site.config).unwrap();
        assert_eq!(9, report.records.len());
        assert_eq!(1, report.skipped.len());
        let (path, err) = &report.skipped[0];
        assert!(path.ends_with("binary.html"));
        assert!(matches!(err, FileError::Io(_)));
    }

    #[test]
    fn nested_files_and_other_extensions() {
        let site = Site::new();
        site.write("guides/italy.mdx", "<p>Ciao</p>");
        site.write("notes.txt", "ignored");
        site.write("Top Story.HTML", "<p>Top</p>");

        let report = scan(&site.config).unwrap();
        let files = report
            .records
            .iter()
            .map(|record| record.content_file.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["content/Top Story.HTML", "content/guides/italy.mdx"], files);
        assert_eq!("top-story", report.records[0].slug);
    }

    #[test]
    fn missing_content_dir_is_fatal() {
        let site = Site::new();
        let config = IndexConfig {
            content_dir: Some(site.config.site_root.join("nowhere")),
            ..site.config.clone()
        };
        assert!(matches!(scan(&config), Err(ScanError::Walk { .. })));
    }

    #[test]
    fn file_outside_site_root() {
        let site = Site::new();
        let other = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(other.path().join("x.md")).unwrap();
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            read_article(&path, &site.config.site_root, &site.config),
            Err(FileError::OutsideSiteRoot(_))
        ));
    }

    #[test]
    fn mtime_backs_a_missing_date() {
        let site = Site::new();
        site.write("undated.md", "<p>No date</p>");
        let path = site.config.content_dir().join("undated.md");
        let when = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(when)
            .unwrap();

        let record = read_article(&path, &site.config.site_root, &site.config).unwrap();
        assert_eq!(1_700_000_000, record.date.timestamp());
    }
}
