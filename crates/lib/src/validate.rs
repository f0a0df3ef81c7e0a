use std::collections::HashSet;

use camino::Utf8Path;
use serde_json::Value;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn error(&mut self, message: String) {
        self.issues.push(Issue {
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, message: String) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            message,
        });
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }
}

fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn is_iso_date(value: &str) -> bool {
    value.contains('T') && chrono::DateTime::parse_from_rfc3339(value).is_ok()
}

/// Checks a loaded manifest against what the site renderer relies on.
///
/// Duplicate ids and slugs, bad dates and dangling `contentFile` paths are
/// errors; missing summaries and authors are warnings.
pub fn validate(entries: &[Value], site_root: &Utf8Path) -> Result<ValidationReport, ConfigError> {
    if !site_root.is_dir() {
        return Err(ConfigError::SiteRootMissing(site_root.to_owned()));
    }

    let mut report = ValidationReport {
        checked: entries.len(),
        issues: vec![],
    };
    if entries.is_empty() {
        report.warning("Manifest is empty.".to_owned());
    }

    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let name = non_empty_str(entry, "slug")
            .or_else(|| non_empty_str(entry, "id"))
            .unwrap_or("unknown");
        let prefix = format!("post[{index}] ({name})");

        match non_empty_str(entry, "id") {
            None => report.error(format!("{prefix}: missing id.")),
            Some(id) if !seen_ids.insert(id) => {
                report.error(format!("{prefix}: duplicate id '{id}'."));
            }
            Some(_) => (),
        }

        match non_empty_str(entry, "slug") {
            None => report.error(format!("{prefix}: missing slug.")),
            Some(slug) if !seen_slugs.insert(slug) => {
                report.error(format!("{prefix}: duplicate slug '{slug}'."));
            }
            Some(_) => (),
        }

        if non_empty_str(entry, "title").is_none() {
            report.error(format!("{prefix}: missing title."));
        }
        if non_empty_str(entry, "summary").is_none() {
            report.warning(format!("{prefix}: summary missing."));
        }
        if non_empty_str(entry, "author").is_none() {
            report.warning(format!("{prefix}: author missing."));
        }

        match non_empty_str(entry, "date") {
            None => report.error(format!("{prefix}: missing date.")),
            Some(date) if !is_iso_date(date) => {
                report.error(format!("{prefix}: invalid ISO date '{date}'."));
            }
            Some(_) => (),
        }

        if !entry.get("tags").is_some_and(Value::is_array) {
            report.error(format!("{prefix}: tags must be an array."));
        }

        match non_empty_str(entry, "contentFile") {
            None => report.error(format!("{prefix}: missing contentFile.")),
            Some(content_file) => {
                let path = site_root.join(content_file.trim_start_matches('/'));
                if !path.is_file() {
                    report.error(format!(
                        "{prefix}: content file not found ({content_file})."
                    ));
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod test {
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{validate, Severity};
    use crate::config::ConfigError;

    fn site() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("content")).unwrap();
        std::fs::write(root.join("content/a.html"), "<h1>A</h1>").unwrap();
        (dir, root)
    }

    fn good(slug: &str) -> serde_json::Value {
        json!({
            "id": slug,
            "title": "A",
            "slug": slug,
            "date": "2024-01-05T00:00:00.000Z",
            "author": "Nexairi Editorial",
            "summary": "s",
            "tags": [],
            "contentFile": "content/a.html"
        })
    }

    #[test]
    fn clean_manifest_passes() {
        let (_dir, root) = site();
        let report = validate(&[good("a"), good("b")], &root).unwrap();
        assert!(!report.has_errors());
        assert_eq!(2, report.checked);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn duplicates_and_dangling_files() {
        let (_dir, root) = site();
        let mut dangling = good("c");
        dangling["contentFile"] = json!("/content/missing.html");
        let report = validate(&[good("a"), good("a"), dangling], &root).unwrap();

        let errors = report.errors().map(|i| i.message.as_str()).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "post[1] (a): duplicate id 'a'.",
                "post[1] (a): duplicate slug 'a'.",
                "post[2] (c): content file not found (/content/missing.html).",
            ],
            errors
        );
    }

    #[test]
    fn shape_problems() {
        let (_dir, root) = site();
        let entry = json!({
            "slug": "x",
            "date": "2024-01-05",
            "tags": "a, b",
            "contentFile": "content/a.html"
        });
        let report = validate(&[entry], &root).unwrap();
        assert!(report.has_errors());

        let errors = report.errors().map(|i| i.message.as_str()).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "post[0] (x): missing id.",
                "post[0] (x): missing title.",
                "post[0] (x): invalid ISO date '2024-01-05'.",
                "post[0] (x): tags must be an array.",
            ],
            errors
        );
        assert_eq!(2, report.warnings().count());
        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.ends_with("author missing.")));
    }

    #[test]
    fn empty_manifest_warns() {
        let (_dir, root) = site();
        let report = validate(&[], &root).unwrap();
        assert!(!report.has_errors());
        assert_eq!(1, report.warnings().count());
    }

    #[test]
    fn missing_site_root() {
        let (_dir, root) = site();
        assert!(matches!(
            validate(&[], &root.join("nope")),
            Err(ConfigError::SiteRootMissing(_))
        ));
    }
}
