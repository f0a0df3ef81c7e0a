use std::path::{Path, PathBuf};

use camino::Utf8Path;
use walkdir::WalkDir;

pub const ARTICLE_EXTENSIONS: &[&str] = &["md", "mdx", "markdown", "html", "htm"];

pub fn path_has_extensions(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Every regular file under `dir` with one of `extensions`, depth first and
/// sorted by name. Symlinks are not followed.
pub fn filepaths_with_extensions(
    dir: &Utf8Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map(|entry| {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    if path_has_extensions(entry.path(), extensions) {
                        Some(entry.into_path())
                    } else {
                        None
                    }
                })
                .transpose()
        })
        .collect()
}
