use camino::{Utf8Path, Utf8PathBuf};

use crate::record::ArticleRecord;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write manifest ({path}): {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read manifest ({path}): {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Manifest ({path}) is not valid JSON: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
    #[error("Manifest ({0}) must contain an array")]
    NotAnArray(Utf8PathBuf),
}

/// Newest first. Records sharing a date keep their encounter order.
pub fn sort_records(records: &mut [ArticleRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Pretty printed JSON with a trailing newline.
pub fn to_manifest_string(records: &[ArticleRecord]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Replaces whatever is at `path` with the full manifest.
pub fn write_manifest(records: &[ArticleRecord], path: &Utf8Path) -> Result<(), ManifestError> {
    let json = to_manifest_string(records)?;
    std::fs::write(path, json).map_err(|source| ManifestError::Write {
        path: path.to_owned(),
        source,
    })
}

/// Loads a manifest as loose JSON so malformed entries can still be inspected.
pub fn read_manifest(path: &Utf8Path) -> Result<Vec<serde_json::Value>, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
            path: path.to_owned(),
            source,
        })?;
    match value {
        serde_json::Value::Array(entries) => Ok(entries),
        _ => Err(ManifestError::NotAnArray(path.to_owned())),
    }
}
