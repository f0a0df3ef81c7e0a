#![allow(clippy::missing_errors_doc)]

pub mod category;
pub mod config;
pub mod derive;
pub mod frontmatter;
mod fs;
pub mod manifest;
mod markup;
pub mod record;
pub mod scan;
pub mod validate;

use camino::Utf8PathBuf;
use tracing::info;

use config::{ConfigError, IndexConfig};
use manifest::ManifestError;
use scan::ScanError;

pub use category::Category;
pub use record::ArticleRecord;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

#[derive(Debug)]
pub struct BuildSummary {
    pub written: usize,
    pub skipped: usize,
    pub output: Utf8PathBuf,
}

/// Rebuilds the manifest from scratch: scan, sort newest first, overwrite.
///
/// Nothing is written when the content directory cannot be read.
pub fn build_index(config: &IndexConfig) -> Result<BuildSummary, BuildError> {
    config.check()?;

    let mut report = scan::scan(config)?;
    manifest::sort_records(&mut report.records);

    let output = config.output();
    manifest::write_manifest(&report.records, &output)?;
    info!("Saved {} posts to {output}.", report.records.len());

    Ok(BuildSummary {
        written: report.records.len(),
        skipped: report.skipped.len(),
        output,
    })
}
