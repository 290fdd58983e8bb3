//! Builds the catalog from a folder of reference tracks.

mod metadata;
mod walk;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::{FingerprintConfig, fingerprint_file};
use crate::catalog::{AddOutcome, CatalogDatabase, CatalogError};

pub use metadata::{FilenameMetadata, MetadataStrategy, UNKNOWN_ARTIST};
pub use walk::{SUPPORTED_EXTENSIONS, is_supported_audio};

/// Errors that abort an indexing run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Library folder is not a directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// Remove every existing track before walking.
    pub clear: bool,
}

/// Counts from one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Supported audio files found under the root.
    pub scanned: usize,
    pub added: usize,
    /// Files whose title and artist were already catalogued.
    pub duplicates: usize,
    /// Files that could not be fingerprinted.
    pub failed: usize,
    pub total_in_catalog: usize,
}

/// Fingerprint every supported file under `root` and add it to `db`.
///
/// Files that fail to decode or are too short are logged and counted, never fatal.
/// Tracks already present by (title, artist) are skipped without decoding.
pub fn index_library(
    root: &Path,
    db: &CatalogDatabase,
    config: &FingerprintConfig,
    strategy: &dyn MetadataStrategy,
    options: IndexOptions,
) -> Result<IndexReport, IngestError> {
    if !root.is_dir() {
        return Err(IngestError::InvalidRoot(root.to_path_buf()));
    }
    if options.clear {
        let removed = db.clear()?;
        info!(removed, "Cleared catalog before indexing");
    }
    let files = walk::collect_audio_files(root)?;
    info!(root = %root.display(), files = files.len(), "Indexing library");

    let mut report = IndexReport {
        scanned: files.len(),
        ..IndexReport::default()
    };
    for path in files {
        let metadata = strategy.describe(&path);
        if db.find_track(&metadata.title, &metadata.artist)?.is_some() {
            report.duplicates += 1;
            continue;
        }
        let fingerprint = match fingerprint_file(&path, config) {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                warn!(path = %path.display(), "Skipping file: {err}");
                report.failed += 1;
                continue;
            }
        };
        match db.add_track(&metadata, &fingerprint)? {
            AddOutcome::Inserted(id) => {
                info!(id, title = %metadata.title, artist = %metadata.artist, "Indexed track");
                report.added += 1;
            }
            AddOutcome::Duplicate(_) => report.duplicates += 1,
        }
    }
    report.total_in_catalog = db.count()?;
    info!(
        added = report.added,
        duplicates = report.duplicates,
        failed = report.failed,
        total = report.total_in_catalog,
        "Indexing finished"
    );
    Ok(report)
}
