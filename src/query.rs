//! Identify an unknown clip against a catalog.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::analysis::{FingerprintConfig, FingerprintError, fingerprint_file};
use crate::catalog::{CatalogError, CatalogSource};
use crate::config::AppSettings;
use crate::matching::{MatchError, MatchReport, MatchSettings, match_fingerprint};

const SCRATCH_PREFIX: &str = "remixid-query-";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Failed to stage query audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Extraction and scoring settings applied to every query.
#[derive(Debug, Clone, Default)]
pub struct Identifier {
    fingerprint: FingerprintConfig,
    matching: MatchSettings,
    scratch_dir: Option<PathBuf>,
}

impl Identifier {
    pub fn new(fingerprint: FingerprintConfig, matching: MatchSettings) -> Self {
        Self {
            fingerprint,
            matching,
            scratch_dir: None,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.fingerprint.clone(), settings.matching.clone())
    }

    /// Stage uploaded bytes in `dir` instead of the system temp folder.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn fingerprint_config(&self) -> &FingerprintConfig {
        &self.fingerprint
    }

    pub fn match_settings(&self) -> &MatchSettings {
        &self.matching
    }

    /// Fingerprint the file at `path` and rank the catalog against it.
    pub fn identify_path(
        &self,
        path: &Path,
        catalog: &dyn CatalogSource,
    ) -> Result<MatchReport, QueryError> {
        let fingerprint = fingerprint_file(path, &self.fingerprint)?;
        let mut report = match_fingerprint(&fingerprint, catalog, &self.matching)?;
        for result in &mut report.matches {
            result.file_path = catalog.get(result.id)?.and_then(|meta| meta.file_path);
        }
        info!(
            path = %path.display(),
            matches = report.matches.len(),
            scanned = report.scanned,
            "Query finished"
        );
        Ok(report)
    }

    /// Identify audio held in memory, e.g. an upload.
    ///
    /// The bytes are written to a temp file named with `extension` so the decoder can
    /// probe the container. The file is removed on every return path.
    pub fn identify_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
        catalog: &dyn CatalogSource,
    ) -> Result<MatchReport, QueryError> {
        let suffix = scratch_suffix(extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX).suffix(&suffix);
        let mut staged = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        staged.write_all(bytes)?;
        staged.flush()?;
        self.identify_path(staged.path(), catalog)
    }
}

/// `.ext` with anything but ASCII alphanumerics stripped; empty when nothing is left.
fn scratch_suffix(extension: &str) -> String {
    let clean: String = extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if clean.is_empty() {
        String::new()
    } else {
        format!(".{clean}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Fingerprint;
    use crate::catalog::{InMemoryCatalog, TrackMetadata};
    use tempfile::tempdir;

    #[test]
    fn suffix_is_sanitized() {
        assert_eq!(scratch_suffix("mp3"), ".mp3");
        assert_eq!(scratch_suffix(".WAV"), ".WAV");
        assert_eq!(scratch_suffix("../x"), ".x");
        assert_eq!(scratch_suffix(""), "");
    }

    #[test]
    fn staged_upload_is_removed_after_failure() {
        let scratch = tempdir().unwrap();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(
            TrackMetadata::new("A", "b"),
            Fingerprint::new("fp_v1_test", vec![1.0]),
        );
        let identifier = Identifier::default().with_scratch_dir(scratch.path());
        let err = identifier
            .identify_bytes(b"definitely not audio", "mp3", &catalog)
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::Fingerprint(FingerprintError::Decode { .. })
        ));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}
