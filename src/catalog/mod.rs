//! Reference tracks and their stored fingerprints.
//!
//! The scorer only needs [`CatalogSource`]; the SQLite store and the in-memory catalog
//! both implement it, so callers pass whichever handle they own.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::Fingerprint;

/// SQLite-backed catalog store.
pub mod db;
mod memory;

pub use db::{AddOutcome, CatalogDatabase, StoredTrack};
pub use memory::InMemoryCatalog;

/// Identifier assigned by the catalog, increasing in insertion order.
pub type TrackId = i64;

/// Descriptive fields of a reference track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    /// File the fingerprint was computed from, when known.
    pub file_path: Option<PathBuf>,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// One scorable catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub fingerprint: Fingerprint,
}

/// Read-only view of a catalog used at query time.
pub trait CatalogSource {
    /// Every entry in insertion order. Rows that cannot be decoded are skipped.
    fn enumerate(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Metadata for one entry, or `None` when the id is unknown.
    fn get(&self, id: TrackId) -> Result<Option<TrackMetadata>, CatalogError>;
}

/// Errors returned by catalog stores.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// SQLite query failed.
    #[error("Catalog query failed: {0}")]
    Sql(#[from] rusqlite::Error),
    /// Database is locked or busy.
    #[error("Catalog database is busy, please retry")]
    Busy,
    /// SQLite returned an unexpected result.
    #[error("SQLite returned an unexpected result")]
    Unexpected,
    /// Failed to create the database's parent directory.
    #[error("Could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A stored fingerprint does not decode to the length its header records.
    #[error("Stored fingerprint for track {id} is corrupt: {reason}")]
    CorruptFingerprint { id: TrackId, reason: String },
}
