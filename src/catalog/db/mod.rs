use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Serialize;

use super::{CatalogError, TrackId};

/// Read-only catalog queries.
pub mod read;
/// SQLite schema for the catalog.
pub mod schema;
/// Catalog writes.
pub mod write;

mod util;

/// Result of adding a track to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new row was created with this id.
    Inserted(TrackId),
    /// A track with the same title and artist already exists; nothing was written.
    Duplicate(TrackId),
}

impl AddOutcome {
    pub fn id(self) -> TrackId {
        match self {
            AddOutcome::Inserted(id) | AddOutcome::Duplicate(id) => id,
        }
    }
}

/// Row summary returned by [`CatalogDatabase::list_tracks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTrack {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub file_path: Option<PathBuf>,
    /// Layout tag of the stored fingerprint.
    pub layout: String,
    /// Number of values in the stored fingerprint.
    pub dim: usize,
    /// Epoch seconds of the last write to this row.
    pub indexed_at: i64,
}

/// SQLite store of reference tracks and fingerprints.
pub struct CatalogDatabase {
    connection: Connection,
    path: Option<PathBuf>,
}

impl CatalogDatabase {
    /// Open (or create) the catalog at `path`, creating parent folders as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        util::create_parent_if_needed(path)?;
        let connection = Connection::open(path).map_err(util::map_sql_error)?;
        let db = Self {
            connection,
            path: Some(path.to_path_buf()),
        };
        db.apply_pragmas()?;
        schema::apply_schema(&db.connection)?;
        Ok(db)
    }

    /// Open a private catalog that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let connection = Connection::open_in_memory().map_err(util::map_sql_error)?;
        let db = Self {
            connection,
            path: None,
        };
        db.apply_pragmas()?;
        schema::apply_schema(&db.connection)?;
        Ok(db)
    }

    /// Location of the database file, `None` for in-memory catalogs.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn apply_pragmas(&self) -> Result<(), CatalogError> {
        self.connection
            .execute_batch(
                "PRAGMA journal_mode=WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout=5000;
             PRAGMA temp_store=MEMORY;
             PRAGMA cache_size=-32000;",
            )
            .map_err(util::map_sql_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Fingerprint;
    use crate::catalog::{CatalogSource, TrackMetadata};
    use tempfile::tempdir;

    fn fp(values: &[f32]) -> Fingerprint {
        Fingerprint::new("fp_v1_test", values.to_vec())
    }

    #[test]
    fn file_catalog_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.db");
        {
            let db = CatalogDatabase::open(&path).unwrap();
            db.add_track(&TrackMetadata::new("Song", "Artist"), &fp(&[1.0, 2.0]))
                .unwrap();
        }
        let reopened = CatalogDatabase::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        let entries = reopened.enumerate().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Song");
        assert_eq!(entries[0].fingerprint.values(), &[1.0, 2.0]);
    }

    #[test]
    fn applies_wal_journal_mode_on_disk() {
        let dir = tempdir().unwrap();
        let db = CatalogDatabase::open(dir.path().join("catalog.db")).unwrap();
        let mode: String = db
            .connection
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
