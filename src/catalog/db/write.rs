use rusqlite::params;
use tracing::debug;

use super::util::{map_sql_error, now_epoch_seconds};
use super::{AddOutcome, CatalogDatabase};
use crate::analysis::Fingerprint;
use crate::analysis::vector::encode_f32_le_blob;
use crate::catalog::{CatalogError, TrackId, TrackMetadata};

impl CatalogDatabase {
    /// Store a track unless one with the same title and artist already exists.
    pub fn add_track(
        &self,
        metadata: &TrackMetadata,
        fingerprint: &Fingerprint,
    ) -> Result<AddOutcome, CatalogError> {
        let file_path = metadata
            .file_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned());
        let changed = self
            .connection
            .prepare_cached(
                "INSERT INTO tracks (title, artist, file_path, layout, dim, fingerprint, indexed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(title, artist) DO NOTHING",
            )
            .map_err(map_sql_error)?
            .execute(params![
                metadata.title,
                metadata.artist,
                file_path,
                fingerprint.layout(),
                fingerprint.len() as i64,
                encode_f32_le_blob(fingerprint.values()),
                now_epoch_seconds(),
            ])
            .map_err(map_sql_error)?;
        if changed == 0 {
            let id = self
                .find_track(&metadata.title, &metadata.artist)?
                .ok_or(CatalogError::Unexpected)?;
            debug!(id, title = %metadata.title, "Track already catalogued");
            return Ok(AddOutcome::Duplicate(id));
        }
        Ok(AddOutcome::Inserted(self.connection.last_insert_rowid()))
    }

    /// Overwrite the fingerprint of an existing track. Returns false when the id is unknown.
    pub fn replace_fingerprint(
        &self,
        id: TrackId,
        fingerprint: &Fingerprint,
    ) -> Result<bool, CatalogError> {
        let changed = self
            .connection
            .prepare_cached(
                "UPDATE tracks SET layout = ?2, dim = ?3, fingerprint = ?4, indexed_at = ?5
                 WHERE id = ?1",
            )
            .map_err(map_sql_error)?
            .execute(params![
                id,
                fingerprint.layout(),
                fingerprint.len() as i64,
                encode_f32_le_blob(fingerprint.values()),
                now_epoch_seconds(),
            ])
            .map_err(map_sql_error)?;
        Ok(changed > 0)
    }

    /// Remove every track and restart id numbering. Returns the number of rows removed.
    pub fn clear(&self) -> Result<usize, CatalogError> {
        let tx = self
            .connection
            .unchecked_transaction()
            .map_err(map_sql_error)?;
        let removed = tx
            .execute("DELETE FROM tracks", [])
            .map_err(map_sql_error)?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'tracks'", [])
            .map_err(map_sql_error)?;
        tx.commit().map_err(map_sql_error)?;
        Ok(removed)
    }
}
