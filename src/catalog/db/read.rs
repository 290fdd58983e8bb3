use std::path::PathBuf;

use rusqlite::{OptionalExtension, params};
use tracing::warn;

use super::util::map_sql_error;
use super::{CatalogDatabase, StoredTrack};
use crate::analysis::Fingerprint;
use crate::analysis::vector::decode_f32_le_blob;
use crate::catalog::{CatalogEntry, CatalogError, CatalogSource, TrackId, TrackMetadata};

struct RawEntry {
    id: TrackId,
    title: String,
    artist: String,
    layout: String,
    dim: i64,
    blob: Vec<u8>,
}

impl RawEntry {
    fn decode(self) -> Result<CatalogEntry, CatalogError> {
        let id = self.id;
        let corrupt = |reason: String| CatalogError::CorruptFingerprint { id, reason };
        let dim = usize::try_from(self.dim)
            .map_err(|_| corrupt(format!("negative dimension {}", self.dim)))?;
        let values = decode_f32_le_blob(&self.blob, dim).map_err(corrupt)?;
        Ok(CatalogEntry {
            id,
            title: self.title,
            artist: self.artist,
            fingerprint: Fingerprint::new(self.layout, values),
        })
    }
}

impl CatalogDatabase {
    /// Number of stored tracks.
    pub fn count(&self) -> Result<usize, CatalogError> {
        let count: i64 = self
            .connection
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))
            .map_err(map_sql_error)?;
        Ok(count.max(0) as usize)
    }

    /// Every stored track without its fingerprint values, in insertion order.
    pub fn list_tracks(&self) -> Result<Vec<StoredTrack>, CatalogError> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT id, title, artist, file_path, layout, dim, indexed_at
                 FROM tracks ORDER BY id ASC",
            )
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredTrack {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    artist: row.get(2)?,
                    file_path: row.get::<_, Option<String>>(3)?.map(PathBuf::from),
                    layout: row.get(4)?,
                    dim: row.get::<_, i64>(5)?.max(0) as usize,
                    indexed_at: row.get(6)?,
                })
            })
            .map_err(map_sql_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sql_error)?;
        Ok(rows)
    }

    /// Id of the track with this exact title and artist.
    pub fn find_track(&self, title: &str, artist: &str) -> Result<Option<TrackId>, CatalogError> {
        self.connection
            .prepare_cached("SELECT id FROM tracks WHERE title = ?1 AND artist = ?2")
            .map_err(map_sql_error)?
            .query_row(params![title, artist], |row| row.get(0))
            .optional()
            .map_err(map_sql_error)
    }

    fn raw_entries(&self) -> Result<Vec<RawEntry>, CatalogError> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT id, title, artist, layout, dim, fingerprint
                 FROM tracks ORDER BY id ASC",
            )
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RawEntry {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    artist: row.get(2)?,
                    layout: row.get(3)?,
                    dim: row.get(4)?,
                    blob: row.get(5)?,
                })
            })
            .map_err(map_sql_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sql_error)?;
        Ok(rows)
    }
}

impl CatalogSource for CatalogDatabase {
    fn enumerate(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut entries = Vec::new();
        for raw in self.raw_entries()? {
            match raw.decode() {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("Skipping catalog row: {err}"),
            }
        }
        Ok(entries)
    }

    fn get(&self, id: TrackId) -> Result<Option<TrackMetadata>, CatalogError> {
        self.connection
            .prepare_cached("SELECT title, artist, file_path FROM tracks WHERE id = ?1")
            .map_err(map_sql_error)?
            .query_row(params![id], |row| {
                Ok(TrackMetadata {
                    title: row.get(0)?,
                    artist: row.get(1)?,
                    file_path: row.get::<_, Option<String>>(2)?.map(PathBuf::from),
                })
            })
            .optional()
            .map_err(map_sql_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::vector::encode_f32_le_blob;

    fn insert_raw(db: &CatalogDatabase, title: &str, dim: i64, blob: Vec<u8>) {
        db.connection
            .execute(
                "INSERT INTO tracks (title, artist, layout, dim, fingerprint, indexed_at)
                 VALUES (?1, 'raw', 'fp_v1_test', ?2, ?3, 0)",
                params![title, dim, blob],
            )
            .unwrap();
    }

    #[test]
    fn enumerate_skips_rows_with_corrupt_blobs() {
        let db = CatalogDatabase::open_in_memory().unwrap();
        insert_raw(&db, "good", 2, encode_f32_le_blob(&[0.5, 0.25]));
        insert_raw(&db, "ragged", 2, vec![0, 1, 2]);
        insert_raw(&db, "short", 3, encode_f32_le_blob(&[1.0]));
        insert_raw(&db, "negative", -1, Vec::new());

        let entries = db.enumerate().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "good");
        assert_eq!(entries[0].fingerprint.values(), &[0.5, 0.25]);
        assert_eq!(db.count().unwrap(), 4);
    }

    #[test]
    fn corrupt_rows_report_their_id() {
        let raw = RawEntry {
            id: 7,
            title: "t".into(),
            artist: "a".into(),
            layout: "l".into(),
            dim: 2,
            blob: vec![0; 5],
        };
        let err = raw.decode().unwrap_err();
        assert!(matches!(err, CatalogError::CorruptFingerprint { id: 7, .. }));
    }

    #[test]
    fn get_returns_none_for_unknown_ids() {
        let db = CatalogDatabase::open_in_memory().unwrap();
        assert!(db.get(42).unwrap().is_none());
        assert!(db.find_track("x", "y").unwrap().is_none());
    }
}
