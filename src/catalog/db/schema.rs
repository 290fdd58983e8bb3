use rusqlite::Connection;

use super::super::CatalogError;
use super::util::map_sql_error;

pub(super) fn apply_schema(connection: &Connection) -> Result<(), CatalogError> {
    connection
        .execute_batch(
            "CREATE TABLE IF NOT EXISTS tracks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                file_path TEXT,
                layout TEXT NOT NULL,
                dim INTEGER NOT NULL,
                fingerprint BLOB NOT NULL,
                indexed_at INTEGER NOT NULL,
                UNIQUE(title, artist)
             );
             CREATE INDEX IF NOT EXISTS idx_tracks_layout ON tracks (layout);",
        )
        .map_err(map_sql_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tracks'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
