use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::super::CatalogError;

/// Translate rusqlite errors into friendlier [`CatalogError`] variants.
pub(super) fn map_sql_error(err: rusqlite::Error) -> CatalogError {
    match err {
        rusqlite::Error::SqliteFailure(sql_err, _)
            if sql_err.code == rusqlite::ErrorCode::DatabaseBusy =>
        {
            CatalogError::Busy
        }
        rusqlite::Error::InvalidQuery
        | rusqlite::Error::InvalidParameterName(_)
        | rusqlite::Error::MultipleStatement => CatalogError::Unexpected,
        other => CatalogError::Sql(other),
    }
}

pub(super) fn create_parent_if_needed(path: &Path) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| CatalogError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub(super) fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parent_folders() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("catalog.db");
        create_parent_if_needed(&target).unwrap();
        assert!(target.parent().unwrap().is_dir());
    }

    #[test]
    fn bare_file_name_needs_no_parent() {
        create_parent_if_needed(Path::new("catalog.db")).unwrap();
    }
}
