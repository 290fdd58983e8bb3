use std::path::PathBuf;

use super::{CatalogEntry, CatalogError, CatalogSource, TrackId, TrackMetadata};
use crate::analysis::Fingerprint;

/// Catalog held entirely in memory, mostly for tests and one-off comparisons.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
    paths: Vec<Option<PathBuf>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track and return its id.
    pub fn insert(&mut self, metadata: TrackMetadata, fingerprint: Fingerprint) -> TrackId {
        let id = self.entries.len() as TrackId + 1;
        self.entries.push(CatalogEntry {
            id,
            title: metadata.title,
            artist: metadata.artist,
            fingerprint,
        });
        self.paths.push(metadata.file_path);
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogSource for InMemoryCatalog {
    fn enumerate(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self.entries.clone())
    }

    fn get(&self, id: TrackId) -> Result<Option<TrackMetadata>, CatalogError> {
        let Some(index) = usize::try_from(id).ok().and_then(|id| id.checked_sub(1)) else {
            return Ok(None);
        };
        Ok(self.entries.get(index).map(|entry| TrackMetadata {
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            file_path: self.paths.get(index).cloned().flatten(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let mut catalog = InMemoryCatalog::new();
        let a = catalog.insert(TrackMetadata::new("A", "x"), Fingerprint::new("t", vec![1.0]));
        let b = catalog.insert(
            TrackMetadata::new("B", "y").with_file_path("/music/b.mp3"),
            Fingerprint::new("t", vec![2.0]),
        );
        assert_eq!((a, b), (1, 2));
        let ids: Vec<TrackId> = catalog.enumerate().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let meta = catalog.get(b).unwrap().unwrap();
        assert_eq!(meta.file_path, Some(PathBuf::from("/music/b.mp3")));
        assert!(catalog.get(0).unwrap().is_none());
        assert!(catalog.get(3).unwrap().is_none());
    }
}
