use std::path::Path;

use crate::catalog::TrackMetadata;

/// Artist used when a file name carries no artist.
pub const UNKNOWN_ARTIST: &str = "unknown";

/// Derives catalog metadata for a file being indexed.
pub trait MetadataStrategy: Send + Sync {
    fn describe(&self, path: &Path) -> TrackMetadata;
}

/// Reads `Artist - Title` from the file stem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilenameMetadata;

impl MetadataStrategy for FilenameMetadata {
    fn describe(&self, path: &Path) -> TrackMetadata {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (artist, title) = split_artist_title(&stem);
        TrackMetadata::new(title, artist).with_file_path(path)
    }
}

/// Split at the first `" - "`; without one the whole stem is the title.
fn split_artist_title(stem: &str) -> (&str, &str) {
    let stem = stem.trim();
    match stem.split_once(" - ") {
        Some((artist, title)) if !title.trim().is_empty() => {
            let artist = artist.trim();
            let artist = if artist.is_empty() { UNKNOWN_ARTIST } else { artist };
            (artist, title.trim())
        }
        _ => (UNKNOWN_ARTIST, stem),
    }
}
