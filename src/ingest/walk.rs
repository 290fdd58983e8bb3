use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::IngestError;

/// Extensions accepted by the indexer, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "m4a", "wav", "flac", "ogg"];

pub fn is_supported_audio(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}

/// Every supported audio file under `root`, sorted by path.
///
/// Unreadable subdirectories are logged and skipped; an unreadable root is an error.
/// Symlinks are not followed.
pub(super) fn collect_audio_files(root: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if dir != root => {
                warn!(
                    dir = %dir.display(),
                    error = %source,
                    "Failed to read directory during indexing"
                );
                continue;
            }
            Err(source) => {
                return Err(IngestError::Io { path: dir, source });
            }
        };
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                warn!(path = %path.display(), "Failed to read file type");
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file() && is_supported_audio(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
