//! File metadata extraction.

use std::path::Path;
use std::time::SystemTime;

use super::{FileEntry, FileId, ScanError};

/// Resolve size, modification time and identity for a path.
///
/// Symbolic links are followed. A missing modification time (unsupported
/// platform or filesystem) falls back to the Unix epoch.
///
/// # Errors
///
/// Returns [`ScanError`] when the path vanished, cannot be accessed or is not
/// a regular file.
pub fn stat(path: &Path) -> Result<FileEntry, ScanError> {
    let metadata =
        std::fs::metadata(path).map_err(|e| ScanError::from_io(path.to_path_buf(), e))?;

    if !metadata.is_file() {
        return Err(ScanError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    Ok(FileEntry::new(path.to_path_buf(), metadata.len(), modified)
        .with_id(FileId::from_metadata(&metadata)))
}
