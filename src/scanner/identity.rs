//! On-disk file identity.
//!
//! Several paths can name one file: a directory given twice, overlapping
//! roots, symbolic links to files and hardlinks. Such aliases share their
//! content but are not duplicates, and deleting one of them may delete the
//! only copy. [`IdentityTracker`] lets the finder keep the first path seen
//! for each file and drop the rest.
//!
//! # Platform Support
//!
//! - **Unix**: `(device, inode)` from file metadata
//! - **Other**: identity is unknown, every path is treated as its own file

use std::collections::HashSet;
use std::fs::Metadata;

/// Identity of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    /// Device holding the file
    pub dev: u64,
    /// Inode number on that device
    pub ino: u64,
}

impl FileId {
    /// Read the identity from metadata, when the platform provides one.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    /// Read the identity from metadata, when the platform provides one.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Remembers which files have been seen during one scan.
///
/// Not thread-safe; the finder owns one per scan.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    seen: HashSet<FileId>,
}

impl IdentityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` and report whether it was seen before.
    ///
    /// An unknown identity is never an alias.
    pub fn is_alias(&mut self, id: Option<FileId>) -> bool {
        match id {
            Some(id) => !self.seen.insert(id),
            None => false,
        }
    }

    /// Number of distinct files recorded.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Whether identities are available on this platform.
    #[must_use]
    pub const fn is_supported() -> bool {
        cfg!(unix)
    }
}
