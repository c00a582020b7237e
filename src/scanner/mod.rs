//! Scanner module for directory traversal, metadata and content hashing.
//!
//! This module provides functionality for:
//! - Exclusion filtering of system, build and cache paths
//! - Recursive or shallow directory walking using walkdir
//! - Per-file metadata extraction
//! - Streaming content hashing (MD5, SHA-1, SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`exclude`]: Exclusion rules deciding which entries are invisible
//! - [`walker`]: Directory traversal and file discovery
//! - [`metadata`]: Size, modification time and identity lookup
//! - [`identity`]: Recognizing several paths that name one file
//! - [`hasher`]: Streaming file hashing
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{ExclusionRules, Walker};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], true, ExclusionRules::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod exclude;
pub mod hasher;
pub mod identity;
pub mod metadata;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

// Re-export main types
pub use exclude::{ExclusionRules, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_FILES};
pub use hasher::{ContentHasher, HashAlgorithm, Hasher, DEFAULT_CHUNK_SIZE};
pub use identity::{FileId, IdentityTracker};
pub use metadata::stat;
pub use walker::Walker;

/// Metadata for a discovered file.
///
/// Created by [`stat`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file as discovered by the walker
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// On-disk identity, when the platform reports one
    pub id: Option<FileId>,
}

impl FileEntry {
    /// Create a new FileEntry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
            id: None,
        }
    }

    /// Attach the on-disk identity.
    #[must_use]
    pub fn with_id(mut self, id: Option<FileId>) -> Self {
        self.id = id;
        self
    }

    /// True when both entries name the same file on disk.
    ///
    /// Falls back to comparing paths when an identity is unknown.
    #[must_use]
    pub fn same_file(&self, other: &FileEntry) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.path == other.path,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing was aborted because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
