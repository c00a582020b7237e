//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more root
//! directories and collecting candidate file paths for duplicate detection.
//!
//! # Features
//!
//! - Recursive (depth-first) or shallow traversal
//! - Excluded directories are pruned before descending into them
//! - Deterministic order: roots in submission order, entries sorted by name
//! - Non-fatal errors: missing roots and unreadable directories are yielded
//!   as [`ScanError`] values and the walk continues
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{ExclusionRules, Walker};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/home/user/Downloads"), PathBuf::from("/home/user/Documents")];
//! let walker = Walker::new(roots, true, ExclusionRules::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{ExclusionRules, ScanError};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root directories, scanned in order
    roots: Vec<PathBuf>,
    /// Descend into subdirectories
    recursive: bool,
    /// Exclusion tables applied to every entry
    rules: ExclusionRules,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories to scan
    /// * `recursive` - Whether to descend into subdirectories
    /// * `rules` - Exclusion rules applied to directories and files
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, recursive: bool, rules: ExclusionRules) -> Self {
        Self {
            roots,
            recursive,
            rules,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, iteration stops at the next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directories of this walker.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk all roots, yielding candidate file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| self.walk_root(root))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
    }

    /// Walk a single root.
    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
    ) -> Box<dyn Iterator<Item = Result<PathBuf, ScanError>> + 'a> {
        if let Err(e) = check_root(root) {
            return Box::new(std::iter::once(Err(e)));
        }

        log::info!(
            "Scanning directory: {} ({})",
            root.display(),
            if self.recursive { "recursive" } else { "shallow" }
        );

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let rules = &self.rules;

        let entries = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            // Excluded directories are never descended into
            .filter_entry(move |entry| entry.depth() == 0 || !rules.should_exclude(entry.path()))
            .filter_map(move |result| match result {
                Ok(entry) => {
                    if is_regular_file(&entry) {
                        log::trace!("Adding file: {}", entry.path().display());
                        Some(Ok(entry.into_path()))
                    } else {
                        None
                    }
                }
                Err(e) => Some(Err(convert_walk_error(root, e))),
            });

        Box::new(entries)
    }
}

/// Validate that a root exists and is a directory.
fn check_root(root: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(root.to_path_buf())),
        Err(e) => Err(ScanError::from_io(root.to_path_buf(), e)),
    }
}

/// Regular files, or symlinks that resolve to regular files.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Convert a walkdir error to ScanError.
fn convert_walk_error(root: &Path, e: walkdir::Error) -> ScanError {
    let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    if e.loop_ancestor().is_some() {
        return ScanError::Io {
            path,
            source: io::Error::other("filesystem loop detected"),
        };
    }
    match e.into_io_error() {
        Some(source) => ScanError::from_io(path, source),
        None => ScanError::Io {
            path,
            source: io::Error::other("directory traversal failed"),
        },
    }
}
