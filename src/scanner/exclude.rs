//! Exclusion rules for directory traversal.
//!
//! # Overview
//!
//! [`ExclusionRules`] decides whether a directory or file is invisible to a
//! scan. The decision is a pure function of the absolute path and two tables:
//!
//! - `excluded_dirs`: directory names (or absolute roots such as `/usr`)
//! - `excluded_files`: filename suffixes and special filenames
//!
//! The rules, in evaluation order:
//!
//! 1. A path component equal to an excluded directory name excludes the path.
//!    An absolute entry excludes everything below that root.
//! 2. An entry in either table starting with `.` excludes any path whose final
//!    component starts with the rest of the entry. The entry `.*` excludes every
//!    final component starting with `.`.
//! 3. A final component ending with an excluded file entry excludes the path.
//!
//! The built-in tables are [`DEFAULT_EXCLUDED_DIRS`] and
//! [`DEFAULT_EXCLUDED_FILES`]; [`ExclusionRules::new`] builds any other set.
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::ExclusionRules;
//! use std::path::Path;
//!
//! let rules = ExclusionRules::new(["node_modules"], [".tmp"]);
//! assert!(rules.should_exclude(Path::new("/src/node_modules/lib.js")));
//! assert!(rules.should_exclude(Path::new("/src/build.tmp")));
//! assert!(!rules.should_exclude(Path::new("/src/main.rs")));
//! ```

use std::path::{Component, Path, PathBuf};

/// Directory names excluded by default.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    // System roots
    "/System",
    "/Library",
    "/private",
    "/dev",
    "/Volumes",
    "/Network",
    "/cores",
    "/opt",
    "/sbin",
    "/usr",
    "/bin",
    "/etc",
    "/var",
    // Hidden entries
    ".*",
    // Dependency and build output
    "node_modules",
    "venv",
    ".venv",
    "env",
    ".env",
    "__pycache__",
    "build",
    "dist",
    "target",
    // Version control and editors
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    // Caches
    "cache",
    ".cache",
    "tmp",
    "temp",
    // Backups
    "backup",
    "backups",
    ".backup",
    ".backups",
];

/// Filename suffixes and special filenames excluded by default.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    // System files
    ".DS_Store",
    ".localized",
    ".Trash",
    ".Trashes",
    ".Spotlight-V100",
    ".fseventsd",
    ".TemporaryItems",
    ".DocumentRevisions-V100",
    ".PKInstallSandboxManager",
    ".CFUserTextEncoding",
    ".hotfiles.btree",
    ".vol",
    // Shell and tool configuration
    ".config",
    ".profile",
    ".bashrc",
    ".bash_profile",
    ".zshrc",
    ".zprofile",
    ".ssh",
    ".gnupg",
    ".pki",
    // Package manager caches
    ".cache",
    ".npm",
    ".pip",
    ".m2",
    ".gradle",
    ".ivy2",
    ".sbt",
    // Databases
    ".sqlite",
    ".db",
    ".sqlite3",
    ".db3",
    // Temporary files
    ".tmp",
    ".temp",
    ".swp",
    ".swo",
    ".bak",
    ".backup",
    // Compiled and binary artifacts
    ".pyc",
    ".pyo",
    ".pyd",
    ".so",
    ".dll",
    ".exe",
    ".dylib",
    ".bundle",
];

/// Leading marker of entries matched by prefix against the final component.
const HIDDEN_MARKER: char = '.';

/// Entry matching every final component that starts with [`HIDDEN_MARKER`].
const HIDDEN_WILDCARD: &str = ".*";

/// Exclusion tables used while walking directory trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    excluded_dirs: Vec<String>,
    excluded_files: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_DIRS.iter().copied(),
            DEFAULT_EXCLUDED_FILES.iter().copied(),
        )
    }
}

impl ExclusionRules {
    /// Build rules from custom tables.
    ///
    /// # Arguments
    ///
    /// * `excluded_dirs` - Directory names or absolute roots
    /// * `excluded_files` - Filename suffixes or special filenames
    #[must_use]
    pub fn new<D, F>(excluded_dirs: D, excluded_files: F) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
            excluded_files: excluded_files.into_iter().map(Into::into).collect(),
        }
    }

    /// Rules that exclude nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            excluded_dirs: Vec::new(),
            excluded_files: Vec::new(),
        }
    }

    /// Configured directory entries.
    #[must_use]
    pub fn excluded_dirs(&self) -> &[String] {
        &self.excluded_dirs
    }

    /// Configured file entries.
    #[must_use]
    pub fn excluded_files(&self) -> &[String] {
        &self.excluded_files
    }

    /// Check whether a path should be skipped during traversal.
    ///
    /// Relative paths are resolved against the current directory first.
    /// The filesystem is never touched.
    #[must_use]
    pub fn should_exclude(&self, path: &Path) -> bool {
        let abs_path = absolute(path);
        let file_name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(entry) = self.matching_dir(&abs_path) {
            log::trace!("Excluded by directory '{}': {}", entry, abs_path.display());
            return true;
        }

        if let Some(entry) = self.matching_hidden_prefix(&file_name) {
            log::trace!("Excluded by prefix '{}': {}", entry, abs_path.display());
            return true;
        }

        if let Some(entry) = self.matching_suffix(&file_name) {
            log::trace!("Excluded by suffix '{}': {}", entry, abs_path.display());
            return true;
        }

        false
    }

    /// Rule 1: exact component match, or containment in an absolute root.
    fn matching_dir(&self, abs_path: &Path) -> Option<&str> {
        self.excluded_dirs
            .iter()
            .find(|entry| {
                let entry_path = Path::new(entry.as_str());
                if entry_path.is_absolute() {
                    abs_path.starts_with(entry_path)
                } else {
                    abs_path.components().any(|c| match c {
                        Component::Normal(name) => name == entry.as_str(),
                        _ => false,
                    })
                }
            })
            .map(String::as_str)
    }

    /// Rule 2: dot entries match by prefix-after-dot against the final component.
    fn matching_hidden_prefix(&self, file_name: &str) -> Option<&str> {
        if file_name.is_empty() {
            return None;
        }

        self.excluded_dirs
            .iter()
            .chain(self.excluded_files.iter())
            .find(|entry| {
                if entry.as_str() == HIDDEN_WILDCARD {
                    return file_name.starts_with(HIDDEN_MARKER);
                }
                match entry.strip_prefix(HIDDEN_MARKER) {
                    Some(rest) if !rest.is_empty() => file_name.starts_with(rest),
                    _ => false,
                }
            })
            .map(String::as_str)
    }

    /// Rule 3: suffix match against the final component.
    fn matching_suffix(&self, file_name: &str) -> Option<&str> {
        if file_name.is_empty() {
            return None;
        }

        self.excluded_files
            .iter()
            .find(|entry| !entry.is_empty() && file_name.ends_with(entry.as_str()))
            .map(String::as_str)
    }
}

/// Resolve a path to absolute form without touching the filesystem.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
