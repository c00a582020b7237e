//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk** - Collect candidate paths from every root (see [`crate::scanner::Walker`])
//! 2. **Phase 1 - Size grouping**: Stat every path and group by size
//!    (see [`crate::duplicates::groups`] module)
//! 3. **Phase 2 - Content hash**: Hash only size-colliding files and group
//!    them by size and digest
//!
//! Per-path failures never abort the scan: they are logged, recorded in the
//! [`ScanSummary`] and the path is dropped.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::duplicates::{DuplicateFinder, FinderConfig};
//! use dupefind::scanner::HashAlgorithm;
//! use std::path::PathBuf;
//!
//! let config = FinderConfig::default()
//!     .with_recursive(true)
//!     .with_hash_algorithm(HashAlgorithm::Sha256);
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{group_by_hash, group_by_size, DuplicateGroup, DuplicateGroups};
use crate::config::ConfigError;
use crate::progress::ProgressCallback;
use crate::scanner::{
    stat, ContentHasher, ExclusionRules, FileEntry, HashAlgorithm, HashError, Hasher,
    IdentityTracker, ScanError, Walker, DEFAULT_CHUNK_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Content hash algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// Read buffer size for streaming hashes.
    pub chunk_size: usize,
    /// Descend into subdirectories of each root.
    pub recursive: bool,
    /// Exclusion rules applied while walking.
    pub rules: ExclusionRules,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("hash_algorithm", &self.hash_algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("recursive", &self.recursive)
            .field("rules", &self.rules)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            recursive: false,
            rules: ExclusionRules::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the content hash algorithm.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Set the content hash algorithm by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedHashAlgorithm`] for names other than
    /// `md5`, `sha1` and `sha256`.
    pub fn with_hash_algorithm_name(self, name: &str) -> Result<Self, ConfigError> {
        let algorithm: HashAlgorithm = name.parse()?;
        Ok(self.with_hash_algorithm(algorithm))
    }

    /// Set the read buffer size used while hashing.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Enable or disable recursive traversal.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the exclusion rules.
    #[must_use]
    pub fn with_rules(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of candidate paths handed to detection
    pub total_files: usize,
    /// Number of paths whose metadata was read
    pub files_sized: usize,
    /// Total size of all sized files in bytes
    pub total_size: u64,
    /// Paths dropped because they name a file already seen under another path
    pub aliases_skipped: usize,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files successfully hashed
    pub files_hashed: usize,
    /// Number of files whose hash could not be computed
    pub hash_failures: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding keepers)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Non-fatal errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The finder was invoked with an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Duplicate finder that orchestrates the detection pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<dyn ContentHasher>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new(config.hash_algorithm).with_chunk_size(config.chunk_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self {
            config,
            hasher: Arc::new(hasher),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the content hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Arc<dyn ContentHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Configuration of this finder.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Walk every root and detect duplicates among the discovered files.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] when `roots` is empty (before any
    /// filesystem access) and [`FinderError::Interrupted`] when shutdown was
    /// requested.
    pub fn find_duplicates(
        &self,
        roots: &[PathBuf],
    ) -> Result<(DuplicateGroups, ScanSummary), FinderError> {
        if roots.is_empty() {
            return Err(ConfigError::NoDirectories.into());
        }

        let start_time = Instant::now();
        log::info!(
            "Starting duplicate scan of {} director{} using {}",
            roots.len(),
            if roots.len() == 1 { "y" } else { "ies" },
            self.config.hash_algorithm
        );

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let (paths, walk_errors) = self.collect_paths(roots);

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let (groups, mut summary) = self.detect(&paths)?;

        let mut errors = walk_errors;
        errors.append(&mut summary.scan_errors);
        summary.scan_errors = errors;
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Detect duplicates among an explicit list of file paths.
    ///
    /// Only files sharing their size with another file are hashed.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] when shutdown was requested.
    pub fn detect(&self, paths: &[PathBuf]) -> Result<(DuplicateGroups, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            total_files: paths.len(),
            ..ScanSummary::default()
        };

        // Phase 1: Group by size
        let files = self.stat_all(paths, &mut summary)?;
        let (size_groups, size_stats) = group_by_size(files);
        summary.eliminated_by_size = size_stats.eliminated_unique;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if size_groups.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            summary.scan_duration = start_time.elapsed();
            return Ok((DuplicateGroups::new(), summary));
        }

        // Phase 2: Content hash
        let hashed = self.hash_all(size_groups.into_values().flatten(), &mut summary)?;
        let groups = group_by_hash(hashed);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.values().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.values().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Phase 2 complete: {} hashed → {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.files_hashed,
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Walk all roots, separating paths from non-fatal errors.
    fn collect_paths(&self, roots: &[PathBuf]) -> (Vec<PathBuf>, Vec<ScanError>) {
        let mut walker = Walker::new(
            roots.to_vec(),
            self.config.recursive,
            self.config.rules.clone(),
        );
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!(
                "Walking {} director{}",
                roots.len(),
                if roots.len() == 1 { "y" } else { "ies" }
            ));
        }

        let mut paths = Vec::new();
        let mut errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(path) => {
                    paths.push(path);
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(paths.len(), &paths[paths.len() - 1].to_string_lossy());
                    }
                }
                Err(e) => {
                    log::warn!("{}", e);
                    errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        log::info!("Found {} candidate files", paths.len());
        (paths, errors)
    }

    /// Read metadata for every path; failures are recorded and dropped.
    fn stat_all(
        &self,
        paths: &[PathBuf],
        summary: &mut ScanSummary,
    ) -> Result<Vec<FileEntry>, FinderError> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("sizing", paths.len());
        }

        let mut files = Vec::with_capacity(paths.len());
        let mut identities = IdentityTracker::new();
        for (idx, path) in paths.iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::info!("Phase 1: Interrupted by shutdown signal");
                return Err(FinderError::Interrupted);
            }

            match stat(path) {
                Ok(entry) if identities.is_alias(entry.id) => {
                    log::debug!("Skipping alias of an already seen file: {}", path.display());
                    summary.aliases_skipped += 1;
                }
                Ok(entry) => {
                    summary.total_size += entry.size;
                    files.push(entry);
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    summary.scan_errors.push(e);
                }
            }

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(idx + 1, &path.to_string_lossy());
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("sizing");
        }

        summary.files_sized = files.len();
        Ok(files)
    }

    /// Hash every file; failures are recorded and dropped.
    fn hash_all(
        &self,
        files: impl Iterator<Item = FileEntry>,
        summary: &mut ScanSummary,
    ) -> Result<Vec<(FileEntry, String)>, FinderError> {
        let files: Vec<FileEntry> = files.collect();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", files.len());
        }

        let mut hashed = Vec::with_capacity(files.len());
        for (idx, file) in files.into_iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::info!("Phase 2: Interrupted by shutdown signal");
                return Err(FinderError::Interrupted);
            }

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(idx + 1, &file.path.to_string_lossy());
            }

            match self.hasher.hash_file(&file.path) {
                Ok(digest) => {
                    summary.files_hashed += 1;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_item_completed(file.size);
                    }
                    hashed.push((file, digest));
                }
                Err(HashError::Interrupted(_)) => {
                    log::info!("Phase 2: Interrupted by shutdown signal");
                    return Err(FinderError::Interrupted);
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    summary.hash_failures += 1;
                    summary.scan_errors.push(e.into());
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        Ok(hashed)
    }
}
