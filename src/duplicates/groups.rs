//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection: files with
//! different sizes cannot be duplicates, so only files sharing a size are
//! ever hashed. The second phase groups hashed files by [`GroupKey`], the
//! pair of size and hex digest.
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::FileEntry;
//! use dupefind::duplicates::group_by_size;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// Composite key of a hash bucket.
///
/// Ordered by size, then digest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// File size in bytes
    pub size: u64,
    /// Lowercase hexadecimal content digest
    pub digest: String,
}

impl GroupKey {
    /// Create a new group key.
    #[must_use]
    pub fn new(size: u64, digest: impl Into<String>) -> Self {
        Self {
            size,
            digest: digest.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.size, self.digest)
    }
}

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Size and digest shared by every member
    pub key: GroupKey,
    /// Members in discovery order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(key: GroupKey, files: Vec<FileEntry>) -> Self {
        debug_assert!(
            files.iter().all(|f| f.size == key.size),
            "group members must share the key size"
        );
        Self { key, files }
    }

    /// Size shared by every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.key.size
    }

    /// Hex digest shared by every member.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.key.digest
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.key.size * self.files.len() as u64
    }

    /// Space wasted by the extra copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.key.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (excluding the keeper).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Members ordered newest first; ties fall back to path order.
    #[must_use]
    pub fn sorted_by_recency(&self) -> Vec<&FileEntry> {
        let mut sorted: Vec<&FileEntry> = self.files.iter().collect();
        sorted.sort_by(|a, b| recency_order(a, b));
        sorted
    }

    /// The member that is never a deletion candidate.
    #[must_use]
    pub fn keeper(&self) -> Option<&FileEntry> {
        self.files.iter().min_by(|a, b| recency_order(a, b))
    }

    /// Every member except the keeper, newest first.
    #[must_use]
    pub fn deletion_candidates(&self) -> Vec<&FileEntry> {
        self.sorted_by_recency().into_iter().skip(1).collect()
    }

    /// Get all file paths in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Latest modification time first, then smallest path.
fn recency_order(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.modified
        .cmp(&a.modified)
        .then_with(|| a.path.cmp(&b.path))
}

/// Duplicate groups keyed by size and digest.
pub type DuplicateGroups = BTreeMap<GroupKey, DuplicateGroup>;

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Buckets with a single file are dropped. Empty files are grouped like any
/// other size, so several empty files form a duplicate group.
///
/// # Returns
///
/// A tuple of:
/// - `BTreeMap<u64, Vec<FileEntry>>` - Files grouped by size (only groups with 2+ files),
///   discovery order preserved inside each bucket
/// - `GroupingStats` - Statistics about the grouping operation
///
/// # Example
///
/// ```
/// use dupefind::scanner::FileEntry;
/// use dupefind::duplicates::group_by_size;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100, SystemTime::now()),
///     FileEntry::new(PathBuf::from("/b.txt"), 100, SystemTime::now()),
///     FileEntry::new(PathBuf::from("/c.txt"), 200, SystemTime::now()),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (BTreeMap<u64, Vec<FileEntry>>, GroupingStats) {
    let mut all_groups: BTreeMap<u64, Vec<FileEntry>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    let mut filtered = BTreeMap::new();
    for (size, files) in all_groups {
        if files.len() < 2 {
            stats.eliminated_unique += files.len();
            if let Some(file) = files.first() {
                log::trace!("Eliminated unique size {}: {}", size, file.path.display());
            }
            continue;
        }
        stats.potential_duplicates += files.len();
        stats.duplicate_groups += 1;
        log::debug!(
            "Size group {} bytes: {} potential duplicates",
            size,
            files.len()
        );
        filtered.insert(size, files);
    }

    log::info!(
        "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (filtered, stats)
}

/// Group hashed files by [`GroupKey`] (Phase 2 of duplicate detection).
///
/// Buckets with fewer than two members are dropped.
#[must_use]
pub fn group_by_hash(hashed: impl IntoIterator<Item = (FileEntry, String)>) -> DuplicateGroups {
    let mut buckets: BTreeMap<GroupKey, Vec<FileEntry>> = BTreeMap::new();
    for (file, digest) in hashed {
        buckets
            .entry(GroupKey::new(file.size, digest))
            .or_default()
            .push(file);
    }

    buckets
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(key, files)| (key.clone(), DuplicateGroup::new(key, files)))
        .collect()
}
