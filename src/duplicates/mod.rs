//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Content hash comparison (Phase 2)
//! - Duplicate group management and keeper selection

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{
    group_by_hash, group_by_size, DuplicateGroup, DuplicateGroups, GroupKey, GroupingStats,
};
