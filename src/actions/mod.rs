//! File actions module.
//!
//! Deletion of duplicate files found by a scan:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (requires explicit configuration)
//! - Verification that a file is unchanged since the scan
//!
//! ```no_run
//! use dupefind::actions::delete::delete_to_trash;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = delete_to_trash(&path);
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_candidates, delete_to_trash, delete_verified, permanent_delete, BatchDeleteResult,
    DeleteConfig, DeleteError, DeleteResult,
};
