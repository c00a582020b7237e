//! Output formatters for duplicate scan results.
//!
//! - [`report`]: human-readable summary printed to stdout
//! - [`script`]: shell-quoted deletion-candidate list
//!
//! # Example
//!
//! ```no_run
//! use dupefind::duplicates::DuplicateFinder;
//! use dupefind::output::{CandidateList, Report};
//! use std::path::{Path, PathBuf};
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! Report::new(&groups, &summary).write_to(&mut std::io::stdout()).unwrap();
//! CandidateList::from_groups(&groups)
//!     .write_file(Path::new("candidates.txt"))
//!     .unwrap();
//! ```

pub mod report;
pub mod script;

// Re-export main types
pub use report::Report;
pub use script::{escape_posix, CandidateList};
