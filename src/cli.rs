//! Command-line interface definitions for dupefind.
//!
//! # Example
//!
//! ```bash
//! # Shallow scan of two directories, MD5 (default)
//! dupefind ~/Downloads ~/Desktop
//!
//! # Recursive scan with SHA-256, writing deletion candidates to a file
//! dupefind -r --hash-algorithm sha256 -o candidates.txt ~/Pictures
//!
//! # Remove the candidates (moved to trash)
//! dupefind -r --delete --yes ~/Pictures
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Find duplicate files by size and content hash.
///
/// Files are grouped by size, then by content hash. In every group of
/// identical files the most recently modified one is kept; all others are
/// deletion candidates.
#[derive(Debug, Parser)]
#[command(name = "dupefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan
    #[arg(value_name = "DIRECTORIES", required = true, num_args = 1..)]
    pub directories: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Content hash algorithm [default: md5, or the configured value]
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub hash_algorithm: Option<HashAlgorithm>,

    /// Write shell-quoted deletion candidates to this file
    #[arg(short, long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not draw progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read buffer size for hashing (e.g. 8192, 64KiB, 1MiB)
    #[arg(long, value_name = "BYTES", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Delete every deletion candidate after the scan (moved to trash)
    #[arg(long, requires = "yes")]
    pub delete: bool,

    /// Remove files permanently instead of moving them to trash
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// Confirm deletion without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Parse a byte count with an optional binary or decimal suffix.
///
/// # Errors
///
/// Returns a message for malformed input, unknown suffixes and zero.
pub fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);

    let count: usize = digits
        .parse()
        .map_err(|_| format!("Invalid chunk size: '{s}'"))?;

    let multiplier: usize = match suffix.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1_000,
        "KIB" => 1 << 10,
        "M" | "MB" => 1_000_000,
        "MIB" => 1 << 20,
        other => return Err(format!("Unknown size suffix: '{other}'")),
    };

    match count.checked_mul(multiplier) {
        Some(0) => Err("Chunk size must be greater than zero".to_string()),
        Some(bytes) => Ok(bytes),
        None => Err(format!("Chunk size too large: '{s}'")),
    }
}
