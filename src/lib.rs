//! dupefind - duplicate file finder
//!
//! Locates duplicate files across one or more directory trees by comparing
//! file sizes first and content hashes (MD5, SHA-1 or SHA-256) second, then
//! reports every group and lists deletion candidates: all but the most
//! recently modified file of each group.
//!
//! # Library usage
//!
//! ```no_run
//! use dupefind::duplicates::{DuplicateFinder, FinderConfig};
//! use dupefind::output::CandidateList;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_recursive(true));
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")])?;
//! let candidates = CandidateList::from_groups(&groups);
//! println!("{} candidates, {} reclaimable", candidates.len(), summary.reclaimable_display());
//! # Ok::<(), dupefind::duplicates::FinderError>(())
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::delete::{delete_candidates, DeleteConfig};
use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CandidateList, Report};
use crate::progress::Progress;
use crate::signal::ShutdownHandler;

/// Run the application with parsed arguments, printing the report to stdout.
///
/// # Errors
///
/// Returns configuration errors before any scanning, an interruption error
/// when Ctrl+C was pressed and I/O errors while writing results.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_app_with_output(cli, &mut out)
}

/// Run the application, writing the report to `out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_app_with_output<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.directories.is_empty() {
        return Err(ConfigError::NoDirectories.into());
    }

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(algorithm) = cli.hash_algorithm {
        config.hash_algorithm = algorithm;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    config.validate()?;

    let handler = signal::install_handler().unwrap_or_else(|e| {
        log::warn!("{}; Ctrl+C will terminate immediately", e);
        ShutdownHandler::new()
    });

    let finder_config = FinderConfig::default()
        .with_hash_algorithm(config.hash_algorithm)
        .with_chunk_size(config.chunk_size)
        .with_recursive(cli.recursive)
        .with_rules(config.exclusion_rules())
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(Arc::new(Progress::new(cli.quiet || cli.no_progress)));

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = finder.find_duplicates(&cli.directories)?;

    Report::new(&groups, &summary)
        .write_to(out)
        .context("Failed to write report")?;

    let candidates = CandidateList::from_groups(&groups);
    if let Some(ref path) = cli.output_file {
        let written = candidates
            .write_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if written {
            writeln!(
                out,
                "{} deletion candidate(s) written to {}",
                candidates.len(),
                path.display()
            )?;
        }
    }

    if cli.delete {
        let delete_config = if cli.permanent {
            DeleteConfig::permanent()
        } else {
            DeleteConfig::trash()
        };
        let result = delete_candidates(&groups, &delete_config);
        writeln!(out, "{}", result.summary())?;
        for (path, err) in &result.failures {
            log::error!("{}: {}", path.display(), err);
        }
    }

    Ok(ExitCode::Success)
}
