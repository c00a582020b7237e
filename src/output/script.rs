//! Deletion-candidate list generation.
//!
//! The candidate file holds one shell-quoted path per line, ready to be fed
//! to a delete command after review:
//!
//! ```text
//! '/home/user/Downloads/report (1).pdf'
//! '/home/user/Downloads/it'\''s here.txt'
//! ```
//!
//! Each path is wrapped in single quotes; an embedded single quote is
//! written as `'\''`. On Unix the raw path bytes are written, so names that
//! are not valid UTF-8 survive unchanged.

use std::borrow::Cow;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateGroups;

/// Every deletion candidate of a scan, in group order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    paths: Vec<PathBuf>,
}

impl CandidateList {
    /// Collect the candidates of every group, keepers excluded.
    #[must_use]
    pub fn from_groups(groups: &DuplicateGroups) -> Self {
        let paths = groups
            .values()
            .flat_map(|group| group.deletion_candidates())
            .map(|file| file.path.clone())
            .collect();
        Self { paths }
    }

    /// Candidate paths.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when there is nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Write one quoted path per line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for path in &self.paths {
            writer.write_all(&quote_bytes(path))?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Write the list to `path`.
    ///
    /// Nothing is created when the list is empty; the return value tells
    /// whether the file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> std::io::Result<bool> {
        if self.is_empty() {
            log::info!("No deletion candidates, {} not written", path.display());
            return Ok(false);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::info!(
            "Wrote {} deletion candidate(s) to {}",
            self.paths.len(),
            path.display()
        );
        Ok(true)
    }
}

/// Quote a path for a POSIX shell.
#[must_use]
pub fn escape_posix(path: &Path) -> OsString {
    bytes_to_os(quote_bytes(path))
}

fn quote_bytes(path: &Path) -> Vec<u8> {
    let raw = path_bytes(path);
    let mut quoted = Vec::with_capacity(raw.len() + 2);
    quoted.push(b'\'');
    for &byte in raw.iter() {
        if byte == b'\'' {
            quoted.extend_from_slice(b"'\\''");
        } else {
            quoted.push(byte);
        }
    }
    quoted.push(b'\'');
    quoted
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

#[cfg(unix)]
fn bytes_to_os(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn bytes_to_os(bytes: Vec<u8>) -> OsString {
    String::from_utf8_lossy(&bytes).into_owned().into()
}
