//! Streaming file hasher.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing MD5, SHA-1 or
//! SHA-256 digests of file contents. Files are read in fixed-size chunks
//! ([`DEFAULT_CHUNK_SIZE`] unless configured otherwise), so memory use does
//! not depend on file size.
//!
//! Digests are rendered as lowercase hexadecimal strings.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{ContentHasher, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(HashAlgorithm::Sha256);
//! let digest = hasher.hash_file(Path::new("photo.jpg")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use digest::Digest;
use serde::{Deserialize, Serialize};

use super::HashError;
use crate::config::ConfigError;

/// Default read size for streaming hashes.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Supported content hash algorithms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5 (default)
    #[default]
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Length of the hex-encoded digest.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(ConfigError::UnsupportedHashAlgorithm(s.to_string())),
        }
    }
}

/// Something that can produce a content digest for a file.
///
/// [`Hasher`] is the production implementation; the duplicate finder only
/// depends on this trait.
pub trait ContentHasher: Send + Sync {
    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the file cannot be opened or read.
    fn hash_file(&self, path: &Path) -> Result<String, HashError>;
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl Hasher {
    /// Create a hasher for the given algorithm with the default chunk size.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the read chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Selected algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Read chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hash everything readable from `reader`.
    ///
    /// `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if a read fails or shutdown is requested.
    pub fn hash_reader<R: Read>(&self, reader: &mut R, path: &Path) -> Result<String, HashError> {
        match self.algorithm {
            HashAlgorithm::Md5 => self.stream_digest::<md5::Md5, R>(reader, path),
            HashAlgorithm::Sha1 => self.stream_digest::<sha1::Sha1, R>(reader, path),
            HashAlgorithm::Sha256 => self.stream_digest::<sha2::Sha256, R>(reader, path),
        }
    }

    fn stream_digest<D: Digest, R: Read>(
        &self,
        reader: &mut R,
        path: &Path,
    ) -> Result<String, HashError> {
        let mut digest = D::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => digest.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            }
        }

        Ok(hex::encode(digest.finalize()))
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

impl ContentHasher for Hasher {
    fn hash_file(&self, path: &Path) -> Result<String, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
        let digest = self.hash_reader(&mut file, path)?;
        log::trace!("{} {}: {}", self.algorithm, digest, path.display());
        Ok(digest)
    }
}
