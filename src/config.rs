//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (`--config PATH`, or `config.toml` in the platform
//!    configuration directory)
//! 3. Environment variables prefixed with `DUPEFIND_`
//!
//! Command-line flags are applied on top by the caller.
//!
//! ```toml
//! hash_algorithm = "sha256"
//! chunk_size = 65536
//! excluded_dirs = ["node_modules", ".git"]
//! excluded_files = [".tmp", ".DS_Store"]
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{
    ExclusionRules, HashAlgorithm, DEFAULT_CHUNK_SIZE, DEFAULT_EXCLUDED_DIRS,
    DEFAULT_EXCLUDED_FILES,
};

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "DUPEFIND_";

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while validating configuration, before any scanning.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The requested hash algorithm is not one of md5, sha1, sha256.
    #[error("Unsupported hash algorithm: {0} (expected md5, sha1 or sha256)")]
    UnsupportedHashAlgorithm(String),

    /// No directories were given to scan.
    #[error("No directories specified")]
    NoDirectories,

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file or environment could not be parsed.
    #[error("Invalid configuration: {0}")]
    Load(#[from] figment::Error),

    /// The hashing chunk size must be at least one byte.
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content hash algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// Read buffer size for streaming hashes, in bytes.
    pub chunk_size: usize,
    /// Directory names (or absolute roots) skipped while walking.
    pub excluded_dirs: Vec<String>,
    /// Filename suffixes and special filenames skipped while walking.
    pub excluded_files: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            excluded_files: DEFAULT_EXCLUDED_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// With `path` set the file must exist. Without it the platform default
    /// file is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, cannot be parsed or
    /// holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::FileNotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let config: Self = Self::figment(file.as_deref())
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;

        log::debug!(
            "Configuration loaded (file: {}): {} via {} byte chunks",
            file.as_deref()
                .map_or_else(|| "none".to_string(), |p| p.display().to_string()),
            config.hash_algorithm,
            config.chunk_size
        );
        Ok(config)
    }

    /// Defaults merged with an optional TOML file.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        }
    }

    /// Platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupefind", "dupefind")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChunkSize`] for a zero chunk size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }

    /// Exclusion rules built from the configured tables.
    #[must_use]
    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.excluded_dirs.clone(), self.excluded_files.clone())
    }
}
