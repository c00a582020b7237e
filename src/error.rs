//! Exit codes and their mapping from application errors.

use crate::config::ConfigError;
use crate::duplicates::FinderError;

/// Exit codes for the dupefind binary.
///
/// - 0: Success (with or without duplicates)
/// - 1: General error (unexpected failure)
/// - 2: Configuration error (nothing was scanned)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Configuration error: Invalid options, rejected before scanning.
    ConfigError = 2,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::ConfigError => "DF002",
            Self::Interrupted => "DF130",
        }
    }

    /// Classify an error returned by `run_app`.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(finder) = cause.downcast_ref::<FinderError>() {
                return match finder {
                    FinderError::Interrupted => Self::Interrupted,
                    FinderError::Config(_) => Self::ConfigError,
                };
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Self::ConfigError;
            }
        }
        Self::GeneralError
    }
}
