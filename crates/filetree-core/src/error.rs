//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No path was given.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Root path does not exist or cannot be inspected.
    #[error("Failed to stat path {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The scan was cancelled by the caller.
    #[error("Scan cancelled")]
    Cancelled,

    /// The caller's deadline passed before the scan finished.
    #[error("Scan deadline exceeded")]
    DeadlineExceeded,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create a root stat error with path context.
    pub fn not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error means the scan was stopped rather than failed.
    ///
    /// Cancellation and timeouts are expected outcomes of interactive use and
    /// callers usually report them differently from real failures.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied while listing a directory.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
    /// Traversal stopped at the hard depth ceiling.
    DepthCeiling,
    /// Directory had too many entries and was truncated.
    Truncated,
}

/// Non-fatal condition encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a directory that could not be listed.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self {
            message: format!("Failed to read directory {}: {error}", path.display()),
            path,
            kind,
        }
    }

    /// Create a warning for a directory left unexpanded at the depth ceiling.
    pub fn depth_ceiling(path: impl Into<PathBuf>, depth: usize) -> Self {
        let path = path.into();
        Self {
            message: format!("Stopped scan at depth {depth} for {}", path.display()),
            path,
            kind: WarningKind::DepthCeiling,
        }
    }

    /// Create a warning for a directory whose listing was cut short.
    pub fn truncated(path: impl Into<PathBuf>, found: usize, kept: usize) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Directory {} has {found} entries, limited to first {kept}",
                path.display()
            ),
            path,
            kind: WarningKind::Truncated,
        }
    }
}
