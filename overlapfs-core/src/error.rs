//! Error types for overlay filesystems.

use thiserror::Error;

/// Errors reported by filesystem layers.
///
/// The overlay never produces these itself; it only passes them through
/// from the layer that failed.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Bad glob pattern: {0}")]
    BadPattern(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl FsError {
    /// True for the one condition that lets an overlay fall back to its base.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;
