//! Error types for list operations.

use thiserror::Error;

/// Errors reported by list operations and configuration.
///
/// A missing key is never an error: `update` reports it as `Ok(false)` and
/// `find` as `Ok(false)`.
///
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListError {
    /// A key, value or output buffer that the list cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored value no longer matches its checksum.
    #[error("Checksum mismatch for key {key:?}: stored {stored}, computed {computed}")]
    ChecksumMismatch {
        key: String,
        stored: u64,
        computed: u64,
    },

    /// A configuration value that names no known discipline.
    #[error("Unknown discipline: {0:?}")]
    UnknownDiscipline(String),
}

impl ListError {
    /// Create an invalid argument error
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether the caller must treat this error as unrecoverable.
    ///
    /// Precondition and integrity violations are fatal: the list cannot tell
    /// corruption from a transient fault, so it never retries. The decision to
    /// terminate is left to the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::ChecksumMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
