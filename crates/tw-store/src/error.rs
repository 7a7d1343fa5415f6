//! Error types for the save store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while saving, loading, or listing sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A save name was empty or whitespace.
    #[error("save name must not be empty")]
    EmptyName,

    /// The named save does not exist.
    #[error("no save named \"{0}\"")]
    NotFound(String),

    /// The save has no version marker; it predates versioned saves or is
    /// not a save directory at all.
    #[error("save \"{0}\" has no version marker (save may be too old)")]
    VersionMissing(String),

    /// The save was written by an incompatible version.
    #[error("incompatible save version: found {found}, want {expected}")]
    VersionMismatch {
        /// Version string found in the marker document.
        found: String,
        /// Version string this build supports.
        expected: String,
    },

    /// A document failed to serialize or deserialize.
    #[error("malformed save document {path}: {source}")]
    Document {
        /// Path of the offending document.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Filesystem failure.
    #[error("save I/O failed at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
