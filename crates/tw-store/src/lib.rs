//! On-disk persistence for Taleweaver sessions.
//!
//! A save is a directory of YAML documents gated by a version marker. The
//! store takes its root directory at construction — there is no process-wide
//! save path, so tests (and anything else) can point separate stores at
//! separate temporary directories.

/// Error types for save and load operations.
pub mod error;
/// The save store and document layout.
pub mod store;

/// Re-export error types.
pub use error::{StoreError, StoreResult};
/// Re-export the store.
pub use store::{SAVE_VERSION, SaveStore, file_slug};
