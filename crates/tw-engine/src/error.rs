//! Error types for the turn protocol.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while talking to the generation collaborator.
///
/// Every variant aborts only the operation in progress; the session is left
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The collaborator was unreachable or refused the request.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The collaborator returned no usable content.
    #[error("model returned an empty reply")]
    EmptyReply,

    /// The reply did not parse as the expected document shape. Carries the
    /// raw (fence-stripped) text for diagnostics.
    #[error("model reply did not parse: {source}\n--- reply was ---\n{raw}")]
    MalformedReply {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
        /// The reply text that failed to parse.
        raw: String,
    },
}
