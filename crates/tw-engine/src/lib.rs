//! Turn protocol for Taleweaver: prompt rendering, the generation
//! collaborator, reply parsing, and history compaction.
//!
//! The contract with the model is carried entirely in prompt text and
//! enforced by parsing replies as YAML documents. The engine never partially
//! mutates a session: replies are parsed in full before anything is applied.

/// The generation collaborator trait and the Gemini-backed client.
pub mod client;
/// The game engine: world generation, turn processing, summarization.
pub mod engine;
/// Error types for engine operations.
pub mod error;
/// Prompt rendering.
pub mod prompt;
/// Reply documents and parsing.
pub mod reply;

/// Re-export client types.
pub use client::{DEFAULT_MODEL, GeminiClient, TextGenerator};
/// Re-export the engine.
pub use engine::{GameEngine, RETAIN_RECENT, SUMMARIZE_FLOOR, SUMMARIZE_THRESHOLD, TurnReport};
/// Re-export error types.
pub use error::{EngineError, EngineResult};
