//! Session model for Taleweaver: the world contract, mutable game state,
//! turn history, and discovered locations.
//!
//! This crate defines the data that the turn protocol produces and the
//! persistence layer stores. It is independent of both — you can construct
//! a [`GameSession`] programmatically or deserialize one from YAML.

/// Turn history: entries, running summary, and turn status.
pub mod history;
/// Discovered locations.
pub mod location;
/// The session aggregate.
pub mod session;
/// Mutable per-turn game state.
pub mod state;
/// The immutable world contract produced by generation.
pub mod world;

/// Re-export history types.
pub use history::{GameHistory, HistoryEntry, TurnStatus};
/// Re-export the location type.
pub use location::Location;
/// Re-export the session aggregate.
pub use session::GameSession;
/// Re-export the game state type.
pub use state::GameState;
/// Re-export world types.
pub use world::{Polarity, World};
