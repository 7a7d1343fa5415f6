//! Mutable game state, replaced wholesale by each resolved turn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The dynamic state of a game.
///
/// Stat values are free-form strings ("100", "72%", "three of five") — the
/// model owns their meaning; the engine only carries them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Item names currently carried, in acquisition order.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Arbitrary stat key to free-form value.
    #[serde(default)]
    pub stats: BTreeMap<String, String>,
    /// Name of the current location. Once non-empty it should reference a
    /// key in the session's location map.
    #[serde(default)]
    pub current_location: String,
    /// Current health value (free-form).
    #[serde(default)]
    pub health: String,
    /// Current progress value (free-form).
    #[serde(default)]
    pub progress: String,
}
