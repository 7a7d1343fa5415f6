//! Locations discovered during play.

use serde::{Deserialize, Serialize};

/// A place the player has discovered.
///
/// Locations are immutable once discovered, except that a turn reply naming
/// an already-known location overwrites it wholesale (re-discovery).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Unique name, also the key in the session's location map.
    #[serde(default)]
    pub name: String,
    /// Prose description of the place.
    #[serde(default)]
    pub description: String,
    /// People currently present.
    #[serde(default)]
    pub people: Vec<String>,
    /// Notable objects currently present.
    #[serde(default)]
    pub objects: Vec<String>,
}
