//! The session aggregate: one world, its state, history, and locations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::history::GameHistory;
use crate::location::Location;
use crate::state::GameState;
use crate::world::World;

/// A complete in-memory game.
///
/// Created only by world generation or by loading a persisted save; mutated
/// only by the turn protocol. Discarding an unsaved session (restart, quit)
/// is expected behavior, not a fault.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameSession {
    /// The immutable world contract.
    #[serde(default)]
    pub world: World,
    /// The current mutable state.
    #[serde(default)]
    pub state: GameState,
    /// Turn history and summary.
    #[serde(default)]
    pub history: GameHistory,
    /// Discovered locations keyed by name. Sorted iteration keeps prompt
    /// and display output deterministic.
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
}

impl GameSession {
    /// Insert or overwrite a discovered location.
    ///
    /// Locations with an empty name are ignored: the protocol inserts
    /// discoveries before the state update that references them, and a
    /// nameless location can never be referenced.
    pub fn insert_location(&mut self, location: Location) {
        if !location.name.is_empty() {
            self.locations.insert(location.name.clone(), location);
        }
    }

    /// Whether the current location, if set, is a known location key.
    pub fn current_location_known(&self) -> bool {
        self.state.current_location.is_empty()
            || self.locations.contains_key(&self.state.current_location)
    }
}
