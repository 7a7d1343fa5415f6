//! Reply documents returned by the model, and the parsing that enforces the
//! contract.

use std::collections::BTreeMap;

use serde::Deserialize;

use tw_model::{GameState, Location, TurnStatus, World};

use crate::error::{EngineError, EngineResult};

/// The document shape expected from a world-generation request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WorldReply {
    /// The generated world contract.
    #[serde(default)]
    pub world: World,
    /// The starting location, inserted when its name is non-empty.
    #[serde(default)]
    pub initial_location: Location,
    /// The initial game state.
    #[serde(default)]
    pub state: GameState,
}

/// The document shape expected from a turn-resolution request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TurnReply {
    /// Narrated outcome of the action.
    #[serde(default)]
    pub outcome: String,
    /// Game status after the turn.
    #[serde(default)]
    pub status: TurnStatus,
    /// A newly discovered (or re-described) location, if any.
    #[serde(default)]
    pub discovered_location: Option<Location>,
    /// Human-readable explanations of state changes.
    #[serde(default)]
    pub explanations: Vec<String>,
    /// Changed stat key to change description.
    #[serde(default)]
    pub changes: BTreeMap<String, String>,
    /// The complete replacement state.
    #[serde(default)]
    pub state: GameState,
}

/// Strip an optional fenced code block from a raw reply.
///
/// Models sometimes wrap the requested document in ```` ```yaml ```` (or a
/// bare fence) despite instructions; the wrapper is noise, not an error.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```yaml") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a world-generation reply.
pub fn parse_world_reply(raw: &str) -> EngineResult<WorldReply> {
    parse_document(raw)
}

/// Parse a turn-resolution reply.
pub fn parse_turn_reply(raw: &str) -> EngineResult<TurnReply> {
    parse_document(raw)
}

fn parse_document<T: for<'de> Deserialize<'de>>(raw: &str) -> EngineResult<T> {
    let clean = strip_code_fence(raw);
    if clean.is_empty() {
        return Err(EngineError::EmptyReply);
    }
    serde_yaml::from_str(clean).map_err(|source| EngineError::MalformedReply {
        source,
        raw: clean.to_string(),
    })
}
