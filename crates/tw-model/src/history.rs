//! Turn history: resolved turns and the running summary that bounds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether the game is still in play after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnStatus {
    /// The game continues.
    #[default]
    Playing,
    /// The player has met the win conditions.
    Won,
    /// The player has met the lose conditions.
    Lost,
}

/// One resolved turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The player's raw action text.
    #[serde(default)]
    pub player_action: String,
    /// The narrated outcome.
    #[serde(default)]
    pub outcome: String,
    /// Game status after the turn.
    #[serde(default)]
    pub status: TurnStatus,
    /// Human-readable explanations of state deltas, if the model gave any.
    #[serde(default)]
    pub explanations: Vec<String>,
    /// Changed stat key to change description, if the model gave any.
    #[serde(default)]
    pub changes: BTreeMap<String, String>,
    /// Inventory snapshot after the turn.
    #[serde(default)]
    pub inventory: Vec<String>,
}

/// The history of a game: a running prose summary plus the turns not yet
/// folded into it.
///
/// Invariant: once a batch of entries is summarized, those entries are
/// removed and live on only in the summary — a turn is never represented
/// twice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameHistory {
    /// Summary of turns already folded away. Empty until first compaction.
    #[serde(default)]
    pub summary: String,
    /// Turns retained verbatim.
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}
