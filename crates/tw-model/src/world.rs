//! The world contract: everything the generation step fixes about a game
//! before play begins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether a higher value of a stat is favorable or unfavorable.
///
/// Used only to frame how a stat is displayed; the engine never interprets
/// stat values numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Higher is better.
    #[default]
    Good,
    /// Lower is better.
    Bad,
}

/// The descriptive contract for a generated world.
///
/// Immutable once generation completes. `win_conditions` and
/// `lose_conditions` are shown to the model on every turn but must never be
/// disclosed verbatim to the player.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct World {
    /// Display title of the world.
    #[serde(default)]
    pub title: String,
    /// Short filesystem-safe identifier, used for auto-saves.
    #[serde(default)]
    pub short_name: String,
    /// Long prose description of the world.
    #[serde(default)]
    pub description: String,
    /// Kinds of actions a player can sensibly take here.
    #[serde(default)]
    pub possibilities: Vec<String>,
    /// Free-text description of what the state fields mean.
    #[serde(default)]
    pub state_schema: String,
    /// Stat key to human-readable display name.
    #[serde(default)]
    pub stat_display_names: BTreeMap<String, String>,
    /// Stat key to display polarity.
    #[serde(default)]
    pub stat_polarity: BTreeMap<String, Polarity>,
    /// How the player wins. Model-only; never narrated verbatim.
    #[serde(default)]
    pub win_conditions: String,
    /// How the player loses. Model-only; never narrated verbatim.
    #[serde(default)]
    pub lose_conditions: String,
}

impl World {
    /// Human-readable name for a stat key, falling back to the key itself.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.stat_display_names
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Display polarity for a stat key. Unlisted keys read as [`Polarity::Good`].
    pub fn polarity(&self, key: &str) -> Polarity {
        self.stat_polarity.get(key).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_key() {
        let mut world = World::default();
        world
            .stat_display_names
            .insert("health".to_string(), "Hull Integrity".to_string());
        assert_eq!(world.display_name("health"), "Hull Integrity");
        assert_eq!(world.display_name("sanity"), "sanity");
    }

    #[test]
    fn polarity_defaults_to_good() {
        let mut world = World::default();
        world.stat_polarity.insert("dread".to_string(), Polarity::Bad);
        assert_eq!(world.polarity("dread"), Polarity::Bad);
        assert_eq!(world.polarity("health"), Polarity::Good);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let world: World = serde_yaml::from_str("title: Test\n").unwrap();
        assert_eq!(world.title, "Test");
        assert!(world.possibilities.is_empty());
        assert!(world.stat_polarity.is_empty());
    }

    #[test]
    fn polarity_parses_lowercase() {
        let world: World =
            serde_yaml::from_str("stat_polarity:\n  health: good\n  dread: bad\n").unwrap();
        assert_eq!(world.polarity("health"), Polarity::Good);
        assert_eq!(world.polarity("dread"), Polarity::Bad);
    }
}
