//! Display-log lines and side-effect summaries.

use std::collections::BTreeMap;

use tw_model::World;

/// Visual style of a display-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// The player's own echoed action ("> " prefix).
    Player,
    /// Narrated game text (bold/dialogue markup applied).
    Narration,
    /// A derived side-effect summary after a turn.
    SideEffect,
    /// System messages (saves, restarts, game end).
    System,
    /// Inline errors shown in the log.
    Error,
}

/// One entry in the display log. May span multiple lines of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Visual style of this entry.
    pub style: LogStyle,
    /// The text content.
    pub text: String,
}

impl LogLine {
    /// Convenience constructor.
    pub fn new(style: LogStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// Format a turn's reported changes as one summary line, mapped through the
/// world's display names and sorted for stable output.
pub fn format_side_effects(world: &World, changes: &BTreeMap<String, String>) -> String {
    let mut parts: Vec<String> = changes
        .iter()
        .map(|(key, change)| format!("{}: {change}", world.display_name(key)))
        .collect();
    parts.sort();
    format!("Effects: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_effects_use_display_names_sorted() {
        let mut world = World::default();
        world
            .stat_display_names
            .insert("dread".to_string(), "Creeping Dread".to_string());

        let mut changes = BTreeMap::new();
        changes.insert("health".to_string(), "-10".to_string());
        changes.insert("dread".to_string(), "rising".to_string());

        assert_eq!(
            format_side_effects(&world, &changes),
            "Effects: Creeping Dread: rising, health: -10"
        );
    }
}
