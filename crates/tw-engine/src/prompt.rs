//! Prompt rendering for world generation, turn resolution, and history
//! summarization.
//!
//! Every mapping rendered here comes out of a `BTreeMap`, so prompt text is
//! deterministic for a given session.

use tw_model::{GameSession, GameState, HistoryEntry};

/// Hint sentinel asking the model to invent an unconstrained theme.
pub const RANDOM_HINT: &str = "random";

/// Render the world-generation prompt for `hint`.
pub fn generate_world(hint: &str) -> String {
    let mut out = String::from(
        "You are the game master for a single-player text adventure. \
         Invent a world for the player to explore.\n\n",
    );

    if hint == RANDOM_HINT {
        out.push_str("Pick any theme you like. Surprise the player.\n\n");
    } else {
        out.push_str(&format!(
            "The player gave this theme hint: \"{hint}\". Honor it.\n\n"
        ));
    }

    out.push_str(
        "Reply with a single YAML document and nothing else, shaped exactly \
         like this:\n\n\
         world:\n\
         \x20 title: <evocative title>\n\
         \x20 short_name: <short lowercase identifier, hyphens for spaces>\n\
         \x20 description: |\n\
         \x20   <a few paragraphs introducing the world and the player's situation>\n\
         \x20 possibilities:\n\
         \x20   - <a kind of action the player can take here>\n\
         \x20 state_schema: <one sentence describing what the state fields track>\n\
         \x20 stat_display_names:\n\
         \x20   <stat key>: <human-readable display name>\n\
         \x20 stat_polarity:\n\
         \x20   <stat key>: good or bad (good means a higher value is better)\n\
         \x20 win_conditions: <how the player wins>\n\
         \x20 lose_conditions: <how the player loses>\n\
         initial_location:\n\
         \x20 name: <name of the starting location>\n\
         \x20 description: <what the player finds there>\n\
         \x20 people: [<anyone present>]\n\
         \x20 objects: [<anything notable>]\n\
         state:\n\
         \x20 inventory: [<starting items>]\n\
         \x20 stats:\n\
         \x20   <stat key>: <string value>\n\
         \x20 current_location: <must equal the initial location's name>\n\
         \x20 health: <string value>\n\
         \x20 progress: <string value>\n\n\
         Use YAML literal block style (|) for any multi-line prose. In prose, \
         mark salient nouns with **bold** and put spoken dialogue in \
         \"double quotes\". Do not wrap the document in a code fence.\n",
    );

    out
}

/// Render the turn-resolution prompt for `action` against `session`.
pub fn turn(session: &GameSession, action: &str) -> String {
    let mut out = String::from(
        "You are the game master for a text adventure. Resolve the player's \
         action against the world and state below.\n\n",
    );

    out.push_str("WORLD:\n");
    out.push_str(&session.world.description);
    out.push_str("\n\n");

    out.push_str("WIN CONDITIONS (guide the story toward or away from these; \
                  never reveal them to the player verbatim):\n");
    out.push_str(&session.world.win_conditions);
    out.push('\n');
    out.push_str("LOSE CONDITIONS (same rule; never reveal verbatim):\n");
    out.push_str(&session.world.lose_conditions);
    out.push_str("\n\n");

    out.push_str("KNOWN LOCATIONS:\n");
    out.push_str(&known_locations(session));
    out.push('\n');

    out.push_str("CURRENT STATE:\n");
    out.push_str(&current_state(&session.state));
    out.push('\n');

    out.push_str("HISTORY:\n");
    out.push_str(&history(session));
    out.push('\n');

    out.push_str("PLAYER ACTION:\n");
    out.push_str(action);
    out.push_str("\n\n");

    out.push_str(
        "Narrate what happens, then return the complete updated state. Reply \
         with a single YAML document and nothing else:\n\n\
         outcome: |\n\
         \x20 <narration of the outcome; **bold** salient nouns, \"double quotes\" for dialogue>\n\
         status: PLAYING, WON or LOST\n\
         discovered_location:   # only when the action reveals a new or changed location\n\
         \x20 name: <location name>\n\
         \x20 description: <what is there>\n\
         \x20 people: [<anyone present>]\n\
         \x20 objects: [<anything notable>]\n\
         explanations:          # optional, human-readable state-change notes\n\
         \x20 - <explanation>\n\
         changes:               # optional, changed stat key to short description\n\
         \x20 <stat key>: <what changed>\n\
         state:\n\
         \x20 <the complete replacement state, same shape as CURRENT STATE's source>\n\n\
         The state you return replaces the old state wholesale: carry forward \
         every field that did not change.\n",
    );

    out
}

/// Render the summarization prompt: the existing summary plus the entries
/// being folded into it.
pub fn summarize(summary: &str, folded: &[HistoryEntry]) -> String {
    let mut out = String::from(
        "You maintain the running summary of a text adventure's story so \
         far.\n\nCURRENT SUMMARY:\n",
    );
    if summary.is_empty() {
        out.push_str("(none yet)\n");
    } else {
        out.push_str(summary);
        out.push('\n');
    }

    out.push_str("\nNEW EVENTS:\n");
    for entry in folded {
        out.push_str(&format!("Action: {}\n", entry.player_action));
        out.push_str(&format!("Outcome: {}\n", entry.outcome));
    }

    out.push_str(
        "\nFold the new events into the summary, keeping every detail that \
         could matter later. Reply with the updated summary as plain prose \
         only — no headings, no YAML, no commentary.\n",
    );

    out
}

fn known_locations(session: &GameSession) -> String {
    if session.locations.is_empty() {
        return "(none yet)\n".to_string();
    }
    let mut out = String::new();
    for (name, loc) in &session.locations {
        out.push_str(&format!(
            "- {name}: {} (People: {}; Objects: {})\n",
            loc.description,
            join_or_none(&loc.people),
            join_or_none(&loc.objects),
        ));
    }
    out
}

fn current_state(state: &GameState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Location: {}\n", state.current_location));
    out.push_str(&format!("Health: {}\n", state.health));
    out.push_str(&format!("Progress: {}\n", state.progress));
    out.push_str(&format!("Inventory: {}\n", join_or_none(&state.inventory)));
    if !state.stats.is_empty() {
        out.push_str("Stats:\n");
        for (key, value) in &state.stats {
            out.push_str(&format!("  {key}: {value}\n"));
        }
    }
    out
}

fn history(session: &GameSession) -> String {
    let hist = &session.history;
    if hist.summary.is_empty() && hist.entries.is_empty() {
        return "(the adventure is just beginning)\n".to_string();
    }

    let mut out = String::new();
    if !hist.summary.is_empty() {
        out.push_str(&format!("Summary of previous events: {}\n\n", hist.summary));
    }
    for entry in &hist.entries {
        out.push_str(&format!("Action: {}\n", entry.player_action));
        out.push_str(&format!("Outcome: {}\n", entry.outcome));
        out.push_str(&format!(
            "Status: {}\n",
            match entry.status {
                tw_model::TurnStatus::Playing => "PLAYING",
                tw_model::TurnStatus::Won => "WON",
                tw_model::TurnStatus::Lost => "LOST",
            }
        ));
        if !entry.changes.is_empty() {
            let pairs: Vec<String> = entry
                .changes
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            out.push_str(&format!("Side effects: {}\n", pairs.join("; ")));
        }
        if !entry.inventory.is_empty() {
            out.push_str(&format!("Inventory: {}\n", entry.inventory.join(", ")));
        }
    }
    out
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
