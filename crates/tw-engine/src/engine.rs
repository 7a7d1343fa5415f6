//! The game engine: world generation, turn processing, and history
//! compaction against a [`TextGenerator`] collaborator.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use tw_model::{GameSession, HistoryEntry, TurnStatus};

use crate::client::TextGenerator;
use crate::error::EngineResult;
use crate::prompt;
use crate::reply;

/// History length above which a turn triggers compaction.
pub const SUMMARIZE_THRESHOLD: usize = 8;
/// History length at or below which summarization is a no-op.
pub const SUMMARIZE_FLOOR: usize = 5;
/// Number of most-recent entries retained verbatim through compaction.
pub const RETAIN_RECENT: usize = 3;

/// What the controller needs to display after a resolved turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The narrated outcome.
    pub outcome: String,
    /// Game status after the turn.
    pub status: TurnStatus,
    /// Name of a newly discovered location, if the turn revealed one.
    pub discovered_location: Option<String>,
    /// Changed stat key to change description, for the side-effect line.
    pub changes: BTreeMap<String, String>,
}

/// Drives the turn protocol against a generation collaborator.
#[derive(Clone)]
pub struct GameEngine {
    generator: Arc<dyn TextGenerator>,
}

impl GameEngine {
    /// Create an engine over the given collaborator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a new session from a theme hint.
    ///
    /// The literal hint `"random"` asks the model for an unconstrained
    /// theme. The initial location is inserted into the session when it has
    /// a non-empty name, and a missing `short_name` is derived from the
    /// title so auto-save always has a target.
    pub async fn generate_world(&self, hint: &str) -> EngineResult<GameSession> {
        let prompt = prompt::generate_world(hint);
        let raw = self.generator.generate(&prompt).await?;
        let parsed = reply::parse_world_reply(&raw)?;

        let mut session = GameSession {
            world: parsed.world,
            state: parsed.state,
            ..Default::default()
        };
        if session.world.short_name.is_empty() {
            session.world.short_name = derive_short_name(&session.world.title);
        }
        session.insert_location(parsed.initial_location);
        Ok(session)
    }

    /// Resolve one player action, mutating `session` in place.
    ///
    /// Order: compaction check, prompt render, generate, parse, apply. The
    /// reply's state replaces the session state wholesale — the model owns
    /// the full transition, not a diff. On any error the session is left
    /// unmodified (compaction aside, which is independently atomic).
    pub async fn process_turn(
        &self,
        session: &mut GameSession,
        action: &str,
    ) -> EngineResult<TurnReport> {
        if session.history.entries.len() > SUMMARIZE_THRESHOLD {
            // A summarization hiccup must never block play.
            if let Err(err) = self.summarize_history(session).await {
                warn!(%err, "history compaction failed; continuing with full history");
            }
        }

        let prompt = prompt::turn(session, action);
        let raw = self.generator.generate(&prompt).await?;
        let parsed = reply::parse_turn_reply(&raw)?;

        session.state = parsed.state;
        let discovered_location = parsed
            .discovered_location
            .as_ref()
            .filter(|loc| !loc.name.is_empty())
            .map(|loc| loc.name.clone());
        if let Some(location) = parsed.discovered_location {
            session.insert_location(location);
        }
        session.history.entries.push(HistoryEntry {
            player_action: action.to_string(),
            outcome: parsed.outcome.clone(),
            status: parsed.status,
            explanations: parsed.explanations,
            changes: parsed.changes.clone(),
            inventory: session.state.inventory.clone(),
        });

        Ok(TurnReport {
            outcome: parsed.outcome,
            status: parsed.status,
            discovered_location,
            changes: parsed.changes,
        })
    }

    /// Fold older history entries into the running summary.
    ///
    /// No-op at or below [`SUMMARIZE_FLOOR`] entries. Otherwise everything
    /// but the most recent [`RETAIN_RECENT`] entries is folded: the trimmed
    /// reply replaces the summary and the retained suffix replaces the
    /// entries. Recent turns stay verbatim because they matter most for
    /// narrative continuity.
    pub async fn summarize_history(&self, session: &mut GameSession) -> EngineResult<()> {
        if session.history.entries.len() <= SUMMARIZE_FLOOR {
            return Ok(());
        }

        let split = session.history.entries.len() - RETAIN_RECENT;
        let prompt = prompt::summarize(
            &session.history.summary,
            &session.history.entries[..split],
        );
        let raw = self.generator.generate(&prompt).await?;
        let summary = raw.trim();
        if summary.is_empty() {
            return Err(crate::error::EngineError::EmptyReply);
        }

        session.history.summary = summary.to_string();
        session.history.entries.drain(..split);
        Ok(())
    }
}

fn derive_short_name(title: &str) -> String {
    let slug: Vec<String> = title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.join("-")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use tw_model::{GameHistory, Location};

    use crate::error::EngineError;

    use super::*;

    /// Scripted generator: pops one canned reply per call.
    struct Script {
        replies: Mutex<VecDeque<EngineResult<String>>>,
    }

    impl Script {
        fn new(replies: Vec<EngineResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Script {
        async fn generate(&self, _prompt: &str) -> EngineResult<String> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EngineError::Transport("script exhausted".to_string())))
        }
    }

    const WORLD_YAML: &str = "\
world:
  title: The Hollow Light
  short_name: hollow-light
  description: A lighthouse at the end of a drowned causeway.
  win_conditions: Relight the lamp
  lose_conditions: Drown
initial_location:
  name: Shore
  description: Wet sand and old rope.
state:
  inventory: [oilskin coat]
  current_location: Shore
  health: \"100\"
  progress: 0%
";

    const TURN_YAML: &str = "\
outcome: |
  You wade onto the **causeway**. \"Mind the tide,\" calls a voice.
status: PLAYING
discovered_location:
  name: Causeway
  description: Slick stone, half under water.
  people: [the keeper]
changes:
  health: slipped and bruised
state:
  inventory: [oilskin coat, brass key]
  current_location: Causeway
  health: \"90\"
  progress: 15%
";

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            player_action: format!("action {n}"),
            outcome: format!("outcome {n}"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generate_world_builds_session() {
        let engine = GameEngine::new(Script::new(vec![Ok(format!("```yaml\n{WORLD_YAML}```"))]));
        let session = engine.generate_world("haunted lighthouse").await.unwrap();

        assert_eq!(session.world.title, "The Hollow Light");
        assert_eq!(session.world.short_name, "hollow-light");
        assert_eq!(session.state.current_location, "Shore");
        assert!(session.locations.contains_key("Shore"));
        assert!(session.current_location_known());
    }

    #[tokio::test]
    async fn generate_world_derives_missing_short_name() {
        let yaml = "world:\n  title: The Hollow Light\nstate:\n  health: \"100\"\n";
        let engine = GameEngine::new(Script::new(vec![Ok(yaml.to_string())]));
        let session = engine.generate_world("anything").await.unwrap();
        assert_eq!(session.world.short_name, "the-hollow-light");
    }

    #[tokio::test]
    async fn generate_world_surfaces_empty_reply() {
        let engine = GameEngine::new(Script::new(vec![Ok("```\n```".to_string())]));
        let err = engine.generate_world("x").await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyReply));
    }

    #[tokio::test]
    async fn process_turn_applies_reply() {
        let engine = GameEngine::new(Script::new(vec![Ok(TURN_YAML.to_string())]));
        let mut session = GameSession::default();
        session.insert_location(Location {
            name: "Shore".to_string(),
            ..Default::default()
        });

        let report = engine.process_turn(&mut session, "wade in").await.unwrap();

        assert!(report.outcome.contains("causeway"));
        assert_eq!(report.status, TurnStatus::Playing);
        assert_eq!(report.discovered_location.as_deref(), Some("Causeway"));
        assert_eq!(session.state.current_location, "Causeway");
        assert_eq!(session.locations.len(), 2);

        let last = session.history.entries.last().unwrap();
        assert_eq!(last.player_action, "wade in");
        assert_eq!(last.inventory, vec!["oilskin coat", "brass key"]);
        assert_eq!(last.changes["health"], "slipped and bruised");
    }

    #[tokio::test]
    async fn process_turn_overwrites_rediscovered_location() {
        let engine = GameEngine::new(Script::new(vec![Ok(TURN_YAML.to_string())]));
        let mut session = GameSession::default();
        session.insert_location(Location {
            name: "Causeway".to_string(),
            description: "Dry and safe.".to_string(),
            ..Default::default()
        });

        engine.process_turn(&mut session, "wade in").await.unwrap();

        assert_eq!(session.locations.len(), 1);
        assert_eq!(
            session.locations["Causeway"].description,
            "Slick stone, half under water."
        );
    }

    #[tokio::test]
    async fn failed_parse_leaves_session_untouched() {
        let engine = GameEngine::new(Script::new(vec![Ok("status: [broken".to_string())]));
        let mut session = GameSession::default();
        session.state.health = "100".to_string();
        session.insert_location(Location {
            name: "Shore".to_string(),
            ..Default::default()
        });
        session.history.entries.push(entry(1));
        let before = session.clone();

        let err = engine.process_turn(&mut session, "wade in").await.unwrap_err();
        assert!(matches!(err, EngineError::MalformedReply { .. }));
        assert_eq!(session, before);
    }

    #[tokio::test]
    async fn transport_error_leaves_session_untouched() {
        let engine = GameEngine::new(Script::new(vec![Err(EngineError::Transport(
            "connection refused".to_string(),
        ))]));
        let mut session = GameSession::default();
        session.history.entries.push(entry(1));
        let before = session.clone();

        assert!(engine.process_turn(&mut session, "look").await.is_err());
        assert_eq!(session, before);
    }

    #[tokio::test]
    async fn summarize_noop_at_floor() {
        // Script is empty: any generate call would error the operation.
        let engine = GameEngine::new(Script::new(Vec::new()));
        let mut session = GameSession::default();
        session.history.entries = (0..SUMMARIZE_FLOOR).map(entry).collect();
        let before = session.clone();

        engine.summarize_history(&mut session).await.unwrap();
        assert_eq!(session, before);
    }

    #[tokio::test]
    async fn summarize_folds_all_but_recent() {
        let engine = GameEngine::new(Script::new(vec![Ok(
            "The crossing nearly killed you.".to_string()
        )]));
        let mut session = GameSession::default();
        session.history.entries = (0..7).map(entry).collect();

        engine.summarize_history(&mut session).await.unwrap();

        assert_eq!(session.history.summary, "The crossing nearly killed you.");
        assert_eq!(session.history.entries.len(), RETAIN_RECENT);
        assert_eq!(session.history.entries[0].player_action, "action 4");
    }

    #[tokio::test]
    async fn turn_past_threshold_triggers_compaction() {
        let engine = GameEngine::new(Script::new(vec![
            Ok("All of it, in brief.".to_string()),
            Ok(TURN_YAML.to_string()),
        ]));
        let mut session = GameSession::default();
        session.history.entries = (0..9).map(entry).collect();

        engine.process_turn(&mut session, "press on").await.unwrap();

        assert_eq!(session.history.summary, "All of it, in brief.");
        // 3 retained by compaction + the turn just resolved.
        assert_eq!(session.history.entries.len(), RETAIN_RECENT + 1);
    }

    #[tokio::test]
    async fn compaction_failure_does_not_block_the_turn() {
        let engine = GameEngine::new(Script::new(vec![
            Err(EngineError::Transport("summarizer down".to_string())),
            Ok(TURN_YAML.to_string()),
        ]));
        let mut session = GameSession::default();
        session.history.entries = (0..9).map(entry).collect();

        engine.process_turn(&mut session, "press on").await.unwrap();

        assert!(session.history.summary.is_empty());
        assert_eq!(session.history.entries.len(), 10);
    }

    #[test]
    fn short_name_derivation() {
        assert_eq!(derive_short_name("The Hollow Light"), "the-hollow-light");
        assert_eq!(derive_short_name(""), "untitled");
    }

    #[tokio::test]
    async fn summarize_history_keeps_prior_summary_in_prompt() {
        // GameHistory invariant: folded entries live on only in the summary,
        // so the prompt must carry the old summary forward.
        struct Capture {
            prompt: Mutex<String>,
        }
        #[async_trait]
        impl TextGenerator for Capture {
            async fn generate(&self, prompt: &str) -> EngineResult<String> {
                *self.prompt.lock().unwrap() = prompt.to_string();
                Ok("new summary".to_string())
            }
        }

        let capture = Arc::new(Capture {
            prompt: Mutex::new(String::new()),
        });
        let engine = GameEngine::new(capture.clone());
        let mut session = GameSession::default();
        session.history = GameHistory {
            summary: "Old ground already covered.".to_string(),
            entries: (0..6).map(entry).collect(),
        };

        engine.summarize_history(&mut session).await.unwrap();

        let prompt = capture.prompt.lock().unwrap();
        assert!(prompt.contains("Old ground already covered."));
        // Entries 0..=2 are folded; the retained suffix stays out of the
        // summarization prompt.
        assert!(prompt.contains("Action: action 2"));
        assert!(!prompt.contains("Action: action 3"));
    }
}
