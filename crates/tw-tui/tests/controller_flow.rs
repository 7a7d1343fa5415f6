//! End-to-end controller scenario against a scripted generator: hint entry
//! through world generation, one resolved turn, and the auto-saves between.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use tw_engine::{EngineResult, GameEngine, TextGenerator};
use tw_store::{SAVE_VERSION, SaveStore};
use tw_tui::app::{App, Screen};
use tw_tui::event::AppEvent;
use tw_tui::log::LogStyle;

struct Script {
    replies: Mutex<VecDeque<String>>,
}

#[async_trait]
impl TextGenerator for Script {
    async fn generate(&self, _prompt: &str) -> EngineResult<String> {
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted"))
    }
}

const WORLD_YAML: &str = "\
world:
  title: The Hollow Light
  short_name: hollow-light
  description: |
    A lighthouse at the end of a drowned causeway. The **lamp** has been
    dark for three nights.
  possibilities:
    - explore the lighthouse
    - talk to the keeper
  state_schema: health and progress toward relighting the lamp
  stat_display_names:
    health: Health
    progress: Progress
  win_conditions: Relight the lamp before the fourth night
  lose_conditions: Drown on the causeway
initial_location:
  name: Shore
  description: Wet sand and old rope.
  people: []
  objects: [rowboat]
state:
  inventory: [matches]
  current_location: Shore
  health: \"100\"
  progress: 0%
";

const TURN_YAML: &str = "\
outcome: |
  You climb to the lamp room and touch a match to the wick. The **lamp**
  blazes. \"About time,\" mutters the keeper.
status: PLAYING
discovered_location:
  name: Lamp Room
  description: Glass on three sides, salt on all of them.
  people: [the keeper]
  objects: [the great lamp]
changes:
  progress: the lamp is lit
state:
  inventory: [matches]
  current_location: Lamp Room
  health: \"100\"
  progress: 80%
";

fn harness(replies: &[&str]) -> (App, UnboundedReceiver<AppEvent>, SaveStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let script = Arc::new(Script {
        replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
    });
    let engine = GameEngine::new(script);
    let store = SaveStore::new(dir.path());
    let app = App::new(engine, store.clone(), tx);
    (app, rx, store, dir)
}

fn submit(app: &mut App, text: &str) {
    app.input = text.to_string();
    app.cursor = app.input.len();
    app.submit();
}

/// Feed completion events into the controller until `done` holds.
async fn pump_until(
    app: &mut App,
    rx: &mut UnboundedReceiver<AppEvent>,
    done: impl Fn(&App) -> bool,
) {
    while !done(app) {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a completion event")
            .expect("event channel closed");
        app.handle_event(event);
    }
}

fn autosave_exists(root: &Path) -> bool {
    root.join("hollow-light").join("version.yaml").is_file()
}

#[tokio::test]
async fn hint_to_turn_to_autosave() {
    let (mut app, mut rx, store, dir) = harness(&[WORLD_YAML, TURN_YAML]);
    assert_eq!(app.screen, Screen::HintEntry);

    // Hint submission kicks off generation.
    submit(&mut app, "haunted lighthouse");
    assert_eq!(app.screen, Screen::Loading);

    pump_until(&mut app, &mut rx, |app| app.screen == Screen::Playing).await;
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.world.title, "The Hollow Light");
    assert!(session.locations.contains_key("Shore"));
    assert!(app.log.iter().any(|l| l.text.contains("drowned causeway")));

    // The fresh world is auto-saved under its slug, with a version marker.
    pump_until(&mut app, &mut rx, |_| autosave_exists(dir.path())).await;
    let marker =
        std::fs::read_to_string(dir.path().join("hollow-light").join("version.yaml")).unwrap();
    assert!(marker.contains(SAVE_VERSION));

    // One turn: echo first, then the narrated outcome and side effects.
    submit(&mut app, "light the lamp");
    assert!(app.turn_pending);
    assert_eq!(app.log.last().unwrap().style, LogStyle::Player);

    pump_until(&mut app, &mut rx, |app| !app.turn_pending).await;
    assert_eq!(app.screen, Screen::Playing);
    assert!(app.log.iter().any(|l| l.text.contains("blazes")));
    assert!(
        app.log
            .iter()
            .any(|l| l.style == LogStyle::SideEffect && l.text.contains("Progress"))
    );

    let session = app.session.as_ref().unwrap();
    assert_eq!(session.state.current_location, "Lamp Room");
    assert_eq!(session.state.progress, "80%");
    assert!(session.locations.contains_key("Lamp Room"));
    assert_eq!(session.history.entries.len(), 1);

    // The post-turn auto-save round-trips to the same session.
    pump_until(&mut app, &mut rx, |app| {
        store.load("hollow-light").is_ok_and(|saved| {
            Some(&saved) == app.session.as_ref()
        })
    })
    .await;
}
