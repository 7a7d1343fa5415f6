//! The interactive controller: a state machine over hint entry, loading,
//! play, quit confirmation, and error display.
//!
//! The controller owns the active session outright. Model calls run in
//! spawned tasks against a clone and report back through the event channel;
//! at most one generation or turn task is outstanding at a time, enforced by
//! rejecting submissions rather than queueing them.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use tw_engine::{EngineError, GameEngine};
use tw_model::{GameSession, TurnStatus};
use tw_store::{SaveStore, StoreError};

use crate::directive::{Directive, ParsedInput, parse_input};
use crate::event::{AppEvent, TurnFinish};
use crate::log::{LogLine, LogStyle, format_side_effects};

/// Hint used when the player submits an empty hint.
const DEFAULT_HINT: &str = "random";

/// The controller's current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for a theme hint or a `/load`.
    HintEntry,
    /// World generation in flight.
    Loading,
    /// In play.
    Playing,
    /// Confirming quit (optionally saving first).
    QuitConfirm,
    /// Terminal failure; only quit is accepted.
    Error,
}

/// Tab-completion state for `/load` in hint entry.
#[derive(Debug, Default)]
pub struct CompletionState {
    /// Candidate full input lines.
    pub candidates: Vec<String>,
    /// Currently selected candidate index.
    pub index: usize,
    /// Whether completion is cycling.
    pub active: bool,
    /// The input text before completion started.
    pub original_input: String,
}

/// The interactive controller.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// The active session, if any.
    pub session: Option<GameSession>,
    /// The display log.
    pub log: Vec<LogLine>,
    /// Current input text.
    pub input: String,
    /// Cursor position within the input (byte offset).
    pub cursor: usize,
    /// Inline error shown next to the input (hint entry, quit confirm).
    pub inline_error: Option<String>,
    /// Cached save names for the hint screen and tab completion.
    pub saves: Vec<String>,
    /// Tab-completion state.
    pub completion: CompletionState,
    /// Whether a turn task is outstanding.
    pub turn_pending: bool,
    /// Whether the controller quits once the pending save completes.
    pub quit_after_save: bool,
    /// Failure text for the error screen.
    pub error_text: String,
    /// Whether the main loop should exit.
    pub should_quit: bool,
    /// Log scroll offset from the bottom (0 = pinned to bottom).
    pub scroll: u16,
    /// Busy-spinner animation frame.
    pub spinner_frame: usize,
    engine: GameEngine,
    store: SaveStore,
    tx: UnboundedSender<AppEvent>,
}

impl App {
    /// Create the controller in hint entry.
    pub fn new(engine: GameEngine, store: SaveStore, tx: UnboundedSender<AppEvent>) -> Self {
        let mut app = Self {
            screen: Screen::HintEntry,
            session: None,
            log: Vec::new(),
            input: String::new(),
            cursor: 0,
            inline_error: None,
            saves: Vec::new(),
            completion: CompletionState::default(),
            turn_pending: false,
            quit_after_save: false,
            error_text: String::new(),
            should_quit: false,
            scroll: 0,
            spinner_frame: 0,
            engine,
            store,
            tx,
        };
        app.refresh_saves();
        app
    }

    /// Handle one event from the channel. This is the only place state
    /// changes happen.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) => self.handle_key(key),
            AppEvent::Input(_) => {}
            AppEvent::Tick => self.spinner_frame = self.spinner_frame.wrapping_add(1),
            AppEvent::WorldReady(result) => self.on_world_ready(*result),
            AppEvent::TurnDone(result) => self.on_turn_done(*result),
            AppEvent::SaveDone {
                name,
                announce,
                result,
            } => self.on_save_done(&name, announce, result),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        // Ctrl+C always quits, discarding any in-flight call.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Loading => {}
            Screen::Error => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.should_quit = true;
                }
            }
            Screen::HintEntry | Screen::Playing | Screen::QuitConfirm => self.handle_edit_key(key),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.tab_complete_prev();
                } else {
                    self.tab_complete();
                }
            }
            KeyCode::BackTab => self.tab_complete_prev(),
            KeyCode::Esc => {
                if self.completion.active {
                    self.input = self.completion.original_input.clone();
                    self.cursor = self.input.len();
                    self.clear_completion();
                } else if !self.input.is_empty() {
                    self.input.clear();
                    self.cursor = 0;
                }
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_char(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.len(),
            KeyCode::Up if self.screen == Screen::Playing => {
                self.scroll = self.scroll.saturating_add(1);
            }
            KeyCode::Down if self.screen == Screen::Playing => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Char(c) => self.push_char(c),
            _ => {}
        }
    }

    /// Submit the current input line to whatever screen is active.
    pub fn submit(&mut self) {
        self.clear_completion();
        let text = self.input.trim().to_string();
        match self.screen {
            Screen::HintEntry => self.submit_hint(text),
            Screen::Playing => self.submit_play(text),
            Screen::QuitConfirm => self.submit_quit_confirm(text),
            Screen::Loading | Screen::Error => {}
        }
    }

    fn submit_hint(&mut self, text: String) {
        self.clear_input();
        match parse_input(&text) {
            ParsedInput::Directive(Directive::Load(Some(name))) => self.load_save(&name),
            ParsedInput::Directive(Directive::Load(None)) => {
                self.inline_error = Some("Usage: /load <name>".to_string());
            }
            ParsedInput::Directive(Directive::Quit) => self.should_quit = true,
            ParsedInput::Directive(_) => {
                self.inline_error = Some(format!(
                    "unrecognized command: {text}. Valid commands: /load <name>, /quit"
                ));
            }
            ParsedInput::Action(hint) => {
                self.inline_error = None;
                let hint = if hint.is_empty() {
                    DEFAULT_HINT.to_string()
                } else {
                    hint
                };
                self.screen = Screen::Loading;
                self.start_generation(hint);
            }
        }
    }

    fn submit_play(&mut self, text: String) {
        // Single-slot admission: no new submissions while a turn is out.
        if self.turn_pending || text.is_empty() {
            return;
        }
        self.clear_input();
        match parse_input(&text) {
            ParsedInput::Directive(Directive::Save(Some(name))) => self.spawn_save(name, true),
            ParsedInput::Directive(Directive::Save(None)) => {
                self.push_log(LogStyle::Error, "Usage: /save <name>");
            }
            ParsedInput::Directive(Directive::Restart) => self.restart(),
            ParsedInput::Directive(Directive::Quit) => {
                self.inline_error = None;
                self.screen = Screen::QuitConfirm;
            }
            ParsedInput::Directive(_) => {
                self.push_log(
                    LogStyle::Error,
                    "Unrecognized command. Valid commands: /save <name>, /restart, /quit",
                );
            }
            ParsedInput::Action(action) => {
                // Echo before dispatch: the player always sees their own
                // action ahead of the outcome, whatever the model latency.
                self.push_log(LogStyle::Player, &action);
                self.turn_pending = true;
                self.start_turn(action);
            }
        }
    }

    fn submit_quit_confirm(&mut self, text: String) {
        if self.quit_after_save {
            return;
        }
        self.clear_input();
        match parse_input(&text) {
            ParsedInput::Directive(Directive::Cancel) => {
                self.inline_error = None;
                self.screen = Screen::Playing;
            }
            ParsedInput::Directive(_) => {
                self.inline_error = Some(format!(
                    "unrecognized command: {text}. Valid commands: /cancel"
                ));
            }
            ParsedInput::Action(name) if name.is_empty() => self.should_quit = true,
            ParsedInput::Action(name) => {
                self.inline_error = None;
                self.quit_after_save = true;
                self.spawn_save(name, true);
            }
        }
    }

    fn restart(&mut self) {
        self.session = None;
        self.log.clear();
        self.inline_error = None;
        self.scroll = 0;
        self.screen = Screen::HintEntry;
        self.refresh_saves();
    }

    fn start_generation(&mut self, hint: String) {
        let engine = self.engine.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = engine.generate_world(&hint).await;
            let _ = tx.send(AppEvent::WorldReady(Box::new(result)));
        });
    }

    fn start_turn(&mut self, action: String) {
        let Some(session) = self.session.clone() else {
            self.turn_pending = false;
            return;
        };
        let engine = self.engine.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut session = session;
            let result = engine
                .process_turn(&mut session, &action)
                .await
                .map(|report| TurnFinish { session, report });
            let _ = tx.send(AppEvent::TurnDone(Box::new(result)));
        });
    }

    fn spawn_save(&mut self, name: String, announce: bool) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let store = self.store.clone();
        let tx = self.tx.clone();
        let root = store.root().to_path_buf();
        tokio::spawn(async move {
            let task_name = name.clone();
            let result =
                match tokio::task::spawn_blocking(move || store.save(&task_name, &session)).await {
                    Ok(result) => result,
                    Err(err) => Err(StoreError::Io {
                        path: root,
                        source: std::io::Error::other(err),
                    }),
                };
            let _ = tx.send(AppEvent::SaveDone {
                name,
                announce,
                result,
            });
        });
    }

    fn on_world_ready(&mut self, result: Result<GameSession, EngineError>) {
        match result {
            Ok(session) => {
                self.log.clear();
                self.log.push(LogLine::new(
                    LogStyle::Narration,
                    opening_text(&session),
                ));
                self.scroll = 0;
                self.screen = Screen::Playing;
                let slug = session.world.short_name.clone();
                self.session = Some(session);
                self.spawn_save(slug, false);
            }
            Err(err) => {
                self.error_text = err.to_string();
                self.screen = Screen::Error;
            }
        }
    }

    fn on_turn_done(&mut self, result: Result<TurnFinish, EngineError>) {
        self.turn_pending = false;
        let finish = match result {
            Ok(finish) => finish,
            Err(err) => {
                // A failed turn leaves the narrative and state ambiguous;
                // unlike a bad directive, play does not continue.
                self.error_text = err.to_string();
                self.screen = Screen::Error;
                return;
            }
        };

        self.push_log(LogStyle::Narration, finish.report.outcome.trim());
        if !finish.report.changes.is_empty() {
            let line = format_side_effects(&finish.session.world, &finish.report.changes);
            self.push_log(LogStyle::SideEffect, &line);
        }
        match finish.report.status {
            TurnStatus::Playing => {}
            TurnStatus::Won => self.push_log(LogStyle::System, "The game has ended: you won."),
            TurnStatus::Lost => self.push_log(LogStyle::System, "The game has ended: you lost."),
        }

        let slug = finish.session.world.short_name.clone();
        self.session = Some(finish.session);
        self.scroll = 0;
        self.spawn_save(slug, false);
    }

    fn on_save_done(&mut self, name: &str, announce: bool, result: Result<(), StoreError>) {
        match result {
            Ok(()) => {
                if announce {
                    self.push_log(LogStyle::System, format!("Game saved as '{name}'"));
                }
                if self.quit_after_save {
                    self.should_quit = true;
                }
            }
            Err(err) => {
                warn!(%err, name, "save failed");
                self.push_log(LogStyle::Error, format!("Failed to save '{name}': {err}"));
                if self.quit_after_save {
                    // Don't quit on a failed save; the player would lose the
                    // progress they just asked to keep.
                    self.quit_after_save = false;
                    self.screen = Screen::Playing;
                }
            }
        }
    }

    fn load_save(&mut self, name: &str) {
        match self.store.load(name) {
            Ok(session) => {
                self.session = Some(session);
                self.rebuild_log();
                self.inline_error = None;
                self.scroll = 0;
                self.screen = Screen::Playing;
            }
            Err(err) => {
                self.inline_error = Some(format!("failed to load '{name}': {err}"));
            }
        }
    }

    /// Reconstruct the display log from a loaded session's history.
    fn rebuild_log(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let mut log = vec![LogLine::new(LogStyle::Narration, opening_text(session))];
        for entry in &session.history.entries {
            log.push(LogLine::new(LogStyle::Player, &entry.player_action));
            log.push(LogLine::new(LogStyle::Narration, &entry.outcome));
            if !entry.changes.is_empty() {
                log.push(LogLine::new(
                    LogStyle::SideEffect,
                    format_side_effects(&session.world, &entry.changes),
                ));
            }
        }
        self.log = log;
    }

    fn refresh_saves(&mut self) {
        self.saves = self.store.list().unwrap_or_else(|err| {
            warn!(%err, "listing saves failed");
            Vec::new()
        });
    }

    fn push_log(&mut self, style: LogStyle, text: impl Into<String>) {
        self.log.push(LogLine::new(style, text));
        self.scroll = 0;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // --- tab completion (hint entry, `/load ` prefix) ---

    fn tab_complete(&mut self) {
        if self.screen != Screen::HintEntry {
            return;
        }
        if self.completion.active {
            self.cycle_completion(1);
        } else {
            self.start_completion();
        }
    }

    fn tab_complete_prev(&mut self) {
        if self.completion.active {
            self.cycle_completion(-1);
        }
    }

    fn start_completion(&mut self) {
        let Some(partial) = self.input.strip_prefix("/load ") else {
            return;
        };
        let partial = partial.trim().to_string();
        self.refresh_saves();
        let candidates: Vec<String> = self
            .saves
            .iter()
            .filter(|name| name.starts_with(&partial))
            .map(|name| format!("/load {name}"))
            .collect();
        if candidates.is_empty() {
            return;
        }
        self.completion.original_input = self.input.clone();
        self.completion.candidates = candidates;
        self.completion.index = 0;
        self.completion.active = true;
        self.apply_completion();
    }

    fn cycle_completion(&mut self, step: isize) {
        let len = self.completion.candidates.len();
        if len == 0 {
            return;
        }
        let index = self.completion.index as isize + step;
        self.completion.index = index.rem_euclid(len as isize) as usize;
        self.apply_completion();
    }

    fn apply_completion(&mut self) {
        self.input = self.completion.candidates[self.completion.index].clone();
        self.cursor = self.input.len();
    }

    fn clear_completion(&mut self) {
        self.completion.active = false;
        self.completion.candidates.clear();
        self.completion.index = 0;
        self.completion.original_input.clear();
    }

    // --- input editing ---

    fn push_char(&mut self, c: char) {
        self.clear_completion();
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        self.clear_completion();
        if self.cursor > 0 {
            let prev = self.input[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.input.remove(prev);
            self.cursor = prev;
        }
    }

    fn delete_char(&mut self) {
        self.clear_completion();
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.input[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    fn cursor_right(&mut self) {
        if self.cursor < self.input.len() {
            self.cursor = self.input[self.cursor..]
                .chars()
                .next()
                .map(|c| self.cursor + c.len_utf8())
                .unwrap_or(self.input.len());
        }
    }
}

/// The log header shown when a world is generated or a save is loaded.
fn opening_text(session: &GameSession) -> String {
    format!(
        "{}\nLocation: {}\n\n{}",
        session.world.title, session.state.current_location, session.world.description
    )
}
