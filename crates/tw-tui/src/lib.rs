//! Terminal UI for Taleweaver: a state machine over hint entry, loading,
//! play, quit confirmation, and error display, driven by a single event
//! channel.
//!
//! The controller ([`app::App`]) is the sole owner and mutator of the active
//! session. Model calls run as spawned tasks that feed exactly one
//! completion event back into the channel, so state mutations keep a strict
//! total order. Rendering lives in [`ui`] and never touches state.

/// The interactive controller state machine.
pub mod app;
/// Environment and flag configuration.
pub mod config;
/// Pure directive parsing for `/`-prefixed input.
pub mod directive;
/// The event type and the terminal input pump.
pub mod event;
/// Display-log lines and side-effect formatting.
pub mod log;
/// Narration markup styling (bold nouns, quoted dialogue).
pub mod markup;
/// Terminal setup, teardown, and the main loop.
pub mod terminal;
/// Rendering for every screen.
pub mod ui;
