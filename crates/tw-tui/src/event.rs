//! The controller's event type and the terminal input pump.

use std::thread;
use std::time::Duration;

use crossterm::event;
use tokio::sync::mpsc::UnboundedSender;

use tw_engine::{EngineResult, TurnReport};
use tw_model::GameSession;
use tw_store::StoreResult;

/// Interval between spinner ticks while no terminal input arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// A resolved turn: the updated session plus the display report.
///
/// Turn tasks work on a clone of the session and hand the whole thing back;
/// the controller swaps it in on success, so a failed turn can never leave
/// the live session half-updated.
#[derive(Debug)]
pub struct TurnFinish {
    /// The session after the turn was applied.
    pub session: GameSession,
    /// What to display for the turn.
    pub report: TurnReport,
}

/// Everything that can wake the controller.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal event (key press, resize).
    Input(event::Event),
    /// Periodic tick for the busy spinner.
    Tick,
    /// World generation finished.
    WorldReady(Box<EngineResult<GameSession>>),
    /// Turn processing finished.
    TurnDone(Box<EngineResult<TurnFinish>>),
    /// A persistence task finished.
    SaveDone {
        /// The save name the task wrote to.
        name: String,
        /// Whether success should be reported in the log (explicit saves)
        /// or only failures (auto-saves).
        announce: bool,
        /// The outcome.
        result: StoreResult<()>,
    },
}

/// Spawn the input pump: a thread that forwards terminal events into the
/// controller channel and emits ticks while the terminal is idle.
///
/// The thread exits when the receiving side hangs up.
pub fn spawn_input_pump(tx: UnboundedSender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            let app_event = match event::poll(TICK_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => AppEvent::Input(ev),
                    Err(_) => break,
                },
                Ok(false) => AppEvent::Tick,
                Err(_) => break,
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    })
}
