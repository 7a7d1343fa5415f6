//! Terminal setup, teardown, and the main event loop.

use std::io;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;
use crate::event::AppEvent;
use crate::ui;

/// Run the controller loop until the app asks to quit.
///
/// Raw mode and the alternate screen are torn down before returning,
/// on success and failure alike.
pub async fn run(mut app: App, mut rx: UnboundedReceiver<AppEvent>) -> anyhow::Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let result = run_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop: draw, wait for one event, drain any backlog, repeat.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("drawing frame")?;

        if app.should_quit {
            return Ok(());
        }

        let Some(event) = rx.recv().await else {
            return Ok(());
        };
        app.handle_event(event);

        // Coalesce whatever is already queued into one redraw.
        while !app.should_quit {
            match rx.try_recv() {
                Ok(event) => app.handle_event(event),
                Err(_) => break,
            }
        }
    }
}
