//! Taleweaver: an LLM-narrated text adventure in the terminal.

use std::fs::{self, File};
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tw_engine::{GameEngine, GeminiClient};
use tw_store::SaveStore;
use tw_tui::app::App;
use tw_tui::config::{Args, Config};
use tw_tui::event::spawn_input_pump;
use tw_tui::terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match Config::from_env(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    init_logging(&config)?;

    let client = GeminiClient::new(config.api_key.clone()).with_model(config.model.clone());
    let engine = GameEngine::new(Arc::new(client));
    let store = SaveStore::new(config.save_dir.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(engine, store, tx.clone());
    spawn_input_pump(tx);

    terminal::run(app, rx).await
}

/// Log to a file inside the save root; writing to the terminal would corrupt
/// the alternate screen.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    fs::create_dir_all(&config.save_dir)
        .with_context(|| format!("creating save directory {}", config.save_dir.display()))?;
    let log_file = File::create(config.save_dir.join("taleweaver.log"))
        .context("creating log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
