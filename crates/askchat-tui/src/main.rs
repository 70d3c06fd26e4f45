//! AskChat Terminal UI.
//!
//! Chat interface that forwards questions to a question-answering backend
//! and renders the Markdown answers in the terminal.

use std::error::Error;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod backend;
mod event;
mod markdown;
mod ui;

use app::App;
use event::{BackendCommand, UiEvent};

#[derive(Parser)]
#[command(name = "askchat")]
#[command(about = "Terminal chat for a question-answering backend")]
#[command(version)]
struct Cli {
    /// Backend base URL; questions go to <endpoint>/api/ask
    #[arg(
        short,
        long,
        env = "ASKCHAT_ENDPOINT",
        default_value = "http://127.0.0.1:8000"
    )]
    endpoint: String,

    /// Log file path (logging is skipped if the file cannot be created)
    #[arg(long, default_value = "/tmp/askchat-tui.log")]
    log_file: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Write logs to a file so the subscriber never touches the raw-mode
    // terminal
    let log_file = std::fs::File::create(&cli.log_file).ok();
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter("askchat=debug,askchat_client=debug")
            .with_ansi(false)
            .init();
    }

    info!(endpoint = %cli.endpoint, "Starting AskChat TUI");

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // Spawn background thread with its own tokio runtime; it owns the
    // HTTP client
    let endpoint = cli.endpoint.clone();
    let bg_handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(backend::run_backend(endpoint, ui_tx, cmd_rx));
    });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    // Run UI loop on main thread
    let mut app = App::new(ui_rx, cmd_tx);
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    // Wait for background thread to finish
    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
