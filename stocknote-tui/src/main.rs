//! Share market data manager: two-pane terminal editor for an annotated
//! company spreadsheet.
//!
//! Panes:
//! 1. Companies: sorted selector over `Company Name`
//! 2. Annotation: lot size header, four choice fields, free-text comment
//!
//! Usage: `stocknote [FILE]`. Without a file the last one opened is reloaded.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use stocknote_core::AppConfig;

use crate::app::AppState;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stocknote");
    let config = AppConfig::load_or_default(&config_dir.join("config.toml"))?;
    let state_path = config_dir.join("state.json");

    init_logging(&config, &config_dir)?;
    tracing::info!(output_dir = %config.output_dir.display(), "starting");

    let open_override = std::env::args_os().nth(1).map(PathBuf::from);

    let mut app = AppState::new(&config);
    persistence::apply(&mut app, persistence::load(&state_path), open_override);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, "failed to save state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the UI responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key, chrono::Local::now().naive_local());
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Log to a file; the terminal belongs to the UI. `RUST_LOG` overrides the
/// configured filter. A relative log path lands in the config directory.
fn init_logging(config: &AppConfig, config_dir: &Path) -> Result<()> {
    let log_path = if config.log_file.is_absolute() {
        config.log_file.clone()
    } else {
        config_dir.join(&config.log_file)
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
