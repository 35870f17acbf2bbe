//! LMDB - browse The Movie Database from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! lmdb
//!
//! # CLI mode (for automation)
//! lmdb search "blade runner"
//! lmdb info 78 -t movie --json
//! lmdb trending -t tv -w day --pages 2
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use lmdb_tui::app::App;
use lmdb_tui::cli::{Cli, Command, ExitCode, Output};
use lmdb_tui::commands;
use lmdb_tui::config::Config;
use lmdb_tui::logging::{self, LogTarget};
use lmdb_tui::runtime::Runtime;
use lmdb_tui::ui;
use lmdb_tui::TmdbClient;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        if let Err(e) = logging::init(LogTarget::Stderr) {
            eprintln!("Logging disabled: {:#}", e);
        }
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        if let Err(e) = logging::init(LogTarget::tui_default()) {
            eprintln!("Logging disabled: {:#}", e);
        }
        run_tui(cli).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    let client = match config.tmdb() {
        Ok(tmdb) => Arc::new(TmdbClient::new(tmdb)),
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    match cli.command {
        Some(Command::Popular(cmd)) => commands::popular_cmd(cmd, client, &output).await,

        Some(Command::Trending(cmd)) => {
            commands::trending_cmd(cmd, config.trending_window(), client, &output).await
        }

        Some(Command::TopRated(cmd)) => commands::top_rated_cmd(cmd, client, &output).await,

        Some(Command::AiringToday(cmd)) => commands::airing_today_cmd(cmd, client, &output).await,

        Some(Command::Search(cmd)) => commands::search_cmd(cmd, client, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, client, &output).await,

        Some(Command::Credits(cmd)) => commands::credits_cmd(cmd, client, &output).await,

        Some(Command::Reviews(cmd)) => commands::reviews_cmd(cmd, client, &output).await,

        Some(Command::Recommendations(cmd)) => {
            commands::recommendations_cmd(cmd, client, &output).await
        }

        // Handled by the is_cli_mode check
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(cli: Cli) -> Result<()> {
    // Fail before touching the terminal so the message stays readable
    let config = Config::resolve(cli.config.as_deref())?;
    let tmdb = config.tmdb().context("TMDB is not configured")?;
    let mut runtime = Runtime::new(TmdbClient::new(tmdb));
    let mut app = App::new(config.trending_window());
    tracing::info!(window = ?app.window, "starting TUI");

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &mut runtime).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies finished requests, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, runtime: &mut Runtime) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        app.set_viewport(ui::list_rows(terminal.size()?.height));

        runtime.drain(app);
        runtime.dispatch(app);

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so finished requests show up promptly
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
