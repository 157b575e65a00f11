//! jsplay - JavaScript Playground
//!
//! A terminal playground for JavaScript. Code typed into the editor runs in an
//! embedded engine with a captured `console`, and the output appears next to
//! it. Built with Rust and ratatui.
//!
//! jsplay lets developers:
//! - Write JavaScript and see console output and return values as they type
//! - Keep named snippets of code and export them as `.js` files
//! - Share code through self-contained links

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::models::StorageManager;
use anyhow::Context;
use clap::Parser;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{
            self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
            PushKeyboardEnhancementFlags,
        },
        execute,
        terminal::{
            Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
            enable_raw_mode, supports_keyboard_enhancement,
        },
    },
};
use std::error::Error;
use std::io::{self, stdout};
use std::process::ExitCode;
use std::time::{Duration, Instant};

mod app;
mod cli;
mod config;
mod engine;
mod handlers;
mod logging;
mod models;
mod ui;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    let data_dir = config.data_dir()?;

    // The TUI still works without a log file
    if let Err(e) = logging::init(&data_dir, cli.log_level.as_deref()) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let mut storage = StorageManager::open(&data_dir)
        .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?;

    match cli.command {
        None => {}
        Some(Command::Open { url }) => {
            if models::share::import_shared_code(&mut storage, &url).is_none() {
                eprintln!("No shared code found in {}", url);
            }
        }
        Some(Command::Run { file }) => {
            let success = cli::commands::run_code(&storage, file.as_deref())?;
            return Ok(if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Some(Command::Share { file }) => {
            cli::commands::share_code(&storage, &config, file.as_deref())?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::List) => {
            cli::commands::list_snippets(&storage)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Export { name_or_id, out }) => {
            let dir = out.unwrap_or_else(|| config.export_dir());
            cli::commands::export_snippet(&storage, &name_or_id, &dir)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Import { file }) => {
            cli::commands::import_code(&mut storage, &file)?;
            return Ok(ExitCode::SUCCESS);
        }
    }

    let app = App::new(config, storage, data_dir);
    run_tui(app)?;

    Ok(ExitCode::SUCCESS)
}

/// Sets up the terminal, runs the event loop and restores the terminal even
/// when the loop fails
fn run_tui(mut app: App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Needed for Ctrl+Enter to arrive as such; Ctrl+J works everywhere else
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    log::info!("Playground started");
    let outcome = event_loop(&mut terminal, &mut app);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("Playground closed");
    outcome
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        if app.needs_redraw {
            force_redraw(terminal, app)?;
            app.needs_redraw = false;
        } else {
            terminal.draw(|frame| app.render(frame))?;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::keys::handle_key_events(key, app) {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
    }
}

/// Forces a complete redraw of the terminal UI
/// Used after suspending for editor to ensure a clean UI state
fn force_redraw<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    terminal.clear()?;
    execute!(stdout(), Clear(ClearType::All))?;
    terminal.draw(|frame| app.render(frame))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
        Ok(Config::load(Some(path))?)
    }

    #[test]
    fn config_errors_surface_through_main_error_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "autorun = \"sometimes\"").unwrap();

        assert!(load_config(&path).is_err());
        assert!(load_config(&dir.path().join("missing.toml")).is_ok());
    }
}
