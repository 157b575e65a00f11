//! Keyboard Input Handling Module
//!
//! Routes key events to the editor, the snippet manager, the import prompt
//! or the help overlay depending on `InputMode`. Blocking overlays (messages
//! and confirmations) get the key first.

use crate::app::{App, InputMode, ManagerFocus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Main keyboard event handler and dispatcher. Returns `true` to quit.
pub fn handle_key_events(key: KeyEvent, app: &mut App) -> bool {
    if app.has_message() {
        app.clear_messages();
        return false;
    }

    if app.has_pending_action() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.confirm_pending_action();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_pending_action(),
            _ => {}
        }
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return true;
    }

    if is_run_shortcut(key) {
        app.run_code();
        return false;
    }

    match app.input_mode {
        InputMode::Editing => handle_editing_keys(key, app),
        InputMode::SnippetManager => handle_snippet_manager_keys(key, app),
        InputMode::ImportPath => handle_import_prompt_keys(key, app),
        InputMode::HelpMenu => {
            app.input_mode = InputMode::Editing;
        }
    }

    false
}

/// Run works in every mode. Terminals without the keyboard enhancement
/// protocol send Ctrl+Enter as Ctrl+J.
fn is_run_shortcut(key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter | KeyCode::Char('j') | KeyCode::Char('r') => ctrl,
        KeyCode::F(5) => true,
        _ => false,
    }
}

/// Shortcuts available while the editor has focus
fn handle_global_shortcut(key: KeyEvent, app: &mut App) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('s') if ctrl => app.open_snippet_manager(),
        KeyCode::Char('t') if ctrl => app.toggle_theme(),
        KeyCode::Char('p') if ctrl => app.share_code(),
        KeyCode::Char('e') if ctrl => app.export_code(),
        KeyCode::Char('o') if ctrl => {
            app.input_buffer.clear();
            app.input_mode = InputMode::ImportPath;
        }
        KeyCode::Char('g') if ctrl => launch_external_editor(app),
        KeyCode::F(1) => app.input_mode = InputMode::HelpMenu,
        _ => return false,
    }

    true
}

fn handle_editing_keys(key: KeyEvent, app: &mut App) {
    if handle_global_shortcut(key, app) {
        return;
    }

    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let page = app.editor_height.max(1);

    let edited = match key.code {
        KeyCode::Up if alt => {
            app.scroll_output(true);
            false
        }
        KeyCode::Down if alt => {
            app.scroll_output(false);
            false
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.editor.insert_char(c);
            true
        }
        KeyCode::Enter => {
            app.editor.newline();
            true
        }
        KeyCode::Tab => {
            app.editor.insert_tab(app.config.tab_size);
            true
        }
        KeyCode::Backspace => {
            app.editor.backspace();
            true
        }
        KeyCode::Delete => {
            app.editor.delete();
            true
        }
        KeyCode::Left => {
            app.editor.move_left();
            false
        }
        KeyCode::Right => {
            app.editor.move_right();
            false
        }
        KeyCode::Up => {
            app.editor.move_up(1);
            false
        }
        KeyCode::Down => {
            app.editor.move_down(1);
            false
        }
        KeyCode::PageUp => {
            app.editor.move_up(page);
            false
        }
        KeyCode::PageDown => {
            app.editor.move_down(page);
            false
        }
        KeyCode::Home => {
            app.editor.move_home();
            false
        }
        KeyCode::End => {
            app.editor.move_end();
            false
        }
        _ => false,
    };

    if edited {
        app.on_edit();
    }
}

fn handle_snippet_manager_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.close_overlay();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.manager_focus = match app.manager_focus {
                ManagerFocus::NameInput => ManagerFocus::List,
                ManagerFocus::List => ManagerFocus::NameInput,
            };
            return;
        }
        _ => {}
    }

    match app.manager_focus {
        ManagerFocus::NameInput => match key.code {
            KeyCode::Enter => app.save_snippet(),
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            KeyCode::Down => app.manager_focus = ManagerFocus::List,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.input_buffer.push(c)
            }
            _ => {}
        },
        ManagerFocus::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.previous_snippet(),
            KeyCode::Down | KeyCode::Char('j') => app.next_snippet(),
            KeyCode::Enter => app.load_selected_snippet(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete_confirmation(),
            KeyCode::Char('c') | KeyCode::Char('y') => app.copy_selected_snippet(),
            KeyCode::Char('e') => app.export_selected_snippet(),
            KeyCode::Char('u') => app.update_selected_snippet(),
            _ => {}
        },
    }
}

fn handle_import_prompt_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => {
            let input = app.input_buffer.trim().to_string();
            app.close_overlay();
            if !input.is_empty() {
                app.import_file(&expand_home(&input));
            }
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_buffer.push(c)
        }
        _ => {}
    }
}

fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

/// Hands the buffer to an external editor and loads whatever it saved
fn launch_external_editor(app: &mut App) {
    // Set flag to indicate a full UI redraw will be needed after editor use
    app.needs_redraw = true;

    let file_path = app.editor_file_path();
    if let Err(e) = std::fs::create_dir_all(&app.data_dir)
        .and_then(|_| std::fs::write(&file_path, app.code()))
    {
        app.set_error_message(format!("Failed to prepare file for editing: {}", e));
        return;
    }

    if let Err(e) = suspend_tui_for_editor(&file_path) {
        app.set_error_message(format!("Failed to launch editor: {}", e));
        return;
    }

    match std::fs::read_to_string(&file_path) {
        Ok(content) => {
            if content != app.code() {
                app.set_code(&content);
            }
        }
        Err(e) => app.set_error_message(format!("Failed to read edited code: {}", e)),
    }
}

fn editor_candidates() -> Vec<String> {
    let mut editors: Vec<String> = std::env::var("EDITOR")
        .ok()
        .filter(|editor| !editor.trim().is_empty())
        .into_iter()
        .collect();
    editors.extend(["nvim", "vim", "nano"].map(String::from));
    editors
}

/// Properly suspend TUI and launch external editor
fn suspend_tui_for_editor(file_path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    use ratatui::crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use std::io::{Write, stdout};
    use std::process::Command;

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    print!("\x1B[2J"); // Clear entire screen
    print!("\x1B[H"); // Move cursor to home position
    print!("\x1B[?25h"); // Show cursor
    stdout().flush()?;

    let mut editor_launched = false;
    for editor in editor_candidates() {
        // $EDITOR may carry arguments, e.g. "code --wait"
        let mut parts = editor.split_whitespace();
        let Some(program) = parts.next() else {
            continue;
        };

        if let Ok(mut child) = Command::new(program).args(parts).arg(file_path).spawn() {
            if child.wait().is_ok() {
                editor_launched = true;
                break;
            }
        }
    }

    if !editor_launched {
        println!("Could not launch any editor ($EDITOR, nvim, vim, nano)");
        println!("Press Enter to continue...");
        let mut buffer = String::new();
        std::io::stdin().read_line(&mut buffer)?;
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    print!("\x1B[2J"); // Clear screen
    print!("\x1B[H"); // Move cursor to home
    stdout().flush()?;

    if editor_launched {
        Ok(())
    } else {
        Err("Could not launch any editor".into())
    }
}
