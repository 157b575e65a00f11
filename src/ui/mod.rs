//! User Interface Module
//!
//! Rendering for the playground: a header, the editor and output panes side
//! by side, a bottom bar, and the overlays drawn on top of them. Everything
//! draws with the `Palette` of the active theme.

pub mod colors;
pub mod components;
pub mod editor;
pub mod header;
pub mod output;
pub mod snippet_manager;

use crate::app::{App, ConfirmationState, InputMode};
use crate::ui::colors::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::{Block, Widget},
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.current_theme());
    let area = frame.area();

    Block::default()
        .style(Style::default().bg(palette.base).fg(palette.text))
        .render(area, frame.buffer_mut());

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .split(area);

    header::render(frame, chunks[0], app, &palette);

    let panes = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    editor::render(frame, panes[0], app, &palette);
    output::render(frame, panes[1], app, &palette);

    components::render_bottom_bar(frame, chunks[2], app, &palette);

    match app.input_mode {
        InputMode::SnippetManager => snippet_manager::render(frame, area, app, &palette),
        InputMode::ImportPath => components::render_input_overlay(
            frame,
            area,
            "Import file",
            &app.input_buffer,
            &palette,
        ),
        InputMode::HelpMenu => components::render_help_menu_overlay(frame, area, &palette),
        InputMode::Editing => {}
    }

    if let ConfirmationState::DeleteSnippet { name, .. } = &app.confirmation_state {
        components::render_confirmation_overlay(
            frame,
            area,
            &format!("Are you sure you want to delete '{}'?", name),
            &palette,
        );
    }

    if let Some(message) = &app.error_message {
        components::render_message_overlay(frame, area, message, true, &palette);
    } else if let Some(message) = &app.success_message {
        components::render_message_overlay(frame, area, message, false, &palette);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::tests::test_app;
    use crate::models::StorageManager;
    use crate::models::storage::CODE_KEY;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    pub(crate) fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &mut crate::app::App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn renders_editor_and_placeholder_before_first_run() {
        let mut app = test_app(StorageManager::in_memory());
        let screen = draw(&mut app);

        assert!(screen.contains("JavaScript Playground"));
        assert!(screen.contains("JavaScript Editor"));
        assert!(screen.contains("Hello, World!"));
        assert!(screen.contains("Write some JavaScript code and see the output here."));
    }

    #[test]
    fn renders_output_after_run() {
        let mut storage = StorageManager::in_memory();
        storage
            .set(CODE_KEY, "console.warn('careful'); 'done'")
            .unwrap();
        let mut app = test_app(storage);
        app.run_code();
        let screen = draw(&mut app);

        assert!(screen.contains("careful"));
        assert!(screen.contains("done"));
        assert!(screen.contains("Success"));
    }

    #[test]
    fn renders_error_count_after_failure() {
        let mut storage = StorageManager::in_memory();
        storage.set(CODE_KEY, "throw new Error('boom')").unwrap();
        let mut app = test_app(storage);
        app.run_code();
        let screen = draw(&mut app);

        assert!(screen.contains("1 error"));
        assert!(screen.contains("boom"));
    }

    #[test]
    fn renders_overlays_on_top() {
        let mut app = test_app(StorageManager::in_memory());
        app.open_snippet_manager();
        assert!(draw(&mut app).contains("Snippets"));

        app.close_overlay();
        app.set_error_message("Something went wrong".to_string());
        assert!(draw(&mut app).contains("Something went wrong"));
    }
}
