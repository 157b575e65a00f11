use crate::app::{App, ManagerFocus};
use crate::ui::colors::Palette;
use crate::ui::components::centered_rect;
use crate::ui::editor::highlight_code;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, List, ListItem, ListState, Paragraph, Widget},
};

/// Modal listing saved snippets next to a preview of the selected one, with
/// the name field for saving the current buffer on top
pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let popup_area = centered_rect(area.width * 4 / 5, area.height * 4 / 5, area);
    Clear.render(popup_area, frame.buffer_mut());

    let block = Block::bordered()
        .title(format!(" Snippets ({}) ", app.snippets.len()))
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.surface))
        .border_style(Style::default().fg(palette.iris));
    let inner = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(inner);
    render_name_input(frame, rows[0], app, palette);

    let columns = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    render_list(frame, columns[0], app, palette);
    render_preview(frame, columns[1], app, palette);
}

fn focus_style(focused: bool, palette: &Palette) -> Style {
    Style::default().fg(if focused {
        palette.iris
    } else {
        palette.highlight_high
    })
}

fn render_name_input(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.manager_focus == ManagerFocus::NameInput;
    let block = Block::bordered()
        .title(" Save current code as ")
        .border_type(BorderType::Rounded)
        .border_style(focus_style(focused, palette));

    let content = if app.input_buffer.is_empty() && !focused {
        Line::styled("Snippet name...", Style::default().fg(palette.muted))
    } else {
        Line::from(vec![
            Span::styled(app.input_buffer.clone(), Style::default().fg(palette.text)),
            Span::styled(if focused { "▏" } else { "" }, Style::default().fg(palette.iris)),
        ])
    };

    Paragraph::new(content)
        .block(block)
        .render(area, frame.buffer_mut());
}

fn render_list(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.manager_focus == ManagerFocus::List;
    let block = Block::bordered()
        .title(" Saved ")
        .border_type(BorderType::Rounded)
        .border_style(focus_style(focused, palette));

    if app.snippets.is_empty() {
        Paragraph::new("No saved snippets yet.\nType a name above and press Enter.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(block)
            .render(area, frame.buffer_mut());
        return;
    }

    let items: Vec<ListItem> = app
        .snippets
        .list()
        .iter()
        .map(|snippet| {
            ListItem::new(vec![
                Line::styled(snippet.name.clone(), Style::default().fg(palette.text).bold()),
                Line::styled(
                    format!(
                        "  {} · {} lines",
                        snippet.formatted_date(),
                        snippet.get_line_count()
                    ),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(palette.highlight_low))
        .highlight_symbol(if focused { "❯ " } else { "  " });

    let mut state = ListState::default().with_selected(Some(app.selected_snippet));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::bordered()
        .title(" Preview ")
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.highlight_high));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    if let Some(snippet) = app.selected_snippet() {
        let lines = highlight_code(&snippet.code, palette, 0, inner.height as usize);
        Paragraph::new(lines)
            .style(Style::default().bg(palette.surface))
            .render(inner, frame.buffer_mut());
    }
}
