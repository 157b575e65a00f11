//! UI Components and Layout Module
//!
//! Reusable pieces drawn around and on top of the two panes.
//!
//! # Components
//!
//! - **Bottom Bar**: where the user is, plus the shortcuts that apply there
//! - **Message Overlay**: blocking success/error notice, dismissed by any key
//! - **Confirmation Overlay**: y/n question for destructive actions
//! - **Input Overlay**: single-line prompt
//! - **Help Overlay**: keyboard reference

use crate::app::{App, InputMode, ManagerFocus};
use crate::ui::colors::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};

pub fn render_bottom_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let navbar_chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)]).split(area);

    let left_content = Paragraph::new(breadcrumbs(app, palette))
        .alignment(Alignment::Left)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.highlight_high)),
        );

    let right_content = Paragraph::new(context_shortcuts(app))
        .alignment(Alignment::Right)
        .style(Style::default().fg(palette.muted))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.highlight_high)),
        );

    left_content.render(navbar_chunks[0], frame.buffer_mut());
    right_content.render(navbar_chunks[1], frame.buffer_mut());
}

fn breadcrumbs(app: &App, palette: &Palette) -> Line<'static> {
    let section = match app.input_mode {
        InputMode::Editing => " Editor ",
        InputMode::SnippetManager => " Snippets ",
        InputMode::ImportPath => " Import ",
        InputMode::HelpMenu => " Help ",
    };

    Line::from(vec![
        Span::styled(" jsplay ", Style::default().fg(palette.subtle)),
        Span::styled(" ❯ ", Style::default().fg(palette.muted)),
        Span::styled(section, Style::default().fg(palette.base).bg(palette.iris)),
        Span::styled(
            format!("  {} saved", app.snippets.len()),
            Style::default().fg(palette.muted),
        ),
    ])
}

fn context_shortcuts(app: &App) -> String {
    if app.has_message() {
        return " Press any key to dismiss ".to_string();
    }
    if app.has_pending_action() {
        return " [y] Confirm │ [n] Cancel ".to_string();
    }

    match app.input_mode {
        InputMode::Editing => {
            " [^⏎/F5] Run │ [^S] Snippets │ [^P] Share │ [^G] $EDITOR │ [F1] Help │ [^Q] Quit "
                .to_string()
        }
        InputMode::SnippetManager => match app.manager_focus {
            ManagerFocus::NameInput => " [⏎] Save │ [Tab] List │ [Esc] Close ".to_string(),
            ManagerFocus::List => {
                " [⏎] Load │ [d] Delete │ [c] Copy │ [e] Export │ [u] Update │ [Tab] Name │ [Esc] Close "
                    .to_string()
            }
        },
        InputMode::ImportPath => " [⏎] Import │ [Esc] Cancel ".to_string(),
        InputMode::HelpMenu => " [Esc] Close ".to_string(),
    }
}

/// Thin bar near the top of `r`, `width_percent` wide
pub fn spotlight_bar(width_percent: u16, r: Rect) -> Rect {
    spotlight_area(width_percent, 3, r)
}

fn spotlight_area(width_percent: u16, height: u16, r: Rect) -> Rect {
    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(height),
        Constraint::Min(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .split(layout[1])[1]
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn render_message_overlay(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    is_error: bool,
    palette: &Palette,
) {
    // Long messages (a share URL) wrap instead of being cut off
    let text_width = (area.width / 10 * 7).saturating_sub(2 + 3 + 24).max(1) as usize;
    let rows = message.chars().count().div_ceil(text_width).clamp(1, 8) as u16;
    let popup_area = spotlight_area(70, rows + 2, area);

    Clear.render(popup_area, frame.buffer_mut());

    let (icon, color) = if is_error {
        ("✗", palette.love)
    } else {
        ("✓", palette.foam)
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(palette.subtle).bg(palette.surface));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let chunks = Layout::horizontal([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(24),
    ])
    .split(inner_area);

    Paragraph::new(icon)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold())
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(message)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.text))
        .render(chunks[1], frame.buffer_mut());

    Paragraph::new("Press any key to dismiss")
        .alignment(Alignment::Right)
        .style(Style::default().fg(palette.muted))
        .render(chunks[2], frame.buffer_mut());
}

pub fn render_confirmation_overlay(
    frame: &mut Frame,
    area: Rect,
    question: &str,
    palette: &Palette,
) {
    let popup_area = spotlight_bar(60, area);

    Clear.render(popup_area, frame.buffer_mut());

    let block = Block::bordered()
        .border_type(BorderType::Double)
        .style(Style::default().fg(palette.love).bg(palette.surface));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let chunks =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(16)]).split(inner_area);

    Paragraph::new(question)
        .style(Style::default().fg(palette.text))
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(Line::from(vec![
        Span::styled("[y]", Style::default().fg(palette.love).bold()),
        Span::styled(" yes ", Style::default().fg(palette.muted)),
        Span::styled("[n]", Style::default().fg(palette.foam).bold()),
        Span::styled(" no", Style::default().fg(palette.muted)),
    ]))
    .alignment(Alignment::Right)
    .render(chunks[1], frame.buffer_mut());
}

pub fn render_input_overlay(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &str,
    palette: &Palette,
) {
    let popup_area = spotlight_bar(70, area);

    Clear.render(popup_area, frame.buffer_mut());

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(palette.subtle).bg(palette.surface));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let chunks = Layout::horizontal([
        Constraint::Length(title.chars().count() as u16 + 4),
        Constraint::Min(10),
    ])
    .split(inner_area);

    Paragraph::new(title)
        .style(Style::default().fg(palette.iris).bold())
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(format!("{}▏", input))
        .style(Style::default().fg(palette.text))
        .render(chunks[1], frame.buffer_mut());
}

fn help_section(
    title: &'static str,
    entries: &[(&'static str, &'static str)],
    palette: &Palette,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(title, Style::default().fg(palette.love).bold()),
        Line::from(""),
    ];
    for (keys, action) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", keys), Style::default().fg(palette.gold)),
            Span::styled(*action, Style::default().fg(palette.text)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

pub fn render_help_menu_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = centered_rect(84, 24, area);

    Clear.render(popup_area, frame.buffer_mut());

    let block = Block::bordered()
        .title(" 󰘳 Keyboard Shortcuts ")
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(palette.iris).bg(palette.surface));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner_area);

    let mut left = help_section(
        "Playground",
        &[
            ("Ctrl+⏎ / F5", "Run code"),
            ("Ctrl+R", "Run code"),
            ("Ctrl+S", "Open snippets"),
            ("Ctrl+P", "Copy share URL"),
            ("Ctrl+O", "Import a file"),
            ("Ctrl+E", "Export code"),
            ("Ctrl+T", "Toggle theme"),
            ("Ctrl+G", "Edit in $EDITOR"),
            ("Ctrl+Q", "Quit"),
        ],
        palette,
    );
    left.extend(help_section(
        "Output",
        &[("Alt+↑ / Alt+↓", "Scroll output")],
        palette,
    ));

    let right = help_section(
        "Snippets",
        &[
            ("Tab", "Switch name / list"),
            ("⏎", "Save (name) / Load (list)"),
            ("↑↓ / j k", "Select snippet"),
            ("d", "Delete snippet"),
            ("c", "Copy to clipboard"),
            ("e", "Export as .js file"),
            ("u", "Update with current code"),
            ("Esc", "Close"),
        ],
        palette,
    );

    Paragraph::new(left).render(columns[0], frame.buffer_mut());
    Paragraph::new(right).render(columns[1], frame.buffer_mut());
}
