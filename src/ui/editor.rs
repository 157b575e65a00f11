use crate::app::{App, InputMode};
use crate::ui::colors::Palette;
use once_cell::sync::Lazy;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use syntect::{
    easy::HighlightLines, highlighting::ThemeSet, parsing::SyntaxSet, util::LinesWithEndings,
};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Highlights `code` as JavaScript and returns the lines in `skip..skip + take`.
///
/// Highlighting state carries across lines, so everything before the window
/// is still fed through the highlighter.
pub fn highlight_code(
    code: &str,
    palette: &Palette,
    skip: usize,
    take: usize,
) -> Vec<Line<'static>> {
    let syntax = SYNTAX_SET
        .find_syntax_by_name("JavaScript")
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let Some(theme) = THEME_SET.themes.get(palette.syntax_theme()) else {
        return code
            .lines()
            .skip(skip)
            .take(take)
            .map(|line| Line::styled(line.to_string(), Style::default().fg(palette.text)))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();

    for (index, line) in LinesWithEndings::from(code).enumerate() {
        if index >= skip + take {
            break;
        }

        let highlighted = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .unwrap_or_default();
        if index < skip {
            continue;
        }

        let spans: Vec<Span> = highlighted
            .iter()
            .map(|(style, text)| {
                let fg = style.foreground;
                Span::styled(
                    text.trim_end_matches(['\n', '\r']).to_string(),
                    Style::default()
                        .fg(Color::Rgb(fg.r, fg.g, fg.b))
                        .bg(palette.surface),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

fn gutter_width(line_count: usize) -> u16 {
    line_count.max(1).to_string().len() as u16 + 2
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let focused = app.input_mode == InputMode::Editing && !app.has_message();

    let block = Block::bordered()
        .title(" JavaScript Editor ")
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.surface))
        .border_style(Style::default().fg(if focused {
            palette.iris
        } else {
            palette.highlight_high
        }));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let height = inner.height as usize;
    app.editor_height = height;
    app.editor.scroll_to_cursor(height);
    let scroll = app.editor.scroll;

    let line_count = app.editor.lines().len();
    let gutter = gutter_width(line_count).min(inner.width);
    let gutter_area = Rect {
        width: gutter,
        ..inner
    };
    let code_area = Rect {
        x: inner.x + gutter,
        width: inner.width.saturating_sub(gutter),
        ..inner
    };

    let (cursor_row, _) = app.editor.cursor();
    let numbers: Vec<Line> = (scroll..line_count.min(scroll + height))
        .map(|row| {
            let color = if row == cursor_row {
                palette.gold
            } else {
                palette.muted
            };
            Line::styled(
                format!(
                    "{:>width$} ",
                    row + 1,
                    width = (gutter as usize).saturating_sub(2)
                ),
                Style::default().fg(color),
            )
        })
        .collect();
    Paragraph::new(numbers).render(gutter_area, frame.buffer_mut());

    let lines = highlight_code(&app.code(), palette, scroll, height);
    Paragraph::new(lines)
        .style(Style::default().bg(palette.surface))
        .render(code_area, frame.buffer_mut());

    if focused {
        let column = app.editor.cursor_display_col() as u16;
        let row = cursor_row.saturating_sub(scroll) as u16;
        if column < code_area.width && row < code_area.height {
            frame.set_cursor_position(Position::new(code_area.x + column, code_area.y + row));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighting_keeps_text_and_window() {
        let code = "const a = 1;\nconst b = 2;\nconsole.log(a + b);";
        let lines = highlight_code(code, &Palette::DARK, 1, 5);

        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, ["const b = 2;", "console.log(a + b);"]);
    }

    #[test]
    fn light_palette_highlights_too() {
        let lines = highlight_code("let x = 'y';", &Palette::LIGHT, 0, 1);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].spans.len() > 1);
    }

    #[test]
    fn gutter_grows_with_line_count() {
        assert_eq!(gutter_width(0), 3);
        assert_eq!(gutter_width(9), 3);
        assert_eq!(gutter_width(120), 5);
    }
}
