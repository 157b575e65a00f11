use crate::app::App;
use crate::engine::{ExecutionResult, OutputKind};
use crate::ui::colors::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

pub const PLACEHOLDER: &str = "Write some JavaScript code and see the output here.";

fn kind_style(kind: OutputKind, palette: &Palette) -> Style {
    match kind {
        OutputKind::Log => Style::default().fg(palette.text),
        OutputKind::Warn => Style::default().fg(palette.gold),
        OutputKind::Info => Style::default().fg(palette.foam),
        OutputKind::Error => Style::default().fg(palette.love),
        OutputKind::Return => Style::default().fg(palette.iris),
        OutputKind::Comment => Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::ITALIC),
    }
}

fn kind_icon(kind: OutputKind) -> &'static str {
    match kind {
        OutputKind::Error => "✗ ",
        OutputKind::Return => "✓ ",
        _ => "  ",
    }
}

/// Lines of the output pane: fatal errors first, then every captured line
/// with its tag dropped. Multi-line values continue under the first line.
pub fn output_lines(result: &ExecutionResult, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for error in &result.fatal_errors {
        lines.push(Line::from(vec![
            Span::styled("✗ ", Style::default().fg(palette.love).bold()),
            Span::styled(error.clone(), Style::default().fg(palette.love).bold()),
        ]));
    }
    if !result.fatal_errors.is_empty() {
        lines.push(Line::from(""));
    }

    for output in &result.lines {
        let style = kind_style(output.kind, palette);
        for (index, text) in output.text.split('\n').enumerate() {
            let prefix = if index == 0 {
                kind_icon(output.kind)
            } else {
                "  "
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(text.to_string(), style),
            ]));
        }
    }

    lines
}

fn status_line(app: &App, palette: &Palette) -> Line<'static> {
    if app.executor.is_running() {
        return Line::styled(" ● Running... ", Style::default().fg(palette.gold));
    }

    let Some(result) = &app.last_result else {
        return Line::from("");
    };

    let millis = result.duration.as_secs_f64() * 1000.0;
    if result.failed() {
        let count = result.fatal_errors.len();
        Line::styled(
            format!(
                " ✗ {} error{} · {:.1} ms ",
                count,
                if count > 1 { "s" } else { "" },
                millis
            ),
            Style::default().fg(palette.love),
        )
    } else {
        Line::styled(
            format!(" ✓ Success · {:.1} ms ", millis),
            Style::default().fg(palette.foam),
        )
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, palette: &Palette) {
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let text = vec![
        Line::styled(PLACEHOLDER, Style::default().fg(palette.muted)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(palette.muted)),
            Span::styled(
                "Ctrl+Enter",
                Style::default().fg(palette.gold).bg(palette.highlight_low),
            ),
            Span::styled(" to run your code.", Style::default().fg(palette.muted)),
        ]),
    ];

    Paragraph::new(text)
        .alignment(Alignment::Center)
        .render(rows[1], frame.buffer_mut());
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let block = Block::bordered()
        .title(" Output ")
        .title_top(status_line(app, palette).right_aligned())
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.base))
        .border_style(Style::default().fg(palette.highlight_high));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let Some(result) = &app.last_result else {
        render_placeholder(frame, inner, palette);
        return;
    };

    let lines = output_lines(result, palette);
    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    app.output_scroll = app.output_scroll.min(max_scroll);

    Paragraph::new(lines)
        .scroll((app.output_scroll as u16, 0))
        .render(inner, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{NO_CODE_MESSAGE, OutputLine};

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn tags_become_icons_and_multiline_values_indent() {
        let result = ExecutionResult {
            lines: vec![
                OutputLine::new(OutputKind::Log, "{\n  \"a\": 1\n}"),
                OutputLine::new(OutputKind::Return, "42"),
            ],
            ..Default::default()
        };

        assert_eq!(
            plain(&output_lines(&result, &Palette::DARK)),
            ["  {", "    \"a\": 1", "  }", "✓ 42"]
        );
    }

    #[test]
    fn fatal_errors_lead_the_pane() {
        let result = ExecutionResult {
            lines: vec![
                OutputLine::comment("// Execution failed"),
                OutputLine::new(OutputKind::Error, "boom"),
            ],
            fatal_errors: vec!["boom".to_string()],
            ..Default::default()
        };

        assert_eq!(
            plain(&output_lines(&result, &Palette::LIGHT)),
            ["✗ boom", "", "  // Execution failed", "✗ boom"]
        );
    }

    #[test]
    fn sentinel_is_styled_as_comment() {
        let result = ExecutionResult {
            lines: vec![OutputLine::comment(NO_CODE_MESSAGE)],
            ..Default::default()
        };
        let lines = output_lines(&result, &Palette::DARK);
        assert_eq!(
            lines[0].spans[1].style,
            kind_style(OutputKind::Comment, &Palette::DARK)
        );
    }
}
