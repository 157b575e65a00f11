use crate::app::App;
use crate::ui::colors::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

/// Title, run hint and the header actions with their shortcuts
pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(palette.base))
        .border_style(Style::default().fg(palette.highlight_high));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(inner);

    let title = Line::from(vec![
        Span::styled(" JavaScript Playground ", Style::default().fg(palette.iris).bold()),
        Span::styled(" Press ", Style::default().fg(palette.muted)),
        Span::styled(
            "Ctrl+Enter",
            Style::default().fg(palette.gold).bg(palette.highlight_low),
        ),
        Span::styled(" to run", Style::default().fg(palette.muted)),
    ]);
    Paragraph::new(title)
        .alignment(Alignment::Left)
        .render(chunks[0], frame.buffer_mut());

    let run_label = if app.executor.is_running() {
        " ▶ Running... "
    } else {
        " ▶ Run "
    };
    let key = Style::default().fg(palette.muted);
    let actions = Line::from(vec![
        Span::styled(run_label, Style::default().fg(palette.base).bg(palette.foam)),
        Span::styled(" Save ", Style::default().fg(palette.text)),
        Span::styled("^S", key),
        Span::styled(" │ Share ", Style::default().fg(palette.text)),
        Span::styled("^P", key),
        Span::styled(" │ Import ", Style::default().fg(palette.text)),
        Span::styled("^O", key),
        Span::styled(" │ Export ", Style::default().fg(palette.text)),
        Span::styled("^E", key),
        Span::styled(
            format!(" │ {} ", app.current_theme().icon()),
            Style::default().fg(palette.gold),
        ),
        Span::styled("^T ", key),
    ]);
    Paragraph::new(actions)
        .alignment(Alignment::Right)
        .render(chunks[1], frame.buffer_mut());
}
