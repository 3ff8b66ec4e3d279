use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

pub struct StatusInfo<'a> {
    pub line: usize,
    pub col: usize,
    pub message: &'a str,
    pub char_count: usize,
    pub fullscreen: bool,
    pub uploading: bool,
}

pub fn render(frame: &mut Frame, area: Rect, info: StatusInfo) {
    // Fill the entire status bar background
    let bg = Paragraph::new("").style(theme::status_style());
    frame.render_widget(bg, area);

    // Right: upload activity, screen mode and character count
    let mut spans = Vec::new();
    if info.uploading {
        spans.push(Span::styled("uploading… ", Style::default().fg(theme::WARNING)));
    }
    if info.fullscreen {
        spans.push(Span::styled(
            "FULLSCREEN | ",
            Style::default().fg(theme::SUCCESS),
        ));
    }
    spans.push(Span::styled(
        format!("{} chars  ", info.char_count),
        theme::status_style(),
    ));
    let right = Line::from(spans);
    let left = Line::from(Span::styled(
        format!("  Ln {}, Col {}", info.line, info.col),
        theme::status_style(),
    ));

    // the side sections keep their full width; the message takes what is left
    let chunks = Layout::horizontal([
        Constraint::Length(left.width() as u16),
        Constraint::Fill(1),
        Constraint::Length(right.width() as u16),
    ])
    .split(area);

    frame.render_widget(Paragraph::new(left), chunks[0]);

    // Center: status message
    if !info.message.is_empty() {
        let center = Paragraph::new(Line::from(Span::styled(
            info.message.to_string(),
            theme::status_style(),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(center, chunks[1]);
    }

    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[2]);
}
