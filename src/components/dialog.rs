//! Modal dialog overlay: title bar with ×, body, and the 取消 / 确定 footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::modal::{
    dialogs, ModalBody, OpenModal, TextInput, CANCEL_LABEL, CLOSE_LABEL, CONFIRM_LABEL,
};
use crate::theme;

const MAX_WIDTH: u16 = 56;
const LABEL_WIDTH: u16 = 10;
const MAX_LISTED_FILES: usize = 8;

/// Screen areas of an open dialog, shared by rendering and hit-testing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogLayout {
    pub area: Rect,
    pub close: Rect,
    pub body: Rect,
    /// One row per form field (or the path input of the upload picker).
    pub fields: Vec<Rect>,
    pub cancel: Option<Rect>,
    pub confirm: Option<Rect>,
}

fn button_label(label: &str) -> String {
    format!(" {label} ")
}

fn body_height(body: &ModalBody) -> u16 {
    match body {
        ModalBody::Text(text) => text.lines().count().max(1) as u16,
        ModalBody::Form(form) => (form.fields.len() as u16 * 2).saturating_sub(1).max(1),
        // hint, path input, blank, file list, status line
        ModalBody::Upload(panel) => 4 + panel.pending.len().clamp(1, MAX_LISTED_FILES) as u16,
    }
}

pub fn layout(container: Rect, open: &OpenModal) -> DialogLayout {
    let footer = if open.has_footer { 2 } else { 0 };
    // borders + blank line above and below the body
    let height = (body_height(&open.body) + footer + 4).min(container.height);
    let width = MAX_WIDTH.min(container.width.saturating_sub(4)).max(container.width.min(20));
    let area = Rect::new(
        container.x + (container.width.saturating_sub(width)) / 2,
        container.y + (container.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    let body = Rect::new(
        inner.x,
        inner.y + 1,
        inner.width,
        body_height(&open.body).min(inner.height.saturating_sub(1 + footer)),
    );

    let fields = match &open.body {
        ModalBody::Form(form) => (0..form.fields.len() as u16)
            .map(|i| Rect::new(body.x, body.y + i * 2, body.width, 1))
            .filter(|r| r.y < body.y + body.height)
            .collect(),
        ModalBody::Upload(_) if body.height > 1 => {
            vec![Rect::new(body.x, body.y + 1, body.width, 1)]
        }
        _ => Vec::new(),
    };

    let (cancel, confirm) = if open.has_footer && inner.height >= 2 {
        let row = inner.y + inner.height - 1;
        let confirm_w = Span::raw(button_label(CONFIRM_LABEL)).width() as u16;
        let cancel_w = Span::raw(button_label(CANCEL_LABEL)).width() as u16;
        let right = inner.x + inner.width;
        let confirm = Rect::new(right.saturating_sub(confirm_w), row, confirm_w, 1);
        let cancel = Rect::new(confirm.x.saturating_sub(cancel_w + 2), row, cancel_w, 1);
        (Some(cancel), Some(confirm))
    } else {
        (None, None)
    };

    DialogLayout {
        area,
        close: Rect::new((area.x + area.width).saturating_sub(4), area.y, 3, 1),
        body,
        fields,
        cancel,
        confirm,
    }
}

/// Text input with a block cursor when focused, or its placeholder when empty.
fn input_spans<'a>(input: &TextInput, focused: bool, placeholder: &str) -> Vec<Span<'a>> {
    if input.value().is_empty() && !focused {
        return vec![Span::styled(placeholder.to_string(), theme::placeholder_style())];
    }
    let style = theme::input_style(focused);
    if !focused {
        return vec![Span::styled(input.value().to_string(), style)];
    }

    let chars: Vec<char> = input.value().chars().collect();
    let cursor = input.cursor().min(chars.len());
    let mut spans = Vec::new();

    // Text before cursor
    let before: String = chars[..cursor].iter().collect();
    if !before.is_empty() {
        spans.push(Span::styled(before, style));
    }

    // Cursor character (or space if at end)
    let cursor_char = chars.get(cursor).map_or(" ".to_string(), char::to_string);
    spans.push(Span::styled(
        cursor_char,
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
    ));

    // Text after cursor
    if cursor + 1 < chars.len() {
        let after: String = chars[cursor + 1..].iter().collect();
        spans.push(Span::styled(after, style));
    }
    spans
}

fn labelled<'a>(label: &str, mut spans: Vec<Span<'a>>) -> Line<'a> {
    let pad = (LABEL_WIDTH as usize).saturating_sub(Span::raw(label).width());
    let mut all = vec![Span::styled(
        format!("{label}{}", " ".repeat(pad)),
        Style::default().fg(theme::MENU_FG),
    )];
    all.append(&mut spans);
    Line::from(all)
}

pub fn render(frame: &mut Frame, container: Rect, open: &OpenModal) -> DialogLayout {
    let layout = layout(container, open);
    if layout.area.width < 8 || layout.area.height < 3 {
        return layout;
    }

    frame.render_widget(Clear, layout.area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(Span::styled(format!(" {} ", open.title), theme::dialog_title_style()))
        .style(theme::dialog_style());
    frame.render_widget(block, layout.area);
    frame.render_widget(
        Paragraph::new(format!(" {CLOSE_LABEL} ")).style(theme::dialog_style()),
        layout.close,
    );

    match &open.body {
        ModalBody::Text(text) => {
            let paragraph = Paragraph::new(text.as_str())
                .style(theme::dialog_style())
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, layout.body);
        }
        ModalBody::Form(form) => {
            for ((i, field), row) in form.fields.iter().enumerate().zip(&layout.fields) {
                let spans = input_spans(&field.input, i == form.focus, &field.placeholder);
                frame.render_widget(Paragraph::new(labelled(&field.label, spans)), *row);
            }
        }
        ModalBody::Upload(panel) => {
            let hint = if panel.enabled {
                dialogs::UPLOAD_HINT
            } else {
                dialogs::UPLOAD_DISABLED_HINT
            };
            let mut lines = vec![
                Line::from(Span::styled(hint, theme::placeholder_style())),
                labelled("路径", input_spans(&panel.path, panel.enabled, "")),
                Line::from(""),
            ];
            if panel.pending.is_empty() {
                lines.push(Line::from(Span::styled("暂无附件", theme::placeholder_style())));
            }
            let hidden = panel.pending.len().saturating_sub(MAX_LISTED_FILES);
            for entry in panel.pending.iter().skip(hidden) {
                let icon = if entry.is_image { "▣" } else { "≡" };
                lines.push(Line::from(vec![
                    Span::styled(format!("{icon} "), Style::default().fg(theme::SUCCESS)),
                    Span::raw(entry.name.clone()),
                ]));
            }
            if panel.uploading {
                lines.push(Line::from(Span::styled(
                    "上传中…",
                    Style::default().fg(theme::WARNING),
                )));
            }
            frame.render_widget(Paragraph::new(lines), layout.body);
        }
    }

    if let (Some(cancel), Some(confirm)) = (layout.cancel, layout.confirm) {
        frame.render_widget(
            Paragraph::new(button_label(CANCEL_LABEL)).style(theme::button_style(false)),
            cancel,
        );
        frame.render_widget(
            Paragraph::new(button_label(CONFIRM_LABEL)).style(theme::button_style(true)),
            confirm,
        );
    }
    layout
}
