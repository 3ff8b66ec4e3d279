use ratatui::style::Style;
use tui_textarea::TextArea;

use crate::theme;

pub fn configure_textarea(textarea: &mut TextArea) {
    // Cursor line highlighting
    textarea.set_cursor_line_style(theme::cursor_line_style());

    // Line numbers
    textarea.set_line_number_style(theme::line_number_style());

    // Editor area style
    textarea.set_style(theme::editor_style());

    textarea.set_cursor_style(theme::cursor_style());

    // Selection style
    textarea.set_selection_style(Style::default().bg(theme::SELECTION));

    // Tab = 2 spaces
    textarea.set_tab_length(2);

    // Hard tab to spaces
    textarea.set_hard_tab_indent(false);
}

/// Hides the cursor while another widget (menu bar, dialog) has key focus.
pub fn set_focused(textarea: &mut TextArea, focused: bool) {
    let style = if focused {
        theme::cursor_style()
    } else {
        Style::default()
    };
    if textarea.cursor_style() != style {
        textarea.set_cursor_style(style);
    }
}

/// Width of tui-textarea's line-number gutter: leading space, digits and
/// trailing space.
pub fn gutter_width(textarea: &TextArea) -> u16 {
    if textarea.line_number_style().is_none() {
        return 0;
    }
    let lines = textarea.lines().len().max(1);
    lines.to_string().len() as u16 + 2
}
