use ratatui::style::{Color, Modifier, Style};

// Base colors; Color::Reset inherits terminal defaults
pub const BG: Color = Color::Reset;
pub const FG: Color = Color::Reset;
pub const BORDER: Color = Color::DarkGray;

// UI elements
pub const BAR_BG: Color = Color::Reset;
pub const LINE_NUMBER: Color = Color::DarkGray;
pub const SELECTION: Color = Color::Blue;
pub const PLACEHOLDER: Color = Color::DarkGray;

// Toolbar
pub const MENU_FG: Color = Color::Gray;
pub const MENU_ACTIVE: Color = Color::Blue;
pub const DROPDOWN_BG: Color = Color::Rgb(40, 42, 54);

// Dialog
pub const DIALOG_BG: Color = Color::Rgb(30, 32, 42);
pub const DIALOG_TITLE: Color = Color::Rgb(130, 170, 255);
pub const BUTTON_PRIMARY: Color = Color::Blue;

// Status indicators
pub const SUCCESS: Color = Color::Green;
pub const WARNING: Color = Color::Yellow;

// White for text on colored backgrounds
pub const WHITE: Color = Color::White;

// Tilde color for empty lines beyond the document
pub const TILDE: Color = Color::DarkGray;

// Pre-built styles
pub fn editor_style() -> Style {
    Style::default().fg(FG).bg(BG)
}

pub fn toolbar_style() -> Style {
    Style::default().fg(MENU_FG).bg(BAR_BG)
}

pub fn status_style() -> Style {
    Style::default()
}

pub fn line_number_style() -> Style {
    Style::default().fg(LINE_NUMBER)
}

pub fn cursor_line_style() -> Style {
    Style::default()
}

pub fn cursor_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

/// Top-level menu entry; `active` when its dropdown is open or it holds the
/// keyboard highlight.
pub fn menu_item_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(WHITE)
            .bg(MENU_ACTIVE)
            .add_modifier(Modifier::BOLD)
    } else {
        toolbar_style()
    }
}

pub fn dropdown_style() -> Style {
    Style::default().fg(FG).bg(DROPDOWN_BG)
}

pub fn dropdown_item_style(highlighted: bool) -> Style {
    if highlighted {
        Style::default().fg(WHITE).bg(MENU_ACTIVE)
    } else {
        dropdown_style()
    }
}

pub fn dialog_style() -> Style {
    Style::default().fg(FG).bg(DIALOG_BG)
}

pub fn dialog_title_style() -> Style {
    Style::default()
        .fg(DIALOG_TITLE)
        .add_modifier(Modifier::BOLD)
}

pub fn button_style(primary: bool) -> Style {
    if primary {
        Style::default()
            .fg(WHITE)
            .bg(BUTTON_PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(FG).add_modifier(Modifier::REVERSED)
    }
}

pub fn placeholder_style() -> Style {
    Style::default().fg(PLACEHOLDER).add_modifier(Modifier::ITALIC)
}

pub fn input_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(WHITE).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    }
}
