//! Input handling: keyboard events, mouse events and paste, routed to the
//! dialog, the menu bar or the text surface depending on who has focus.

use unicode_width::UnicodeWidthChar;

use super::*;

impl<'a> Editor<'a> {
    /// Handles bracketed paste events. Goes to the dialog when one is open
    /// (a file drop in the upload picker), otherwise into the document.
    pub(super) fn handle_paste(&mut self, text: String) {
        if self.modal.is_open() {
            if let ModalEvent::FilesPicked(paths) = self.modal.handle_paste(&text) {
                self.start_upload(paths);
            }
            return;
        }
        self.surface.textarea_mut().insert_str(text);
    }

    // ─── Key handling ────────────────────────────────────────────────────

    /// Main key handler. The dialog swallows keys while open, then the menu
    /// bar while it has focus; global bindings come next and everything else
    /// goes to the text surface.
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if self.modal.is_open() {
            self.handle_modal_key(key);
            return;
        }

        if self.menu.has_focus() {
            match self.menu.handle_key(key.code) {
                MenuResponse::Activated(action) => self.dispatch(&action),
                MenuResponse::Closed => self.surface.focus(),
                MenuResponse::Handled => {}
            }
            return;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::F(10)) => {
                self.surface.blur();
                self.menu.focus();
                return;
            }
            (_, KeyCode::F(11)) => {
                self.toggle_fullscreen();
                return;
            }
            // Esc leaves fullscreen
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.menu.collapse_all();
                if self.screen == ScreenMode::Fullscreen {
                    self.toggle_fullscreen();
                }
                return;
            }
            _ => {}
        }

        self.handle_editor_key(key);
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match self.modal.handle_key(key) {
            ModalEvent::Confirm => self.confirm_modal(),
            ModalEvent::Cancel => self.cancel_modal(),
            ModalEvent::FilesPicked(paths) => self.start_upload(paths),
            ModalEvent::Handled | ModalEvent::Ignored => {}
        }
    }

    /// Editor key handler. Intercepts standard keybindings (Ctrl+Z, Ctrl+C, etc.)
    /// BEFORE passing to tui-textarea, which has non-standard defaults:
    ///   tui-textarea: Ctrl+U=undo, Ctrl+Y=paste, Ctrl+V=PageDown, Ctrl+A=line-start
    ///   We remap:     Ctrl+Z=undo, Ctrl+Y=redo,  Ctrl+V=paste,    Ctrl+A=select-all
    fn handle_editor_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('z')) => {
                self.execute(&Transform::Undo);
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
                self.execute(&Transform::Redo);
                return;
            }
            // Redo (alternative: Ctrl+Shift+Z)
            (m, KeyCode::Char('Z'))
                if m.contains(KeyModifiers::CONTROL) && m.contains(KeyModifiers::SHIFT) =>
            {
                self.execute(&Transform::Redo);
                return;
            }
            // Formatting shortcuts
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => {
                self.dispatch(&Action::Bold);
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('k')) => {
                self.dispatch(&Action::Link);
                return;
            }
            // Select all (overrides tui-textarea's Ctrl+A = move to line start)
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.surface.textarea_mut().select_all();
                return;
            }
            // Copy selection to system clipboard (overrides tui-textarea's internal-only yank)
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                let text = self.get_selection_text();
                if !text.is_empty() {
                    self.copy_to_clipboard(&text);
                }
                // Also yank internally so Ctrl+V fallback works within the editor
                self.surface.textarea_mut().copy();
                return;
            }
            // Paste from system clipboard (overrides tui-textarea's Ctrl+V = PageDown)
            (KeyModifiers::CONTROL, KeyCode::Char('v')) => {
                match self.paste_from_clipboard() {
                    Some(text) => self.replace_selection(&text),
                    None => {
                        self.surface.textarea_mut().paste();
                    }
                }
                return;
            }
            // Delete word before cursor
            // On macOS, Ctrl+Backspace sends Ctrl+H (0x08), so we match both
            (KeyModifiers::CONTROL, KeyCode::Backspace)
            | (KeyModifiers::CONTROL, KeyCode::Char('h')) => {
                self.surface.textarea_mut().delete_word();
                return;
            }
            // Delete word after cursor
            (KeyModifiers::CONTROL, KeyCode::Delete)
            | (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
                self.surface.textarea_mut().delete_next_word();
                return;
            }
            _ => {}
        }

        // Everything else: pass through to tui-textarea's built-in handling.
        // This covers: arrow keys, Enter, Backspace, Delete, Home, End,
        // Ctrl+E (move to EOL), word navigation, etc.
        self.surface.focus();
        let input = Input::from(key);
        self.surface.textarea_mut().input(input);
    }

    // ─── Mouse handling ──────────────────────────────────────────────────

    /// Handles mouse events: toolbar and dropdown clicks, dialog buttons,
    /// scrolling, and click/drag selection in the text area.
    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                // the dialog holds the page still
                if self.modal.is_open() {
                    return;
                }
                let key = if mouse.kind == MouseEventKind::ScrollUp {
                    Key::MouseScrollUp
                } else {
                    Key::MouseScrollDown
                };
                self.surface.textarea_mut().input(Input {
                    key,
                    ctrl: false,
                    alt: false,
                    shift: false,
                });
                if key == Key::MouseScrollUp {
                    self.editor_scroll_top = self.editor_scroll_top.saturating_sub(1);
                } else {
                    let total_lines = self.surface.textarea().lines().len() as u16;
                    let max_scroll = total_lines.saturating_sub(1);
                    self.editor_scroll_top = (self.editor_scroll_top + 1).min(max_scroll);
                }
            }

            MouseEventKind::Down(MouseButton::Left) => {
                if self.modal.is_open() {
                    self.click_dialog(mouse.column, mouse.row);
                    return;
                }
                if self.click_menu(mouse.column, mouse.row) {
                    return;
                }
                self.click_content(mouse.column, mouse.row);
            }

            // Left drag: extend selection to current mouse position
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.mouse_dragging && contains(self.hit.content, mouse.column, mouse.row) {
                    let (buffer_row, buffer_col) =
                        self.mouse_to_buffer_pos(mouse.column, mouse.row);
                    self.surface
                        .textarea_mut()
                        .move_cursor(CursorMove::Jump(buffer_row, buffer_col));
                }
            }

            // Left release: finalize selection (cancel if it was just a click with no drag)
            MouseEventKind::Up(MouseButton::Left) => {
                if self.mouse_dragging {
                    self.mouse_dragging = false;
                    let textarea = self.surface.textarea_mut();
                    match textarea.selection_range() {
                        Some(((sr, sc), (er, ec))) if sr != er || sc != ec => {}
                        _ => textarea.cancel_selection(),
                    }
                }
            }
            _ => {}
        }
    }

    fn click_dialog(&mut self, column: u16, row: u16) {
        let Some(layout) = self.hit.dialog.clone() else {
            return;
        };
        if contains(layout.close, column, row)
            || layout.cancel.is_some_and(|r| contains(r, column, row))
        {
            self.cancel_modal();
        } else if layout.confirm.is_some_and(|r| contains(r, column, row)) {
            self.confirm_modal();
        } else if let Some(index) = layout.fields.iter().position(|r| contains(*r, column, row)) {
            self.modal.focus_field(index);
        }
    }

    /// Toolbar and dropdown clicks. Returns true if the click was consumed.
    fn click_menu(&mut self, column: u16, row: u16) -> bool {
        if let Some((entry, area)) = self.hit.dropdown {
            if contains(area, column, row) {
                let count = self.menu.entries()[entry].children().len();
                if let Some(child) = toolbar::child_at(area, row, count) {
                    if let Some(action) = self.menu.click_child(entry, child) {
                        self.dispatch(&action);
                    }
                }
                return true;
            }
        }

        let hit = self
            .hit
            .toolbar
            .iter()
            .position(|r| r.width > 0 && contains(*r, column, row));
        match hit {
            Some(index) => {
                if let Some(action) = self.menu.click(index) {
                    self.dispatch(&action);
                }
                true
            }
            None => {
                // any click outside the bar closes its dropdown
                self.menu.collapse_all();
                self.menu.blur();
                false
            }
        }
    }

    /// Click in the text area: single/double/triple click handling.
    fn click_content(&mut self, column: u16, row: u16) {
        if !contains(self.hit.content, column, row) {
            return;
        }
        self.surface.focus();

        // Multi-click detection
        let now = Instant::now();
        let is_repeat = self
            .last_click_time
            .map(|t| now.duration_since(t).as_millis() < MULTI_CLICK_MS as u128)
            .unwrap_or(false)
            && self.last_click_pos == (column, row);
        self.click_count = if is_repeat {
            (self.click_count % 3) + 1
        } else {
            1
        };
        self.last_click_time = Some(now);
        self.last_click_pos = (column, row);

        let (buffer_row, buffer_col) = self.mouse_to_buffer_pos(column, row);
        let jump = CursorMove::Jump(buffer_row, buffer_col);

        match self.click_count {
            2 => {
                // Double-click: select word
                self.surface.textarea_mut().move_cursor(jump);
                self.select_word_at_cursor();
                self.mouse_dragging = false;
            }
            3 => {
                // Triple-click: select paragraph
                self.surface.textarea_mut().move_cursor(jump);
                self.select_paragraph_at_cursor();
                self.mouse_dragging = false;
            }
            _ => {
                // Single click: position cursor + start drag selection
                let textarea = self.surface.textarea_mut();
                textarea.cancel_selection();
                textarea.move_cursor(jump);
                textarea.start_selection();
                self.mouse_dragging = true;
            }
        }
    }

    /// Converts terminal mouse coordinates to buffer (row, col) positions,
    /// accounting for the line number gutter width and scroll offset. The
    /// returned column is a char index into the line, so wide glyphs and tabs
    /// count once.
    pub(super) fn mouse_to_buffer_pos(&self, column: u16, row: u16) -> (u16, u16) {
        let area = self.hit.content;
        let textarea = self.surface.textarea();
        let gutter_width = textarea::gutter_width(textarea);
        let buffer_row = row.saturating_sub(area.y) + self.editor_scroll_top;
        let display_col = column.saturating_sub(area.x).saturating_sub(gutter_width);
        let buffer_col = match textarea.lines().get(usize::from(buffer_row)) {
            Some(line) => char_at_display_col(line, display_col, textarea.tab_length()),
            None => display_col,
        };
        (buffer_row, buffer_col)
    }
}

/// Index of the char drawn at `display_col`, or the line length past its end.
fn char_at_display_col(line: &str, display_col: u16, tab_length: u8) -> u16 {
    let target = usize::from(display_col);
    let tab = usize::from(tab_length.max(1));
    let mut width = 0;
    for (index, c) in line.chars().enumerate() {
        let cell = match c {
            '\t' => tab - width % tab,
            _ => c.width().unwrap_or(0),
        };
        if target < width + cell {
            return u16::try_from(index).unwrap_or(u16::MAX);
        }
        width += cell;
    }
    u16::try_from(line.chars().count()).unwrap_or(u16::MAX)
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}
