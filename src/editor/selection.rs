//! Mouse selection helpers: word selection and paragraph selection.
//!
//! Used by double-click (word) and triple-click (paragraph).

use super::*;

impl<'a> Editor<'a> {
    /// Selects the word under the cursor (for double-click).
    /// Groups: alphanumeric+underscore, whitespace, punctuation.
    pub(super) fn select_word_at_cursor(&mut self) {
        let textarea = self.surface.textarea_mut();
        let (row, col) = textarea.cursor();
        let Some(line) = textarea.lines().get(row) else {
            return;
        };
        let chars: Vec<char> = line.chars().collect();
        if col >= chars.len() {
            return;
        }

        let target = char_class(chars[col]);

        let mut start = col;
        while start > 0 && char_class(chars[start - 1]) == target {
            start -= 1;
        }

        let mut end = col;
        while end < chars.len() && char_class(chars[end]) == target {
            end += 1;
        }

        textarea.cancel_selection();
        textarea.move_cursor(CursorMove::Jump(row as u16, start as u16));
        textarea.start_selection();
        textarea.move_cursor(CursorMove::Jump(row as u16, end as u16));
    }

    /// Selects the paragraph around the cursor (for triple-click).
    /// A paragraph is a contiguous block of non-empty lines.
    pub(super) fn select_paragraph_at_cursor(&mut self) {
        let textarea = self.surface.textarea_mut();
        let (row, _) = textarea.cursor();
        let lines = textarea.lines();
        if row >= lines.len() {
            return;
        }

        // Find paragraph start: walk backward to first empty line
        let mut start = row;
        while start > 0 && !lines[start - 1].trim().is_empty() {
            start -= 1;
        }

        // Find paragraph end: walk forward to last non-empty line
        let mut end = row;
        while end + 1 < lines.len() && !lines[end + 1].trim().is_empty() {
            end += 1;
        }

        let end_col = lines[end].chars().count();
        textarea.cancel_selection();
        textarea.move_cursor(CursorMove::Jump(start as u16, 0));
        textarea.start_selection();
        textarea.move_cursor(CursorMove::Jump(end as u16, end_col as u16));
    }
}
