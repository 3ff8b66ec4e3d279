//! Text surface abstraction.
//!
//! The `TextSurface` trait is the only door the transform engine has into the
//! document. Every transform reads the selection, computes an insertion and
//! writes it back through `replace_selection`, optionally followed by
//! `set_cursor` and always by `focus`.
//!
//! All offsets are in Unicode scalar values (chars) over the document text
//! with lines joined by `\n`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use tui_textarea::{CursorMove, TextArea};

/// A half-open `[from, to)` range over document char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    /// Builds a selection from two endpoints in any order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            from: offset,
            to: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.from == self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }
}

impl From<Selection> for Range<usize> {
    fn from(sel: Selection) -> Self {
        sel.from..sel.to
    }
}

/// Facade over the text-editing engine.
pub trait TextSurface {
    /// Full document snapshot.
    fn text(&self) -> String;

    /// Current selection bounds, `from <= to`.
    fn selection(&self) -> Selection;

    /// Char offset of the selection head (where the cursor is drawn).
    fn cursor(&self) -> usize;

    /// Column of the selection start within its line; for a caret, the
    /// cursor column.
    fn line_offset(&self) -> usize;

    /// Replaces the selection with `text`; the cursor collapses to the end of
    /// the inserted text.
    fn replace_selection(&mut self, text: &str);

    /// Replaces an arbitrary char range with `text`.
    fn replace_range(&mut self, range: Range<usize>, text: &str);

    /// Moves the cursor to an absolute offset, dropping any selection.
    fn set_cursor(&mut self, offset: usize);

    fn focus(&mut self);

    fn blur(&mut self);

    fn is_focused(&self) -> bool;

    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    /// Substring covered by the selection.
    fn selection_text(&self) -> String {
        let sel = self.selection();
        self.text().chars().skip(sel.from).take(sel.len()).collect()
    }

    fn len_chars(&self) -> usize {
        self.text().chars().count()
    }
}

/// Byte index of the `char_offset`-th char, clamped to the end of `s`.
fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map_or(s.len(), |(idx, _)| idx)
}

/// Converts a char offset into a `(row, col)` position over `lines`.
pub fn offset_to_position<S: AsRef<str>>(lines: &[S], offset: usize) -> (usize, usize) {
    let mut remaining = offset;
    for (row, line) in lines.iter().enumerate() {
        let len = line.as_ref().chars().count();
        if remaining <= len {
            return (row, remaining);
        }
        // +1 for the joining newline
        remaining -= len + 1;
    }
    let last = lines.len().saturating_sub(1);
    let col = lines.get(last).map_or(0, |l| l.as_ref().chars().count());
    (last, col)
}

/// Converts a `(row, col)` position into a char offset over `lines`.
pub fn position_to_offset<S: AsRef<str>>(lines: &[S], row: usize, col: usize) -> usize {
    let before: usize = lines
        .iter()
        .take(row)
        .map(|l| l.as_ref().chars().count() + 1)
        .sum();
    let line_len = lines.get(row).map_or(0, |l| l.as_ref().chars().count());
    before + col.min(line_len)
}

#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    cursor: usize,
}

/// In-memory surface with a linear undo history.
///
/// Used when the editor runs without a terminal, and by tests that exercise
/// transforms directly.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    text: String,
    anchor: usize,
    head: usize,
    focused: bool,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl BufferSurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Selects `[anchor, head)`; the head carries the cursor.
    pub fn select(&mut self, anchor: usize, head: usize) {
        let len = self.text.chars().count();
        self.anchor = anchor.min(len);
        self.head = head.min(len);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.head,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.anchor = snapshot.cursor;
        self.head = snapshot.cursor;
    }
}

impl TextSurface for BufferSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor, self.head)
    }

    fn cursor(&self) -> usize {
        self.head
    }

    fn line_offset(&self) -> usize {
        let from = self.selection().from;
        let prefix = &self.text[..byte_index(&self.text, from)];
        match prefix.rfind('\n') {
            Some(pos) => prefix[pos + 1..].chars().count(),
            None => prefix.chars().count(),
        }
    }

    fn replace_selection(&mut self, text: &str) {
        let range = self.selection().into();
        self.replace_range(range, text);
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let len = self.text.chars().count();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);

        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();

        let byte_start = byte_index(&self.text, start);
        let byte_end = byte_index(&self.text, end);
        self.text.replace_range(byte_start..byte_end, text);

        let cursor = start + text.chars().count();
        self.anchor = cursor;
        self.head = cursor;
    }

    fn set_cursor(&mut self, offset: usize) {
        let offset = offset.min(self.text.chars().count());
        self.anchor = offset;
        self.head = offset;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(prev) => {
                self.redo_stack.push(self.snapshot());
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(self.snapshot());
                self.restore(next);
                true
            }
            None => false,
        }
    }
}

/// Most grouped replacements remembered; tui-textarea keeps 50 edits.
const MAX_GROUPS: usize = 50;

/// Surface backed by a tui-textarea widget, which owns the buffer, the
/// cursor and the undo history.
///
/// Replacing a selection takes two textarea edits (cut, then insert). Those
/// pairs are remembered by the document fingerprint they leave behind so
/// that one undo or redo steps over both.
pub struct TextAreaSurface<'a> {
    textarea: TextArea<'a>,
    focused: bool,
    undo_groups: Vec<u64>,
    redo_groups: Vec<u64>,
}

impl<'a> TextAreaSurface<'a> {
    pub fn new(doc: &str) -> Self {
        let lines: Vec<String> = doc
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();
        Self {
            textarea: TextArea::new(lines),
            focused: true,
            undo_groups: Vec::new(),
            redo_groups: Vec::new(),
        }
    }

    pub fn textarea(&self) -> &TextArea<'a> {
        &self.textarea
    }

    /// Raw access for key input and styling. Callers must not keep offsets
    /// across edits made through this handle.
    pub fn textarea_mut(&mut self) -> &mut TextArea<'a> {
        &mut self.textarea
    }

    fn jump(&mut self, offset: usize) {
        let (row, col) = offset_to_position(self.textarea.lines(), offset);
        self.textarea.move_cursor(CursorMove::Jump(
            row.min(u16::MAX as usize) as u16,
            col.min(u16::MAX as usize) as u16,
        ));
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.textarea.lines().hash(&mut hasher);
        hasher.finish()
    }

    fn push_group(stack: &mut Vec<u64>, state: u64) {
        if stack.len() == MAX_GROUPS {
            stack.remove(0);
        }
        stack.push(state);
    }

    /// Runs one history step, or two when the document is in the state a
    /// grouped replacement left it in.
    fn step_history(&mut self, undo: bool) -> bool {
        let state = self.fingerprint();
        let groups = if undo {
            &mut self.undo_groups
        } else {
            &mut self.redo_groups
        };
        let grouped = groups.last() == Some(&state);
        if grouped {
            groups.pop();
        }

        let mut changed = false;
        for _ in 0..if grouped { 2 } else { 1 } {
            let stepped = if undo {
                self.textarea.undo()
            } else {
                self.textarea.redo()
            };
            if !stepped {
                break;
            }
            changed = true;
        }

        if grouped && changed {
            let state = self.fingerprint();
            let opposite = if undo {
                &mut self.redo_groups
            } else {
                &mut self.undo_groups
            };
            Self::push_group(opposite, state);
        }
        changed
    }

    fn select_range(&mut self, range: Range<usize>) {
        self.textarea.cancel_selection();
        self.jump(range.start);
        if range.end > range.start {
            self.textarea.start_selection();
            self.jump(range.end);
        }
    }
}

impl TextSurface for TextAreaSurface<'_> {
    fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    fn selection(&self) -> Selection {
        let lines = self.textarea.lines();
        match self.textarea.selection_range() {
            Some(((sr, sc), (er, ec))) => Selection::new(
                position_to_offset(lines, sr, sc),
                position_to_offset(lines, er, ec),
            ),
            None => Selection::caret(self.cursor()),
        }
    }

    fn cursor(&self) -> usize {
        let (row, col) = self.textarea.cursor();
        position_to_offset(self.textarea.lines(), row, col)
    }

    fn line_offset(&self) -> usize {
        match self.textarea.selection_range() {
            Some(((_, start_col), _)) => start_col,
            None => self.textarea.cursor().1,
        }
    }

    fn replace_selection(&mut self, text: &str) {
        let mut cut = false;
        if self.textarea.selection_range().is_some() {
            // cut() clobbers the yank buffer; keep the user's copy intact
            let yank = self.textarea.yank_text();
            cut = self.textarea.cut();
            self.textarea.set_yank_text(yank);
        } else {
            self.textarea.cancel_selection();
        }
        let inserted = self.textarea.insert_str(text);

        self.redo_groups.clear();
        if cut && inserted {
            let state = self.fingerprint();
            Self::push_group(&mut self.undo_groups, state);
        }
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        self.select_range(range);
        self.replace_selection(text);
    }

    fn set_cursor(&mut self, offset: usize) {
        self.textarea.cancel_selection();
        self.jump(offset);
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn undo(&mut self) -> bool {
        self.step_history(true)
    }

    fn redo(&mut self) -> bool {
        self.step_history(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_position_conversion() {
        let lines = ["ab", "", "中文x"];
        assert_eq!(offset_to_position(&lines, 0), (0, 0));
        assert_eq!(offset_to_position(&lines, 2), (0, 2));
        assert_eq!(offset_to_position(&lines, 3), (1, 0));
        assert_eq!(offset_to_position(&lines, 4), (2, 0));
        assert_eq!(offset_to_position(&lines, 6), (2, 2));
        // past the end clamps to the last column
        assert_eq!(offset_to_position(&lines, 100), (2, 3));

        assert_eq!(position_to_offset(&lines, 2, 2), 6);
        assert_eq!(position_to_offset(&lines, 0, 9), 2);
    }

    #[test]
    fn buffer_replace_selection_collapses_to_end() {
        let mut surface = BufferSurface::new("hello world");
        surface.select(6, 11);
        assert_eq!(surface.selection_text(), "world");
        surface.replace_selection("rust");
        assert_eq!(surface.text(), "hello rust");
        assert_eq!(surface.selection(), Selection::caret(10));
    }

    #[test]
    fn buffer_reversed_selection_is_normalized() {
        let mut surface = BufferSurface::new("abcdef");
        surface.select(4, 1);
        assert_eq!(surface.selection(), Selection::new(1, 4));
        assert_eq!(surface.cursor(), 1);
        assert_eq!(surface.selection_text(), "bcd");
    }

    #[test]
    fn buffer_line_offset_counts_chars() {
        let mut surface = BufferSurface::new("first\n中文abc");
        surface.set_cursor(8);
        assert_eq!(surface.line_offset(), 2);
        surface.set_cursor(6);
        assert_eq!(surface.line_offset(), 0);
        surface.set_cursor(3);
        assert_eq!(surface.line_offset(), 3);
    }

    #[test]
    fn buffer_undo_redo() {
        let mut surface = BufferSurface::new("a");
        surface.set_cursor(1);
        surface.replace_selection("b");
        surface.replace_selection("c");
        assert_eq!(surface.text(), "abc");

        assert!(surface.undo());
        assert_eq!(surface.text(), "ab");
        assert!(surface.undo());
        assert_eq!(surface.text(), "a");
        assert!(!surface.undo());

        assert!(surface.redo());
        assert_eq!(surface.text(), "ab");
    }

    #[test]
    fn textarea_surface_round_trips_text() {
        let surface = TextAreaSurface::new("line one\n\nline three\n");
        assert_eq!(surface.text(), "line one\n\nline three\n");
        assert_eq!(surface.cursor(), 0);
    }

    #[test]
    fn textarea_surface_replaces_multiline_selection() {
        let mut surface = TextAreaSurface::new("a\nb\nc");
        surface.replace_range(2..5, "X\nY");
        assert_eq!(surface.text(), "a\nX\nY");
        assert_eq!(surface.cursor(), 5);
        assert_eq!(surface.line_offset(), 1);
    }

    #[test]
    fn textarea_surface_selection_offsets() {
        let mut surface = TextAreaSurface::new("hello\nworld");
        surface.set_cursor(3);
        surface.textarea_mut().start_selection();
        surface.textarea_mut().move_cursor(CursorMove::Jump(1, 2));
        assert_eq!(surface.selection(), Selection::new(3, 8));
        assert_eq!(surface.selection_text(), "lo\nwo");
    }

    #[test]
    fn line_offset_is_taken_from_selection_start() {
        let mut surface = TextAreaSurface::new("a\nb\n\nc");
        surface.textarea_mut().start_selection();
        surface.textarea_mut().move_cursor(CursorMove::Jump(3, 1));
        assert_eq!(surface.cursor(), 6);
        assert_eq!(surface.line_offset(), 0);

        let mut buffer = BufferSurface::new("xy\nab");
        buffer.select(1, 5);
        assert_eq!(buffer.line_offset(), 1);
        buffer.select(5, 3);
        assert_eq!(buffer.line_offset(), 0);
    }

    #[test]
    fn one_undo_reverts_a_selection_replacement() {
        let mut surface = TextAreaSurface::new("say hi now");
        surface.select_range(4..6);
        surface.replace_selection(" **hi** ");
        assert_eq!(surface.text(), "say  **hi**  now");

        assert!(surface.undo());
        assert_eq!(surface.text(), "say hi now");
        assert!(surface.redo());
        assert_eq!(surface.text(), "say  **hi**  now");
        assert!(surface.undo());
        assert_eq!(surface.text(), "say hi now");
    }

    #[test]
    fn grouped_undo_leaves_typed_edits_alone() {
        let mut surface = TextAreaSurface::new("ab");
        surface.replace_range(0..2, "X\nY");
        surface.set_cursor(3);
        surface.replace_selection("!");
        assert_eq!(surface.text(), "X\nY!");

        assert!(surface.undo());
        assert_eq!(surface.text(), "X\nY");
        assert!(surface.undo());
        assert_eq!(surface.text(), "ab");
    }

    #[test]
    fn textarea_surface_set_cursor_and_undo() {
        let mut surface = TextAreaSurface::new("abc");
        surface.set_cursor(3);
        surface.replace_selection("d");
        assert_eq!(surface.text(), "abcd");
        assert!(surface.undo());
        assert_eq!(surface.text(), "abc");
    }
}
