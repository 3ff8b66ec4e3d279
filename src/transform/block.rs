//! Line-prefix transforms: blockquotes and lists.

use super::{Context, Insertion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePrefix {
    Quote,
    Unordered,
    Ordered,
}

impl LinePrefix {
    /// Marker for the `index`-th line of the selection (0-based).
    fn marker(self, index: usize) -> String {
        match self {
            Self::Quote => "> ".to_string(),
            Self::Unordered => "- ".to_string(),
            Self::Ordered => format!("{}. ", index + 1),
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Quote => "> 引用",
            Self::Unordered => "- 无序列表",
            Self::Ordered => "1. 有序列表",
        }
    }

    /// Separator placed before the placeholder line when the cursor is
    /// mid-line. Ordered lists start a new paragraph.
    fn placeholder_separator(self) -> &'static str {
        match self {
            Self::Ordered => "\n\n",
            Self::Quote | Self::Unordered => "\n",
        }
    }
}

/// Prefixes every non-blank line of the selection with `kind`'s marker.
///
/// Blank lines stay blank. Ordered numbering follows the line position in
/// the selection and always starts at 1. The cursor is left at the end of
/// the insertion.
pub fn prefix_lines(kind: LinePrefix, ctx: &Context<'_>) -> Insertion {
    if ctx.selection.is_empty() {
        let lead = if ctx.mid_line() {
            kind.placeholder_separator()
        } else {
            ""
        };
        return Insertion::new(format!("{lead}{}", kind.placeholder()));
    }

    let body = ctx
        .selection
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{line}", kind.marker(i))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let lead = if ctx.mid_line() { "\n" } else { "" };
    Insertion::new(format!("{lead}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_skips_blank_lines() {
        let ins = prefix_lines(LinePrefix::Unordered, &Context::new("a\nb\n\nc", 0, 0));
        assert_eq!(ins.text, "- a\n- b\n\n- c");
        assert_eq!(ins.cursor, None);
    }

    #[test]
    fn quote_prefixes_each_line_once() {
        let ins = prefix_lines(LinePrefix::Quote, &Context::new("one\n\n\ntwo", 0, 0));
        assert_eq!(ins.text, "> one\n\n\n> two");
    }

    #[test]
    fn ordered_numbers_by_line_position_and_restarts() {
        let ctx = Context::new("x\ny\n\nz", 0, 0);
        assert_eq!(prefix_lines(LinePrefix::Ordered, &ctx).text, "1. x\n2. y\n\n4. z");
        // a second invocation starts over at 1
        let again = prefix_lines(LinePrefix::Ordered, &Context::new("3. q", 0, 0));
        assert_eq!(again.text, "1. 3. q");
    }

    #[test]
    fn mid_line_selection_gets_single_newline() {
        for kind in [LinePrefix::Quote, LinePrefix::Unordered, LinePrefix::Ordered] {
            let ins = prefix_lines(kind, &Context::new("a", 4, 4));
            assert!(ins.text.starts_with('\n'), "{kind:?}");
            assert!(!ins.text.starts_with("\n\n"), "{kind:?}");
        }
    }

    #[test]
    fn empty_selection_placeholders() {
        let at_start = Context::new("", 0, 0);
        assert_eq!(prefix_lines(LinePrefix::Quote, &at_start).text, "> 引用");
        assert_eq!(prefix_lines(LinePrefix::Unordered, &at_start).text, "- 无序列表");
        assert_eq!(prefix_lines(LinePrefix::Ordered, &at_start).text, "1. 有序列表");

        let mid = Context::new("", 2, 2);
        assert_eq!(prefix_lines(LinePrefix::Quote, &mid).text, "\n> 引用");
        assert_eq!(prefix_lines(LinePrefix::Unordered, &mid).text, "\n- 无序列表");
        assert_eq!(prefix_lines(LinePrefix::Ordered, &mid).text, "\n\n1. 有序列表");
    }

    #[test]
    fn trailing_newline_in_selection_is_kept_blank() {
        let ins = prefix_lines(LinePrefix::Unordered, &Context::new("a\n", 0, 0));
        assert_eq!(ins.text, "- a\n");
    }
}
