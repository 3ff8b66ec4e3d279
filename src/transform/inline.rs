//! Inline wraps: a symmetric marker pair around the selection, or around a
//! placeholder word when nothing is selected.

use super::{Context, Insertion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    Italic,
    Bold,
    Strikethrough,
    Code,
}

impl InlineStyle {
    /// Opening marker, including the separating space in front.
    pub fn open(self) -> &'static str {
        match self {
            Self::Italic => " *",
            Self::Bold => " **",
            Self::Strikethrough => " ~~",
            Self::Code => " `",
        }
    }

    /// Closing marker, including the separating space behind.
    pub fn close(self) -> &'static str {
        match self {
            Self::Italic => "* ",
            Self::Bold => "** ",
            Self::Strikethrough => "~~ ",
            Self::Code => "` ",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Italic => "倾斜",
            Self::Bold => "加粗",
            Self::Strikethrough => "删除",
            Self::Code => "标记",
        }
    }
}

/// Wraps the selection in `style`'s markers.
///
/// With an empty selection the placeholder is inserted and the cursor lands
/// right after it, before the closing marker.
pub fn wrap(style: InlineStyle, ctx: &Context<'_>) -> Insertion {
    if ctx.selection.is_empty() {
        let text = format!("{}{}{}", style.open(), style.placeholder(), style.close());
        let offset = style.open().chars().count() + style.placeholder().chars().count();
        Insertion::with_cursor(text, ctx.cursor + offset)
    } else {
        Insertion::new(format!("{}{}{}", style.open(), ctx.selection, style.close()))
    }
}
