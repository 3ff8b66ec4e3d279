//! The text-transform engine.
//!
//! Transforms are computed by pure functions over a [`Context`] (selection
//! text, line offset, cursor) and applied by [`execute`], which runs the
//! fixed sequence: read selection, compute, replace, reposition, focus.

pub mod block;
pub mod inline;
pub mod insert;

pub use block::LinePrefix;
pub use inline::InlineStyle;
pub use insert::{LinkSpec, TableSize};

use crate::surface::TextSurface;
use crate::upload::UploadEntry;

/// Snapshot of the surface state a transform is computed from.
#[derive(Debug, Clone, Copy)]
pub struct Context<'s> {
    pub selection: &'s str,
    pub line_offset: usize,
    pub cursor: usize,
}

impl<'s> Context<'s> {
    pub fn new(selection: &'s str, line_offset: usize, cursor: usize) -> Self {
        Self {
            selection,
            line_offset,
            cursor,
        }
    }

    /// Whether the cursor sits after column 0, so block content needs a
    /// leading newline.
    pub fn mid_line(&self) -> bool {
        self.line_offset != 0
    }
}

/// Text to write over the selection and where to leave the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Absolute cursor offset after the write; `None` keeps the surface
    /// default (end of the inserted text).
    pub cursor: Option<usize>,
}

impl Insertion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor: Some(cursor),
        }
    }
}

/// Every document edit the toolbar can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Inline(InlineStyle),
    Prefix(LinePrefix),
    Divider,
    Heading { title: String, field: String },
    Clear,
    Timestamp,
    Indent,
    Link(LinkSpec),
    Image(LinkSpec),
    Table(TableSize),
    Attachments(Vec<UploadEntry>),
    Undo,
    Redo,
}

impl Transform {
    /// Computes the insertion for selection-based transforms. History and
    /// whole-document transforms have none.
    pub fn insertion(&self, ctx: &Context<'_>) -> Option<Insertion> {
        let insertion = match self {
            Self::Inline(style) => inline::wrap(*style, ctx),
            Self::Prefix(kind) => block::prefix_lines(*kind, ctx),
            Self::Divider => insert::divider(ctx),
            Self::Heading { title, field } => insert::heading(title, field, ctx),
            Self::Timestamp => insert::timestamp(&chrono::Local::now().naive_local(), ctx),
            Self::Indent => insert::indent(),
            Self::Link(spec) => insert::link(spec),
            Self::Image(spec) => insert::image(spec),
            Self::Table(size) => insert::table(*size, ctx),
            Self::Attachments(entries) => insert::attachments(entries, ctx),
            Self::Clear | Self::Undo | Self::Redo => return None,
        };
        Some(insertion)
    }
}

/// Writes `insertion` over the current selection.
pub fn apply<S: TextSurface + ?Sized>(surface: &mut S, insertion: Insertion) {
    surface.replace_selection(&insertion.text);
    if let Some(offset) = insertion.cursor {
        surface.set_cursor(offset);
    }
}

/// Runs `transform` against `surface` and returns focus to it.
///
/// Returns true if the document was modified.
pub fn execute<S: TextSurface + ?Sized>(surface: &mut S, transform: &Transform) -> bool {
    let changed = match transform {
        Transform::Undo => surface.undo(),
        Transform::Redo => surface.redo(),
        Transform::Clear => {
            let len = surface.len_chars();
            surface.replace_range(0..len, "");
            true
        }
        _ => {
            let selection = surface.selection_text();
            let ctx = Context::new(&selection, surface.line_offset(), surface.cursor());
            match transform.insertion(&ctx) {
                Some(insertion) => {
                    apply(surface, insertion);
                    true
                }
                None => false,
            }
        }
    };
    tracing::debug!(?transform, changed, "applied transform");
    surface.focus();
    changed
}
