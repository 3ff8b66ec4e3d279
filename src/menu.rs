//! Toolbar configuration and dispatch state.
//!
//! Menu items arrive as static configuration (`MenuItem`, deserialized from
//! TOML or built in). They are resolved once into typed [`Action`]s so that
//! dispatch is an exhaustive match rather than a string switch. `MenuBar`
//! keeps the dropdown expansion state: at most one dropdown is expanded.

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transform::{InlineStyle, LinePrefix, Transform};

/// Static description of one toolbar affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    /// Heading prefix (e.g. `"## "`) for `title` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuItem>>,
}

impl MenuItem {
    pub fn leaf(kind: &str, title: &str, icon: &str) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            field: None,
            children: None,
        }
    }

    pub fn heading(title: &str, field: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            ..Self::leaf("title", title, field.trim())
        }
    }

    pub fn dropdown(kind: &str, title: &str, icon: &str, children: Vec<MenuItem>) -> Self {
        Self {
            children: Some(children),
            ..Self::leaf(kind, title, icon)
        }
    }
}

/// A toolbar action, resolved from a leaf item's `type` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Undo,
    Redo,
    FullScreen,
    Italic,
    Bold,
    Strikethrough,
    InlineCode,
    Divider,
    Quote,
    OrderedList,
    UnorderedList,
    Heading { title: String, field: String },
    Clean,
    Download,
    Timestamp,
    Indent,
    Link,
    Image,
    Upload,
    Table,
}

/// What the editor has to do for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Apply a transform right away.
    Transform(Transform),
    /// Collect input in a dialog first.
    Dialog(DialogKind),
    ToggleFullScreen,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Link,
    Image,
    Upload,
    Table,
}

impl Action {
    pub fn from_item(item: &MenuItem) -> Result<Self> {
        let action = match item.kind.as_str() {
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "full-screen" => Self::FullScreen,
            "italic" => Self::Italic,
            "bold" => Self::Bold,
            "line-through" => Self::Strikethrough,
            "marker" => Self::InlineCode,
            "split-line" => Self::Divider,
            "block-quotations" => Self::Quote,
            "ordered-list" => Self::OrderedList,
            "unordered-list" => Self::UnorderedList,
            "title" => Self::Heading {
                title: item.title.clone(),
                field: item
                    .field
                    .clone()
                    .ok_or_else(|| Error::MissingHeadingField(item.title.clone()))?,
            },
            "clean" => Self::Clean,
            "download" => Self::Download,
            "time" => Self::Timestamp,
            "indent" => Self::Indent,
            "link" => Self::Link,
            "picture" => Self::Image,
            "upload" => Self::Upload,
            "table" => Self::Table,
            other => return Err(Error::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    pub fn dispatch(&self) -> Dispatch {
        match self {
            Self::Undo => Dispatch::Transform(Transform::Undo),
            Self::Redo => Dispatch::Transform(Transform::Redo),
            Self::FullScreen => Dispatch::ToggleFullScreen,
            Self::Italic => Dispatch::Transform(Transform::Inline(InlineStyle::Italic)),
            Self::Bold => Dispatch::Transform(Transform::Inline(InlineStyle::Bold)),
            Self::Strikethrough => {
                Dispatch::Transform(Transform::Inline(InlineStyle::Strikethrough))
            }
            Self::InlineCode => Dispatch::Transform(Transform::Inline(InlineStyle::Code)),
            Self::Divider => Dispatch::Transform(Transform::Divider),
            Self::Quote => Dispatch::Transform(Transform::Prefix(LinePrefix::Quote)),
            Self::OrderedList => Dispatch::Transform(Transform::Prefix(LinePrefix::Ordered)),
            Self::UnorderedList => Dispatch::Transform(Transform::Prefix(LinePrefix::Unordered)),
            Self::Heading { title, field } => Dispatch::Transform(Transform::Heading {
                title: title.clone(),
                field: field.clone(),
            }),
            Self::Clean => Dispatch::Transform(Transform::Clear),
            Self::Download => Dispatch::Download,
            Self::Timestamp => Dispatch::Transform(Transform::Timestamp),
            Self::Indent => Dispatch::Transform(Transform::Indent),
            Self::Link => Dispatch::Dialog(DialogKind::Link),
            Self::Image => Dispatch::Dialog(DialogKind::Image),
            Self::Upload => Dispatch::Dialog(DialogKind::Upload),
            Self::Table => Dispatch::Dialog(DialogKind::Table),
        }
    }
}

/// A dropdown child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLeaf {
    pub title: String,
    pub icon: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Action(Action),
    Dropdown(Vec<MenuLeaf>),
}

/// A top-level toolbar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    pub icon: String,
    pub kind: EntryKind,
}

impl MenuEntry {
    pub fn children(&self) -> &[MenuLeaf] {
        match &self.kind {
            EntryKind::Dropdown(children) => children,
            EntryKind::Action(_) => &[],
        }
    }

    pub fn is_dropdown(&self) -> bool {
        matches!(self.kind, EntryKind::Dropdown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    Normal,
    Fullscreen,
}

impl ScreenMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Normal => Self::Fullscreen,
            Self::Fullscreen => Self::Normal,
        }
    }
}

/// Keyboard highlight inside the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCursor {
    pub entry: usize,
    pub child: Option<usize>,
}

/// Outcome of a key press while the menu bar has keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResponse {
    Handled,
    Activated(Action),
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct MenuBar {
    entries: Vec<MenuEntry>,
    expanded: Option<usize>,
    cursor: Option<MenuCursor>,
}

impl MenuBar {
    /// Resolves configuration items. Unknown leaf types are rejected; dropdown
    /// children that carry their own children are skipped.
    pub fn from_items(items: &[MenuItem]) -> Result<Self> {
        let entries = items
            .iter()
            .map(|item| {
                let kind = match &item.children {
                    Some(children) => EntryKind::Dropdown(
                        children
                            .iter()
                            .filter(|child| {
                                if child.children.is_some() {
                                    tracing::warn!(
                                        title = %child.title,
                                        "nested dropdowns are not supported, skipping"
                                    );
                                    return false;
                                }
                                true
                            })
                            .map(|child| {
                                Ok(MenuLeaf {
                                    title: child.title.clone(),
                                    icon: child.icon.clone(),
                                    action: Action::from_item(child)?,
                                })
                            })
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    None => EntryKind::Action(Action::from_item(item)?),
                };
                Ok(MenuEntry {
                    title: item.title.clone(),
                    icon: item.icon.clone(),
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            entries,
            expanded: None,
            cursor: None,
        })
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn dropdown_state(&self, index: usize) -> DropdownState {
        if self.expanded == Some(index) {
            DropdownState::Expanded
        } else {
            DropdownState::Collapsed
        }
    }

    /// Click on a top-level entry. Dropdowns toggle (collapsing every
    /// sibling); plain entries collapse the bar and return their action.
    pub fn click(&mut self, index: usize) -> Option<Action> {
        let entry = self.entries.get(index)?;
        match &entry.kind {
            EntryKind::Dropdown(_) => {
                self.expanded = match self.expanded {
                    Some(open) if open == index => None,
                    _ => Some(index),
                };
                None
            }
            EntryKind::Action(action) => {
                let action = action.clone();
                self.expanded = None;
                Some(action)
            }
        }
    }

    /// Click on a dropdown child: the dropdown closes and the child's action
    /// is returned.
    pub fn click_child(&mut self, index: usize, child: usize) -> Option<Action> {
        let action = self
            .entries
            .get(index)?
            .children()
            .get(child)?
            .action
            .clone();
        self.expanded = None;
        self.cursor = None;
        Some(action)
    }

    /// Click anywhere outside the bar and its dropdown.
    pub fn collapse_all(&mut self) {
        self.expanded = None;
    }

    // ─── Keyboard navigation ──────────────────────────────────────────────

    pub fn cursor(&self) -> Option<MenuCursor> {
        self.cursor
    }

    pub fn has_focus(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn focus(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = Some(MenuCursor {
                entry: 0,
                child: None,
            });
        }
    }

    pub fn blur(&mut self) {
        self.cursor = None;
        self.expanded = None;
    }

    pub fn handle_key(&mut self, code: KeyCode) -> MenuResponse {
        let Some(cursor) = self.cursor else {
            return MenuResponse::Closed;
        };
        let count = self.entries.len();
        match code {
            KeyCode::Esc | KeyCode::F(10) => {
                self.blur();
                MenuResponse::Closed
            }
            KeyCode::Left | KeyCode::Right => {
                let entry = if code == KeyCode::Left {
                    (cursor.entry + count - 1) % count
                } else {
                    (cursor.entry + 1) % count
                };
                // keep a dropdown open while sliding across the bar
                if self.expanded.is_some() {
                    self.expanded = self.entries[entry].is_dropdown().then_some(entry);
                }
                self.cursor = Some(MenuCursor { entry, child: None });
                MenuResponse::Handled
            }
            KeyCode::Down | KeyCode::Up => {
                let children = self.entries[cursor.entry].children().len();
                if children == 0 {
                    return MenuResponse::Handled;
                }
                if self.expanded != Some(cursor.entry) {
                    self.expanded = Some(cursor.entry);
                    self.cursor = Some(MenuCursor {
                        entry: cursor.entry,
                        child: Some(0),
                    });
                    return MenuResponse::Handled;
                }
                let child = match (cursor.child, code) {
                    (None, _) => 0,
                    (Some(c), KeyCode::Down) => (c + 1) % children,
                    (Some(c), _) => (c + children - 1) % children,
                };
                self.cursor = Some(MenuCursor {
                    entry: cursor.entry,
                    child: Some(child),
                });
                MenuResponse::Handled
            }
            KeyCode::Enter => {
                let action = match cursor.child {
                    Some(child) if self.expanded == Some(cursor.entry) => {
                        self.click_child(cursor.entry, child)
                    }
                    _ => self.click(cursor.entry),
                };
                match action {
                    Some(action) => {
                        self.blur();
                        MenuResponse::Activated(action)
                    }
                    None => {
                        let child = (self.expanded == Some(cursor.entry)).then_some(0);
                        self.cursor = Some(MenuCursor {
                            entry: cursor.entry,
                            child,
                        });
                        MenuResponse::Handled
                    }
                }
            }
            _ => MenuResponse::Handled,
        }
    }
}

/// The built-in toolbar.
pub fn default_items() -> Vec<MenuItem> {
    vec![
        MenuItem::leaf("undo", "撤销", "↶"),
        MenuItem::leaf("redo", "重做", "↷"),
        MenuItem::dropdown(
            "style",
            "样式",
            "B",
            vec![
                MenuItem::leaf("italic", "倾斜", "I"),
                MenuItem::leaf("bold", "加粗", "B"),
                MenuItem::leaf("line-through", "删除线", "S"),
                MenuItem::leaf("marker", "行内标记", "`"),
            ],
        ),
        MenuItem::dropdown(
            "title",
            "标题",
            "H",
            vec![
                MenuItem::heading("一级标题", "# "),
                MenuItem::heading("二级标题", "## "),
                MenuItem::heading("三级标题", "### "),
                MenuItem::heading("四级标题", "#### "),
                MenuItem::heading("五级标题", "##### "),
                MenuItem::heading("六级标题", "###### "),
            ],
        ),
        MenuItem::dropdown(
            "paragraph",
            "段落",
            "¶",
            vec![
                MenuItem::leaf("split-line", "分割线", "—"),
                MenuItem::leaf("block-quotations", "引用", ">"),
                MenuItem::leaf("ordered-list", "有序列表", "1."),
                MenuItem::leaf("unordered-list", "无序列表", "-"),
                MenuItem::leaf("indent", "缩进", "⇥"),
            ],
        ),
        MenuItem::dropdown(
            "insert",
            "插入",
            "+",
            vec![
                MenuItem::leaf("link", "超链接", "@"),
                MenuItem::leaf("picture", "图片", "▣"),
                MenuItem::leaf("upload", "上传附件", "↑"),
                MenuItem::leaf("table", "表格", "#"),
                MenuItem::leaf("time", "当前时间", "◷"),
            ],
        ),
        MenuItem::dropdown(
            "tools",
            "工具",
            "≡",
            vec![
                MenuItem::leaf("clean", "清空", "×"),
                MenuItem::leaf("download", "下载", "↓"),
            ],
        ),
        MenuItem::leaf("full-screen", "全屏", "□"),
    ]
}
