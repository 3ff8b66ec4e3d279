//! Single-instance dialog overlay.
//!
//! The editor owns exactly one [`Modal`]. Opening it installs a fresh
//! [`ModalConfig`], replacing whatever was shown before; closing it through
//! ×, 取消 or 确定 runs the matching callback first. Callbacks do not touch the
//! document: they return the [`Transform`] the editor should execute.

pub mod dialogs;
pub mod input;

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};

pub use input::TextInput;

use crate::transform::Transform;
use crate::upload::UploadEntry;

pub const DEFAULT_TITLE: &str = "提示";
pub const CANCEL_LABEL: &str = "取消";
pub const CONFIRM_LABEL: &str = "确定";
pub const CLOSE_LABEL: &str = "×";

/// Runs when the dialog is dismissed; may request a document edit.
pub type ModalCallback = Box<dyn FnOnce(&ModalBody) -> Option<Transform>>;

/// Runs right after a dialog's content has been installed.
pub type OpenCallback = Box<dyn FnOnce(&mut ModalBody)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub input: TextInput,
}

impl FormField {
    pub fn new(name: &str, label: &str, placeholder: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            input: TextInput::new(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub fields: Vec<FormField>,
    /// Index of the field receiving key input.
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Value of the field called `name`, or `""` if there is none.
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map_or("", |f| f.input.value())
    }

    fn cycle(&mut self, forward: bool) {
        let n = self.fields.len();
        if n == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % n
        } else {
            (self.focus + n - 1) % n
        };
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        self.fields.get_mut(self.focus).map(|f| &mut f.input)
    }
}

/// File picker plus the list of files uploaded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPanel {
    /// Paths typed or dropped by the user, submitted with Enter.
    pub path: TextInput,
    pub pending: Vec<UploadEntry>,
    /// Whether the editor has an uploader to send files to.
    pub enabled: bool,
    /// A batch is in flight.
    pub uploading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    Text(String),
    Form(Form),
    Upload(UploadPanel),
}

impl ModalBody {
    pub fn form(&self) -> Option<&Form> {
        match self {
            Self::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn upload(&self) -> Option<&UploadPanel> {
        match self {
            Self::Upload(panel) => Some(panel),
            _ => None,
        }
    }
}

/// Everything `Modal::open` installs.
pub struct ModalConfig {
    pub title: String,
    pub body: ModalBody,
    pub has_footer: bool,
    pub on_cancel: Option<ModalCallback>,
    pub on_confirm: Option<ModalCallback>,
    pub on_open: Option<OpenCallback>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: ModalBody::Text(String::new()),
            has_footer: true,
            on_cancel: None,
            on_confirm: None,
            on_open: None,
        }
    }
}

/// A dialog currently on screen.
pub struct OpenModal {
    pub title: String,
    pub body: ModalBody,
    pub has_footer: bool,
    /// Bumped on every open; work started for an older dialog is discarded.
    pub generation: u64,
    on_cancel: Option<ModalCallback>,
    on_confirm: Option<ModalCallback>,
}

#[derive(Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Open(OpenModal),
}

/// What a key press inside the dialog asks the editor to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Ignored,
    Handled,
    Confirm,
    Cancel,
    /// Paths submitted in the upload picker.
    FilesPicked(Vec<PathBuf>),
}

#[derive(Default)]
pub struct Modal {
    state: ModalState,
    generation: u64,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `config`, replacing any dialog already open.
    pub fn open(&mut self, config: ModalConfig) {
        self.generation += 1;
        let ModalConfig {
            title,
            body,
            has_footer,
            on_cancel,
            on_confirm,
            on_open,
        } = config;
        tracing::debug!(%title, generation = self.generation, "opening dialog");
        self.state = ModalState::Open(OpenModal {
            title,
            body,
            has_footer,
            generation: self.generation,
            on_cancel,
            on_confirm,
        });
        if let (Some(on_open), ModalState::Open(open)) = (on_open, &mut self.state) {
            on_open(&mut open.body);
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn current(&self) -> Option<&OpenModal> {
        match &self.state {
            ModalState::Open(open) => Some(open),
            ModalState::Hidden => None,
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut OpenModal> {
        match &mut self.state {
            ModalState::Open(open) => Some(open),
            ModalState::Hidden => None,
        }
    }

    /// Generation of the most recently opened dialog.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn take(&mut self) -> Option<OpenModal> {
        match std::mem::take(&mut self.state) {
            ModalState::Open(open) => Some(open),
            ModalState::Hidden => None,
        }
    }

    /// 确定: hides the dialog and runs the confirm callback.
    pub fn confirm(&mut self) -> Option<Transform> {
        let open = self.take()?;
        open.on_confirm.and_then(|cb| cb(&open.body))
    }

    /// 取消 and ×: hides the dialog and runs the cancel callback.
    pub fn cancel(&mut self) -> Option<Transform> {
        let open = self.take()?;
        open.on_cancel.and_then(|cb| cb(&open.body))
    }

    /// Adds uploaded entries to the picker if it still belongs to
    /// `generation`. Returns false when the entries were discarded.
    pub fn append_entries(&mut self, generation: u64, entries: Vec<UploadEntry>) -> bool {
        match self.current_mut() {
            Some(OpenModal {
                generation: current,
                body: ModalBody::Upload(panel),
                ..
            }) if *current == generation => {
                panel.pending.extend(entries);
                true
            }
            _ => false,
        }
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        if let Some(OpenModal {
            body: ModalBody::Upload(panel),
            ..
        }) = self.current_mut()
        {
            panel.uploading = uploading;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalEvent {
        let Some(open) = self.current_mut() else {
            return ModalEvent::Ignored;
        };
        match key.code {
            KeyCode::Esc => return ModalEvent::Cancel,
            KeyCode::Tab | KeyCode::BackTab => {
                if let ModalBody::Form(form) = &mut open.body {
                    form.cycle(key.code == KeyCode::Tab);
                }
                return ModalEvent::Handled;
            }
            KeyCode::Enter => {
                if let ModalBody::Upload(panel) = &mut open.body {
                    if !panel.path.value().trim().is_empty() {
                        let paths = parse_paths(panel.path.value());
                        panel.path.clear();
                        return ModalEvent::FilesPicked(paths);
                    }
                }
                return ModalEvent::Confirm;
            }
            _ => {}
        }
        let handled = match &mut open.body {
            ModalBody::Form(form) => form.focused_input().is_some_and(|i| i.handle_key(key)),
            ModalBody::Upload(panel) => panel.path.handle_key(key),
            ModalBody::Text(_) => false,
        };
        if handled {
            ModalEvent::Handled
        } else {
            ModalEvent::Ignored
        }
    }

    /// Bracketed paste. Dropping files onto a terminal pastes their paths,
    /// so a paste into the upload picker submits them right away.
    pub fn handle_paste(&mut self, text: &str) -> ModalEvent {
        let Some(open) = self.current_mut() else {
            return ModalEvent::Ignored;
        };
        match &mut open.body {
            ModalBody::Upload(_) => {
                let paths = parse_paths(text);
                if paths.is_empty() {
                    ModalEvent::Handled
                } else {
                    ModalEvent::FilesPicked(paths)
                }
            }
            ModalBody::Form(form) => {
                if let Some(input) = form.focused_input() {
                    input.insert_str(text);
                }
                ModalEvent::Handled
            }
            ModalBody::Text(_) => ModalEvent::Ignored,
        }
    }

    /// Moves key focus to a form field, e.g. after a mouse click.
    pub fn focus_field(&mut self, index: usize) {
        if let Some(OpenModal {
            body: ModalBody::Form(form),
            ..
        }) = self.current_mut()
        {
            if index < form.fields.len() {
                form.focus = index;
            }
        }
    }
}

/// Splits pasted or typed text into file paths.
///
/// Terminals drop files as whitespace-separated paths, quoting or
/// backslash-escaping the ones that contain spaces, sometimes as `file://`
/// URLs.
pub fn parse_paths(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut started = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                started = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    started = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if started {
                    paths.push(to_path(&current));
                    current.clear();
                    started = false;
                }
            }
            (None, c) => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        paths.push(to_path(&current));
    }
    paths
}

fn to_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw))
}
