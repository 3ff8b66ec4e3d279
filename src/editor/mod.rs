use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_textarea::{CursorMove, Input, Key};

use crate::components::{dialog, status, textarea, toolbar};
use crate::config::{Axis, Dimension, EditorOptions, Target};
use crate::error::{Error, Result};
use crate::menu::{Action, DialogKind, Dispatch, MenuBar, MenuResponse, ScreenMode};
use crate::modal::{dialogs, Modal, ModalConfig, ModalEvent};
use crate::surface::{TextAreaSurface, TextSurface};
use crate::theme;
use crate::transform::{self, Transform};
use crate::upload::{UploadJob, Uploader};

/// How long status bar messages stay visible before auto-clearing.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Maximum time between clicks to count as multi-click (double/triple).
const MULTI_CLICK_MS: u64 = 500;

/// File name used by the download action.
pub const DOWNLOAD_FILE_NAME: &str = "新文章.md";

/// Screen areas from the last render, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct HitAreas {
    container: Rect,
    toolbar: Vec<Rect>,
    /// Expanded dropdown: owning entry and its area.
    dropdown: Option<(usize, Rect)>,
    dialog: Option<dialog::DialogLayout>,
    content: Rect,
}

/// Classifies a character for word-boundary detection (double-click selection).
/// Same class = same "word". Classes: 0=word, 1=whitespace, 2=punctuation.
fn char_class(c: char) -> u8 {
    if c.is_alphanumeric() || c == '_' {
        0
    } else if c.is_whitespace() {
        1
    } else {
        2
    }
}

pub struct Editor<'a> {
    // --- Core state ---
    surface: TextAreaSurface<'a>,
    menu: MenuBar,
    modal: Modal,
    screen: ScreenMode,
    pub should_quit: bool,

    // --- Placement ---
    /// `None` when the editor was created without a target.
    target: Option<Target>,
    width: Dimension,
    height: Dimension,

    // --- Upload / download ---
    uploader: Option<Uploader>,
    upload_jobs: Vec<UploadJob>,
    download_dir: PathBuf,

    // --- Status bar ---
    pub status_message: String,
    pub status_time: Option<Instant>,

    // --- Internal tracking ---
    hit: HitAreas,
    /// Tracks tui-textarea's scroll position for mouse click → buffer position math.
    editor_scroll_top: u16,
    /// True while left mouse button is held down for drag selection.
    mouse_dragging: bool,
    /// Timestamp of last left-click in content area, for double/triple-click detection.
    last_click_time: Option<Instant>,
    /// Terminal position of last click, for multi-click detection.
    last_click_pos: (u16, u16),
    /// Click count (1=single, 2=double, 3=triple), resets on timeout or position change.
    click_count: u8,
}

impl<'a> Editor<'a> {
    /// Builds the editor. Fails only on a menu configuration that does not
    /// resolve.
    pub fn new(options: EditorOptions) -> Result<Self> {
        let menu = MenuBar::from_items(&options.menus)?;

        let mut surface = TextAreaSurface::new(&options.doc);
        textarea::configure_textarea(surface.textarea_mut());
        if options.target.is_none() {
            tracing::debug!("no target, editor runs detached");
        }

        Ok(Self {
            surface,
            menu,
            modal: Modal::new(),
            screen: ScreenMode::Normal,
            should_quit: false,
            target: options.target,
            width: options.width,
            height: options.height,
            uploader: options.upload_file,
            upload_jobs: Vec::new(),
            download_dir: options.download_dir,
            status_message: "F10: menu | F11: fullscreen | Ctrl+Q: quit".to_string(),
            status_time: Some(Instant::now()),
            hit: HitAreas::default(),
            editor_scroll_top: 0,
            mouse_dragging: false,
            last_click_time: None,
            last_click_pos: (0, 0),
            click_count: 0,
        })
    }

    // ─── Document API ────────────────────────────────────────────────────

    /// Returns key focus to the text surface.
    pub fn focus(&mut self) {
        self.menu.blur();
        self.surface.focus();
    }

    /// Char offset of the cursor in the document.
    pub fn get_cursor(&self) -> usize {
        self.surface.cursor()
    }

    pub fn get_selection_text(&self) -> String {
        self.surface.selection_text()
    }

    pub fn replace_selection(&mut self, text: &str) {
        self.surface.replace_selection(text);
    }

    /// Column of the cursor within its line.
    pub fn get_line_ch(&self) -> usize {
        self.surface.line_offset()
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.surface.set_cursor(offset);
    }

    pub fn get_doc(&self) -> String {
        self.surface.text()
    }

    pub fn surface(&self) -> &TextAreaSurface<'a> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut TextAreaSurface<'a> {
        &mut self.surface
    }

    // ─── Toolbar / dialogs ───────────────────────────────────────────────

    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn screen_mode(&self) -> ScreenMode {
        self.screen
    }

    /// Page scrolling is locked while a dialog is open or the editor is
    /// fullscreen.
    pub fn scroll_locked(&self) -> bool {
        self.modal.is_open() || self.screen == ScreenMode::Fullscreen
    }

    /// Whether the editor draws and accepts UI events.
    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    /// Runs a toolbar action.
    pub fn dispatch(&mut self, action: &Action) {
        tracing::debug!(?action, "dispatch");
        match action.dispatch() {
            Dispatch::Transform(transform) => {
                self.execute(&transform);
            }
            Dispatch::Dialog(kind) => self.open_dialog(kind),
            Dispatch::ToggleFullScreen => self.toggle_fullscreen(),
            Dispatch::Download => {
                // failures are reported in the status bar
                let _ = self.download();
            }
        }
    }

    /// Applies `transform` to the document and refocuses the surface.
    pub fn execute(&mut self, transform: &Transform) -> bool {
        self.menu.blur();
        transform::execute(&mut self.surface, transform)
    }

    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.open_modal(dialogs::for_kind(kind, self.uploader.is_some()));
    }

    /// Shows `config` in the dialog, replacing any open one.
    pub fn open_modal(&mut self, config: ModalConfig) {
        self.menu.blur();
        self.surface.blur();
        self.modal.open(config);
    }

    /// Presses 确定 on the open dialog.
    pub fn confirm_modal(&mut self) {
        match self.modal.confirm() {
            Some(transform) => {
                self.execute(&transform);
            }
            None => self.surface.focus(),
        }
    }

    /// Presses 取消 (or ×) on the open dialog.
    pub fn cancel_modal(&mut self) {
        match self.modal.cancel() {
            Some(transform) => {
                self.execute(&transform);
            }
            None => self.surface.focus(),
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.screen = self.screen.toggle();
        self.menu.collapse_all();
        tracing::debug!(screen = ?self.screen, "screen mode");
    }

    // ─── Tick / timers ───────────────────────────────────────────────────

    /// Called every 100ms from the main loop. Collects finished uploads and
    /// expires status messages.
    pub fn tick(&mut self) {
        self.poll_uploads();

        // Auto-clear status messages after STATUS_DURATION
        if let Some(time) = self.status_time {
            if time.elapsed() >= STATUS_DURATION {
                self.status_message.clear();
                self.status_time = None;
            }
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Top-level event handler. Dispatches to key, mouse, or paste handlers.
    /// A detached editor ignores every event.
    pub fn handle_event(&mut self, event: Event) {
        if self.target.is_none() {
            return;
        }
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Bracketed paste: terminal sends entire clipboard as one event
            // (enabled via EnableBracketedPaste in main.rs)
            Event::Paste(text) => self.handle_paste(text),
            Event::Resize(_, _) => {} // ratatui handles resize
            _ => {}
        }
    }

    /// Shows a temporary message in the status bar.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = msg.to_string();
        self.status_time = Some(Instant::now());
    }

    fn char_count(&self) -> usize {
        self.surface
            .textarea()
            .lines()
            .iter()
            .map(|line| line.chars().count())
            .sum()
    }
}

mod clipboard;
mod download;
mod input;
mod render;
mod selection;
mod uploads;

#[cfg(test)]
mod tests;
