//! System clipboard integration for copy and paste.

use super::*;

impl<'a> Editor<'a> {
    // arboard::Clipboard is created per call and never stored in the Editor.

    /// Writes text to the system clipboard via arboard.
    pub(super) fn copy_to_clipboard(&self, text: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clip) => {
                if let Err(err) = clip.set_text(text.to_string()) {
                    tracing::debug!(%err, "clipboard write failed");
                }
            }
            Err(err) => tracing::debug!(%err, "clipboard unavailable"),
        }
    }

    /// Reads text from the system clipboard. Returns None on failure.
    pub(super) fn paste_from_clipboard(&self) -> Option<String> {
        arboard::Clipboard::new().ok()?.get_text().ok()
    }
}
