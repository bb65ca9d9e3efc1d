//! System clipboard backed by `arboard`.

use tracing::warn;

use crate::traits::{Clipboard, ClipboardContent, TransferableItem};

/// The desktop clipboard. Access is best effort: headless environments
/// simply read nothing.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    // arboard only carries text, so the payload of our own last write is kept
    // here and handed back while the text is unchanged.
    last_write: Option<ClipboardContent>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                warn!(%err, "system clipboard unavailable");
                None
            }
        };
        SystemClipboard {
            inner,
            last_write: None,
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn get_clipboard_text_and_transferable_data(&mut self) -> Option<ClipboardContent> {
        let text = self.inner.as_mut()?.get_text().ok()?;
        let transferable = match &self.last_write {
            Some(last) if last.text == text => last.transferable.clone(),
            _ => Vec::new(),
        };
        Some(ClipboardContent { text, transferable })
    }

    fn set_clipboard_text(&mut self, text: &str, raw_text: &str, transferable: Vec<TransferableItem>) {
        let Some(inner) = self.inner.as_mut() else {
            return;
        };
        if let Err(err) = inner.set_text(raw_text.to_string()) {
            warn!(%err, "failed to write system clipboard");
            return;
        }
        self.last_write = Some(ClipboardContent {
            text: text.to_string(),
            transferable,
        });
    }
}
