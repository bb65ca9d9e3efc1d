use std::cell::RefCell;
use std::rc::Rc;

use vim_core::traits::{Clipboard, ClipboardContent, TransferableItem};

/// Clipboard whose contents stay observable after the session takes it.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Rc<RefCell<Option<ClipboardContent>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.content.borrow().as_ref().map(|c| c.text.clone())
    }

    pub fn transferable(&self) -> Vec<TransferableItem> {
        self.content
            .borrow()
            .as_ref()
            .map(|c| c.transferable.clone())
            .unwrap_or_default()
    }

    /// Simulates another application copying `text`.
    pub fn set_external(&self, text: &str) {
        *self.content.borrow_mut() = Some(ClipboardContent {
            text: text.to_string(),
            transferable: Vec::new(),
        });
    }
}

impl Clipboard for MockClipboard {
    fn get_clipboard_text_and_transferable_data(&mut self) -> Option<ClipboardContent> {
        self.content.borrow().clone()
    }

    fn set_clipboard_text(&mut self, text: &str, _raw_text: &str, transferable: Vec<TransferableItem>) {
        *self.content.borrow_mut() = Some(ClipboardContent {
            text: text.to_string(),
            transferable,
        });
    }
}
