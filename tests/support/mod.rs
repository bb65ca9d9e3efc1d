#![allow(dead_code)]

pub mod mock_clipboard;
pub mod mock_host;

use std::time::Duration;

use vim_core::{RopeEditor, Session};

use mock_clipboard::MockClipboard;
use mock_host::MockHost;

/// A session wired to recording mocks, plus handles to inspect them.
pub fn session() -> (Session, MockHost, MockClipboard) {
    let host = MockHost::new();
    let clipboard = MockClipboard::new();
    let session = Session::builder()
        .host(host.clone())
        .clipboard(clipboard.clone())
        .bell_interval(Duration::ZERO)
        .build();
    (session, host, clipboard)
}

/// Runs `line` and returns the buffer contents afterwards.
pub fn run(session: &mut Session, editor: &mut RopeEditor, line: &str) -> String {
    let _ = vim_core::execute(session, editor, line);
    editor.contents()
}

pub fn caret(editor: &RopeEditor) -> usize {
    editor.caret_offsets()[0]
}
