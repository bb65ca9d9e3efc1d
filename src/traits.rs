use unicode_segmentation::UnicodeSegmentation;

use crate::offset::{LinePointer, Offset, Pointer};
use crate::types::{Mode, Position};

/// Identity of a caret.
///
/// Carets move as the document changes, so they are compared by identity,
/// never by the offset they currently sit at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaretId(pub u32);

/// Handle to a line marker that follows document edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u32);

/// The buffer capability surface the engine works against.
///
/// Offsets count chars. Line numbers are zero-based. A buffer whose text ends
/// in `'\n'` does not have an extra empty line: `"a\nb\n"` has two lines.
pub trait VimEditor {
    // Document queries
    fn file_size(&self) -> usize;
    fn line_count(&self) -> usize;
    fn line_start_offset(&self, line: usize) -> Offset;
    /// Offset right before the line's terminating `'\n'` (or end of file).
    fn line_end_offset(&self, line: usize) -> Offset;
    fn offset_to_line(&self, offset: Offset) -> usize;
    fn char_at(&self, pointer: Pointer) -> char;
    fn text_range(&self, start: Offset, end: Offset) -> String;

    fn text(&self) -> String {
        self.text_range(Offset::ZERO, Offset::new(self.file_size()))
    }

    /// `true` when a `'\n'` starts each line after the first, so deleting the
    /// last line may consume the newline that precedes it.
    fn lf_makes_new_line(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        true
    }

    /// Whether `[start, end)` touches a read-only region of the host.
    fn is_guarded(&self, _start: Offset, _end: Offset) -> bool {
        false
    }

    // Mutation
    fn delete_range(&mut self, start: Offset, end: Offset);
    fn insert_text(&mut self, at: Offset, text: &str);

    /// Inserts an empty line so that it becomes line `at_line`.
    ///
    /// Returns `None` when the insertion point is guarded.
    fn add_line(&mut self, at_line: usize) -> Option<LinePointer> {
        let count = self.line_count();
        if at_line > count {
            return None;
        }
        let (at, text) = if at_line == count {
            let size = self.file_size();
            let ends_with_nl = size > 0 && self.char_at(Pointer::new(size - 1)) == '\n';
            // "a\n" and "a" both hold one line, so a missing final newline
            // has to be added along with the new line.
            (Offset::new(size), if ends_with_nl { "\n" } else { "\n\n" })
        } else {
            (self.line_start_offset(at_line), "\n")
        };
        if self.is_guarded(at, at) {
            return None;
        }
        self.insert_text(at, text);
        Some(LinePointer::init(at_line, &*self))
    }

    // Carets
    /// Every caret in document order.
    fn native_carets(&self) -> Vec<CaretId>;
    fn primary_caret(&self) -> CaretId;
    fn in_block_selection(&self) -> bool {
        false
    }
    fn set_block_selection(&mut self, _on: bool) {}

    /// Carets an operation should visit. In block selection only the primary
    /// caret acts.
    fn carets(&self) -> Vec<CaretId> {
        if self.in_block_selection() {
            vec![self.primary_caret()]
        } else {
            self.native_carets()
        }
    }

    fn caret_offset(&self, caret: CaretId) -> Offset;
    fn move_caret(&mut self, caret: CaretId, offset: Offset);
    fn selection(&self, caret: CaretId) -> Option<(Offset, Offset)>;
    fn set_selection(&mut self, caret: CaretId, start: Offset, end: Offset);
    fn remove_selection(&mut self, caret: CaretId);
    fn last_column(&self, caret: CaretId) -> Option<usize>;
    fn set_last_column(&mut self, caret: CaretId, column: Option<usize>);
    fn add_caret(&mut self, offset: Offset) -> Option<CaretId>;
    fn remove_secondary_carets(&mut self);

    fn mode(&self) -> Mode;
    fn set_mode(&mut self, mode: Mode);

    // Markers and marks
    fn create_line_marker(&mut self, line: usize) -> MarkerId;
    /// Current line of the marker, `None` once its line was deleted.
    fn marker_line(&self, marker: MarkerId) -> Option<usize>;
    fn release_marker(&mut self, marker: MarkerId);
    fn set_mark(&mut self, name: char, offset: Offset);
    fn mark(&self, name: char) -> Option<Offset>;
    /// Every set mark, sorted by name.
    fn marks(&self) -> Vec<(char, Offset)>;

    fn scroll_to_caret(&mut self, _caret: CaretId) {}

    // Derived helpers
    fn line_range(&self, line: usize) -> (Offset, Offset) {
        (self.line_start_offset(line), self.line_end_offset(line))
    }

    fn line_text(&self, line: usize) -> String {
        let (start, end) = self.line_range(line);
        self.text_range(start, end)
    }

    fn line_start_for_offset(&self, offset: Offset) -> Offset {
        self.line_start_offset(self.offset_to_line(offset))
    }

    fn line_end_for_offset(&self, offset: Offset) -> Offset {
        self.line_end_offset(self.offset_to_line(offset))
    }

    /// Offset of the first non-blank character on `line`.
    fn first_non_blank(&self, line: usize) -> Offset {
        let (start, end) = self.line_range(line);
        let text = self.text_range(start, end);
        let skip = text.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        start + skip
    }

    fn offset_to_position(&self, offset: Offset) -> Position {
        let line = self.offset_to_line(offset);
        let col = offset.point() - self.line_start_offset(line).point();
        Position { line, col }
    }

    fn position_to_offset(&self, pos: Position) -> Offset {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        let (start, end) = self.line_range(line);
        (start + pos.col).min(end)
    }

    /// Caret column counted in grapheme clusters from the line start.
    fn visual_column(&self, caret: CaretId) -> usize {
        let offset = self.caret_offset(caret);
        let start = self.line_start_for_offset(offset);
        self.text_range(start, offset).graphemes(true).count()
    }

    fn caret_line(&self, caret: CaretId) -> usize {
        self.offset_to_line(self.caret_offset(caret))
    }
}

/// One item of the opaque payload that travels with clipboard text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferableItem {
    /// Caret positions the text was copied from. Hosts use it to split a
    /// multi-caret paste; the engine makes sure one is always present.
    CaretState { starts: Vec<usize>, ends: Vec<usize> },
    /// Anything else the host attached, round-tripped untouched.
    Opaque { mime: String, data: Vec<u8> },
}

/// Clipboard text plus the host payload that came with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardContent {
    pub text: String,
    pub transferable: Vec<TransferableItem>,
}

/// The host clipboard.
pub trait Clipboard {
    fn get_clipboard_text_and_transferable_data(&mut self) -> Option<ClipboardContent>;
    fn set_clipboard_text(&mut self, text: &str, raw_text: &str, transferable: Vec<TransferableItem>);
}

/// A clipboard that stores nothing, used when the host provides none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn get_clipboard_text_and_transferable_data(&mut self) -> Option<ClipboardContent> {
        None
    }

    fn set_clipboard_text(&mut self, _text: &str, _raw_text: &str, _transferable: Vec<TransferableItem>) {}
}

/// Fire-and-forget host services: status bar, bell, output panel, actions.
pub trait HostUi {
    fn show_message(&mut self, message: &str);
    fn beep(&mut self);
    fn output(&mut self, text: &str);
    /// Runs a native host action by name. Returns `false` if it is unknown.
    fn execute_action(&mut self, name: &str) -> bool;
    /// Queues an action to run once the host is ready (e.g. regains focus).
    fn run_later(&mut self, name: &str) {
        let _ = self.execute_action(name);
    }
}

/// Host UI that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHostUi;

impl HostUi for NoHostUi {
    fn show_message(&mut self, _message: &str) {}
    fn beep(&mut self) {}
    fn output(&mut self, _text: &str) {}
    fn execute_action(&mut self, _name: &str) -> bool {
        false
    }
}

/// Host-owned key/value settings used for persisted state.
pub trait SettingsStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: Option<&str>);
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&mut self, key: &str, value: bool);
}
