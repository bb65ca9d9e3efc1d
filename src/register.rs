//! Registers and the rules that route yanked and deleted text into them.
//!
//! - An explicit register (`"a`) receives the text alone; uppercase names
//!   append to their lowercase register. Numbered and small-delete registers
//!   are left alone.
//! - Without one, a delete within a single line goes to `-`. Any other delete
//!   shifts `1`..`8` into `2`..`9` and lands in `1`. A few motions (see
//!   [`NOT_SMALL_MOTIONS`]) always count as big.
//! - Without one, a yank goes to `0`.
//! - The unnamed register `"` mirrors whatever was written last.
//! - `*` and `+` are backed by the host clipboard.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{ExError, ExResult};
use crate::key::{KeyEvent, keys_to_text, text_to_keys};
use crate::options::{ClipboardMode, Options};
use crate::traits::{Clipboard, TransferableItem};
use crate::types::SelectionType;

pub const UNNAMED_REGISTER: char = '"';
pub const SMALL_DELETE_REGISTER: char = '-';
pub const BLACK_HOLE_REGISTER: char = '_';
pub const LAST_SEARCH_REGISTER: char = '/';
pub const LAST_INSERTED_TEXT_REGISTER: char = '.';
pub const LAST_COMMAND_REGISTER: char = ':';
pub const CLIPBOARD_REGISTER: char = '+';
pub const PRIMARY_REGISTER: char = '*';

/// Motions whose deletes use the numbered registers even within one line.
pub const NOT_SMALL_MOTIONS: [char; 10] = ['%', '(', ')', '`', '/', '?', 'n', 'N', '{', '}'];

const READ_ONLY_REGISTERS: &str = ":./%#";

/// Order used when listing registers.
const DISPLAY_ORDER: &str = "\"0123456789abcdefghijklmnopqrstuvwxyz-*+.:/";

/// Stored register content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: char,
    kind: SelectionType,
    text: String,
    keys: Option<Vec<KeyEvent>>,
    transferable: Vec<TransferableItem>,
}

impl Register {
    pub fn new(name: char, kind: SelectionType, text: impl Into<String>) -> Self {
        let mut text = text.into();
        if kind == SelectionType::LineWise && !text.ends_with('\n') {
            text.push('\n');
        }
        Register {
            name,
            kind,
            text,
            keys: None,
            transferable: Vec::new(),
        }
    }

    /// A register recorded from keystrokes (a macro).
    pub fn from_keys(name: char, keys: Vec<KeyEvent>) -> Self {
        Register {
            name,
            kind: SelectionType::CharacterWise,
            text: keys_to_text(&keys),
            keys: Some(keys),
            transferable: Vec::new(),
        }
    }

    pub fn name(&self) -> char {
        self.name
    }

    pub fn kind(&self) -> SelectionType {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw keys when recorded as a macro, otherwise the text read as keys.
    pub fn keys(&self) -> Vec<KeyEvent> {
        match &self.keys {
            Some(keys) => keys.clone(),
            None => text_to_keys(&self.text),
        }
    }

    pub fn transferable(&self) -> &[TransferableItem] {
        &self.transferable
    }

    fn renamed(&self, name: char) -> Register {
        Register {
            name,
            ..self.clone()
        }
    }

    fn append(&mut self, kind: SelectionType, text: &str) {
        if self.kind == SelectionType::LineWise || kind == SelectionType::LineWise {
            if !self.text.ends_with('\n') {
                self.text.push('\n');
            }
            self.text.push_str(text);
            if !self.text.ends_with('\n') {
                self.text.push('\n');
            }
            self.kind = SelectionType::LineWise;
        } else {
            self.text.push_str(text);
        }
        self.keys = None;
        self.transferable.clear();
    }
}

/// Why text is being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    Yank,
    Delete {
        /// The deleted range started and ended on the same line.
        single_line: bool,
        /// The motion key that produced the range, if any.
        motion: Option<char>,
    },
}

/// The register table, shared by every editor of a session.
#[derive(Debug, Clone, Default)]
pub struct RegisterGroup {
    registers: BTreeMap<char, Register>,
}

impl RegisterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(name: char) -> bool {
        name.is_ascii_alphanumeric() || "\"-_*+/.:%#".contains(name)
    }

    pub fn is_writable(name: char) -> bool {
        Self::is_valid(name) && !READ_ONLY_REGISTERS.contains(name)
    }

    fn is_clipboard(name: char) -> bool {
        name == CLIPBOARD_REGISTER || name == PRIMARY_REGISTER
    }

    /// The register used when none is given.
    pub fn default_register(options: &Options) -> char {
        match options.clipboard {
            ClipboardMode::Off => UNNAMED_REGISTER,
            ClipboardMode::Unnamed => PRIMARY_REGISTER,
            ClipboardMode::UnnamedPlus => CLIPBOARD_REGISTER,
        }
    }

    /// Routes `text` into the registers.
    ///
    /// A write to an explicit register also updates `"`, as Vim does.
    pub fn store_text(
        &mut self,
        clipboard: &mut dyn Clipboard,
        options: &Options,
        register: Option<char>,
        text: &str,
        kind: SelectionType,
        op: RegisterOp,
    ) -> ExResult {
        let default = Self::default_register(options);
        let name = register.unwrap_or(default);
        if !Self::is_writable(name) {
            return Err(ExError::InvalidRegister(name));
        }
        if name == BLACK_HOLE_REGISTER {
            return Ok(());
        }
        let content = Register::new(name, kind, text);
        let explicit = name != default && name != UNNAMED_REGISTER;
        debug!(register = %name, ?kind, ?op, explicit, "store text");

        if explicit {
            let stored = self.write(clipboard, content);
            self.registers
                .insert(UNNAMED_REGISTER, stored.renamed(UNNAMED_REGISTER));
            return Ok(());
        }

        match op {
            RegisterOp::Delete {
                single_line,
                motion,
            } => {
                let small = single_line && kind != SelectionType::LineWise;
                let forced_big = motion.is_some_and(|m| NOT_SMALL_MOTIONS.contains(&m));
                if !small || forced_big {
                    self.shift_numbered(content.renamed('1'));
                }
                if small {
                    self.registers
                        .insert(SMALL_DELETE_REGISTER, content.renamed(SMALL_DELETE_REGISTER));
                }
            }
            RegisterOp::Yank => {
                self.registers.insert('0', content.renamed('0'));
            }
        }
        if Self::is_clipboard(default) {
            self.write(clipboard, content.renamed(default));
        }
        self.registers
            .insert(UNNAMED_REGISTER, content.renamed(UNNAMED_REGISTER));
        Ok(())
    }

    /// Writes one named register; returns what it now holds.
    fn write(&mut self, clipboard: &mut dyn Clipboard, content: Register) -> Register {
        let name = content.name;
        if Self::is_clipboard(name) {
            let transferable = with_caret_marker(content.transferable.clone(), &content.text);
            clipboard.set_clipboard_text(&content.text, &content.text, transferable.clone());
            return Register {
                transferable,
                ..content
            };
        }
        if name.is_ascii_uppercase() {
            let lower = name.to_ascii_lowercase();
            let merged = match self.registers.get_mut(&lower) {
                Some(existing) => {
                    existing.append(content.kind, &content.text);
                    existing.clone()
                }
                None => {
                    let fresh = content.renamed(lower);
                    self.registers.insert(lower, fresh.clone());
                    fresh
                }
            };
            return merged;
        }
        self.registers.insert(name, content.clone());
        content
    }

    fn shift_numbered(&mut self, newest: Register) {
        for d in (b'1'..=b'8').rev() {
            let next = (d + 1) as char;
            if let Some(moved) = self.registers.get(&(d as char)).map(|r| r.renamed(next)) {
                self.registers.insert(next, moved);
            }
        }
        trace!("numbered registers shifted");
        self.registers.insert('1', newest);
    }

    /// Reads a register. `*` and `+` query the host clipboard.
    pub fn get(&self, clipboard: &mut dyn Clipboard, name: char) -> Option<Register> {
        if Self::is_clipboard(name) {
            let content = clipboard.get_clipboard_text_and_transferable_data()?;
            let kind = if content.text.ends_with('\n') {
                SelectionType::LineWise
            } else {
                SelectionType::CharacterWise
            };
            return Some(Register {
                name,
                kind,
                text: content.text,
                keys: None,
                transferable: content.transferable,
            });
        }
        let key = if name.is_ascii_uppercase() {
            name.to_ascii_lowercase()
        } else {
            name
        };
        self.registers.get(&key).cloned()
    }

    /// Stores recorded keys as a macro register (`qa...q`).
    pub fn record_keys(&mut self, name: char, keys: Vec<KeyEvent>) -> ExResult {
        if !name.is_ascii_alphanumeric() && name != UNNAMED_REGISTER {
            return Err(ExError::InvalidRegister(name));
        }
        if name.is_ascii_uppercase() {
            let lower = name.to_ascii_lowercase();
            let mut all = self
                .registers
                .get(&lower)
                .map(Register::keys)
                .unwrap_or_default();
            all.extend(keys);
            self.registers.insert(lower, Register::from_keys(lower, all));
        } else {
            self.registers.insert(name, Register::from_keys(name, keys));
        }
        Ok(())
    }

    pub fn set_last_search(&mut self, pattern: &str) {
        self.set_special(LAST_SEARCH_REGISTER, pattern);
    }

    pub fn set_last_inserted_text(&mut self, text: &str) {
        self.set_special(LAST_INSERTED_TEXT_REGISTER, text);
    }

    pub fn set_last_command(&mut self, command: &str) {
        self.set_special(LAST_COMMAND_REGISTER, command);
    }

    fn set_special(&mut self, name: char, text: &str) {
        self.registers
            .insert(name, Register::new(name, SelectionType::CharacterWise, text));
    }

    /// Every non-empty register in `:registers` order.
    pub fn list(&self, clipboard: &mut dyn Clipboard) -> Vec<Register> {
        DISPLAY_ORDER
            .chars()
            .filter_map(|name| self.get(clipboard, name))
            .filter(|r| !r.text.is_empty())
            .collect()
    }
}

/// Makes sure clipboard payloads carry caret positions.
pub fn with_caret_marker(mut transferable: Vec<TransferableItem>, text: &str) -> Vec<TransferableItem> {
    let has_marker = transferable
        .iter()
        .any(|t| matches!(t, TransferableItem::CaretState { .. }));
    if !has_marker {
        transferable.push(TransferableItem::CaretState {
            starts: vec![0],
            ends: vec![text.chars().count()],
        });
    }
    transferable
}
