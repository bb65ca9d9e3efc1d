//! Keystrokes as stored in macro registers.
//!
//! Registers keep the raw keys they were recorded from next to their text.
//! This module converts between key sequences, the plain text Vim stores for
//! them, and Vim's `<...>` key notation used when displaying registers.

/// The keys a macro register can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key.
    Char(char),
    /// `<Esc>`
    Esc,
    /// `<CR>`
    Enter,
    /// The Backspace key.
    Backspace,
    /// The Tab key.
    Tab,
}

bitflags::bitflags! {
    /// Modifiers held with a key; `SHIFT` never changes the stored text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// One recorded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: Modifiers) -> Self {
        KeyEvent { code, mods }
    }

    pub const fn char(c: char) -> Self {
        KeyEvent::new(KeyCode::Char(c), Modifiers::empty())
    }

    /// Renders the key in `<...>` notation, plain characters stay as-is.
    pub fn notation(&self) -> String {
        let mut prefix = String::new();
        if self.mods.contains(Modifiers::CTRL) {
            prefix.push_str("C-");
        }
        if self.mods.contains(Modifiers::ALT) {
            prefix.push_str("A-");
        }
        if self.mods.contains(Modifiers::META) {
            prefix.push_str("M-");
        }
        let name = match self.code {
            KeyCode::Char('<') if prefix.is_empty() => return "<lt>".to_string(),
            KeyCode::Char(' ') if !prefix.is_empty() => "Space".to_string(),
            KeyCode::Char(c) if prefix.is_empty() => return c.to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Tab => "Tab".to_string(),
        };
        format!("<{prefix}{name}>")
    }

    /// The character Vim stores in a register for this key.
    pub fn as_text(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.mods.contains(Modifiers::CTRL) && c.is_ascii_alphabetic() => {
                Some(((c.to_ascii_lowercase() as u8) & 0x1f) as char)
            }
            KeyCode::Char(c) if self.mods.difference(Modifiers::SHIFT).is_empty() => Some(c),
            KeyCode::Char(_) => None,
            KeyCode::Esc => Some('\u{1b}'),
            KeyCode::Enter => Some('\n'),
            KeyCode::Backspace => Some('\u{8}'),
            KeyCode::Tab => Some('\t'),
        }
    }

    fn from_text(c: char) -> KeyEvent {
        match c {
            '\u{1b}' => KeyEvent::new(KeyCode::Esc, Modifiers::empty()),
            '\n' | '\r' => KeyEvent::new(KeyCode::Enter, Modifiers::empty()),
            '\u{8}' => KeyEvent::new(KeyCode::Backspace, Modifiers::empty()),
            '\t' => KeyEvent::new(KeyCode::Tab, Modifiers::empty()),
            c if (c as u32) >= 1 && (c as u32) <= 26 => {
                let letter = (b'a' + (c as u8) - 1) as char;
                KeyEvent::new(KeyCode::Char(letter), Modifiers::CTRL)
            }
            c => KeyEvent::char(c),
        }
    }
}

/// Converts register text back into the keys it replays as.
pub fn text_to_keys(text: &str) -> Vec<KeyEvent> {
    text.chars().map(KeyEvent::from_text).collect()
}

/// Converts keys into the text a register stores for them.
///
/// Keys with no textual form (e.g. `<A-x>`) are skipped.
pub fn keys_to_text(keys: &[KeyEvent]) -> String {
    keys.iter().filter_map(KeyEvent::as_text).collect()
}

/// Renders keys in Vim notation: `ihello<Esc>`.
pub fn to_key_notation(keys: &[KeyEvent]) -> String {
    keys.iter().map(KeyEvent::notation).collect()
}

/// Parses Vim key notation (`dw<Esc>`, `<C-r>`, `<lt>`).
///
/// An unterminated or unknown `<...>` sequence is taken literally.
pub fn parse_keys(notation: &str) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    let mut rest = notation;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(end) = rest.find('>')
            && let Some(key) = parse_special(&rest[1..end])
        {
            keys.push(key);
            rest = &rest[end + 1..];
            continue;
        }
        keys.push(KeyEvent::char(c));
        rest = &rest[c.len_utf8()..];
    }
    keys
}

fn parse_special(name: &str) -> Option<KeyEvent> {
    let mut mods = Modifiers::empty();
    let mut body = name;
    loop {
        let lower = body.to_ascii_lowercase();
        if body.len() > 2 && lower.starts_with("c-") {
            mods |= Modifiers::CTRL;
        } else if body.len() > 2 && lower.starts_with("a-") {
            mods |= Modifiers::ALT;
        } else if body.len() > 2 && (lower.starts_with("m-") || lower.starts_with("d-")) {
            mods |= Modifiers::META;
        } else if body.len() > 2 && lower.starts_with("s-") {
            mods |= Modifiers::SHIFT;
        } else {
            break;
        }
        body = &body[2..];
    }
    let code = match body.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "lt" => KeyCode::Char('<'),
        "space" => KeyCode::Char(' '),
        "bar" => KeyCode::Char('|'),
        _ => {
            let mut chars = body.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !mods.is_empty() => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(KeyEvent::new(code, mods))
}
