//! Vim patterns, buffer search and the persisted search state.

use regex::Regex;
use tracing::trace;

use crate::error::{ExError, ExResult};
use crate::offset::Offset;
use crate::session::Session;
use crate::traits::{CaretId, SettingsStore, VimEditor};
use crate::types::Direction;

const KEY_LAST_SEARCH: &str = "last-search";
const KEY_LAST_SUBSTITUTE: &str = "last-substitute";
const KEY_LAST_REPLACEMENT: &str = "last-replacement";
const KEY_LAST_DIRECTION: &str = "last-direction";
const KEY_SHOW_HIGHLIGHT: &str = "show-highlight";

/// Search history kept across commands and persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub last_search: Option<String>,
    pub last_substitute: Option<String>,
    pub last_replacement: Option<String>,
    pub last_direction: Direction,
    pub show_highlight: bool,
}

impl SearchState {
    pub fn load(store: &dyn SettingsStore) -> Self {
        let last_direction = match store.get_string(KEY_LAST_DIRECTION).as_deref() {
            Some("backward") => Direction::Backward,
            _ => Direction::Forward,
        };
        SearchState {
            last_search: store.get_string(KEY_LAST_SEARCH),
            last_substitute: store.get_string(KEY_LAST_SUBSTITUTE),
            last_replacement: store.get_string(KEY_LAST_REPLACEMENT),
            last_direction,
            show_highlight: store.get_bool(KEY_SHOW_HIGHLIGHT).unwrap_or(false),
        }
    }

    pub fn save(&self, store: &mut dyn SettingsStore) {
        store.set_string(KEY_LAST_SEARCH, self.last_search.as_deref());
        store.set_string(KEY_LAST_SUBSTITUTE, self.last_substitute.as_deref());
        store.set_string(KEY_LAST_REPLACEMENT, self.last_replacement.as_deref());
        let direction = match self.last_direction {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        };
        store.set_string(KEY_LAST_DIRECTION, Some(direction));
        store.set_bool(KEY_SHOW_HIGHLIGHT, self.show_highlight);
    }

    /// Records a search pattern and turns highlighting back on.
    pub fn remember_search(&mut self, pattern: &str, direction: Direction) {
        self.last_search = Some(pattern.to_string());
        self.last_direction = direction;
        self.show_highlight = true;
    }
}

/// Translates a magic-mode Vim pattern and compiles it.
///
/// `\c` and `\C` inside the pattern override `ignore_case`.
pub fn compile_pattern(pattern: &str, ignore_case: bool) -> ExResult<Regex> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut ignore_case = ignore_case;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push_str("\\\\");
                    break;
                };
                match next {
                    '(' | ')' | '|' | '+' => out.push(next),
                    '=' | '?' => out.push('?'),
                    '{' => {
                        let mut body = String::new();
                        for b in chars.by_ref() {
                            if b == '}' {
                                break;
                            }
                            if b != '\\' {
                                body.push(b);
                            }
                        }
                        match body.as_str() {
                            "" => out.push('*'),
                            "-" => out.push_str("*?"),
                            b if b.starts_with('-') => {
                                out.push('{');
                                out.push_str(&b[1..]);
                                out.push_str("}?");
                            }
                            b => {
                                out.push('{');
                                if b.starts_with(',') {
                                    out.push('0');
                                }
                                out.push_str(b);
                                out.push('}');
                            }
                        }
                    }
                    '<' | '>' => out.push_str("\\b"),
                    'c' => ignore_case = true,
                    'C' => ignore_case = false,
                    'n' => out.push_str("\\n"),
                    't' => out.push_str("\\t"),
                    'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                        out.push('\\');
                        out.push(next);
                    }
                    'a' => out.push_str("[A-Za-z]"),
                    'l' => out.push_str("[a-z]"),
                    'u' => out.push_str("[A-Z]"),
                    'x' => out.push_str("[0-9A-Fa-f]"),
                    'h' => out.push_str("[A-Za-z_]"),
                    other => out.push_str(&regex::escape(&other.to_string())),
                }
            }
            '[' => {
                // Copy a bracket expression through verbatim.
                let mut class = String::from("[");
                let mut closed = false;
                if chars.peek() == Some(&'^') {
                    class.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    class.push_str("\\]");
                    chars.next();
                }
                while let Some(b) = chars.next() {
                    match b {
                        ']' => {
                            closed = true;
                            class.push(']');
                            break;
                        }
                        '\\' => {
                            class.push('\\');
                            if let Some(esc) = chars.next() {
                                class.push(esc);
                            }
                        }
                        '[' => class.push_str("\\["),
                        b => class.push(b),
                    }
                }
                if closed {
                    out.push_str(&class);
                } else {
                    out.push_str(&regex::escape(&class));
                }
            }
            '(' | ')' | '|' | '+' | '?' | '{' | '}' | '~' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    let flags = if ignore_case { "(?mi)" } else { "(?m)" };
    let source = format!("{flags}{out}");
    trace!(vim = pattern, regex = %source, "compiled pattern");
    Regex::new(&source).map_err(|_| ExError::InvalidPattern(pattern.to_string()))
}

/// Byte index of the `n`th char of `text`, or `text.len()` past the end.
pub(crate) fn byte_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(b, _)| b).unwrap_or(text.len())
}

pub(crate) fn char_of_byte(text: &str, b: usize) -> usize {
    text[..b].chars().count()
}

/// Finds the next match of `regex` starting after (or before) `from`.
///
/// Returns the match as a `[start, end)` offset pair. `wrap` continues from
/// the other end of the buffer.
pub fn search(
    editor: &dyn VimEditor,
    regex: &Regex,
    from: Offset,
    direction: Direction,
    wrap: bool,
) -> Option<(Offset, Offset)> {
    let text = editor.text();
    let from_byte = byte_of_char(&text, from.point());
    let to_offsets = |m: regex::Match<'_>| {
        (
            Offset::new(char_of_byte(&text, m.start())),
            Offset::new(char_of_byte(&text, m.end())),
        )
    };
    match direction {
        Direction::Forward => {
            let mut matches = regex.find_iter(&text);
            let after = matches.by_ref().find(|m| m.start() > from_byte);
            after
                .or_else(|| {
                    if wrap {
                        regex.find_iter(&text).find(|m| m.start() <= from_byte)
                    } else {
                        None
                    }
                })
                .map(to_offsets)
        }
        Direction::Backward => {
            let all: Vec<_> = regex.find_iter(&text).collect();
            let before = all.iter().rev().find(|m| m.start() < from_byte).copied();
            before
                .or_else(|| {
                    if wrap {
                        all.iter().rev().find(|m| m.start() >= from_byte).copied()
                    } else {
                        None
                    }
                })
                .map(to_offsets)
        }
    }
}

fn search_count(
    session: &Session,
    editor: &dyn VimEditor,
    from: Offset,
    pattern: &str,
    direction: Direction,
    count: usize,
) -> ExResult<Offset> {
    let regex = compile_pattern(pattern, session.options().ignore_case_for(pattern))?;
    let wrap = session.options().wrapscan;
    let mut at = from;
    for _ in 0..count.max(1) {
        let (start, _) = search(editor, &regex, at, direction, wrap)
            .ok_or_else(|| ExError::PatternNotFound(pattern.to_string()))?;
        at = start;
    }
    Ok(at)
}

/// `/pattern` and `?pattern`: moves `caret` to the `count`th match and makes
/// `pattern` the last search.
pub fn search_pattern(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    pattern: &str,
    direction: Direction,
    count: usize,
) -> ExResult<Offset> {
    session.search_mut().remember_search(pattern, direction);
    session.registers_mut().set_last_search(pattern);
    let found = search_count(session, editor, editor.caret_offset(caret), pattern, direction, count)?;
    editor.move_caret(caret, found);
    Ok(found)
}

/// `n` (and `N` with `opposite`): repeats the last search.
pub fn search_next(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    count: usize,
    opposite: bool,
) -> ExResult<Offset> {
    let pattern = session
        .search()
        .last_search
        .clone()
        .ok_or(ExError::NoPreviousRegex)?;
    let direction = session.search().last_direction;
    let direction = if opposite { direction.reverse() } else { direction };
    session.search_mut().show_highlight = true;
    let found = search_count(session, editor, editor.caret_offset(caret), &pattern, direction, count)?;
    editor.move_caret(caret, found);
    Ok(found)
}
