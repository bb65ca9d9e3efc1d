//! Ex line addresses: `.`, `$`, `%`, `N`, `'m`, `/pat/`, `?pat?`, `\/`,
//! `\?`, `\&`, `+N`, `-N`, joined by `,` or `;`.

use tracing::trace;

use crate::error::{ExError, ExResult};
use crate::search::compile_pattern;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::Direction;

/// The base of one address, before `+`/`-` offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// A literal 1-based line number; `0` is "before the first line".
    Line(usize),
    Current,
    Last,
    Mark(char),
    Search { pattern: String, direction: Direction },
    LastSearch(Direction),
    LastSubstitute(Direction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAddress {
    /// `None` when the address is only an offset (`+2`), meaning `.`.
    pub base: Option<Address>,
    pub offset: isize,
    /// Followed by `;`: later addresses count from this one.
    pub set_current: bool,
}

/// A parsed `[range]`, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    addresses: Vec<LineAddress>,
}

fn valid_mark(c: char) -> bool {
    c.is_ascii_alphabetic() || "<>'`[]".contains(c)
}

/// Reads up to an unescaped `delimiter`; `\delimiter` stands for it.
pub(crate) fn take_delimited(input: &str, delimiter: char) -> (String, &str, bool) {
    let mut out = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == delimiter {
            return (out, &input[i + c.len_utf8()..], true);
        }
        if c == '\\' {
            match chars.next() {
                Some((_, next)) if next == delimiter => out.push(next),
                Some((_, next)) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    (out, "", false)
}

fn take_number(input: &str) -> (Option<usize>, &str) {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return (None, input);
    }
    (input[..end].parse().ok(), &input[end..])
}

impl Range {
    pub fn new(addresses: Vec<LineAddress>) -> Self {
        Range { addresses }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn addresses(&self) -> &[LineAddress] {
        &self.addresses
    }

    /// Parses a range from the front of `input`; returns it with the rest.
    pub fn parse(input: &str) -> ExResult<(Range, &str)> {
        let mut rest = input.trim_start();
        let mut addresses = Vec::new();
        let current = || LineAddress {
            base: Some(Address::Current),
            offset: 0,
            set_current: false,
        };
        let mut after_separator = false;

        loop {
            rest = rest.trim_start();
            if let Some(tail) = rest.strip_prefix('%') {
                addresses.push(LineAddress {
                    base: Some(Address::Line(1)),
                    offset: 0,
                    set_current: false,
                });
                addresses.push(LineAddress {
                    base: Some(Address::Last),
                    offset: 0,
                    set_current: false,
                });
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('*') {
                for mark in ['<', '>'] {
                    addresses.push(LineAddress {
                        base: Some(Address::Mark(mark)),
                        offset: 0,
                        set_current: false,
                    });
                }
                rest = tail;
            } else {
                let (address, tail) = Self::parse_address(rest)?;
                match address {
                    Some(address) => {
                        addresses.push(address);
                        rest = tail;
                    }
                    // A missing address next to a separator is the current line.
                    None if after_separator || rest.starts_with([',', ';']) => addresses.push(current()),
                    None => break,
                }
            }

            rest = rest.trim_start();
            match rest.chars().next() {
                Some(',') => rest = &rest[1..],
                Some(';') => {
                    if let Some(last) = addresses.last_mut() {
                        last.set_current = true;
                    }
                    rest = &rest[1..];
                }
                _ => break,
            }
            after_separator = true;
        }
        Ok((Range { addresses }, rest))
    }

    fn parse_address(input: &str) -> ExResult<(Option<LineAddress>, &str)> {
        let mut rest = input;
        let base = match rest.chars().next() {
            Some('.') => {
                rest = &rest[1..];
                Some(Address::Current)
            }
            Some('$') => {
                rest = &rest[1..];
                Some(Address::Last)
            }
            Some('\'') => {
                let mark = rest[1..].chars().next().ok_or(ExError::UnknownMark)?;
                if !valid_mark(mark) {
                    return Err(ExError::UnknownMark);
                }
                rest = &rest[1 + mark.len_utf8()..];
                Some(Address::Mark(mark))
            }
            Some(c @ ('/' | '?')) => {
                let (pattern, tail, _) = take_delimited(&rest[1..], c);
                rest = tail;
                let direction = if c == '/' {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                Some(Address::Search { pattern, direction })
            }
            Some('\\') => {
                let address = match rest[1..].chars().next() {
                    Some('/') => Address::LastSearch(Direction::Forward),
                    Some('?') => Address::LastSearch(Direction::Backward),
                    Some('&') => Address::LastSubstitute(Direction::Forward),
                    _ => return Err(ExError::InvalidAddress),
                };
                rest = &rest[2..];
                Some(address)
            }
            Some(c) if c.is_ascii_digit() => {
                let (n, tail) = take_number(rest);
                rest = tail;
                Some(Address::Line(n.ok_or(ExError::InvalidRange)?))
            }
            _ => None,
        };

        let mut offset = 0isize;
        let mut has_offset = false;
        loop {
            let sign = match rest.chars().next() {
                Some('+') => 1,
                Some('-') => -1,
                _ => break,
            };
            let digits = rest[1..].starts_with(|c: char| c.is_ascii_digit());
            let (n, tail) = take_number(&rest[1..]);
            // A bare `+`/`-` means one; digits that do not fit are E16.
            let n = match n {
                Some(n) => isize::try_from(n).map_err(|_| ExError::InvalidRange)?,
                None if digits => return Err(ExError::InvalidRange),
                None => 1,
            };
            offset = n
                .checked_mul(sign)
                .and_then(|step| offset.checked_add(step))
                .ok_or(ExError::InvalidRange)?;
            has_offset = true;
            rest = tail;
        }

        if base.is_none() && !has_offset {
            return Ok((None, input));
        }
        Ok((
            Some(LineAddress {
                base,
                offset,
                set_current: false,
            }),
            rest,
        ))
    }

    /// Resolves to raw 1-based `(first, last)` line numbers, which may be out
    /// of range; callers validate. `None` when the range is empty.
    pub fn resolve(
        &self,
        session: &mut Session,
        editor: &dyn VimEditor,
        caret: CaretId,
    ) -> ExResult<Option<(isize, isize)>> {
        if self.addresses.is_empty() {
            return Ok(None);
        }
        let mut current = editor.caret_line(caret);
        let mut lines = Vec::with_capacity(self.addresses.len());
        for address in &self.addresses {
            let line = address.resolve(session, editor, current)?;
            if address.set_current {
                if line < 1 || line as usize > editor.line_count() {
                    return Err(ExError::InvalidRange);
                }
                current = line as usize - 1;
            }
            lines.push(line);
        }
        let last = lines[lines.len() - 1];
        let first = if lines.len() > 1 { lines[lines.len() - 2] } else { last };
        trace!(first, last, "resolved range");
        Ok(Some((first, last)))
    }
}

impl LineAddress {
    /// 1-based line number, relative to the 0-based `current` line.
    fn resolve(&self, session: &mut Session, editor: &dyn VimEditor, current: usize) -> ExResult<isize> {
        let base = match &self.base {
            None | Some(Address::Current) => current + 1,
            Some(Address::Line(n)) => *n,
            Some(Address::Last) => editor.line_count(),
            Some(Address::Mark(name)) => {
                let name = if *name == '`' { '\'' } else { *name };
                let offset = editor.mark(name).ok_or(ExError::MarkNotSet)?;
                editor.offset_to_line(offset) + 1
            }
            Some(Address::Search { pattern, direction }) => {
                let pattern = if pattern.is_empty() {
                    session.search().last_search.clone().ok_or(ExError::NoPreviousRegex)?
                } else {
                    pattern.clone()
                };
                session.search_mut().remember_search(&pattern, *direction);
                search_line(session, editor, &pattern, current, *direction)? + 1
            }
            Some(Address::LastSearch(direction)) => {
                let pattern = session.search().last_search.clone().ok_or(ExError::NoPreviousRegex)?;
                search_line(session, editor, &pattern, current, *direction)? + 1
            }
            Some(Address::LastSubstitute(direction)) => {
                let pattern = session
                    .search()
                    .last_substitute
                    .clone()
                    .ok_or(ExError::NoPreviousRegex)?;
                search_line(session, editor, &pattern, current, *direction)? + 1
            }
        };
        isize::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(self.offset))
            .ok_or(ExError::InvalidRange)
    }
}

/// The next line after (or before) `current` matching `pattern`.
fn search_line(
    session: &Session,
    editor: &dyn VimEditor,
    pattern: &str,
    current: usize,
    direction: Direction,
) -> ExResult<usize> {
    let ignore_case = session.options().ignore_case_for(pattern);
    let regex = compile_pattern(pattern, ignore_case)?;
    let count = editor.line_count();
    let wrap = session.options().wrapscan;
    let order: Vec<usize> = match direction {
        Direction::Forward => {
            let after = current + 1..count;
            if wrap {
                after.chain(0..=current).collect()
            } else {
                after.collect()
            }
        }
        Direction::Backward => {
            let before = (0..current).rev();
            if wrap {
                before.chain((current..count).rev()).collect()
            } else {
                before.collect()
            }
        }
    };
    order
        .into_iter()
        .find(|&line| regex.is_match(&editor.line_text(line)))
        .ok_or_else(|| ExError::PatternNotFound(pattern.to_string()))
}
