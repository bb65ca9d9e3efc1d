//! `:s/pattern/replacement/[flags] [count]` and `:&`.

use regex::{Captures, Regex};
use tracing::debug;

use super::parse_count;
use crate::error::{ExError, ExResult};
use crate::ex::command::Command;
use crate::ex::range::take_delimited;
use crate::search::compile_pattern;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::{Direction, LineRange};

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    global: bool,
    ignore_case: Option<bool>,
    count_only: bool,
    no_error: bool,
}

impl Flags {
    /// Parses leading flag characters; `&` (first only) reuses `previous`.
    fn parse<'a>(text: &'a str, previous: &str) -> (Flags, String, &'a str) {
        let mut flags = Flags::default();
        let mut seen = String::new();
        let mut rest = text;
        if let Some(tail) = rest.strip_prefix('&') {
            for c in previous.chars() {
                flags.apply(c);
            }
            seen.push_str(previous);
            rest = tail;
        }
        let end = rest
            .find(|c: char| !"giIne".contains(c))
            .unwrap_or(rest.len());
        for c in rest[..end].chars() {
            flags.apply(c);
            seen.push(c);
        }
        (flags, seen, &rest[end..])
    }

    fn apply(&mut self, c: char) {
        match c {
            'g' => self.global = !self.global,
            'i' => self.ignore_case = Some(true),
            'I' => self.ignore_case = Some(false),
            'n' => self.count_only = true,
            'e' => self.no_error = true,
            _ => {}
        }
    }
}

struct Substitution {
    pattern: String,
    replacement: String,
    flags: Flags,
    flag_text: String,
    count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(char),
    Group(usize),
    /// `\u` / `\l`: the next character only.
    One(Case),
    /// `\U` / `\L`: until `\e` / `\E`.
    Run(Case),
    EndRun,
}

/// Replaces unescaped `~` with the previous replacement string.
fn expand_tilde(replacement: &str, previous: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '~' => out.push_str(previous),
            c => out.push(c),
        }
    }
    out
}

fn parse_replacement(replacement: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut chars = replacement.chars();
    while let Some(c) = chars.next() {
        let piece = match c {
            '&' => Piece::Group(0),
            '\\' => match chars.next() {
                Some(d @ '0'..='9') => Piece::Group(d as usize - '0' as usize),
                Some('r' | 'n') => Piece::Literal('\n'),
                Some('t') => Piece::Literal('\t'),
                Some('u') => Piece::One(Case::Upper),
                Some('l') => Piece::One(Case::Lower),
                Some('U') => Piece::Run(Case::Upper),
                Some('L') => Piece::Run(Case::Lower),
                Some('e' | 'E') => Piece::EndRun,
                Some(other) => Piece::Literal(other),
                None => Piece::Literal('\\'),
            },
            c => Piece::Literal(c),
        };
        pieces.push(piece);
    }
    pieces
}

fn push_cased(out: &mut String, c: char, case: Option<Case>) {
    match case {
        Some(Case::Upper) => out.extend(c.to_uppercase()),
        Some(Case::Lower) => out.extend(c.to_lowercase()),
        None => out.push(c),
    }
}

fn expand(pieces: &[Piece], caps: &Captures<'_>) -> String {
    let mut out = String::new();
    let mut one: Option<Case> = None;
    let mut run: Option<Case> = None;
    for piece in pieces {
        match piece {
            Piece::Literal(c) => push_cased(&mut out, *c, one.take().or(run)),
            Piece::Group(n) => {
                if let Some(m) = caps.get(*n) {
                    for c in m.as_str().chars() {
                        push_cased(&mut out, c, one.take().or(run));
                    }
                }
            }
            Piece::One(case) => one = Some(*case),
            Piece::Run(case) => run = Some(*case),
            Piece::EndRun => run = None,
        }
    }
    out
}

/// Substitutes within one line; returns the new text and the match count.
fn replace_line(regex: &Regex, text: &str, pieces: &[Piece], global: bool) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for caps in regex.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&text[last..m.start()]);
        out.push_str(&expand(pieces, &caps));
        last = m.end();
        count += 1;
        if !global {
            break;
        }
    }
    out.push_str(&text[last..]);
    (out, count)
}

fn parse(argument: &str, session: &Session) -> ExResult<Substitution> {
    let argument = argument.trim_start();
    let previous_flags = session.last_substitute_flags().to_string();
    let delimiter = argument.chars().next();

    // `:s` alone, or followed by flags, repeats the last substitution.
    if delimiter.is_none_or(|d| d.is_ascii_alphabetic() || d == '&' || d.is_ascii_digit()) {
        let pattern = session
            .search()
            .last_substitute
            .clone()
            .ok_or(ExError::NoPreviousRegex)?;
        let replacement = session.search().last_replacement.clone().unwrap_or_default();
        let (flags, flag_text, rest) = Flags::parse(argument, &previous_flags);
        return Ok(Substitution {
            pattern,
            replacement,
            flags,
            flag_text,
            count: parse_count(rest)?,
        });
    }

    let delimiter = delimiter.unwrap_or('/');
    if matches!(delimiter, '"' | '|' | '\\') {
        return Err(ExError::BadDelimiter);
    }
    let (pattern, rest, closed) = take_delimited(&argument[delimiter.len_utf8()..], delimiter);
    let (replacement, rest) = if closed {
        let (replacement, rest, _) = take_delimited(rest, delimiter);
        (replacement, rest)
    } else {
        (String::new(), "")
    };
    let pattern = if pattern.is_empty() {
        session
            .search()
            .last_search
            .clone()
            .ok_or(ExError::NoPreviousRegex)?
    } else {
        pattern
    };
    let previous = session.search().last_replacement.clone().unwrap_or_default();
    let replacement = expand_tilde(&replacement, &previous);
    let (flags, flag_text, rest) = Flags::parse(rest, &previous_flags);
    Ok(Substitution {
        pattern,
        replacement,
        flags,
        flag_text,
        count: parse_count(rest)?,
    })
}

fn run_substitution(
    cmd: &Command,
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    sub: Substitution,
) -> ExResult {
    let mut range = cmd.line_range(session, editor, caret)?;
    if let Some(n) = sub.count {
        let start = range.end_line;
        range = LineRange::new(start, (start + n - 1).min(editor.line_count() - 1));
    }
    let ignore_case = sub
        .flags
        .ignore_case
        .unwrap_or_else(|| session.options().ignore_case_for(&sub.pattern));
    let regex = compile_pattern(&sub.pattern, ignore_case)?;
    let global = sub.flags.global != session.options().gdefault;

    {
        let search = session.search_mut();
        search.last_substitute = Some(sub.pattern.clone());
        search.last_replacement = Some(sub.replacement.clone());
        search.remember_search(&sub.pattern, Direction::Forward);
    }
    session.registers_mut().set_last_search(&sub.pattern);
    session.set_last_substitute_flags(&sub.flag_text);

    let pieces = parse_replacement(&sub.replacement);
    let mut matches = 0;
    let mut lines_changed = 0;
    let mut last_line = None;
    let mut line = range.start_line;
    let mut end = range.end_line;
    while line <= end {
        let text = editor.line_text(line);
        let (new_text, n) = replace_line(&regex, &text, &pieces, global);
        if n == 0 {
            line += 1;
            continue;
        }
        matches += n;
        lines_changed += 1;
        if !sub.flags.count_only {
            let (start, stop) = editor.line_range(line);
            if editor.is_guarded(start, stop) {
                return Err(ExError::Failed);
            }
            editor.delete_range(start, stop);
            editor.insert_text(start, &new_text);
            let added = new_text.matches('\n').count();
            end += added;
            line += added;
        }
        last_line = Some(line);
        line += 1;
    }

    let Some(last_line) = last_line else {
        if sub.flags.no_error {
            return Ok(());
        }
        return Err(ExError::PatternNotFound(sub.pattern));
    };
    debug!(matches, lines_changed, "substitute");

    let plural = |n: usize, word: &str, many: &str| {
        if n == 1 {
            format!("1 {word}")
        } else {
            format!("{n} {many}")
        }
    };
    if sub.flags.count_only {
        let message = format!(
            "{} on {}",
            plural(matches, "match", "matches"),
            plural(lines_changed, "line", "lines")
        );
        session.show_message(&message);
        return Ok(());
    }
    editor.move_caret(caret, editor.first_non_blank(last_line));
    if lines_changed > session.options().report {
        let message = format!(
            "{} on {}",
            plural(matches, "substitution", "substitutions"),
            plural(lines_changed, "line", "lines")
        );
        session.show_message(&message);
    }
    Ok(())
}

pub(super) fn substitute(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let sub = parse(&cmd.argument, session)?;
    run_substitution(cmd, session, editor, caret, sub)
}

/// `:&[&][flags] [count]` repeats the last substitution.
pub(super) fn repeat(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let pattern = session
        .search()
        .last_substitute
        .clone()
        .ok_or(ExError::NoPreviousRegex)?;
    let replacement = session.search().last_replacement.clone().unwrap_or_default();
    let previous_flags = session.last_substitute_flags().to_string();
    let (flags, flag_text, rest) = Flags::parse(cmd.argument.trim_start(), &previous_flags);
    let sub = Substitution {
        pattern,
        replacement,
        flags,
        flag_text,
        count: parse_count(rest)?,
    };
    run_substitution(cmd, session, editor, caret, sub)
}
