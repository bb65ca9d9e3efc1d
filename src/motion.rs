//! Motions and text objects.
//!
//! Everything here works on the buffer as a slice of chars so the same code
//! serves interactive motions and ex addresses. Positions are char offsets;
//! object ranges are `[start, end)`.

use crate::offset::Offset;
use crate::range::{MotionType, VimRange};
use crate::traits::VimEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Blank,
    Punctuation,
    Word,
}

fn class_of(c: char, big: bool) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if big || c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

fn is_empty_line(chars: &[char], at: usize) -> bool {
    chars.get(at) == Some(&'\n') && (at == 0 || chars[at - 1] == '\n')
}

fn line_bounds(chars: &[char], at: usize) -> (usize, usize) {
    let at = at.min(chars.len());
    let start = chars[..at]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let end = chars[at..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| at + i);
    (start, end)
}

/// `w` / `W`: start of the `count`th next word. Empty lines count as words.
pub fn next_word_start(chars: &[char], from: usize, count: usize, big: bool) -> usize {
    let len = chars.len();
    let mut pos = from.min(len);
    for _ in 0..count.max(1) {
        if pos >= len {
            break;
        }
        let class = class_of(chars[pos], big);
        if class != CharClass::Blank {
            while pos < len && class_of(chars[pos], big) == class {
                pos += 1;
            }
        }
        while pos < len && class_of(chars[pos], big) == CharClass::Blank {
            if is_empty_line(chars, pos) && pos != from {
                break;
            }
            pos += 1;
        }
    }
    pos
}

/// `e` / `E`: end of the `count`th next word (the position of its last char).
pub fn next_word_end(chars: &[char], from: usize, count: usize, big: bool) -> usize {
    let len = chars.len();
    if len == 0 {
        return 0;
    }
    let mut pos = from.min(len - 1);
    for _ in 0..count.max(1) {
        if pos + 1 >= len {
            break;
        }
        pos += 1;
        while pos < len - 1 && class_of(chars[pos], big) == CharClass::Blank {
            pos += 1;
        }
        let class = class_of(chars[pos], big);
        while pos + 1 < len && class_of(chars[pos + 1], big) == class {
            pos += 1;
        }
    }
    pos
}

/// `b` / `B`: start of the `count`th previous word.
pub fn prev_word_start(chars: &[char], from: usize, count: usize, big: bool) -> usize {
    let mut pos = from.min(chars.len());
    for _ in 0..count.max(1) {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && class_of(chars[pos], big) == CharClass::Blank && !is_empty_line(chars, pos) {
            pos -= 1;
        }
        if is_empty_line(chars, pos) {
            continue;
        }
        let class = class_of(chars[pos], big);
        while pos > 0 && class_of(chars[pos - 1], big) == class {
            pos -= 1;
        }
    }
    pos
}

/// End of a `w` motion used by an operator (`dw`, `cw`).
///
/// The motion stops at the end of the line instead of crossing into the next
/// one, and never runs past the buffer.
pub fn word_motion_end_for_operator(chars: &[char], from: usize, count: usize, big: bool) -> usize {
    let target = next_word_start(chars, from, count, big);
    let (_, line_end) = line_bounds(chars, from);
    if target > line_end && line_end > from && count <= 1 {
        line_end
    } else {
        target
    }
}

/// `iw`/`aw`/`iW`/`aW`.
pub fn word_object(
    chars: &[char],
    at: usize,
    count: usize,
    around: bool,
    big: bool,
) -> Option<(usize, usize)> {
    let len = chars.len();
    if at >= len || chars[at] == '\n' {
        return None;
    }
    let (line_start, line_end) = line_bounds(chars, at);
    let class = class_of(chars[at], big);
    let mut start = at;
    while start > line_start && class_of(chars[start - 1], big) == class {
        start -= 1;
    }
    let mut end = at;
    let run_end = |mut p: usize| {
        let c = class_of(chars[p], big);
        while p < line_end && class_of(chars[p], big) == c {
            p += 1;
        }
        p
    };
    end = run_end(end);
    for _ in 1..count.max(1) {
        if end >= line_end {
            break;
        }
        end = run_end(end);
    }
    if around {
        if class == CharClass::Blank {
            // Blank run plus the word after it.
            if end < line_end {
                end = run_end(end);
            }
        } else if end < line_end && class_of(chars[end], big) == CharClass::Blank {
            end = run_end(end);
        } else {
            while start > line_start && class_of(chars[start - 1], big) == CharClass::Blank {
                start -= 1;
            }
        }
    }
    Some((start, end))
}

fn is_sentence_end(chars: &[char], at: usize) -> bool {
    if !matches!(chars.get(at), Some('.' | '!' | '?')) {
        return false;
    }
    let mut p = at + 1;
    while matches!(chars.get(p), Some(')' | ']' | '"' | '\'')) {
        p += 1;
    }
    matches!(chars.get(p), None | Some(' ' | '\t' | '\n'))
}

/// Offsets where sentences start, in document order.
fn sentence_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = Vec::new();
    let len = chars.len();
    let mut i = 0;
    let mut expect_start = true;
    while i < len {
        if is_empty_line(chars, i) {
            starts.push(i);
            expect_start = true;
            i += 1;
            continue;
        }
        if expect_start && !chars[i].is_whitespace() {
            starts.push(i);
            expect_start = false;
        }
        if is_sentence_end(chars, i) {
            expect_start = true;
        }
        i += 1;
    }
    starts
}

/// `)`: start of the `count`th next sentence, or the end of the buffer.
pub fn sentence_forward(chars: &[char], from: usize, count: usize) -> usize {
    let starts = sentence_starts(chars);
    starts
        .iter()
        .copied()
        .filter(|&s| s > from)
        .nth(count.max(1) - 1)
        .unwrap_or(chars.len())
}

/// `(`: start of the `count`th previous sentence, or the buffer start.
pub fn sentence_backward(chars: &[char], from: usize, count: usize) -> usize {
    let starts = sentence_starts(chars);
    starts
        .iter()
        .rev()
        .copied()
        .filter(|&s| s < from)
        .nth(count.max(1) - 1)
        .unwrap_or(0)
}

fn line_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        chars
            .iter()
            .enumerate()
            .filter(|&(i, &c)| c == '\n' && i + 1 < chars.len())
            .map(|(i, _)| i + 1),
    );
    starts
}

fn is_blank_line(chars: &[char], start: usize) -> bool {
    let (_, end) = line_bounds(chars, start);
    chars[start..end].iter().all(|c| c.is_whitespace())
}

/// `}`: the next empty line after a paragraph, or the end of the buffer.
pub fn paragraph_forward(chars: &[char], from: usize, count: usize) -> usize {
    let starts = line_starts(chars);
    let mut line = starts.partition_point(|&s| s <= from).saturating_sub(1);
    for _ in 0..count.max(1) {
        while line < starts.len() && is_empty_line_at(chars, starts[line]) {
            line += 1;
        }
        while line < starts.len() && !is_empty_line_at(chars, starts[line]) {
            line += 1;
        }
        if line >= starts.len() {
            return chars.len().saturating_sub(usize::from(chars.last() == Some(&'\n')));
        }
    }
    starts[line]
}

/// `{`: the previous empty line before a paragraph, or the buffer start.
pub fn paragraph_backward(chars: &[char], from: usize, count: usize) -> usize {
    let starts = line_starts(chars);
    let mut line = starts.partition_point(|&s| s <= from).saturating_sub(1) as isize;
    for _ in 0..count.max(1) {
        while line >= 0 && is_empty_line_at(chars, starts[line as usize]) {
            line -= 1;
        }
        while line >= 0 && !is_empty_line_at(chars, starts[line as usize]) {
            line -= 1;
        }
        if line < 0 {
            return 0;
        }
    }
    starts[line as usize]
}

fn is_empty_line_at(chars: &[char], start: usize) -> bool {
    start >= chars.len() || chars[start] == '\n'
}

/// `ip` / `ap`: the paragraph (or blank-line run) under `at`.
///
/// `ap` also takes the blank lines after it (or before it at the end).
pub fn paragraph_object(chars: &[char], at: usize, around: bool) -> Option<(usize, usize)> {
    if chars.is_empty() {
        return None;
    }
    let starts = line_starts(chars);
    let line = starts.partition_point(|&s| s <= at.min(chars.len() - 1)) - 1;
    let blank = |l: usize| is_blank_line(chars, starts[l]);
    let kind = blank(line);
    let mut first = line;
    while first > 0 && blank(first - 1) == kind {
        first -= 1;
    }
    let mut last = line;
    while last + 1 < starts.len() && blank(last + 1) == kind {
        last += 1;
    }
    if around {
        if last + 1 < starts.len() {
            last += 1;
            while last + 1 < starts.len() && blank(last + 1) != kind {
                last += 1;
            }
        } else {
            while first > 0 && blank(first - 1) != kind {
                first -= 1;
            }
        }
    }
    let end = starts.get(last + 1).copied().unwrap_or(chars.len());
    Some((starts[first], end))
}

fn bracket_pair(c: char) -> Option<(char, char, bool)> {
    match c {
        '(' => Some(('(', ')', true)),
        ')' => Some(('(', ')', false)),
        '[' => Some(('[', ']', true)),
        ']' => Some(('[', ']', false)),
        '{' => Some(('{', '}', true)),
        '}' => Some(('{', '}', false)),
        _ => None,
    }
}

fn find_close(chars: &[char], open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open_at) {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn find_open(chars: &[char], close_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close_at).rev() {
        let c = chars[i];
        if c == close {
            depth += 1;
        } else if c == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// `%`: the bracket matching the first bracket at or after `at` on its line.
pub fn matching_bracket(chars: &[char], at: usize) -> Option<usize> {
    let (_, line_end) = line_bounds(chars, at);
    let (pos, (open, close, is_open)) = (at..line_end)
        .find_map(|i| bracket_pair(chars[i]).map(|p| (i, p)))?;
    if is_open {
        find_close(chars, pos, open, close)
    } else {
        find_open(chars, pos, open, close)
    }
}

/// `i(`, `a(` and friends for `()`, `[]`, `{}`, `<>`.
pub fn bracket_object(
    chars: &[char],
    at: usize,
    open: char,
    close: char,
    around: bool,
    count: usize,
) -> Option<(usize, usize)> {
    if at >= chars.len() {
        return None;
    }
    let mut search_from = at;
    let mut found = None;
    for _ in 0..count.max(1) {
        let open_at = if chars[search_from] == open && found.is_none() {
            search_from
        } else if chars[search_from] == close && found.is_none() {
            find_open(chars, search_from, open, close)?
        } else {
            let mut depth = 0usize;
            let mut hit = None;
            for i in (0..search_from).rev() {
                if chars[i] == close {
                    depth += 1;
                } else if chars[i] == open {
                    if depth == 0 {
                        hit = Some(i);
                        break;
                    }
                    depth -= 1;
                }
            }
            hit?
        };
        let close_at = find_close(chars, open_at, open, close)?;
        found = Some((open_at, close_at));
        search_from = open_at;
    }
    let (open_at, close_at) = found?;
    if around {
        Some((open_at, close_at + 1))
    } else {
        Some((open_at + 1, close_at))
    }
}

/// `i"`, `a"` and the other quote objects, within the current line.
pub fn quote_object(chars: &[char], at: usize, quote: char, around: bool) -> Option<(usize, usize)> {
    if at >= chars.len() {
        return None;
    }
    let (line_start, line_end) = line_bounds(chars, at);
    let quotes: Vec<usize> = (line_start..line_end)
        .filter(|&i| chars[i] == quote && (i == line_start || chars[i - 1] != '\\'))
        .collect();
    let (open, close) = quotes
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| (pair[0], pair[1]))
        .find(|&(o, c)| o <= at && at <= c)
        .or_else(|| {
            // Cursor before the first pair on the line.
            quotes
                .chunks(2)
                .filter(|pair| pair.len() == 2 && pair[0] > at)
                .map(|pair| (pair[0], pair[1]))
                .next()
        })?;
    if !around {
        return Some((open + 1, close));
    }
    let mut end = close + 1;
    while end < line_end && matches!(chars[end], ' ' | '\t') {
        end += 1;
    }
    let mut start = open;
    if end == close + 1 {
        while start > line_start && matches!(chars[start - 1], ' ' | '\t') {
            start -= 1;
        }
    }
    Some((start, end))
}

#[derive(Debug, Clone)]
struct Tag {
    start: usize,
    end: usize,
    name: String,
    closing: bool,
}

fn scan_tags(chars: &[char]) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '<' {
            i += 1;
            continue;
        }
        let Some(rel) = chars[i..].iter().position(|&c| c == '>') else {
            break;
        };
        let end = i + rel + 1;
        let inner: String = chars[i + 1..end - 1].iter().collect();
        let self_closing = inner.ends_with('/');
        let (closing, body) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, inner.as_str()),
        };
        let name: String = body
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if !name.is_empty() && !self_closing && !name.starts_with('!') && !name.starts_with('?') {
            tags.push(Tag {
                start: i,
                end,
                name,
                closing,
            });
        }
        i = end;
    }
    tags
}

/// `it` / `at`: the `count`th enclosing tag block around `at`.
pub fn tag_object(chars: &[char], at: usize, around: bool, count: usize) -> Option<(usize, usize)> {
    let tags = scan_tags(chars);
    let mut stack: Vec<&Tag> = Vec::new();
    let mut pairs: Vec<(&Tag, &Tag)> = Vec::new();
    for tag in &tags {
        if !tag.closing {
            stack.push(tag);
        } else if let Some(idx) = stack.iter().rposition(|open| open.name == tag.name) {
            let open = stack[idx];
            stack.truncate(idx);
            pairs.push((open, tag));
        }
    }
    let mut enclosing: Vec<(&Tag, &Tag)> = pairs
        .into_iter()
        .filter(|(open, close)| open.start <= at && at < close.end)
        .collect();
    // Innermost first.
    enclosing.sort_by_key(|(open, close)| close.end - open.start);
    let (open, close) = enclosing.get(count.max(1) - 1)?;
    if around {
        Some((open.start, close.end))
    } else {
        Some((open.end, close.start))
    }
}

/// Every char of the buffer, for the helpers above.
pub fn buffer_chars(editor: &dyn VimEditor) -> Vec<char> {
    editor.text().chars().collect()
}

/// A text object selected through its Vim name (`iw`, `a(`, `it`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    Word { big: bool },
    Paragraph,
    Block { open: char, close: char },
    Quote(char),
    Tag,
}

impl TextObject {
    /// Parses the second key of an `i`/`a` object.
    pub fn from_key(key: char) -> Option<TextObject> {
        Some(match key {
            'w' => TextObject::Word { big: false },
            'W' => TextObject::Word { big: true },
            'p' => TextObject::Paragraph,
            '(' | ')' | 'b' => TextObject::Block { open: '(', close: ')' },
            '[' | ']' => TextObject::Block { open: '[', close: ']' },
            '{' | '}' | 'B' => TextObject::Block { open: '{', close: '}' },
            '<' | '>' => TextObject::Block { open: '<', close: '>' },
            '"' | '\'' | '`' => TextObject::Quote(key),
            't' => TextObject::Tag,
            _ => return None,
        })
    }

    /// Resolves the object around `at` into a range.
    pub fn range(self, editor: &dyn VimEditor, at: Offset, around: bool, count: usize) -> Option<VimRange> {
        let chars = buffer_chars(editor);
        let at = at.point();
        let (start, end) = match self {
            TextObject::Word { big } => word_object(&chars, at, count, around, big)?,
            TextObject::Paragraph => {
                let (s, e) = paragraph_object(&chars, at, around)?;
                return Some(VimRange::line_offsets(
                    Offset::new(s),
                    Offset::new(e.saturating_sub(1).max(s)),
                ));
            }
            TextObject::Block { open, close } => bracket_object(&chars, at, open, close, around, count)?,
            TextObject::Quote(q) => quote_object(&chars, at, q, around)?,
            TextObject::Tag => tag_object(&chars, at, around, count)?,
        };
        Some(VimRange::chars(Offset::new(start), Offset::new(end)))
    }
}

/// A motion usable as an operator target, named by its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    WordForward { big: bool },
    WordBackward { big: bool },
    WordEnd { big: bool },
    SentenceForward,
    SentenceBackward,
    ParagraphForward,
    ParagraphBackward,
    MatchBracket,
}

impl Motion {
    pub fn from_key(key: char) -> Option<Motion> {
        Some(match key {
            'w' => Motion::WordForward { big: false },
            'W' => Motion::WordForward { big: true },
            'b' => Motion::WordBackward { big: false },
            'B' => Motion::WordBackward { big: true },
            'e' => Motion::WordEnd { big: false },
            'E' => Motion::WordEnd { big: true },
            ')' => Motion::SentenceForward,
            '(' => Motion::SentenceBackward,
            '}' => Motion::ParagraphForward,
            '{' => Motion::ParagraphBackward,
            '%' => Motion::MatchBracket,
            _ => return None,
        })
    }

    /// The key that names this motion, as used by register routing.
    pub fn key(self) -> char {
        match self {
            Motion::WordForward { big: false } => 'w',
            Motion::WordForward { big: true } => 'W',
            Motion::WordBackward { big: false } => 'b',
            Motion::WordBackward { big: true } => 'B',
            Motion::WordEnd { big: false } => 'e',
            Motion::WordEnd { big: true } => 'E',
            Motion::SentenceForward => ')',
            Motion::SentenceBackward => '(',
            Motion::ParagraphForward => '}',
            Motion::ParagraphBackward => '{',
            Motion::MatchBracket => '%',
        }
    }

    pub fn motion_type(self) -> MotionType {
        match self {
            Motion::WordEnd { .. } | Motion::MatchBracket => MotionType::Inclusive,
            _ => MotionType::Exclusive,
        }
    }

    /// Where the motion lands from `from`, or `None` if it cannot move.
    pub fn target(self, editor: &dyn VimEditor, from: Offset, count: usize) -> Option<Offset> {
        let chars = buffer_chars(editor);
        let from = from.point();
        let to = match self {
            Motion::WordForward { big } => next_word_start(&chars, from, count, big),
            Motion::WordBackward { big } => prev_word_start(&chars, from, count, big),
            Motion::WordEnd { big } => next_word_end(&chars, from, count, big),
            Motion::SentenceForward => sentence_forward(&chars, from, count),
            Motion::SentenceBackward => sentence_backward(&chars, from, count),
            Motion::ParagraphForward => paragraph_forward(&chars, from, count),
            Motion::ParagraphBackward => paragraph_backward(&chars, from, count),
            Motion::MatchBracket => matching_bracket(&chars, from)?,
        };
        Some(Offset::new(to))
    }

    /// The range an operator covers when applied with this motion from `from`.
    pub fn operator_range(self, editor: &dyn VimEditor, from: Offset, count: usize) -> Option<VimRange> {
        if let Motion::WordForward { big } = self {
            let chars = buffer_chars(editor);
            let end = word_motion_end_for_operator(&chars, from.point(), count, big);
            return (end > from.point()).then(|| VimRange::chars(from, Offset::new(end)));
        }
        let to = self.target(editor, from, count)?;
        if to == from && self.motion_type() == MotionType::Exclusive {
            return None;
        }
        Some(VimRange::from_motion(editor, from, to, self.motion_type()))
    }
}
