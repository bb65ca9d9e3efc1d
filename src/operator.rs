//! Delete, change, yank and put on top of the deletion engine and registers.

use tracing::{debug, warn};

use crate::delete::{caret_after_delete, delete_dry_run, snapshot_last_columns};
use crate::error::{ExError, ExResult};
use crate::offset::{Offset, Pointer};
use crate::range::{CharacterRange, LineRangeKind, OperatedRange, ShiftType, VimRange};
use crate::register::RegisterOp;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::{Mode, SelectionType};

fn indent_of(text: &str) -> &str {
    let end = text.len() - text.trim_start_matches([' ', '\t']).len();
    &text[..end]
}

/// Deletes `range`, stores the text and places `caret`.
///
/// `motion` is the key of the motion that produced the range, used by the
/// small-delete rules. Returns `None` when nothing could be deleted.
pub fn delete_range(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    range: &VimRange,
    motion: Option<char>,
    register: Option<char>,
) -> Option<OperatedRange> {
    if !editor.is_writable() {
        return None;
    }
    snapshot_last_columns(editor);
    let single_line = range.is_single_line(editor);
    let plan = delete_dry_run(editor, range)?;

    let text = plan.operated().text();
    let kind = plan.operated().selection_type();
    let op = RegisterOp::Delete {
        single_line,
        motion,
    };
    if let Err(err) = session.store_text(register, &text, kind, op) {
        warn!(%err, "delete aborted");
        return None;
    }

    let operated = plan.apply(editor);
    let at = caret_after_delete(editor, &operated);
    editor.move_caret(caret, at);
    Some(operated)
}

/// Deletes `range` and enters insert mode in its place.
///
/// A line-wise change leaves one line behind, indented like the first
/// changed line, with the caret after the indent. Returns `false` without
/// entering insert mode when that line cannot be reopened.
pub fn change_range(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    range: &VimRange,
    motion: Option<char>,
    register: Option<char>,
) -> bool {
    let indent = if range.selection_type() == SelectionType::LineWise {
        let line = editor.offset_to_line(range.offset_above(editor));
        indent_of(&editor.line_text(line)).to_string()
    } else {
        String::new()
    };

    let Some(operated) = delete_range(session, editor, caret, range, motion, register) else {
        return false;
    };

    if let OperatedRange::Lines {
        line_above, shift, ..
    } = &operated
    {
        let width = indent.chars().count();
        let at = match shift {
            ShiftType::NlOnEnd => editor.add_line(line_above.line()).map(|line| {
                let start = editor.line_start_offset(line.line());
                editor.insert_text(start, &indent);
                start + width
            }),
            ShiftType::NlOnStart => {
                let end = editor.line_end_offset(line_above.line().saturating_sub(1));
                (!editor.is_guarded(end, end)).then(|| {
                    editor.insert_text(end, &format!("\n{indent}"));
                    end + 1 + width
                })
            }
            ShiftType::NoNl => {
                let start = editor.line_start_offset(line_above.to_pointer(editor).line());
                (!editor.is_guarded(start, start)).then(|| {
                    editor.insert_text(start, &indent);
                    start + width
                })
            }
        };
        let Some(at) = at else {
            debug!(line = line_above.line(), "changed lines could not be reopened");
            return false;
        };
        editor.move_caret(caret, at);
    }
    editor.set_mode(Mode::Insert);
    debug!(kind = ?operated.selection_type(), "changed range");
    true
}

/// The text a yank of `range` stores, with its register kind.
pub fn yanked_text(editor: &dyn VimEditor, range: &VimRange) -> (String, SelectionType) {
    let line_block = |a: usize, b: usize| {
        let (a, b) = (a.min(b), a.max(b));
        let mut text = editor.text_range(editor.line_start_offset(a), editor.line_end_offset(b));
        text.push('\n');
        text
    };
    match range {
        VimRange::Character(CharacterRange::Range { start, end }) => (
            editor.text_range((*start).min(*end), (*start).max(*end)),
            SelectionType::CharacterWise,
        ),
        VimRange::Character(CharacterRange::Multiple(ranges)) => {
            let parts: Vec<String> = ranges
                .iter()
                .map(|(a, b)| editor.text_range((*a).min(*b), (*a).max(*b)))
                .collect();
            (parts.join("\n"), SelectionType::CharacterWise)
        }
        VimRange::Line(LineRangeKind::Range { start, end }) => {
            (line_block(start.line(), end.line()), SelectionType::LineWise)
        }
        VimRange::Line(LineRangeKind::Offsets { start, end }) => (
            line_block(editor.offset_to_line(*start), editor.offset_to_line(*end)),
            SelectionType::LineWise,
        ),
        VimRange::Line(LineRangeKind::Multiple(lines)) => {
            let text = lines
                .iter()
                .map(|l| format!("{}\n", editor.line_text(l.line())))
                .collect();
            (text, SelectionType::LineWise)
        }
        VimRange::Block { start, end } => {
            let pa = editor.offset_to_position(*start);
            let pb = editor.offset_to_position(*end);
            let (left, right) = (pa.col.min(pb.col), pa.col.max(pb.col) + 1);
            let rows: Vec<String> = (pa.line.min(pb.line)..=pa.line.max(pb.line))
                .map(|line| {
                    editor
                        .line_text(line)
                        .chars()
                        .skip(left)
                        .take(right - left)
                        .collect()
                })
                .collect();
            (rows.join("\n"), SelectionType::BlockWise)
        }
    }
}

/// Stores the text of `range` without changing the buffer.
///
/// Character and block yanks move `caret` to the start of the range;
/// line-wise yanks move it up to the first line only if it sat below.
pub fn yank_range(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    range: &VimRange,
    register: Option<char>,
) -> ExResult {
    let (text, kind) = yanked_text(editor, range);
    session.store_text(register, &text, kind, RegisterOp::Yank)?;

    let above = range.offset_above(editor);
    if kind == SelectionType::LineWise {
        let first = editor.offset_to_line(above);
        if editor.caret_line(caret) > first {
            let col = editor.offset_to_position(editor.caret_offset(caret)).col;
            let (start, end) = editor.line_range(first);
            editor.move_caret(caret, (start + col).min(end));
        }
    } else {
        editor.move_caret(caret, above);
    }
    Ok(())
}

/// Inserts whole lines so that the first of them becomes line `at`.
///
/// `text` must end in `'\n'`. Returns the offset of the first inserted line.
pub fn insert_lines(editor: &mut dyn VimEditor, at: usize, text: &str) -> Offset {
    if at < editor.line_count() {
        let start = editor.line_start_offset(at);
        editor.insert_text(start, text);
        return start;
    }
    let size = editor.file_size();
    if size == 0 || editor.char_at(Pointer::new(size - 1)) != '\n' {
        editor.insert_text(Offset::new(size), &format!("\n{text}"));
        Offset::new(size + 1)
    } else {
        editor.insert_text(Offset::new(size), text);
        Offset::new(size)
    }
}

/// Pastes register content relative to `caret`, `count` times.
///
/// Character text goes at (or after) the caret, lines above (or below) the
/// caret line, and block text column by column down from the caret.
pub fn put_text(
    editor: &mut dyn VimEditor,
    caret: CaretId,
    text: &str,
    kind: SelectionType,
    before: bool,
    count: usize,
) -> bool {
    if !editor.is_writable() || text.is_empty() {
        return false;
    }
    let count = count.max(1);
    let offset = editor.caret_offset(caret);
    let line = editor.offset_to_line(offset);

    match kind {
        SelectionType::CharacterWise => {
            let (_, line_end) = editor.line_range(line);
            let at = if before || offset >= line_end {
                offset
            } else {
                offset + 1
            };
            if editor.is_guarded(at, at) {
                return false;
            }
            let pasted = text.repeat(count);
            editor.insert_text(at, &pasted);
            let len = pasted.chars().count();
            editor.move_caret(caret, at + len.saturating_sub(1));
        }
        SelectionType::LineWise => {
            let mut lines = text.to_string();
            if !lines.ends_with('\n') {
                lines.push('\n');
            }
            let target = if before { line } else { line + 1 };
            let at = editor.line_start_offset(target.min(editor.line_count()));
            if editor.is_guarded(at, at) {
                return false;
            }
            insert_lines(editor, target, &lines.repeat(count));
            editor.move_caret(caret, editor.first_non_blank(target));
        }
        SelectionType::BlockWise => {
            let (line_start, line_end) = editor.line_range(line);
            let mut col = offset.point() - line_start.point();
            if !before && line_end > line_start {
                col += 1;
            }
            for (i, row) in text.split('\n').enumerate() {
                let target = line + i;
                if target >= editor.line_count() {
                    insert_lines(editor, target, "\n");
                }
                let (start, end) = editor.line_range(target);
                let len = end.point() - start.point();
                if len < col {
                    editor.insert_text(end, &" ".repeat(col - len));
                }
                editor.insert_text(start + col, &row.repeat(count));
            }
            let start = editor.line_start_offset(line);
            editor.move_caret(caret, start + col);
        }
    }
    true
}

/// Pastes `register` at `caret`.
pub fn put_register(
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    register: Option<char>,
    before: bool,
    count: usize,
) -> ExResult {
    let name = register.unwrap_or('"');
    let content = session
        .register(register)
        .filter(|r| !r.text().is_empty())
        .ok_or(ExError::EmptyRegister(name))?;
    if put_text(editor, caret, content.text(), content.kind(), before, count) {
        Ok(())
    } else {
        Err(ExError::Failed)
    }
}
