//! Line-oriented commands: `:d`, `:y`, `:pu`, `:co`, `:m`, `:j`, `:>`, `:<`,
//! `:p`, `:{N}` and `:go`.

use tracing::debug;

use super::{apply_count, lines_text, parse_count, register_and_count};
use crate::error::{ExError, ExResult};
use crate::ex::command::Command;
use crate::ex::range::Range;
use crate::join::join_lines;
use crate::offset::{LinePointer, Offset};
use crate::operator::{self, insert_lines};
use crate::range::VimRange;
use crate::register::{RegisterGroup, RegisterOp};
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::{LineRange, SelectionType};

fn writable_register(register: Option<char>) -> ExResult<Option<char>> {
    match register {
        Some(r) if !RegisterGroup::is_writable(r) => Err(ExError::InvalidRegister(r)),
        other => Ok(other),
    }
}

fn as_vim_range(editor: &dyn VimEditor, range: LineRange) -> VimRange {
    VimRange::lines(
        LinePointer::init(range.start_line, editor),
        LinePointer::init(range.end_line, editor),
    )
}

pub(super) fn delete(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let (register, count) = register_and_count(&cmd.argument)?;
    let register = writable_register(register)?;
    let range = apply_count(cmd.line_range(session, editor, caret)?, count, editor.line_count());
    let target = as_vim_range(editor, range);
    operator::delete_range(session, editor, caret, &target, None, register)
        .map(|_| ())
        .ok_or(ExError::Failed)
}

pub(super) fn yank(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let (register, count) = register_and_count(&cmd.argument)?;
    let register = writable_register(register)?;
    let range = apply_count(cmd.line_range(session, editor, caret)?, count, editor.line_count());
    let text = lines_text(editor, range);
    session.store_text(register, &text, SelectionType::LineWise, RegisterOp::Yank)
}

pub(super) fn put(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let argument = cmd.argument.trim();
    let mut chars = argument.chars();
    let register = chars.next();
    if !chars.as_str().is_empty() {
        return Err(ExError::TrailingCharacters(argument.to_string()));
    }
    if let Some(r) = register
        && !RegisterGroup::is_valid(r)
    {
        return Err(ExError::InvalidRegister(r));
    }
    let (_, line) = cmd.line_numbers(session, editor, caret)?;
    let content = session
        .register(register)
        .filter(|r| !r.text().is_empty())
        .ok_or(ExError::EmptyRegister(register.unwrap_or('"')))?;

    let mut text = content.text().to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    // `line` counts from 1, so it is also the 0-based index of the line after it.
    let at = if cmd.bang() { line.saturating_sub(1) } else { line };
    let at_offset = editor.line_start_offset(at.min(editor.line_count()));
    if editor.is_guarded(at_offset, at_offset) {
        return Err(ExError::Failed);
    }
    insert_lines(editor, at, &text);
    let last = at + text.matches('\n').count() - 1;
    editor.move_caret(caret, editor.first_non_blank(last));
    Ok(())
}

/// Resolves the `{address}` argument of `:copy` and `:move`.
fn destination(argument: &str, session: &mut Session, editor: &dyn VimEditor, caret: CaretId) -> ExResult<usize> {
    let (range, rest) = Range::parse(argument)?;
    if !rest.trim().is_empty() {
        return Err(ExError::TrailingCharacters(rest.trim().to_string()));
    }
    let (_, line) = range
        .resolve(session, editor, caret)?
        .ok_or(ExError::InvalidAddress)?;
    if line < 0 || line as usize > editor.line_count() {
        return Err(ExError::InvalidAddress);
    }
    Ok(line as usize)
}

pub(super) fn copy(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let range = cmd.line_range(session, editor, caret)?;
    let dest = destination(&cmd.argument, session, editor, caret)?;
    let text = lines_text(editor, range);
    insert_lines(editor, dest, &text);
    let last = dest + range.size() - 1;
    editor.move_caret(caret, editor.line_start_offset(last));
    debug!(?range, dest, "copied lines");
    Ok(())
}

pub(super) fn move_lines(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let range = cmd.line_range(session, editor, caret)?;
    let dest = destination(&cmd.argument, session, editor, caret)?;
    let (first, last) = (range.start_line + 1, range.end_line + 1);
    if dest >= first && dest < last {
        return Err(ExError::MoveIntoItself);
    }

    let text = lines_text(editor, range);
    let target = as_vim_range(editor, range);
    if crate::delete::delete(editor, &target).is_none() {
        return Err(ExError::Failed);
    }
    let dest = if dest >= last { dest - range.size() } else { dest };
    insert_lines(editor, dest, &text);
    editor.move_caret(caret, editor.line_start_offset(dest + range.size() - 1));
    debug!(?range, dest, "moved lines");
    Ok(())
}

pub(super) fn join(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let count = parse_count(&cmd.argument)?;
    let range = cmd.line_range(session, editor, caret)?;
    let (start, lines) = match count {
        Some(n) => (range.end_line, n),
        None if range.size() == 1 => (range.start_line, 2),
        None => (range.start_line, range.size()),
    };
    if join_lines(editor, caret, start, lines, !cmd.bang()) {
        Ok(())
    } else {
        Err(ExError::Failed)
    }
}

fn blank_width(text: &str, tab: usize) -> Vec<usize> {
    text.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { tab } else { 1 })
        .collect()
}

pub(super) fn shift(
    cmd: &Command,
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    right: bool,
    amount: usize,
) -> ExResult {
    let count = parse_count(&cmd.argument)?;
    let range = apply_count(cmd.line_range(session, editor, caret)?, count, editor.line_count());
    let width = session.options().shiftwidth.max(1) * amount;
    let unit = session.options().indent_unit().repeat(amount);

    for line in range.start_line..=range.end_line {
        let (start, end) = editor.line_range(line);
        if start == end {
            continue;
        }
        if right {
            if editor.is_guarded(start, start) {
                return Err(ExError::Failed);
            }
            editor.insert_text(start, &unit);
        } else {
            let widths = blank_width(&editor.line_text(line), session.options().shiftwidth.max(1));
            let mut removed = 0;
            let mut chars = 0;
            for w in widths {
                if removed >= width {
                    break;
                }
                removed += w;
                chars += 1;
            }
            if chars > 0 {
                if editor.is_guarded(start, start + chars) {
                    return Err(ExError::Failed);
                }
                editor.delete_range(start, start + chars);
            }
        }
    }
    editor.move_caret(caret, editor.first_non_blank(range.end_line));
    Ok(())
}

pub(super) fn print(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let range = cmd.line_range(session, editor, caret)?;
    let text = lines_text(editor, range);
    session.output(text.strip_suffix('\n').unwrap_or(&text));
    editor.move_caret(caret, editor.first_non_blank(range.end_line));
    Ok(())
}

/// `:{N}` clamps to the buffer instead of failing.
pub(super) fn goto_line(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let (_, line) = cmd
        .range
        .resolve(session, editor, caret)?
        .ok_or(ExError::InvalidRange)?;
    if line < 0 {
        return Err(ExError::InvalidRange);
    }
    let line = (line.max(1) as usize).min(editor.line_count()) - 1;
    editor.move_caret(caret, editor.first_non_blank(line));
    editor.scroll_to_caret(caret);
    Ok(())
}

/// `:[N]go[to] [N]` moves to the Nth character of the buffer.
pub(super) fn goto_offset(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let from_range = cmd.range.resolve(session, editor, caret)?.map(|(_, n)| n);
    let count = match from_range {
        Some(n) if n < 0 => return Err(ExError::InvalidRange),
        Some(n) => n as usize,
        None => parse_count(&cmd.argument)?.unwrap_or(1),
    };
    let last = editor.file_size().saturating_sub(1);
    editor.move_caret(caret, Offset::new(count.saturating_sub(1).min(last)));
    editor.scroll_to_caret(caret);
    Ok(())
}
