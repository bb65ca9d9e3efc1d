mod global;
mod info;
mod lines;
mod marks;
mod sort;
mod substitute;

use crate::error::{ExError, ExResult};
use crate::ex::command::{Command, CommandName};
use crate::register::RegisterGroup;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::LineRange;

/// Runs `cmd` for one caret.
pub(crate) fn run(
    cmd: &Command,
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    depth: usize,
) -> ExResult {
    match &cmd.name {
        CommandName::Delete => lines::delete(cmd, session, editor, caret),
        CommandName::Yank => lines::yank(cmd, session, editor, caret),
        CommandName::Put => lines::put(cmd, session, editor, caret),
        CommandName::Copy => lines::copy(cmd, session, editor, caret),
        CommandName::Move => lines::move_lines(cmd, session, editor, caret),
        CommandName::Join => lines::join(cmd, session, editor, caret),
        CommandName::Shift { right, amount } => lines::shift(cmd, session, editor, caret, *right, *amount),
        CommandName::Print => lines::print(cmd, session, editor, caret),
        CommandName::GotoLine => lines::goto_line(cmd, session, editor, caret),
        CommandName::Goto => lines::goto_offset(cmd, session, editor, caret),
        CommandName::Global { invert } => global::global(cmd, session, editor, caret, *invert, depth),
        CommandName::Substitute => substitute::substitute(cmd, session, editor, caret),
        CommandName::RepeatSubstitute => substitute::repeat(cmd, session, editor, caret),
        CommandName::Sort => sort::sort(cmd, session, editor, caret),
        CommandName::Mark => marks::mark(cmd, session, editor, caret),
        CommandName::Marks => marks::marks(cmd, session, editor),
        CommandName::Registers => info::registers(cmd, session),
        CommandName::Action => info::action(cmd, session),
        CommandName::Command => info::command(cmd, session),
        CommandName::DelCommand => info::del_command(cmd, session),
        CommandName::ComClear => {
            session.clear_aliases();
            Ok(())
        }
        CommandName::NoHlSearch => {
            session.search_mut().show_highlight = false;
            Ok(())
        }
        CommandName::Set => info::set(cmd, session),
        CommandName::User(name) => info::user(cmd, name, session, editor, depth),
    }
}

/// Splits `[x] [count]`, the argument of `:d`, `:y` and friends.
pub(super) fn register_and_count(argument: &str) -> ExResult<(Option<char>, Option<usize>)> {
    let argument = argument.trim();
    let mut chars = argument.chars();
    let register = match chars.next() {
        Some(c) if !c.is_ascii_digit() => {
            if !RegisterGroup::is_valid(c) {
                return Err(ExError::TrailingCharacters(argument.to_string()));
            }
            Some(c)
        }
        _ => None,
    };
    let rest = if register.is_some() { chars.as_str().trim() } else { argument };
    Ok((register, parse_count(rest)?))
}

/// A trailing `[count]`; `0` is `E939`.
pub(super) fn parse_count(text: &str) -> ExResult<Option<usize>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ExError::TrailingCharacters(text.to_string()));
    }
    match text.parse::<usize>() {
        Ok(0) => Err(ExError::PositiveCountRequired),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ExError::InvalidArgument(text.to_string())),
    }
}

/// `:d 3` style counts start at the last line of the range.
pub(super) fn apply_count(range: LineRange, count: Option<usize>, line_count: usize) -> LineRange {
    match count {
        Some(n) => LineRange::new(range.end_line, (range.end_line + n - 1).min(line_count - 1)),
        None => range,
    }
}

/// Text of whole lines, each terminated by `'\n'`.
pub(super) fn lines_text(editor: &dyn VimEditor, range: LineRange) -> String {
    let start = editor.line_start_offset(range.start_line);
    let end = editor.line_end_offset(range.end_line);
    let mut text = editor.text_range(start, end);
    text.push('\n');
    text
}
