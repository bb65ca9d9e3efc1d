//! `:mark`, `:k` and `:marks`.

use crate::error::{ExError, ExResult};
use crate::ex::command::Command;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};

const MARKS_HEADER: &str = "mark line  col file/text";

fn is_settable(name: char) -> bool {
    name.is_ascii_alphabetic() || "'`<>[]".contains(name)
}

pub(super) fn mark(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let argument = cmd.argument.trim();
    let mut chars = argument.chars();
    let name = chars.next().ok_or(ExError::ArgumentRequired)?;
    if !chars.as_str().is_empty() {
        return Err(ExError::TrailingCharacters(argument.to_string()));
    }
    if !is_settable(name) {
        return Err(ExError::BadMarkName);
    }
    let name = if name == '`' { '\'' } else { name };
    let line = cmd.line_range(session, editor, caret)?.end_line;
    editor.set_mark(name, editor.line_start_offset(line));
    Ok(())
}

pub(super) fn marks(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor) -> ExResult {
    let filter = cmd.argument.trim();
    let mut out = String::from(MARKS_HEADER);
    for (name, offset) in editor.marks() {
        if !filter.is_empty() && !filter.contains(name) {
            continue;
        }
        let pos = editor.offset_to_position(offset);
        let text = editor.line_text(pos.line);
        out.push_str(&format!("\n {name} {:>6} {:>4} {}", pos.line + 1, pos.col, text.trim()));
    }
    session.output(&out);
    Ok(())
}
