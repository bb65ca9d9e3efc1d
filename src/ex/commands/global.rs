//! `:g/pattern/cmd` and `:v/pattern/cmd`.

use tracing::debug;

use crate::error::{ExError, ExResult};
use crate::ex::command::Command;
use crate::ex::range::take_delimited;
use crate::search::compile_pattern;
use crate::session::Session;
use crate::traits::{CaretId, MarkerId, VimEditor};
use crate::types::{Direction, LineRange};

const DEFAULT_COMMAND: &str = "p";

pub(super) fn global(
    cmd: &Command,
    session: &mut Session,
    editor: &mut dyn VimEditor,
    caret: CaretId,
    invert: bool,
    depth: usize,
) -> ExResult {
    let invert = invert || cmd.bang();
    let nested = session.is_global_busy();

    // The whole buffer by default; inside another :global, the line it is on.
    let range = if !cmd.range.is_empty() {
        cmd.line_range(session, editor, caret)?
    } else if nested {
        let line = editor.caret_line(caret);
        LineRange::new(line, line)
    } else {
        LineRange::new(0, editor.line_count() - 1)
    };
    if nested && range.start_line != range.end_line {
        return Err(ExError::GlobalRecursive);
    }

    let argument = cmd.argument.as_str();
    let delimiter = argument.chars().next().ok_or(ExError::ArgumentRequired)?;
    if delimiter.is_ascii_alphanumeric() || matches!(delimiter, '"' | '|' | '\\') {
        return Err(ExError::BadDelimiter);
    }
    let (pattern, rest, _) = take_delimited(&argument[delimiter.len_utf8()..], delimiter);
    let pattern = if pattern.is_empty() {
        session
            .search()
            .last_search
            .clone()
            .ok_or(ExError::NoPreviousRegex)?
    } else {
        pattern
    };
    session.search_mut().remember_search(&pattern, Direction::Forward);
    session.registers_mut().set_last_search(&pattern);
    let regex = compile_pattern(&pattern, session.options().ignore_case_for(&pattern))?;
    let body = match rest.trim() {
        "" => DEFAULT_COMMAND,
        body => body,
    };

    let lines: Vec<usize> = (range.start_line..=range.end_line)
        .filter(|&line| regex.is_match(&editor.line_text(line)) != invert)
        .collect();
    if lines.is_empty() {
        if nested {
            return Ok(());
        }
        return Err(if invert {
            ExError::PatternInEveryLine(pattern)
        } else {
            ExError::PatternNotFound(pattern)
        });
    }

    // Markers keep pointing at the right lines while the body edits the buffer.
    let markers: Vec<MarkerId> = lines.iter().map(|&line| editor.create_line_marker(line)).collect();
    debug!(matches = markers.len(), invert, body, "global");

    session.set_global_busy(true);
    let mut result = Ok(());
    for &marker in &markers {
        if session.take_interrupted() {
            result = Err(ExError::Interrupted);
            break;
        }
        let Some(line) = editor.marker_line(marker) else {
            continue;
        };
        editor.move_caret(caret, editor.line_start_offset(line));
        if let Err(err) = crate::ex::run(session, editor, body, depth) {
            result = Err(err);
            break;
        }
    }
    session.set_global_busy(nested);
    for marker in markers {
        editor.release_marker(marker);
    }
    result
}
