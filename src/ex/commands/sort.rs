//! `:[range]sort[!] [n][i][u][r]`

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{ExError, ExResult};
use crate::ex::command::Command;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::{LineRange, Mode};

#[derive(Debug, Clone, Copy, Default)]
struct SortOptions {
    numeric: bool,
    ignore_case: bool,
    unique: bool,
    reverse: bool,
}

impl SortOptions {
    fn parse(argument: &str, bang: bool) -> ExResult<Self> {
        let mut options = SortOptions {
            reverse: bang,
            ..Default::default()
        };
        for c in argument.chars() {
            match c {
                'n' => options.numeric = true,
                'i' => options.ignore_case = true,
                'u' => options.unique = true,
                'r' => options.reverse = !options.reverse,
                c if c.is_whitespace() => {}
                _ => return Err(ExError::InvalidArgument(argument.to_string())),
            }
        }
        Ok(options)
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let ordering = if self.numeric {
            leading_number(a).cmp(&leading_number(b))
        } else if self.ignore_case {
            a.to_lowercase().cmp(&b.to_lowercase())
        } else {
            a.cmp(b)
        };
        if self.reverse { ordering.reverse() } else { ordering }
    }
}

/// The first decimal number on the line, with an optional `-` sign.
///
/// Lines without one sort before every number. Numbers too large for an
/// `i64` saturate.
fn leading_number(line: &str) -> Option<i64> {
    let start = line.find(|c: char| c.is_ascii_digit())?;
    let end = line[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(line.len(), |n| start + n);
    let negative = line[..start].ends_with('-');
    Some(match line[start..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    })
}

fn target_lines(cmd: &Command, session: &mut Session, editor: &dyn VimEditor, caret: CaretId) -> ExResult<LineRange> {
    if !cmd.range.is_empty() {
        return cmd.line_range(session, editor, caret);
    }
    if let Some((a, b)) = editor.selection(editor.primary_caret()) {
        let (start, end) = (a.min(b), a.max(b));
        let end = if end > start { end - 1 } else { end };
        return Ok(LineRange::new(editor.offset_to_line(start), editor.offset_to_line(end)));
    }
    Ok(LineRange::new(0, editor.line_count() - 1))
}

pub(super) fn sort(cmd: &Command, session: &mut Session, editor: &mut dyn VimEditor, caret: CaretId) -> ExResult {
    let options = SortOptions::parse(&cmd.argument, cmd.bang())?;
    let range = target_lines(cmd, session, editor, caret)?;

    let mut lines: Vec<String> = (range.start_line..=range.end_line)
        .map(|line| editor.line_text(line))
        .collect();
    lines.sort_by(|a, b| options.compare(a, b));
    if options.unique {
        lines.dedup_by(|a, b| options.compare(a, b) == Ordering::Equal);
    }
    debug!(?range, ?options, kept = lines.len(), "sort");

    let start = editor.line_start_offset(range.start_line);
    let end = editor.line_end_offset(range.end_line);
    if editor.is_guarded(start, end) {
        return Err(ExError::Failed);
    }
    editor.delete_range(start, end);
    editor.insert_text(start, &lines.join("\n"));

    for caret in editor.native_carets() {
        editor.remove_selection(caret);
    }
    if matches!(editor.mode(), Mode::Visual(_)) {
        editor.set_mode(Mode::Normal);
    }
    editor.move_caret(caret, start);
    Ok(())
}
