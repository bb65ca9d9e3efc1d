//! `J`, `gJ` and `:join`.

use tracing::debug;

use crate::offset::Offset;
use crate::traits::{CaretId, VimEditor};

fn leading_blanks(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Joins `lines` lines (at least two) starting at `start_line`.
///
/// With `spaces` the next line's indent is dropped and a single space goes in
/// at each junction, unless the current line is empty or already ends in a
/// blank, or the next line is empty or starts with `)`. Without it (`gJ`)
/// only the newline is removed. The caret ends at the last junction.
///
/// Fails when `start_line` is the last line or a junction is guarded.
pub fn join_lines(
    editor: &mut dyn VimEditor,
    caret: CaretId,
    start_line: usize,
    lines: usize,
    spaces: bool,
) -> bool {
    let last = editor.line_count() - 1;
    if start_line >= last {
        return false;
    }
    let junctions = lines.max(2).min(last - start_line + 1) - 1;
    let mut caret_at = editor.caret_offset(caret);

    for _ in 0..junctions {
        let (line_start, line_end) = editor.line_range(start_line);
        let next_text = editor.line_text(start_line + 1);

        let (remove_to, add_space) = if spaces {
            let blanks = leading_blanks(&next_text);
            let rest = &next_text[next_text
                .char_indices()
                .nth(blanks)
                .map(|(b, _)| b)
                .unwrap_or(next_text.len())..];
            let current = editor.line_text(start_line);
            let add = !current.is_empty()
                && !current.ends_with([' ', '\t'])
                && !rest.is_empty()
                && !rest.starts_with(')');
            (line_end + 1 + blanks, add)
        } else {
            (line_end + 1, false)
        };

        if editor.is_guarded(line_end, remove_to) {
            debug!(line = start_line, "join blocked by guarded region");
            return false;
        }
        editor.delete_range(line_end, remove_to);
        caret_at = if add_space {
            editor.insert_text(line_end, " ");
            line_end
        } else if line_end > line_start {
            line_end - 1
        } else {
            line_start
        };
    }

    debug!(start_line, junctions, spaces, "joined lines");
    editor.move_caret(caret, caret_at.min(Offset::new(editor.file_size())));
    true
}
