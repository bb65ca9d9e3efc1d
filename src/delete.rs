//! Turning a [`VimRange`] into an actual buffer deletion.
//!
//! Deletion is split in two steps. [`delete_dry_run`] works out what would be
//! removed (text, final offsets, newline policy) without touching the buffer;
//! [`DeletePlan::apply`] performs it. Callers stash the text in registers
//! between the two.
//!
//! Line-wise deletes pick a newline to consume:
//!
//! 1. the `'\n'` after the last line ([`ShiftType::NlOnEnd`]),
//! 2. else the `'\n'` before the first line ([`ShiftType::NlOnStart`]),
//! 3. else none ([`ShiftType::NoNl`]).
//!
//! When the chosen span overlaps a guarded region the plan falls back to the
//! shapes in [`fallback_shapes`], in order, and gives up after those.

use tracing::{debug, trace};

use crate::offset::{LineOffset, Offset, Pointer};
use crate::range::{CharacterRange, LineRangeKind, OperatedRange, ShiftType, VimRange};
use crate::traits::VimEditor;

/// A computed but not yet applied deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    operated: OperatedRange,
    spans: Vec<(Offset, Offset)>,
}

impl DeletePlan {
    pub fn operated(&self) -> &OperatedRange {
        &self.operated
    }

    /// Spans that will be removed, in document order.
    pub fn spans(&self) -> &[(Offset, Offset)] {
        &self.spans
    }

    pub fn apply(self, editor: &mut dyn VimEditor) -> OperatedRange {
        for &(start, end) in self.spans.iter().rev() {
            trace!(%start, %end, "delete span");
            editor.delete_range(start, end);
        }
        self.operated
    }
}

/// Alternative `(start delta, end delta, shift)` shapes tried, in order, when
/// a line-wise span of the given shift is guarded.
pub fn fallback_shapes(shift: ShiftType) -> &'static [(isize, isize, ShiftType)] {
    match shift {
        ShiftType::NoNl => &[],
        ShiftType::NlOnEnd => &[(-1, -1, ShiftType::NlOnStart), (0, -1, ShiftType::NoNl)],
        ShiftType::NlOnStart => &[(1, 0, ShiftType::NoNl)],
    }
}

/// Finds a span the host allows to delete, starting from the natural one.
///
/// Returns `None` when the span and all its fallbacks are guarded.
pub fn negotiate_guarded(
    editor: &dyn VimEditor,
    start: Offset,
    end: Offset,
    shift: ShiftType,
) -> Option<(Offset, Offset, ShiftType)> {
    if !editor.is_guarded(start, end) {
        return Some((start, end, shift));
    }
    for &(ds, de, next_shift) in fallback_shapes(shift) {
        let (Some(s), Some(e)) = (
            start.point().checked_add_signed(ds),
            end.point().checked_add_signed(de),
        ) else {
            continue;
        };
        if s > e {
            continue;
        }
        let (s, e) = (Offset::new(s), Offset::new(e));
        if !editor.is_guarded(s, e) {
            debug!(%s, %e, ?next_shift, "guarded line delete shifted");
            return Some((s, e, next_shift));
        }
    }
    debug!(%start, %end, ?shift, "line delete blocked by guarded region");
    None
}

fn line_plan(editor: &dyn VimEditor, above: Offset, below: Offset) -> Option<DeletePlan> {
    let start_line = editor.offset_to_line(above);
    let end_line = editor.offset_to_line(below);
    let mut start = editor.line_start_offset(start_line);
    let mut end = editor.line_end_offset(end_line);

    let shift = if end.point() < editor.file_size() && editor.char_at(Pointer::new(end.point())) == '\n' {
        end = end + 1;
        ShiftType::NlOnEnd
    } else if start.point() > 0 && editor.lf_makes_new_line() {
        start = start - 1;
        ShiftType::NlOnStart
    } else {
        ShiftType::NoNl
    };

    let (start, end, shift) = negotiate_guarded(editor, start, end, shift)?;
    let text = editor.text_range(start, end);
    Some(DeletePlan {
        operated: OperatedRange::Lines {
            text,
            line_above: LineOffset::init(start_line, editor),
            lines_operated: end_line - start_line + 1,
            shift,
        },
        spans: vec![(start, end)],
    })
}

fn char_plan(editor: &dyn VimEditor, a: Offset, b: Offset) -> Option<DeletePlan> {
    let size = Offset::new(editor.file_size());
    let (left, right) = (a.min(b).min(size), a.max(b).min(size));
    if left == right || editor.is_guarded(left, right) {
        return None;
    }
    Some(DeletePlan {
        operated: OperatedRange::Characters {
            text: editor.text_range(left, right),
            left,
            right,
        },
        spans: vec![(left, right)],
    })
}

/// Deletes the same column span on every line the block covers.
fn block_plan(editor: &dyn VimEditor, a: Offset, b: Offset) -> Option<DeletePlan> {
    let pa = editor.offset_to_position(a);
    let pb = editor.offset_to_position(b);
    let (first, last) = (pa.line.min(pb.line), pa.line.max(pb.line));
    let left = pa.col.min(pb.col);
    let right = pa.col.max(pb.col) + 1;

    let mut lines = Vec::with_capacity(last - first + 1);
    let mut spans = Vec::new();
    for line in first..=last {
        let (ls, le) = editor.line_range(line);
        let len = le.point() - ls.point();
        let s = ls + left.min(len);
        let e = ls + right.min(len);
        lines.push(editor.text_range(s, e));
        if s < e {
            if editor.is_guarded(s, e) {
                return None;
            }
            spans.push((s, e));
        }
    }
    if spans.is_empty() {
        return None;
    }
    Some(DeletePlan {
        operated: OperatedRange::Block {
            lines,
            start_line: first,
            column: left,
        },
        spans,
    })
}

fn merge(mut plans: Vec<DeletePlan>) -> Option<DeletePlan> {
    plans.sort_by_key(|p| p.spans.first().map(|s| s.0));
    let mut spans = Vec::new();
    let mut parts = Vec::new();
    for plan in plans {
        spans.extend(plan.spans);
        parts.push(plan.operated);
    }
    match parts.len() {
        0 => None,
        1 => parts.pop().map(|operated| DeletePlan { operated, spans }),
        _ => Some(DeletePlan {
            operated: OperatedRange::Multiple(parts),
            spans,
        }),
    }
}

/// Works out what deleting `range` would remove, without changing the buffer.
///
/// Returns `None` when nothing can be deleted (empty range, or guarded).
pub fn delete_dry_run(editor: &dyn VimEditor, range: &VimRange) -> Option<DeletePlan> {
    let plan = match range {
        VimRange::Character(CharacterRange::Range { start, end }) => char_plan(editor, *start, *end),
        VimRange::Character(CharacterRange::Multiple(ranges)) => {
            let plans: Option<Vec<DeletePlan>> = ranges
                .iter()
                .filter(|(a, b)| a != b)
                .map(|&(a, b)| char_plan(editor, a, b))
                .collect();
            merge(plans?)
        }
        VimRange::Line(LineRangeKind::Offsets { start, end }) => {
            line_plan(editor, (*start).min(*end), (*start).max(*end))
        }
        VimRange::Line(LineRangeKind::Range { start, end }) => {
            let (a, b) = (start.line().min(end.line()), start.line().max(end.line()));
            line_plan(editor, editor.line_start_offset(a), editor.line_start_offset(b))
        }
        VimRange::Line(LineRangeKind::Multiple(lines)) => {
            let mut sorted: Vec<usize> = lines.iter().map(|l| l.line()).collect();
            sorted.sort_unstable();
            sorted.dedup();
            let mut runs: Vec<(usize, usize)> = Vec::new();
            for line in sorted {
                match runs.last_mut() {
                    Some((_, last)) if *last + 1 == line => *last = line,
                    _ => runs.push((line, line)),
                }
            }
            let plans: Option<Vec<DeletePlan>> = runs
                .into_iter()
                .map(|(a, b)| line_plan(editor, editor.line_start_offset(a), editor.line_start_offset(b)))
                .collect();
            merge(plans?)
        }
        VimRange::Block { start, end } => block_plan(editor, *start, *end),
    };
    if let Some(plan) = &plan {
        debug!(spans = ?plan.spans, kind = ?plan.operated.selection_type(), "delete planned");
    }
    plan
}

/// Records each caret's column before a delete shifts lines around.
pub fn snapshot_last_columns(editor: &mut dyn VimEditor) {
    for caret in editor.native_carets() {
        let column = editor.visual_column(caret);
        editor.set_last_column(caret, Some(column));
    }
}

/// Deletes `range` and returns what was removed.
pub fn delete(editor: &mut dyn VimEditor, range: &VimRange) -> Option<OperatedRange> {
    snapshot_last_columns(editor);
    let plan = delete_dry_run(editor, range)?;
    Some(plan.apply(editor))
}

/// Where the caret goes after `operated` was deleted.
pub fn caret_after_delete(editor: &dyn VimEditor, operated: &OperatedRange) -> Offset {
    match operated {
        OperatedRange::Characters { left, .. } => (*left).min(Offset::new(editor.file_size())),
        OperatedRange::Lines {
            line_above,
            shift: ShiftType::NlOnStart,
            ..
        } => {
            let line = line_above.line().saturating_sub(1);
            editor.line_start_offset(line.min(editor.line_count() - 1))
        }
        OperatedRange::Lines { line_above, .. } => {
            editor.line_start_offset(line_above.to_pointer(editor).line())
        }
        OperatedRange::Block {
            start_line, column, ..
        } => {
            let line = (*start_line).min(editor.line_count() - 1);
            let (ls, le) = editor.line_range(line);
            (ls + *column).min(le)
        }
        OperatedRange::Multiple(parts) => parts
            .first()
            .map(|first| caret_after_delete(editor, first))
            .unwrap_or_default(),
    }
}
