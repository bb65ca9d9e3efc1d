//! Logical ranges and the results of operating on them.

use crate::offset::{LineOffset, LinePointer, Offset};
use crate::traits::VimEditor;
use crate::types::SelectionType;

/// Which newline a line-wise delete consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftType {
    /// No newline on either side (the only or last line, no `'\n'` after it).
    NoNl,
    /// The `'\n'` after the last deleted line.
    NlOnEnd,
    /// The `'\n'` before the first deleted line.
    NlOnStart,
}

/// A character-wise range. Ends may arrive in either order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterRange {
    Range { start: Offset, end: Offset },
    /// One range per caret.
    Multiple(Vec<(Offset, Offset)>),
}

/// A line-wise range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRangeKind {
    Range { start: LinePointer, end: LinePointer },
    /// Arbitrary offsets, widened to whole lines when applied.
    Offsets { start: Offset, end: Offset },
    /// A discontinuous set of lines.
    Multiple(Vec<LinePointer>),
}

/// A range produced by a motion, text object, selection or ex range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VimRange {
    Character(CharacterRange),
    Line(LineRangeKind),
    Block { start: Offset, end: Offset },
}

impl VimRange {
    pub fn chars(start: Offset, end: Offset) -> Self {
        VimRange::Character(CharacterRange::Range { start, end })
    }

    pub fn lines(start: LinePointer, end: LinePointer) -> Self {
        VimRange::Line(LineRangeKind::Range { start, end })
    }

    pub fn line_offsets(start: Offset, end: Offset) -> Self {
        VimRange::Line(LineRangeKind::Offsets { start, end })
    }

    /// Builds the range a motion from `from` to `to` covers.
    pub fn from_motion(editor: &dyn VimEditor, from: Offset, to: Offset, motion: MotionType) -> Self {
        let (lo, hi) = (from.min(to), from.max(to));
        match motion {
            MotionType::Exclusive => VimRange::chars(lo, hi),
            MotionType::Inclusive => {
                let end = (hi + 1).min(Offset::new(editor.file_size()));
                VimRange::chars(lo, end)
            }
            MotionType::LineWise => VimRange::line_offsets(lo, hi),
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        match self {
            VimRange::Character(_) => SelectionType::CharacterWise,
            VimRange::Line(_) => SelectionType::LineWise,
            VimRange::Block { .. } => SelectionType::BlockWise,
        }
    }

    /// The smaller end, whatever order the range was built in.
    pub fn offset_above(&self, editor: &dyn VimEditor) -> Offset {
        match self {
            VimRange::Character(CharacterRange::Range { start, end })
            | VimRange::Line(LineRangeKind::Offsets { start, end })
            | VimRange::Block { start, end } => (*start).min(*end),
            VimRange::Character(CharacterRange::Multiple(ranges)) => ranges
                .iter()
                .map(|(a, b)| (*a).min(*b))
                .min()
                .unwrap_or_default(),
            VimRange::Line(LineRangeKind::Range { start, end }) => {
                editor.line_start_offset(start.line().min(end.line()))
            }
            VimRange::Line(LineRangeKind::Multiple(lines)) => lines
                .iter()
                .map(|l| editor.line_start_offset(l.line()))
                .min()
                .unwrap_or_default(),
        }
    }

    /// The larger end, whatever order the range was built in.
    pub fn offset_below(&self, editor: &dyn VimEditor) -> Offset {
        match self {
            VimRange::Character(CharacterRange::Range { start, end })
            | VimRange::Line(LineRangeKind::Offsets { start, end })
            | VimRange::Block { start, end } => (*start).max(*end),
            VimRange::Character(CharacterRange::Multiple(ranges)) => ranges
                .iter()
                .map(|(a, b)| (*a).max(*b))
                .max()
                .unwrap_or_default(),
            VimRange::Line(LineRangeKind::Range { start, end }) => {
                editor.line_end_offset(start.line().max(end.line()))
            }
            VimRange::Line(LineRangeKind::Multiple(lines)) => lines
                .iter()
                .map(|l| editor.line_end_offset(l.line()))
                .max()
                .unwrap_or_default(),
        }
    }

    /// Whether the range stays within one line and is not line-wise.
    pub fn is_single_line(&self, editor: &dyn VimEditor) -> bool {
        if matches!(self, VimRange::Line(_)) {
            return false;
        }
        let above = editor.offset_to_line(self.offset_above(editor));
        let below = editor.offset_to_line(self.offset_below(editor));
        above == below
    }
}

/// How a motion's end is treated when it feeds an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    /// The character at the end is included (`e`, `f`, `%`).
    Inclusive,
    /// The range stops before the end (`w`, `b`, `/`).
    Exclusive,
    /// Whole lines (`j`, `k`, `G`).
    LineWise,
}

/// What a delete actually removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatedRange {
    Characters {
        text: String,
        left: Offset,
        right: Offset,
    },
    Lines {
        text: String,
        line_above: LineOffset,
        lines_operated: usize,
        shift: ShiftType,
    },
    Block {
        /// One entry per covered line, top to bottom.
        lines: Vec<String>,
        start_line: usize,
        column: usize,
    },
    /// Per-caret or discontinuous pieces, in document order.
    Multiple(Vec<OperatedRange>),
}

impl OperatedRange {
    /// The removed text as a register would store it.
    pub fn text(&self) -> String {
        match self {
            OperatedRange::Characters { text, .. } => text.clone(),
            OperatedRange::Lines { text, shift, .. } => match shift {
                ShiftType::NlOnEnd => text.clone(),
                ShiftType::NlOnStart => format!("{}\n", &text[1..]),
                ShiftType::NoNl => format!("{text}\n"),
            },
            OperatedRange::Block { lines, .. } => lines.join("\n"),
            OperatedRange::Multiple(parts) => {
                let texts: Vec<String> = parts.iter().map(OperatedRange::text).collect();
                if self.selection_type() == SelectionType::LineWise {
                    texts.concat()
                } else {
                    texts.join("\n")
                }
            }
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        match self {
            OperatedRange::Characters { .. } => SelectionType::CharacterWise,
            OperatedRange::Lines { .. } => SelectionType::LineWise,
            OperatedRange::Block { .. } => SelectionType::BlockWise,
            OperatedRange::Multiple(parts) => parts
                .first()
                .map(OperatedRange::selection_type)
                .unwrap_or_default(),
        }
    }
}
