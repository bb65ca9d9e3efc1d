/// A line/column position within a text buffer.
///
/// Positions are zero-indexed and column values are counted in chars from the
/// start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column in chars.
    pub col: usize,
}

/// The editor mode as far as commands care: ex commands leave `Visual`,
/// `c` ends in `Insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(SelectionType),
}

/// Shape of a selection, a motion result or register content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    /// Character-wise (`v`, most motions).
    #[default]
    CharacterWise,
    /// Line-wise (`V`, `dd`, `j`/`k` motions).
    LineWise,
    /// Rectangular (`<C-v>`).
    BlockWise,
}

impl SelectionType {
    /// Single-letter tag used by `:registers`.
    pub fn tag(self) -> char {
        match self {
            SelectionType::CharacterWise => 'c',
            SelectionType::LineWise => 'l',
            SelectionType::BlockWise => 'b',
        }
    }
}

/// Direction of a search or motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// An inclusive range of zero-based line numbers.
///
/// Produced by resolving an ex range against an editor and caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineRange {
    /// Builds a range, swapping the ends if they arrive backwards.
    pub fn new(a: usize, b: usize) -> Self {
        LineRange {
            start_line: a.min(b),
            end_line: a.max(b),
        }
    }

    pub fn size(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}
