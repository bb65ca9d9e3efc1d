//! Position primitives.
//!
//! Two kinds of integer positions exist in a buffer and they are not
//! interchangeable:
//!
//! - [`Offset`] sits *between* characters and ranges over `[0, len]`.
//! - [`Pointer`] names an existing character and ranges over `[0, len)`.
//!
//! Lines have the same split: [`LinePointer`] names an existing line while
//! [`LineOffset`] may equal `line_count()` ("insert a new line here").
//! Line types validate on construction and panic when out of range, since an
//! invalid line index is always a caller bug.

use std::fmt;
use std::ops::{Add, Sub};

use crate::traits::VimEditor;

/// A position between two characters, counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(usize);

impl Offset {
    pub const ZERO: Offset = Offset(0);

    pub const fn new(point: usize) -> Self {
        Offset(point)
    }

    pub const fn point(self) -> usize {
        self.0
    }

    /// Names the character right after this offset.
    ///
    /// Fails when the offset is at (or beyond) the end of a buffer of `len`
    /// characters: there is no character to point at.
    pub fn to_pointer(self, len: usize) -> Option<Pointer> {
        (self.0 < len).then_some(Pointer(self.0))
    }

    pub fn saturating_sub(self, n: usize) -> Offset {
        Offset(self.0.saturating_sub(n))
    }
}

impl Add<usize> for Offset {
    type Output = Offset;

    fn add(self, rhs: usize) -> Offset {
        Offset(self.0 + rhs)
    }
}

impl Sub<usize> for Offset {
    type Output = Offset;

    fn sub(self, rhs: usize) -> Offset {
        Offset(self.0 - rhs)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A position naming an existing character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pointer(usize);

impl Pointer {
    pub const fn new(point: usize) -> Self {
        Pointer(point)
    }

    pub const fn point(self) -> usize {
        self.0
    }

    /// The offset right before the character.
    pub const fn to_offset(self) -> Offset {
        Offset(self.0)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Index of an existing line: `0 <= line < line_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinePointer(usize);

impl LinePointer {
    /// Panics when `line` is not a line of `editor`.
    pub fn init<E: VimEditor + ?Sized>(line: usize, editor: &E) -> Self {
        let count = editor.line_count();
        assert!(
            line < count,
            "line pointer {line} out of range, buffer has {count} lines"
        );
        LinePointer(line)
    }

    pub fn line(self) -> usize {
        self.0
    }

    pub fn to_offset(self) -> LineOffset {
        LineOffset(self.0)
    }
}

/// Line position that may be one past the last line: `0 <= line <= line_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineOffset(usize);

impl LineOffset {
    /// Panics when `line` is beyond `line_count()`.
    pub fn init(line: usize, editor: &dyn VimEditor) -> Self {
        let count = editor.line_count();
        assert!(
            line <= count,
            "line offset {line} out of range, buffer has {count} lines"
        );
        LineOffset(line)
    }

    pub fn line(self) -> usize {
        self.0
    }

    /// Clamps to the last line, never produces an invalid pointer.
    pub fn to_pointer(self, editor: &dyn VimEditor) -> LinePointer {
        let last = editor.line_count().saturating_sub(1);
        LinePointer(self.0.min(last))
    }
}

/// Either kind of line position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorLine {
    Pointer(LinePointer),
    Offset(LineOffset),
}

impl EditorLine {
    pub fn line(self) -> usize {
        match self {
            EditorLine::Pointer(p) => p.line(),
            EditorLine::Offset(o) => o.line(),
        }
    }

    pub fn to_pointer(self, editor: &dyn VimEditor) -> LinePointer {
        match self {
            EditorLine::Pointer(p) => p,
            EditorLine::Offset(o) => o.to_pointer(editor),
        }
    }
}

impl From<LinePointer> for EditorLine {
    fn from(p: LinePointer) -> Self {
        EditorLine::Pointer(p)
    }
}

impl From<LineOffset> for EditorLine {
    fn from(o: LineOffset) -> Self {
        EditorLine::Offset(o)
    }
}
