//! Headless host adapter.
//!
//! [`RopeEditor`] implements [`VimEditor`] over a [`ropey::Rope`] with its
//! own carets, selections, guarded regions, line markers and marks. It is the
//! buffer the engine runs against when no real widget is involved.

use std::collections::{BTreeMap, HashMap};

use ropey::Rope;

use crate::offset::{Offset, Pointer};
use crate::traits::{CaretId, MarkerId, VimEditor};
use crate::types::Mode;

#[derive(Debug, Clone)]
struct CaretState {
    id: CaretId,
    offset: usize,
    selection: Option<(usize, usize)>,
    last_column: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    marker: MarkerId,
    col: usize,
}

#[derive(Debug, Clone, Copy)]
struct Guard {
    start: usize,
    end: usize,
    greedy: bool,
}

/// An in-memory buffer with multi-caret state.
#[derive(Debug, Clone)]
pub struct RopeEditor {
    rope: Rope,
    carets: Vec<CaretState>,
    primary: CaretId,
    next_caret: u32,
    block_selection: bool,
    guards: Vec<Guard>,
    writable: bool,
    lf_makes_new_line: bool,
    mode: Mode,
    // Line-start offsets; `None` once the line is gone.
    markers: HashMap<MarkerId, Option<usize>>,
    next_marker: u32,
    marks: BTreeMap<char, Mark>,
}

impl RopeEditor {
    /// A buffer holding `text` with one caret at offset 0.
    pub fn new(text: &str) -> Self {
        let primary = CaretId(0);
        RopeEditor {
            rope: Rope::from_str(text),
            carets: vec![CaretState {
                id: primary,
                offset: 0,
                selection: None,
                last_column: None,
            }],
            primary,
            next_caret: 1,
            block_selection: false,
            guards: Vec::new(),
            writable: true,
            lf_makes_new_line: true,
            mode: Mode::Normal,
            markers: HashMap::new(),
            next_marker: 0,
            marks: BTreeMap::new(),
        }
    }

    /// Replaces all carets with carets at `offsets`; the first one is primary.
    pub fn with_carets(mut self, offsets: &[usize]) -> Self {
        self.carets.clear();
        self.next_caret = 0;
        for &offset in offsets {
            let id = CaretId(self.next_caret);
            self.next_caret += 1;
            self.carets.push(CaretState {
                id,
                offset: offset.min(self.rope.len_chars()),
                selection: None,
                last_column: None,
            });
        }
        self.primary = self.carets.first().map(|c| c.id).unwrap_or(CaretId(0));
        if self.carets.is_empty() {
            self.carets.push(CaretState {
                id: self.primary,
                offset: 0,
                selection: None,
                last_column: None,
            });
            self.next_caret = 1;
        }
        self
    }

    /// Marks `[start, end)` read-only.
    pub fn guard(&mut self, start: usize, end: usize) {
        self.guards.push(Guard { start, end, greedy: false });
    }

    /// Like [`RopeEditor::guard`], but text may not be inserted at either
    /// edge of the region either.
    pub fn guard_greedy(&mut self, start: usize, end: usize) {
        self.guards.push(Guard { start, end, greedy: true });
    }

    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    pub fn set_lf_makes_new_line(&mut self, value: bool) {
        self.lf_makes_new_line = value;
    }

    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Caret offsets in document order.
    pub fn caret_offsets(&self) -> Vec<usize> {
        self.native_carets()
            .into_iter()
            .map(|c| self.caret_offset(c).point())
            .collect()
    }

    fn caret(&self, id: CaretId) -> Option<&CaretState> {
        self.carets.iter().find(|c| c.id == id)
    }

    fn caret_mut(&mut self, id: CaretId) -> Option<&mut CaretState> {
        self.carets.iter_mut().find(|c| c.id == id)
    }

    fn shift_for_delete(point: usize, start: usize, end: usize) -> usize {
        if point >= end {
            point - (end - start)
        } else if point > start {
            start
        } else {
            point
        }
    }

    fn shift_for_insert(point: usize, at: usize, len: usize) -> usize {
        if point > at { point + len } else { point }
    }

    fn adjust_markers_for_delete(&mut self, start: usize, end: usize) {
        let len = end - start;
        let starts_line = start == 0 || self.rope.char(start - 1) == '\n';
        let ends_after_newline = self.rope.char(end - 1) == '\n';
        for slot in self.markers.values_mut() {
            let Some(o) = *slot else { continue };
            *slot = if end < o {
                Some(o - len)
            } else if end == o {
                // Whole lines above were removed, or our leading newline was.
                starts_line.then_some(start)
            } else if start < o {
                None
            } else if start == o {
                // Whole lines starting here were removed.
                (!ends_after_newline).then_some(o)
            } else {
                Some(o)
            };
        }
    }

    fn adjust_markers_for_insert(&mut self, at: usize, text: &str) {
        let len = text.chars().count();
        let after_last_nl = text
            .rfind('\n')
            .map(|i| text[..=i].chars().count())
            .unwrap_or(0);
        for slot in self.markers.values_mut() {
            if let Some(o) = slot.as_mut() {
                if at < *o {
                    *o += len;
                } else if at == *o {
                    *o += after_last_nl;
                }
            }
        }
    }
}

impl Default for RopeEditor {
    fn default() -> Self {
        RopeEditor::new("")
    }
}

impl VimEditor for RopeEditor {
    fn file_size(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_count(&self) -> usize {
        let native = self.rope.len_lines();
        let len = self.rope.len_chars();
        if len > 0 && self.rope.char(len - 1) == '\n' {
            native - 1
        } else {
            native
        }
    }

    fn line_start_offset(&self, line: usize) -> Offset {
        if line >= self.rope.len_lines() {
            return Offset::new(self.rope.len_chars());
        }
        Offset::new(self.rope.line_to_char(line))
    }

    fn line_end_offset(&self, line: usize) -> Offset {
        if line + 1 < self.rope.len_lines() {
            Offset::new(self.rope.line_to_char(line + 1) - 1)
        } else {
            Offset::new(self.rope.len_chars())
        }
    }

    fn offset_to_line(&self, offset: Offset) -> usize {
        let point = offset.point().min(self.rope.len_chars());
        self.rope
            .char_to_line(point)
            .min(self.line_count().saturating_sub(1))
    }

    fn char_at(&self, pointer: Pointer) -> char {
        self.rope.char(pointer.point())
    }

    fn text_range(&self, start: Offset, end: Offset) -> String {
        let len = self.rope.len_chars();
        let s = start.point().min(len);
        let e = end.point().min(len).max(s);
        self.rope.slice(s..e).to_string()
    }

    fn lf_makes_new_line(&self) -> bool {
        self.lf_makes_new_line
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn is_guarded(&self, start: Offset, end: Offset) -> bool {
        let (s, e) = (start.point(), end.point());
        self.guards.iter().any(|g| match (s == e, g.greedy) {
            (true, true) => g.start <= s && s <= g.end,
            (true, false) => g.start < s && s < g.end,
            _ => s < g.end && g.start < e,
        })
    }

    fn delete_range(&mut self, start: Offset, end: Offset) {
        let len = self.rope.len_chars();
        let (s, e) = (start.point().min(len), end.point().min(len));
        if s >= e {
            return;
        }
        self.adjust_markers_for_delete(s, e);
        self.rope.remove(s..e);
        for caret in &mut self.carets {
            caret.offset = Self::shift_for_delete(caret.offset, s, e);
            if let Some((a, b)) = caret.selection {
                caret.selection = Some((
                    Self::shift_for_delete(a, s, e),
                    Self::shift_for_delete(b, s, e),
                ));
            }
        }
        for guard in &mut self.guards {
            guard.start = Self::shift_for_delete(guard.start, s, e);
            guard.end = Self::shift_for_delete(guard.end, s, e);
        }
    }

    fn insert_text(&mut self, at: Offset, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = at.point().min(self.rope.len_chars());
        let len = text.chars().count();
        self.adjust_markers_for_insert(at, text);
        self.rope.insert(at, text);
        for caret in &mut self.carets {
            caret.offset = Self::shift_for_insert(caret.offset, at, len);
            if let Some((a, b)) = caret.selection {
                caret.selection = Some((
                    Self::shift_for_insert(a, at, len),
                    Self::shift_for_insert(b, at, len),
                ));
            }
        }
        for guard in &mut self.guards {
            guard.start = Self::shift_for_insert(guard.start, at, len);
            guard.end = Self::shift_for_insert(guard.end, at, len);
        }
    }

    fn native_carets(&self) -> Vec<CaretId> {
        let mut carets: Vec<&CaretState> = self.carets.iter().collect();
        carets.sort_by_key(|c| (c.offset, c.id));
        carets.into_iter().map(|c| c.id).collect()
    }

    fn primary_caret(&self) -> CaretId {
        self.primary
    }

    fn in_block_selection(&self) -> bool {
        self.block_selection
    }

    fn set_block_selection(&mut self, on: bool) {
        self.block_selection = on;
    }

    fn caret_offset(&self, caret: CaretId) -> Offset {
        Offset::new(self.caret(caret).map(|c| c.offset).unwrap_or(0))
    }

    fn move_caret(&mut self, caret: CaretId, offset: Offset) {
        let len = self.rope.len_chars();
        if let Some(c) = self.caret_mut(caret) {
            c.offset = offset.point().min(len);
        }
    }

    fn selection(&self, caret: CaretId) -> Option<(Offset, Offset)> {
        self.caret(caret)
            .and_then(|c| c.selection)
            .map(|(a, b)| (Offset::new(a), Offset::new(b)))
    }

    fn set_selection(&mut self, caret: CaretId, start: Offset, end: Offset) {
        if let Some(c) = self.caret_mut(caret) {
            c.selection = Some((start.point(), end.point()));
        }
    }

    fn remove_selection(&mut self, caret: CaretId) {
        if let Some(c) = self.caret_mut(caret) {
            c.selection = None;
        }
    }

    fn last_column(&self, caret: CaretId) -> Option<usize> {
        self.caret(caret).and_then(|c| c.last_column)
    }

    fn set_last_column(&mut self, caret: CaretId, column: Option<usize>) {
        if let Some(c) = self.caret_mut(caret) {
            c.last_column = column;
        }
    }

    fn add_caret(&mut self, offset: Offset) -> Option<CaretId> {
        let point = offset.point().min(self.rope.len_chars());
        if self.carets.iter().any(|c| c.offset == point) {
            return None;
        }
        let id = CaretId(self.next_caret);
        self.next_caret += 1;
        self.carets.push(CaretState {
            id,
            offset: point,
            selection: None,
            last_column: None,
        });
        Some(id)
    }

    fn remove_secondary_carets(&mut self) {
        let primary = self.primary;
        self.carets.retain(|c| c.id == primary);
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn create_line_marker(&mut self, line: usize) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        let start = self.line_start_offset(line).point();
        self.markers.insert(id, Some(start));
        id
    }

    fn marker_line(&self, marker: MarkerId) -> Option<usize> {
        let start = (*self.markers.get(&marker)?)?;
        Some(self.offset_to_line(Offset::new(start)))
    }

    fn release_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn set_mark(&mut self, name: char, offset: Offset) {
        let pos = self.offset_to_position(offset);
        let marker = self.create_line_marker(pos.line);
        if let Some(old) = self.marks.insert(name, Mark { marker, col: pos.col }) {
            self.release_marker(old.marker);
        }
    }

    fn mark(&self, name: char) -> Option<Offset> {
        let mark = self.marks.get(&name)?;
        let line = self.marker_line(mark.marker)?;
        let (start, end) = self.line_range(line);
        Some((start + mark.col).min(end))
    }

    fn marks(&self) -> Vec<(char, Offset)> {
        self.marks
            .keys()
            .filter_map(|&name| self.mark(name).map(|o| (name, o)))
            .collect()
    }
}
