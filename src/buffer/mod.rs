//! # Text Buffer
//!
//! Line-oriented storage for a single open document.
//!
//! ## What it does
//!
//! - Stores text as a vector of byte lines (no trailing newline per line)
//! - Tracks the cursor and the visible row window (viewport)
//! - Remembers the preferred column for vertical motion
//! - Exposes the splice primitives the editor builds commands from
//!
//! ## Invariants
//!
//! Every mutating method leaves at least one line in the buffer and the
//! cursor inside it. Out-of-range requests are clamped, never rejected.
//! Column math is byte based; nothing here is grapheme aware.

pub mod iter;

pub use iter::{BufIter, Direction, EolPolicy};

use std::ops::Range;

/// Rows shown when the host has not reported a size yet.
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 24;

/// Represents a text position (row, byte column)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert to tuple
    pub fn to_tuple(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

/// The visible window into the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: 0,
            h: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Last row inside the window (may lie past the end of the buffer).
    pub fn bottom(&self) -> usize {
        self.y + self.h.saturating_sub(1)
    }
}

/// Column the cursor tries to return to when moving across lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefCol {
    Col(usize),
    /// Stick to the end of whatever line the cursor lands on.
    LineEnd,
}

impl Default for PrefCol {
    fn default() -> Self {
        PrefCol::Col(0)
    }
}

/// A single line of text, stored as raw bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    text: Vec<u8>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            text: bytes.to_vec(),
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte at `i`, or `None` when out of range.
    pub fn char_at(&self, i: usize) -> Option<u8> {
        self.text.get(i).copied()
    }

    pub fn char_at_is(&self, i: usize, candidates: &[u8]) -> bool {
        self.char_at(i).is_some_and(|c| candidates.contains(&c))
    }

    /// Index of the first byte that is not a space or tab (the line length
    /// for blank lines).
    pub fn starting_index(&self) -> usize {
        self.text
            .iter()
            .position(|&c| c != b' ' && c != b'\t')
            .unwrap_or(self.text.len())
    }

    /// Remove `[i, j)` and return the removed bytes. Both ends are clamped.
    pub fn delete_range(&mut self, i: usize, j: usize) -> Vec<u8> {
        let end = j.min(self.text.len());
        let start = i.min(end);
        self.text.drain(start..end).collect()
    }

    /// Span of the word (or whitespace run) under `col`. With `around`, the
    /// trailing whitespace is included, or the leading whitespace when there
    /// is none after the word.
    pub fn word_span(&self, col: usize, around: bool) -> Range<usize> {
        let len = self.text.len();
        if len == 0 {
            return 0..0;
        }
        let col = col.min(len - 1);
        let on_space = is_space(self.text[col]);
        let mut start = col;
        while start > 0 && is_space(self.text[start - 1]) == on_space {
            start -= 1;
        }
        let mut end = col + 1;
        while end < len && is_space(self.text[end]) == on_space {
            end += 1;
        }
        if around {
            if on_space {
                while end < len && !is_space(self.text[end]) {
                    end += 1;
                }
            } else {
                let word_end = end;
                while end < len && is_space(self.text[end]) {
                    end += 1;
                }
                if end == word_end {
                    while start > 0 && is_space(self.text[start - 1]) {
                        start -= 1;
                    }
                }
            }
        }
        start..end
    }

    /// Flip a `[ ]`/`[x]` task box that follows a two-byte list bullet
    /// (`- [ ] task`). Returns whether anything changed.
    pub fn toggle_check_item(&mut self) -> bool {
        let col = self.starting_index() + 2;
        if !(self.char_at_is(col, b"[") && self.char_at_is(col + 2, b"]")) {
            return false;
        }
        match self.text[col + 1] {
            b'x' => self.text[col + 1] = b' ',
            b' ' => self.text[col + 1] = b'x',
            _ => return false,
        }
        true
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n')
}

#[derive(Clone, Debug)]
pub struct Buffer {
    lines: Vec<Line>,
    cursor: Position,
    viewport: Viewport,
    pref_col: PrefCol,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            cursor: Position::default(),
            viewport: Viewport::default(),
            pref_col: PrefCol::default(),
        }
    }

    /// Build a buffer holding `data`, cursor at the origin.
    pub fn from_text(data: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(data);
        buffer
    }

    /// Replace the whole content. Lines are split on `\n`; a single trailing
    /// newline does not produce an extra empty line and empty input yields
    /// one empty line. The cursor is clamped into the new content.
    pub fn set_text(&mut self, data: &[u8]) {
        let body = data.strip_suffix(b"\n").unwrap_or(data);
        self.lines = if data.is_empty() {
            vec![Line::new()]
        } else {
            body.split(|&c| c == b'\n').map(Line::from_bytes).collect()
        };
        self.set_cursor(self.cursor);
    }

    /// Lines joined with `\n`, no trailing newline.
    pub fn text(&self) -> Vec<u8> {
        let total: usize = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut txt = Vec::with_capacity(total.saturating_sub(1));
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                txt.push(b'\n');
            }
            txt.extend_from_slice(&line.text);
        }
        txt
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pref_col(&self) -> PrefCol {
        self.pref_col
    }

    /// Move the cursor, clamping the row to the buffer and the column to the
    /// line length (insert-style bounds).
    pub fn set_cursor(&mut self, pos: Position) {
        let row = pos.row.min(self.last_row());
        let col = pos.col.min(self.lines[row].len());
        self.cursor = Position { row, col };
    }

    pub fn set_pref_col(&mut self, pref_col: PrefCol) {
        self.pref_col = pref_col;
    }

    pub fn set_viewport_size(&mut self, w: usize, h: usize) {
        self.viewport.w = w;
        self.viewport.h = h.max(1);
    }

    pub fn current_line(&self) -> &Line {
        &self.lines[self.cursor.row]
    }

    fn current_line_mut(&mut self) -> &mut Line {
        &mut self.lines[self.cursor.row]
    }

    pub fn current_line_len(&self) -> usize {
        self.current_line().len()
    }

    fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    /// Re-derive the cursor column from the preferred column. Normal mode
    /// (`eol_exclusive`) cannot rest past the last byte of a non-empty line.
    pub fn clamp_col(&mut self, eol_exclusive: bool) {
        let len = self.current_line_len();
        let ceil = if eol_exclusive {
            len.saturating_sub(1)
        } else {
            len
        };
        self.cursor.col = match self.pref_col {
            PrefCol::Col(c) if c <= ceil => c,
            _ => ceil,
        };
    }

    /// Put the cursor at `col`, clamped to normal-mode bounds.
    pub fn set_cursor_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.current_line_len().saturating_sub(1));
    }

    /// Re-clamp the cursor column to normal-mode bounds.
    pub fn clamp_cursor_normal(&mut self) {
        self.set_cursor_col(self.cursor.col);
    }

    pub fn cursor_right(&mut self) {
        self.cursor.col = (self.cursor.col + 1).min(self.current_line_len());
    }

    pub fn cursor_to_line_end(&mut self) {
        self.cursor.col = self.current_line_len();
    }

    pub fn cursor_to_line_start(&mut self) {
        self.cursor.col = self.current_line().starting_index();
    }

    /// Splice `txt` into the current line at the cursor.
    pub fn insert(&mut self, txt: &str) {
        self.insert_bytes(txt.as_bytes());
    }

    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        let col = self.cursor.col.min(self.current_line_len());
        self.current_line_mut()
            .text
            .splice(col..col, bytes.iter().copied());
        self.cursor.col = col + bytes.len();
        self.pref_col = PrefCol::Col(self.cursor.col);
    }

    /// Split the current line at the cursor; the tail becomes a new line below.
    pub fn insert_new_line(&mut self) {
        let col = self.cursor.col.min(self.current_line_len());
        let tail = self.current_line_mut().text.split_off(col);
        let row = self.cursor.row + 1;
        self.lines.insert(row, Line { text: tail });
        self.cursor = Position::new(row, 0);
        self.pref_col = PrefCol::Col(0);
    }

    /// Open a blank line above or below the current one.
    pub fn start_new_line(&mut self, below: bool) {
        let row = if below {
            self.cursor.row + 1
        } else {
            self.cursor.row
        };
        self.lines.insert(row, Line::new());
        self.cursor = Position::new(row, 0);
        self.pref_col = PrefCol::Col(0);
    }

    /// Backspace. At column 0 the line is joined onto the previous one.
    pub fn delete_back(&mut self) {
        let Position { row, col } = self.cursor;
        if col == 0 {
            if row == 0 {
                return;
            }
            let current = self.lines.remove(row);
            let prev = &mut self.lines[row - 1];
            let join_col = prev.len();
            prev.text.extend(current.text);
            self.cursor = Position::new(row - 1, join_col);
        } else {
            let col = col.min(self.current_line_len());
            self.current_line_mut().text.remove(col - 1);
            self.cursor.col = col - 1;
        }
        self.pref_col = PrefCol::Col(self.cursor.col);
    }

    /// Forward delete with insert-mode semantics: at end of line the next line
    /// is joined onto this one.
    pub fn delete_forward_insert(&mut self) {
        let Position { row, col } = self.cursor;
        if col >= self.current_line_len() {
            if row == self.last_row() {
                return;
            }
            let next = self.lines.remove(row + 1);
            self.current_line_mut().text.extend(next.text);
        } else {
            self.current_line_mut().text.remove(col);
        }
    }

    /// Forward delete with normal-mode semantics (`x`): never joins lines and
    /// pulls the cursor left when the last byte goes. Returns the removed byte.
    pub fn delete_forward_normal(&mut self) -> Option<u8> {
        let len = self.current_line_len();
        if len == 0 {
            return None;
        }
        let col = self.cursor.col.min(len - 1);
        let removed = self.current_line_mut().text.remove(col);
        self.cursor.col = if col == len - 1 {
            col.saturating_sub(1)
        } else {
            col
        };
        Some(removed)
    }

    /// Remove `[range)` from one row. Returns the removed bytes.
    pub fn delete_in_line(&mut self, row: usize, range: Range<usize>) -> Vec<u8> {
        match self.lines.get_mut(row) {
            Some(line) => line.delete_range(range.start, range.end),
            None => Vec::new(),
        }
    }

    /// Remove the text between `p1` (inclusive) and `p2` (exclusive). On
    /// different rows the remainder of `p2`'s row is joined onto `p1`'s row.
    /// The cursor lands on `p1`. Returns the removed text, rows joined by `\n`.
    pub fn delete_block(&mut self, p1: Position, p2: Position) -> Vec<u8> {
        let (p1, p2) = if p2 < p1 { (p2, p1) } else { (p1, p2) };
        let first = p1.row.min(self.last_row());
        let last = p2.row.min(self.last_row());
        let removed = if first == last {
            self.lines[first].delete_range(p1.col, p2.col)
        } else {
            let start = p1.col.min(self.lines[first].len());
            let mut removed = self.lines[first].text.split_off(start);
            let drained: Vec<Line> = self.lines.drain(first + 1..=last).collect();
            let count = drained.len();
            for (i, mut line) in drained.into_iter().enumerate() {
                removed.push(b'\n');
                if i + 1 == count {
                    let tail = line.text.split_off(p2.col.min(line.len()));
                    removed.extend(line.text);
                    self.lines[first].text.extend(tail);
                } else {
                    removed.extend(line.text);
                }
            }
            removed
        };
        self.set_cursor(Position::new(first, p1.col));
        removed
    }

    /// Remove rows `y1..=y2`. The buffer keeps one empty line if everything
    /// goes. Returns the removed lines.
    pub fn delete_lines(&mut self, y1: usize, y2: usize) -> Vec<Line> {
        let (y1, y2) = if y2 < y1 { (y2, y1) } else { (y1, y2) };
        if y1 > self.last_row() {
            return Vec::new();
        }
        let y2 = y2.min(self.last_row());
        let removed: Vec<Line> = self.lines.drain(y1..=y2).collect();
        if self.lines.is_empty() {
            self.lines.push(Line::new());
        }
        self.cursor.row = y1.min(self.last_row());
        self.clamp_cursor_normal();
        removed
    }

    /// `C`: drop everything from the cursor on.
    pub fn trunc_current_line_from_cursor(&mut self) -> Vec<u8> {
        let col = self.cursor.col.min(self.current_line_len());
        self.cursor.col = col;
        self.current_line_mut().text.split_off(col)
    }

    /// `S`: drop everything after the indentation.
    pub fn trunc_current_line_from_start(&mut self) -> Vec<u8> {
        let start = self.current_line().starting_index();
        self.cursor.col = start;
        self.pref_col = PrefCol::Col(start);
        self.current_line_mut().text.split_off(start)
    }

    /// Toggle the task box on the cursor's line.
    pub fn toggle_check_item(&mut self) -> bool {
        self.current_line_mut().toggle_check_item()
    }

    /// Pull the cursor row inside the viewport.
    pub fn mv_cursor_into_view(&mut self) {
        let bottom = self.viewport.bottom().min(self.last_row());
        self.cursor.row = self.cursor.row.max(self.viewport.y).min(bottom);
        let len = self.current_line_len();
        if self.cursor.col >= len {
            self.cursor.col = len.saturating_sub(1);
        }
    }

    /// Scroll the viewport just enough to show the cursor row.
    pub fn mv_view_into_cursor(&mut self) {
        let row = self.cursor.row;
        let bottom = self.viewport.bottom();
        if row < self.viewport.y {
            self.viewport.y = row;
        } else if row > bottom {
            self.viewport.y += row - bottom;
        }
    }

    /// Scroll the viewport by `n` rows and keep the cursor visible.
    pub fn scroll_view(&mut self, n: isize) {
        let last = self.last_row();
        if n >= 0 {
            if self.viewport.y < last {
                self.viewport.y = (self.viewport.y + n.unsigned_abs()).min(last);
            }
        } else {
            self.viewport.y = self.viewport.y.saturating_sub(n.unsigned_abs());
        }
        self.mv_cursor_into_view();
    }
}
