//! Positional cursor over a [`Buffer`], used to resolve motions and deletion
//! ranges before anything in the buffer is touched.

use super::{is_space, Buffer, Position, PrefCol};

/// Whether a forward step may land one past the last byte of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EolPolicy {
    #[default]
    Exclusive,
    Inclusive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Debug)]
pub struct BufIter<'a> {
    buf: &'a Buffer,
    eol: EolPolicy,
    row: usize,
    col: usize,
    pref_col: PrefCol,
}

impl<'a> BufIter<'a> {
    /// Start at the buffer's cursor with its preferred column.
    pub fn new(buf: &'a Buffer) -> Self {
        Self {
            buf,
            eol: EolPolicy::Exclusive,
            row: buf.cursor.row,
            col: buf.cursor.col,
            pref_col: buf.pref_col,
        }
    }

    pub fn with_policy(mut self, eol: EolPolicy) -> Self {
        self.eol = eol;
        self
    }

    /// Start somewhere other than the cursor. The position is clamped to
    /// the buffer.
    pub fn with_position(mut self, pos: Position) -> Self {
        self.row = pos.row.min(self.buf.lines.len() - 1);
        self.col = pos.col.min(self.line_len());
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn pref_col(&self) -> PrefCol {
        self.pref_col
    }

    fn line_len(&self) -> usize {
        self.buf.lines[self.row].len()
    }

    /// Highest column the policy allows on the current row.
    fn ceil_x(&self) -> usize {
        let len = self.line_len();
        match self.eol {
            EolPolicy::Exclusive => len.saturating_sub(1),
            EolPolicy::Inclusive => len,
        }
    }

    /// Move one byte, wrapping across line boundaries. Returns `false` when
    /// the buffer edge stops the move.
    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.step_forward(),
            Direction::Backward => self.step_backward(),
        }
    }

    fn step_forward(&mut self) -> bool {
        if self.col + 1 > self.ceil_x() {
            if self.row >= self.buf.lines.len() - 1 {
                return false;
            }
            self.row += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        true
    }

    fn step_backward(&mut self) -> bool {
        if self.col == 0 {
            if self.row == 0 {
                return false;
            }
            self.row -= 1;
            self.col = self.line_len().saturating_sub(1);
        } else {
            self.col -= 1;
        }
        true
    }

    /// Horizontal seek within the current line. The preferred column only
    /// follows when the target is in bounds.
    pub fn seek_by_x(&mut self, delta: isize) {
        let ceil = self.line_len().saturating_sub(1)
            + usize::from(self.eol == EolPolicy::Inclusive);
        let target = self.col as isize + delta;
        if target >= 0 && target as usize <= ceil {
            self.col = target as usize;
            self.pref_col = PrefCol::Col(self.col);
        } else {
            self.col = target.clamp(0, ceil as isize) as usize;
        }
    }

    /// Vertical seek clamped to the buffer; the column comes back from the
    /// preferred column.
    pub fn seek_by_y(&mut self, delta: isize) {
        let last = self.buf.lines.len() as isize - 1;
        self.row = (self.row as isize + delta).clamp(0, last) as usize;
        self.ensure_x();
    }

    /// `w`/`b`: cross `count` word starts. A word start is a non-blank byte
    /// after a blank or the line start, an empty line, or (inclusive policy)
    /// the end-of-line position.
    pub fn seek_by_word_start(&mut self, count: usize, direction: Direction) {
        let inclusive = self.eol == EolPolicy::Inclusive;
        let mut counter = 0;
        while self.step(direction) {
            let ln = self.buf.lines[self.row].text();
            let at_eol = inclusive && self.col == ln.len();
            if !ln.is_empty() && at_eol && counter + 1 == count {
                break;
            }
            let starts_word = ln.get(self.col).is_some_and(|&c| !is_space(c))
                && (self.col == 0 || is_space(ln[self.col - 1]));
            if ln.is_empty() || at_eol || starts_word {
                counter += 1;
            }
            if counter >= count {
                break;
            }
        }
        self.pref_col = PrefCol::Col(self.col);
    }

    /// `e`: move forward onto the last byte of the `count`th word end.
    pub fn seek_by_word_end(&mut self, count: usize) {
        let mut counter = 0;
        while self.step(Direction::Forward) {
            let ln = self.buf.lines[self.row].text();
            let col = self.col;
            if col < ln.len() && !is_space(ln[col]) && (col + 1 == ln.len() || is_space(ln[col + 1]))
            {
                counter += 1;
                if counter >= count {
                    break;
                }
            }
        }
        self.pref_col = PrefCol::Col(self.col);
    }

    /// `H`: the `count`th row below the top of the viewport.
    pub fn seek_nth_line_from_top(&mut self, count: usize) {
        let last = self.buf.lines.len() - 1;
        self.row = (self.buf.viewport.y + count).min(last);
        self.ensure_x();
    }

    /// `L`: the `count`th row above the bottom of the viewport.
    pub fn seek_nth_line_from_bot(&mut self, count: usize) {
        let last = self.buf.lines.len() - 1;
        let bottom = self.buf.viewport.bottom().min(last);
        self.row = bottom.saturating_sub(count);
        self.ensure_x();
    }

    /// `0`
    pub fn seek_line_start(&mut self) {
        self.col = 0;
        self.pref_col = PrefCol::Col(0);
    }

    /// `$`: last byte of the line; vertical motion then sticks to line ends.
    pub fn seek_line_end(&mut self) {
        self.col = self.line_len().saturating_sub(1);
        self.pref_col = PrefCol::LineEnd;
    }

    fn ensure_x(&mut self) {
        let len = self.line_len();
        self.col = match self.pref_col {
            PrefCol::Col(c) if c < len => c,
            _ => len.saturating_sub(1),
        };
    }

    /// The iterator position and the buffer cursor, in document order.
    pub fn bounds(&self) -> (Position, Position) {
        let cursor = self.buf.cursor;
        let here = self.position();
        if cursor.row < self.row {
            return (cursor, here);
        }
        if cursor.row > self.row || cursor.col > self.col {
            return (here, cursor);
        }
        (cursor, here)
    }

    /// Rows of the iterator and the buffer cursor, in document order.
    pub fn y_bounds(&self) -> (usize, usize) {
        let cursor_row = self.buf.cursor.row;
        if cursor_row < self.row {
            (cursor_row, self.row)
        } else {
            (self.row, cursor_row)
        }
    }
}
