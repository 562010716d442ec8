//! Style bitmask, style markers and the walker that replays them against
//! the text during rendering.

use std::ops::{BitOr, BitOrAssign, Range};

/// Set of markdown styles active at a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MdStyle(u16);

impl MdStyle {
    pub const NONE: MdStyle = MdStyle(0);
    // blocks
    pub const HEADING: MdStyle = MdStyle(1 << 0);
    pub const BLOCKQUOTE: MdStyle = MdStyle(1 << 1);
    pub const CODE_BLOCK: MdStyle = MdStyle(1 << 2);
    pub const THEMATIC_BREAK: MdStyle = MdStyle(1 << 3);
    // inlines
    pub const ITALIC: MdStyle = MdStyle(1 << 4);
    pub const STRONG: MdStyle = MdStyle(1 << 5);
    pub const CODE_SPAN: MdStyle = MdStyle(1 << 6);
    pub const LIST_MARKER: MdStyle = MdStyle(1 << 7);
    pub const LINK_URL: MdStyle = MdStyle(1 << 8);

    pub const fn from_bits(bits: u16) -> Self {
        MdStyle(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: MdStyle) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn with(self, other: MdStyle) -> Self {
        MdStyle(self.0 | other.0)
    }

    pub const fn without(self, other: MdStyle) -> Self {
        MdStyle(self.0 & !other.0)
    }

    pub fn remove(&mut self, other: MdStyle) {
        *self = self.without(other);
    }
}

impl BitOr for MdStyle {
    type Output = MdStyle;

    fn bitor(self, rhs: MdStyle) -> MdStyle {
        self.with(rhs)
    }
}

impl BitOrAssign for MdStyle {
    fn bitor_assign(&mut self, rhs: MdStyle) {
        *self = self.with(rhs);
    }
}

/// Styles to apply from `(row, col)` until the next marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleMark {
    pub row: usize,
    pub col: usize,
    pub value: MdStyle,
}

/// Markers in `(row, col)` order. Several markers may share a position; the
/// last one wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMarks {
    marks: Vec<StyleMark>,
}

impl StyleMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: usize, col: usize, value: MdStyle) {
        self.marks.push(StyleMark { row, col, value });
    }

    pub fn as_slice(&self) -> &[StyleMark] {
        &self.marks
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleMark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Index of the first marker at or after `(row, col)`.
    pub fn find_start(&self, row: usize, col: usize) -> usize {
        self.marks
            .partition_point(|m| (m.row, m.col) < (row, col))
    }

    /// Styles in effect at `(row, col)`.
    pub fn style_at(&self, row: usize, col: usize) -> MdStyle {
        let end = self
            .marks
            .partition_point(|m| (m.row, m.col) <= (row, col));
        end.checked_sub(1)
            .map(|i| self.marks[i].value)
            .unwrap_or_default()
    }

    /// Walker positioned at the start of `row`.
    pub fn walker(&self, row: usize) -> StyleWalker<'_> {
        let index = self.find_start(row, 0);
        let current = index
            .checked_sub(1)
            .map(|i| self.marks[i].value)
            .unwrap_or_default();
        StyleWalker {
            marks: &self.marks,
            index,
            current,
            degraded: false,
        }
    }
}

/// Replays markers row by row, in lock-step with the text.
#[derive(Clone, Debug)]
pub struct StyleWalker<'a> {
    marks: &'a [StyleMark],
    index: usize,
    current: MdStyle,
    degraded: bool,
}

impl StyleWalker<'_> {
    /// A marker pointed past the end of its row; the rest of the pass is
    /// unstyled.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Split `row` (of `line_len` bytes) into styled segments. Rows must be
    /// requested in increasing order.
    pub fn row_segments(&mut self, row: usize, line_len: usize) -> Vec<(Range<usize>, MdStyle)> {
        if self.degraded {
            return plain(line_len);
        }
        while let Some(m) = self.marks.get(self.index) {
            if m.row >= row {
                break;
            }
            self.current = m.value;
            self.index += 1;
        }

        let mut segments = Vec::new();
        let mut begin = 0;
        loop {
            while let Some(m) = self.marks.get(self.index) {
                if m.row != row || m.col > begin {
                    break;
                }
                self.current = m.value;
                self.index += 1;
            }
            if begin >= line_len {
                break;
            }
            let end = match self.marks.get(self.index) {
                Some(m) if m.row == row => m.col,
                _ => line_len,
            };
            if end > line_len {
                log::warn!(
                    "style marker at {}:{} is past the end of a {}-byte line, dropping styles",
                    row,
                    end,
                    line_len
                );
                self.degraded = true;
                self.current = MdStyle::NONE;
                return plain(line_len);
            }
            segments.push((begin..end, self.current));
            begin = end;
        }
        segments
    }
}

fn plain(line_len: usize) -> Vec<(Range<usize>, MdStyle)> {
    if line_len == 0 {
        Vec::new()
    } else {
        vec![(0..line_len, MdStyle::NONE)]
    }
}
