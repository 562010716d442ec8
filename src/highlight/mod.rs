//! # Markdown Highlighting
//!
//! A single forward pass over the buffer that emits [`StyleMark`]s: every
//! row gets a column-0 marker carrying the block state inherited from the
//! rows above, followed by markers wherever an inline style opens or closes.
//!
//! The scanner is deliberately small. It knows ATX headings, blockquotes,
//! fenced code blocks, thematic breaks, list markers, `*`/`_` emphasis,
//! backtick code spans and the url part of inline links. It does not try to
//! be a CommonMark parser.

pub mod style;

pub use style::{MdStyle, StyleMark, StyleMarks, StyleWalker};

use crate::buffer::{Buffer, Line};

/// Turns buffer content into style markers. The editor owns one behind a
/// trait object so hosts can swap in their own.
pub trait Highlighter {
    fn highlight(&self, buf: &Buffer) -> StyleMarks;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownHighlighter;

impl MarkdownHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for MarkdownHighlighter {
    fn highlight(&self, buf: &Buffer) -> StyleMarks {
        let lines = buf.lines();
        let mut out = StyleMarks::new();
        let mut state = ScanState::default();
        let mut row = 0;
        while row < lines.len() {
            row = match state.scan_line(row, lines[row].text(), &mut out) {
                LineOutcome::Done => row + 1,
                LineOutcome::OpenFence => scan_fence(state.marks, row + 1, lines, &mut out),
            };
        }
        out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum BlockquoteState {
    #[default]
    None,
    /// The `>` has been seen on this row.
    Started,
    /// Quote content has started; a blank row ends the quote.
    PastMarker,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum CodeSpanState {
    #[default]
    None,
    Single,
    Double,
}

/// An open emphasis run and the delimiter byte that opened it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum EmphasisState {
    #[default]
    None,
    Active(u8),
}

#[derive(Debug, Default)]
struct ScanState {
    marks: MdStyle,
    maybe_heading: bool,
    blockquote: BlockquoteState,
    code_span: CodeSpanState,
    italic: EmphasisState,
    strong: EmphasisState,
}

enum LineOutcome {
    Done,
    /// A code fence opened on this row.
    OpenFence,
}

fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Three or more of the same `-`, `*` or `_`, optionally spaced, alone on
/// the row.
fn is_thematic_break(content: &[u8]) -> bool {
    let Some(&marker) = content.first() else {
        return false;
    };
    if !matches!(marker, b'-' | b'*' | b'_') {
        return false;
    }
    let mut count = 0;
    for &c in content {
        if c == marker {
            count += 1;
        } else if !is_blank(c) {
            return false;
        }
    }
    count >= 3
}

fn trimmed(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|&c| !is_blank(c)).unwrap_or(line.len());
    let end = line.iter().rposition(|&c| !is_blank(c)).map_or(start, |i| i + 1);
    &line[start..end]
}

/// Mark rows from `row` up to and including the closing fence as code.
/// Returns the first row after the block.
fn scan_fence(marks: MdStyle, mut row: usize, lines: &[Line], out: &mut StyleMarks) -> usize {
    let code = marks | MdStyle::CODE_BLOCK;
    while row < lines.len() {
        out.push(row, 0, code);
        let closes = trimmed(lines[row].text()) == b"```";
        row += 1;
        if closes {
            break;
        }
    }
    row
}

/// Push a closing marker only when it still lands inside the row.
fn push_within(out: &mut StyleMarks, row: usize, col: usize, len: usize, value: MdStyle) {
    if col < len {
        out.push(row, col, value);
    }
}

impl ScanState {
    fn scan_line(&mut self, row: usize, line: &[u8], out: &mut StyleMarks) -> LineOutcome {
        let len = line.len();
        if len == 0 && self.blockquote == BlockquoteState::PastMarker {
            self.marks.remove(MdStyle::BLOCKQUOTE);
            self.blockquote = BlockquoteState::None;
        }
        self.marks.remove(MdStyle::HEADING);
        self.maybe_heading = false;
        out.push(row, 0, self.marks);

        let start = line.iter().position(|&c| !is_blank(c)).unwrap_or(len);
        if is_thematic_break(&line[start..]) {
            out.push(row, start, self.marks | MdStyle::THEMATIC_BREAK);
            return LineOutcome::Done;
        }

        let mut col = start;
        while col < len {
            let c = line[col];
            if self.blockquote == BlockquoteState::Started && !is_blank(c) && c != b'>' {
                self.blockquote = BlockquoteState::PastMarker;
            }

            if col == start {
                match c {
                    b'#' => self.maybe_heading = true,
                    b'>' => {
                        self.marks |= MdStyle::BLOCKQUOTE;
                        self.blockquote = BlockquoteState::Started;
                        out.push(row, col, self.marks);
                    }
                    b'*' | b'+' | b'-' if col + 2 < len && line[col + 1] == b' ' => {
                        out.push(row, col, self.marks | MdStyle::LIST_MARKER);
                        out.push(row, col + 1, self.marks);
                        col += 2;
                        continue;
                    }
                    b'0'..=b'9' => {
                        let digits = line[col..].iter().take_while(|c| c.is_ascii_digit()).count();
                        let dot = col + digits;
                        if line.get(dot) == Some(&b'.')
                            && line.get(dot + 1) == Some(&b' ')
                            && dot + 2 < len
                        {
                            out.push(row, col, self.marks | MdStyle::LIST_MARKER);
                            out.push(row, dot + 1, self.marks);
                            col = dot + 2;
                            continue;
                        }
                    }
                    b'`' if self.code_span == CodeSpanState::None
                        && line[col..].starts_with(b"```") =>
                    {
                        out.push(row, col, self.marks | MdStyle::CODE_BLOCK);
                        return LineOutcome::OpenFence;
                    }
                    _ => {}
                }
            }

            if self.maybe_heading && c != b'#' {
                if c == b' ' {
                    self.marks |= MdStyle::HEADING;
                    out.push(row, start, self.marks);
                }
                self.maybe_heading = false;
            }

            match c {
                b'*' | b'_' if self.code_span == CodeSpanState::None => {
                    col = self.emphasis(row, line, col, out);
                }
                b'`' => col = self.code_span(row, line, col, out),
                b'(' if self.code_span == CodeSpanState::None && col > 0 && line[col - 1] == b']' => {
                    col = self.link_url(row, line, col, out);
                }
                _ => {}
            }
            col += 1;
        }

        // "#" alone on a row is still a heading.
        if self.maybe_heading {
            out.push(row, start, self.marks | MdStyle::HEADING);
            self.maybe_heading = false;
        }
        LineOutcome::Done
    }

    /// Handle a `*`/`_` at `col`. Returns the last column consumed.
    fn emphasis(&mut self, row: usize, line: &[u8], col: usize, out: &mut StyleMarks) -> usize {
        let c = line[col];
        let len = line.len();
        let prev_blank = col == 0 || is_blank(line[col - 1]);
        let next = line.get(col + 1).copied();

        if next == Some(c) {
            match self.strong {
                EmphasisState::None if prev_blank => {
                    if line.get(col + 2).is_some_and(|&n| !is_blank(n)) {
                        self.strong = EmphasisState::Active(c);
                        self.marks |= MdStyle::STRONG;
                        out.push(row, col, self.marks);
                        return col + 1;
                    }
                }
                EmphasisState::Active(d) if d == c && !prev_blank => {
                    self.strong = EmphasisState::None;
                    self.marks.remove(MdStyle::STRONG);
                    push_within(out, row, col + 2, len, self.marks);
                    return col + 1;
                }
                _ => {}
            }
            return col;
        }

        let next_blank = next.map_or(true, is_blank);
        match self.italic {
            EmphasisState::None if prev_blank && !next_blank => {
                self.italic = EmphasisState::Active(c);
                self.marks |= MdStyle::ITALIC;
                out.push(row, col, self.marks);
            }
            EmphasisState::Active(_) if !prev_blank => {
                let closes_strong = matches!(self.strong, EmphasisState::Active(d) if Some(d) == next);
                if next_blank || next.is_some_and(|n| n.is_ascii_punctuation()) || closes_strong {
                    self.italic = EmphasisState::None;
                    self.marks.remove(MdStyle::ITALIC);
                    push_within(out, row, col + 1, len, self.marks);
                }
            }
            _ => {}
        }
        col
    }

    /// Handle a backtick at `col`. Returns the last column consumed.
    fn code_span(&mut self, row: usize, line: &[u8], col: usize, out: &mut StyleMarks) -> usize {
        let len = line.len();
        let doubled = line.get(col + 1) == Some(&b'`');
        match self.code_span {
            CodeSpanState::None => {
                self.marks |= MdStyle::CODE_SPAN;
                out.push(row, col, self.marks);
                if doubled {
                    self.code_span = CodeSpanState::Double;
                    return col + 1;
                }
                self.code_span = CodeSpanState::Single;
                col
            }
            CodeSpanState::Single => {
                self.code_span = CodeSpanState::None;
                self.marks.remove(MdStyle::CODE_SPAN);
                push_within(out, row, col + 1, len, self.marks);
                col
            }
            CodeSpanState::Double if doubled => {
                self.code_span = CodeSpanState::None;
                self.marks.remove(MdStyle::CODE_SPAN);
                push_within(out, row, col + 2, len, self.marks);
                col + 1
            }
            CodeSpanState::Double => col,
        }
    }

    /// `[text](url)`: style the url between the parentheses.
    fn link_url(&mut self, row: usize, line: &[u8], col: usize, out: &mut StyleMarks) -> usize {
        let Some(offset) = line[col + 1..].iter().position(|&c| c == b')') else {
            return col;
        };
        let close = col + 1 + offset;
        if close == col + 1 {
            return close;
        }
        out.push(row, col + 1, self.marks | MdStyle::LINK_URL);
        out.push(row, close, self.marks);
        close
    }
}
