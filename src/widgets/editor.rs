use std::str::FromStr;

use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::{Position as ScreenPosition, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::buffer::Buffer;
use crate::config::UiConfig;
use crate::highlight::{MdStyle, StyleMarks};

/// Colours for the markdown styles, resolved from the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub heading: Color,
    pub blockquote: Color,
    pub code: Color,
    pub list_marker: Color,
    pub line_number: Color,
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

/// Unknown colour names fall back to the terminal default.
fn parse_color(name: &str) -> Color {
    Color::from_str(name).unwrap_or(Color::Reset)
}

impl Theme {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            heading: parse_color(&ui.heading),
            blockquote: parse_color(&ui.blockquote),
            code: parse_color(&ui.code),
            list_marker: parse_color(&ui.list_marker),
            line_number: parse_color(&ui.line_number),
            link: parse_color(&ui.link),
        }
    }

    pub fn style_for(&self, md: MdStyle) -> Style {
        let mut style = Style::default();
        if md.contains(MdStyle::BLOCKQUOTE) {
            style = style.fg(self.blockquote);
        }
        if md.contains(MdStyle::HEADING) {
            style = style.fg(self.heading).add_modifier(Modifier::BOLD);
        }
        if md.contains(MdStyle::THEMATIC_BREAK) {
            style = style.fg(self.line_number);
        }
        if md.contains(MdStyle::LIST_MARKER) {
            style = style.fg(self.list_marker);
        }
        if md.contains(MdStyle::LINK_URL) {
            style = style.fg(self.link).add_modifier(Modifier::UNDERLINED);
        }
        if md.contains(MdStyle::ITALIC) {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if md.contains(MdStyle::STRONG) {
            style = style.add_modifier(Modifier::BOLD);
        }
        if md.contains(MdStyle::CODE_SPAN) || md.contains(MdStyle::CODE_BLOCK) {
            style = style.fg(self.code);
        }
        style
    }
}

/// Renders the buffer rows inside its viewport with a line-number gutter.
pub struct EditorView<'a> {
    pub buffer: &'a Buffer,
    pub marks: &'a StyleMarks,
    pub theme: Theme,
    pub show_line_numbers: bool,
    pub relative_line_numbers: bool,
}

impl<'a> EditorView<'a> {
    pub fn new(buffer: &'a Buffer, marks: &'a StyleMarks) -> Self {
        Self {
            buffer,
            marks,
            theme: Theme::default(),
            show_line_numbers: true,
            relative_line_numbers: true,
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn line_numbers(mut self, show: bool, relative: bool) -> Self {
        self.show_line_numbers = show;
        self.relative_line_numbers = relative;
        self
    }

    /// Columns taken by the gutter, separator included.
    pub fn gutter_width(&self) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        self.buffer.line_count().max(1).to_string().len() + 1
    }

    fn gutter_label(&self, row: usize) -> String {
        let cursor_row = self.buffer.cursor().row;
        if self.relative_line_numbers && row != cursor_row {
            row.abs_diff(cursor_row).to_string()
        } else {
            (row + 1).to_string()
        }
    }

    /// Screen cell of the cursor, if it falls inside `area`.
    pub fn cursor_position(&self, area: Rect) -> Option<ScreenPosition> {
        let cursor = self.buffer.cursor();
        let view = self.buffer.viewport();
        let row = cursor.row.checked_sub(view.y)?;
        let col = cursor.col.checked_sub(view.x)? + self.gutter_width();
        if row >= area.height as usize || col >= area.width as usize {
            return None;
        }
        Some(ScreenPosition::new(area.x + col as u16, area.y + row as u16))
    }
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let view = self.buffer.viewport();
        let start_row = view.y;
        let end_row = (start_row + area.height as usize).min(self.buffer.line_count());
        let gutter = self.gutter_width();
        let gutter_style = Style::default().fg(self.theme.line_number);

        let mut walker = self.marks.walker(start_row);
        let mut lines = Vec::with_capacity(area.height as usize);

        for row in start_row..end_row {
            let mut spans = Vec::new();
            if gutter > 0 {
                spans.push(Span::styled(
                    format!("{:>width$} ", self.gutter_label(row), width = gutter - 1),
                    gutter_style,
                ));
            }
            let text = self.buffer.line(row).map(|l| l.text()).unwrap_or_default();
            for (range, md) in walker.row_segments(row, text.len()) {
                let slice = text.get(range.start.max(view.x)..range.end).unwrap_or_default();
                if slice.is_empty() {
                    continue;
                }
                spans.push(Span::styled(
                    String::from_utf8_lossy(slice).into_owned(),
                    self.theme.style_for(md),
                ));
            }
            lines.push(Line::from(spans));
        }

        // Rows past the end of the document.
        while lines.len() < area.height as usize {
            lines.push(Line::from(Span::styled("~", gutter_style)));
        }

        Paragraph::new(lines).render(area, buf);
    }
}
