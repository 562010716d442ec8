use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::App;
use crate::widgets::editor::EditorView;

impl App {
    /// Main render function for the application UI
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Editor area
                Constraint::Length(1), // Status line
            ])
            .split(f.area());

        self.render_editor(f, chunks[0]);
        self.render_status_line(f, chunks[1]);
    }

    fn render_editor(&mut self, f: &mut Frame, area: Rect) {
        let show = self.config.editor.show_line_numbers;
        let relative = self.config.editor.relative_line_numbers;

        self.editor
            .set_viewport_size(area.width as usize, area.height as usize);

        let view = EditorView::new(self.editor.buffer(), self.editor.style_marks())
            .theme(self.theme)
            .line_numbers(show, relative);
        let cursor = view.cursor_position(area);
        f.render_widget(view, area);
        if let Some(pos) = cursor {
            f.set_cursor_position(pos);
        }
    }

    fn render_status_line(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Paragraph::new(self.status_text()), area);
    }

    /// Mode, document name, 1-based cursor position and the last save
    /// message.
    pub fn status_text(&self) -> Line<'static> {
        let (row, col) = self.editor.cursor_position();
        let name = if self.dirty {
            format!("{} [+]", self.name)
        } else {
            self.name.clone()
        };
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.editor.mode().label()),
                Style::default().fg(Color::Black).bg(Color::LightBlue),
            ),
            Span::raw(format!(" {} ", name)),
            Span::styled(
                format!(" {}:{} ", row + 1, col + 1),
                Style::default().fg(Color::Gray),
            ),
        ];
        if let Some(message) = &self.message {
            let color = if message.is_error() {
                Color::Red
            } else {
                Color::Gray
            };
            spans.push(Span::styled(
                format!(" {}", message.text()),
                Style::default().fg(color),
            ));
        }
        Line::from(spans)
    }
}
