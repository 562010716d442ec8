//! Integration tests for rendering the editor view and the app frame

use ratatui::{
    backend::TestBackend,
    layout::{Position, Rect},
    style::{Color, Modifier},
    Terminal,
};

use mdedit::buffer::Buffer;
use mdedit::config::Config;
use mdedit::highlight::{Highlighter, MarkdownHighlighter, MdStyle, StyleMarks};
use mdedit::widgets::{EditorView, Theme};
use mdedit::App;

fn highlighted(text: &str) -> (Buffer, StyleMarks) {
    let buffer = Buffer::from_text(text.as_bytes());
    let marks = MarkdownHighlighter::new().highlight(&buffer);
    (buffer, marks)
}

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    (0..buf.area.width)
        .map(|x| buf[(x, y)].symbol())
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[test]
fn test_render_rows_with_absolute_numbers() {
    let (buffer, marks) = highlighted("# Hi\nplain");
    let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();

    terminal
        .draw(|f| {
            let view = EditorView::new(&buffer, &marks).line_numbers(true, false);
            f.render_widget(view, f.area());
        })
        .unwrap();

    assert_eq!(row_text(&terminal, 0), "1 # Hi");
    assert_eq!(row_text(&terminal, 1), "2 plain");
    assert_eq!(row_text(&terminal, 2), "~");
    assert_eq!(row_text(&terminal, 3), "~");
}

#[test]
fn test_relative_numbers_follow_cursor() {
    let (mut buffer, marks) = highlighted("a\nb\nc");
    buffer.set_cursor(mdedit::Position::new(1, 0));
    let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();

    terminal
        .draw(|f| f.render_widget(EditorView::new(&buffer, &marks), f.area()))
        .unwrap();

    assert_eq!(row_text(&terminal, 0), "1 a");
    assert_eq!(row_text(&terminal, 1), "2 b");
    assert_eq!(row_text(&terminal, 2), "1 c");
}

#[test]
fn test_styles_reach_cells() {
    let (buffer, marks) = highlighted("# Hi\n`x` *y*");
    let mut terminal = Terminal::new(TestBackend::new(20, 2)).unwrap();

    terminal
        .draw(|f| {
            let view = EditorView::new(&buffer, &marks).line_numbers(false, false);
            f.render_widget(view, f.area());
        })
        .unwrap();

    let buf = terminal.backend().buffer();
    let heading = &buf[(0, 0)];
    assert_eq!(heading.symbol(), "#");
    assert_eq!(heading.fg, Color::Yellow);
    assert!(heading.modifier.contains(Modifier::BOLD));

    let code = &buf[(1, 1)];
    assert_eq!(code.symbol(), "x");
    assert_eq!(code.fg, Color::Green);

    let italic = &buf[(5, 1)];
    assert_eq!(italic.symbol(), "y");
    assert!(italic.modifier.contains(Modifier::ITALIC));

    let plain = &buf[(3, 1)];
    assert!(plain.modifier.is_empty());
}

#[test]
fn test_gutter_width() {
    let (buffer, marks) = highlighted(&"x\n".repeat(120));

    assert_eq!(EditorView::new(&buffer, &marks).gutter_width(), 4);
    assert_eq!(
        EditorView::new(&buffer, &marks)
            .line_numbers(false, false)
            .gutter_width(),
        0
    );
}

#[test]
fn test_cursor_position() {
    let (mut buffer, marks) = highlighted("first\nsecond");
    buffer.set_cursor(mdedit::Position::new(1, 3));
    let view = EditorView::new(&buffer, &marks);

    assert_eq!(
        view.cursor_position(Rect::new(0, 0, 20, 4)),
        Some(Position::new(5, 1))
    );
    assert_eq!(
        view.cursor_position(Rect::new(2, 1, 20, 4)),
        Some(Position::new(7, 2))
    );
    assert_eq!(view.cursor_position(Rect::new(0, 0, 4, 4)), None);
    assert_eq!(view.cursor_position(Rect::new(0, 0, 20, 1)), None);
}

#[test]
fn test_theme_styles() {
    let theme = Theme::default();

    let heading = theme.style_for(MdStyle::HEADING);
    assert_eq!(heading.fg, Some(Color::Yellow));
    assert!(heading.add_modifier.contains(Modifier::BOLD));

    let quoted_code = theme.style_for(MdStyle::BLOCKQUOTE | MdStyle::CODE_SPAN);
    assert_eq!(quoted_code.fg, Some(Color::Green));

    assert_eq!(theme.style_for(MdStyle::NONE), Default::default());
}

#[test]
fn test_app_frame() {
    let mut app = App::new(Config::default());
    app.editor_mut().set_text(b"# Title\nbody");
    let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();

    terminal.draw(|f| app.render(f)).unwrap();

    assert_eq!(row_text(&terminal, 0), "1 # Title");
    assert_eq!(row_text(&terminal, 1), "1 body");
    assert_eq!(row_text(&terminal, 3), "~");
    let status = row_text(&terminal, 4);
    assert!(status.contains("NORMAL"));
    assert!(status.contains("untitled"));
    assert!(status.contains("1:1"));

    assert_eq!(app.editor().buffer().viewport().h, 4);
    assert_eq!(app.editor().buffer().viewport().w, 30);
}
