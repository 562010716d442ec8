//! Smoke tests for overall application functionality
//!
//! These are high-level tests that verify the application works end-to-end

use std::fs;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use tempfile::TempDir;

use mdedit::config::Config;
use mdedit::{App, MdStyle, Mode};

fn keys(app: &mut App, keys: &str) {
    for c in keys.chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
}

fn key(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

#[tokio::test]
async fn test_open_edit_save_round() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("todo.md");
    fs::write(&file_path, "# Todo\n- [ ] write tests\n- [ ] ship\n").unwrap();

    let mut app = App::open(&file_path, Config::default()).await.unwrap();
    let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();

    // Tick the first task, drop the second, add a new one.
    keys(&mut app, "jg ");
    keys(&mut app, "jdd");
    keys(&mut app, "o- [ ] release");
    key(&mut app, KeyCode::Esc);
    assert_eq!(app.editor().mode(), Mode::Normal);
    terminal.draw(|f| app.render(f)).unwrap();

    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    app.flush_saves().await.unwrap();

    assert_eq!(
        fs::read_to_string(&file_path).unwrap(),
        "# Todo\n- [x] write tests\n- [ ] release"
    );
    assert!(!app.is_dirty());
}

#[tokio::test]
async fn test_heading_typed_is_highlighted() {
    let mut app = App::new(Config::default());
    keys(&mut app, "i## Section");
    key(&mut app, KeyCode::Enter);
    keys(&mut app, "text");

    let marks = app.editor().style_marks();
    assert!(marks.style_at(0, 3).contains(MdStyle::HEADING));
    assert_eq!(marks.style_at(1, 0), MdStyle::NONE);
}

#[test]
fn test_quit_stops_loop_flag() {
    let mut app = App::new(Config::default());
    assert!(app.running);

    app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
    assert!(!app.running);
}
