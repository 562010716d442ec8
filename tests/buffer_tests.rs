//! Integration tests for buffer functionality
//!
//! Tests the line storage, cursor clamping and splice primitives

use mdedit::buffer::{BufIter, Buffer, Direction, EolPolicy, Line, Position, PrefCol};

fn lines_of(buffer: &Buffer) -> Vec<String> {
    buffer
        .lines()
        .iter()
        .map(|l| String::from_utf8(l.text().to_vec()).unwrap())
        .collect()
}

fn buffer_at(text: &str, row: usize, col: usize) -> Buffer {
    let mut buffer = Buffer::from_text(text.as_bytes());
    buffer.set_cursor(Position::new(row, col));
    buffer
}

#[test]
fn test_buffer_creation() {
    let buffer = Buffer::new();

    assert_eq!(buffer.line_count(), 1); // Should have one empty line
    assert_eq!(buffer.cursor(), Position::new(0, 0));
    assert_eq!(buffer.pref_col(), PrefCol::Col(0));
    assert!(buffer.text().is_empty());
}

#[test]
fn test_set_text_splits_lines() {
    let buffer = Buffer::from_text(b"one\ntwo\nthree");
    assert_eq!(lines_of(&buffer), vec!["one", "two", "three"]);
    assert_eq!(buffer.text(), b"one\ntwo\nthree");
}

#[test]
fn test_set_text_trailing_newline() {
    let buffer = Buffer::from_text(b"one\ntwo\n");
    assert_eq!(lines_of(&buffer), vec!["one", "two"]);
    assert_eq!(buffer.text(), b"one\ntwo");

    // Only one trailing newline is dropped.
    let buffer = Buffer::from_text(b"one\n\n");
    assert_eq!(lines_of(&buffer), vec!["one", ""]);
}

#[test]
fn test_set_text_empty() {
    let mut buffer = Buffer::from_text(b"abc\ndef");
    buffer.set_cursor(Position::new(1, 2));
    buffer.set_text(b"");

    assert_eq!(buffer.line_count(), 1);
    assert_eq!(buffer.cursor(), Position::new(0, 0));
}

#[test]
fn test_set_cursor_clamps() {
    let mut buffer = Buffer::from_text(b"ab\nlonger line");
    buffer.set_cursor(Position::new(7, 40));
    assert_eq!(buffer.cursor(), Position::new(1, 11));

    buffer.set_cursor(Position::new(0, 40));
    assert_eq!(buffer.cursor(), Position::new(0, 2));
}

#[test]
fn test_insert_advances_cursor() {
    let mut buffer = buffer_at("Hlo", 0, 1);
    buffer.insert("el");

    assert_eq!(lines_of(&buffer), vec!["Hello"]);
    assert_eq!(buffer.cursor(), Position::new(0, 3));
    assert_eq!(buffer.pref_col(), PrefCol::Col(3));
}

#[test]
fn test_insert_new_line_splits() {
    let mut buffer = buffer_at("HiBye", 0, 2);
    buffer.insert_new_line();

    assert_eq!(lines_of(&buffer), vec!["Hi", "Bye"]);
    assert_eq!(buffer.cursor(), Position::new(1, 0));
}

#[test]
fn test_split_then_join_restores_line() {
    let mut buffer = buffer_at("hello world", 0, 5);
    buffer.insert_new_line();
    buffer.delete_back();

    assert_eq!(lines_of(&buffer), vec!["hello world"]);
    assert_eq!(buffer.cursor(), Position::new(0, 5));
}

#[test]
fn test_start_new_line() {
    let mut buffer = buffer_at("a\nb", 0, 0);
    buffer.start_new_line(true);
    assert_eq!(lines_of(&buffer), vec!["a", "", "b"]);
    assert_eq!(buffer.cursor(), Position::new(1, 0));

    buffer.set_cursor(Position::new(0, 1));
    buffer.start_new_line(false);
    assert_eq!(lines_of(&buffer), vec!["", "a", "", "b"]);
    assert_eq!(buffer.cursor(), Position::new(0, 0));
}

#[test]
fn test_backspace_joins_lines() {
    let mut buffer = buffer_at("abc\ndef", 1, 0);
    buffer.delete_back();

    assert_eq!(lines_of(&buffer), vec!["abcdef"]);
    assert_eq!(buffer.cursor(), Position::new(0, 3));
}

#[test]
fn test_backspace_at_buffer_start_is_noop() {
    let mut buffer = buffer_at("abc", 0, 0);
    buffer.delete_back();

    assert_eq!(lines_of(&buffer), vec!["abc"]);
    assert_eq!(buffer.cursor(), Position::new(0, 0));
}

#[test]
fn test_backspace_mid_line() {
    let mut buffer = buffer_at("Hello", 0, 5);
    buffer.delete_back();
    buffer.delete_back();

    assert_eq!(lines_of(&buffer), vec!["Hel"]);
    assert_eq!(buffer.cursor(), Position::new(0, 3));
}

#[test]
fn test_delete_forward_insert_joins_at_eol() {
    let mut buffer = buffer_at("ab\ncd", 0, 2);
    buffer.delete_forward_insert();
    assert_eq!(lines_of(&buffer), vec!["abcd"]);

    // Nothing to join after the last line.
    buffer.set_cursor(Position::new(0, 4));
    buffer.delete_forward_insert();
    assert_eq!(lines_of(&buffer), vec!["abcd"]);
}

#[test]
fn test_delete_forward_normal() {
    let mut buffer = buffer_at("abc", 0, 2);
    assert_eq!(buffer.delete_forward_normal(), Some(b'c'));
    assert_eq!(lines_of(&buffer), vec!["ab"]);
    assert_eq!(buffer.cursor(), Position::new(0, 1));

    let mut empty = Buffer::new();
    assert_eq!(empty.delete_forward_normal(), None);
    assert_eq!(empty.cursor(), Position::new(0, 0));
}

#[test]
fn test_delete_block_same_row() {
    let mut buffer = buffer_at("one two three", 0, 0);
    let removed = buffer.delete_block(Position::new(0, 4), Position::new(0, 8));

    assert_eq!(removed, b"two ");
    assert_eq!(lines_of(&buffer), vec!["one three"]);
    assert_eq!(buffer.cursor(), Position::new(0, 4));
}

#[test]
fn test_delete_block_across_rows() {
    let mut buffer = buffer_at("first\nsecond\nthird", 0, 0);
    // Arguments in either order.
    let removed = buffer.delete_block(Position::new(2, 2), Position::new(0, 3));

    assert_eq!(removed, b"st\nsecond\nth");
    assert_eq!(lines_of(&buffer), vec!["firird"]);
    assert_eq!(buffer.cursor(), Position::new(0, 3));
}

#[test]
fn test_delete_lines_inclusive() {
    let mut buffer = buffer_at("a\nb\nc\nd", 1, 0);
    let removed = buffer.delete_lines(1, 2);

    assert_eq!(removed, vec![Line::from("b"), Line::from("c")]);
    assert_eq!(lines_of(&buffer), vec!["a", "d"]);
    assert_eq!(buffer.cursor(), Position::new(1, 0));
}

#[test]
fn test_delete_all_lines_keeps_one() {
    let mut buffer = buffer_at("a\nb", 1, 0);
    buffer.delete_lines(0, 5);

    assert_eq!(buffer.line_count(), 1);
    assert!(buffer.text().is_empty());
    assert_eq!(buffer.cursor(), Position::new(0, 0));
}

#[test]
fn test_delete_last_line_moves_cursor_up() {
    let mut buffer = buffer_at("keep\ngone", 1, 3);
    buffer.delete_lines(1, 1);

    assert_eq!(lines_of(&buffer), vec!["keep"]);
    assert_eq!(buffer.cursor(), Position::new(0, 3));
}

#[test]
fn test_trunc_from_cursor_and_start() {
    let mut buffer = buffer_at("  indented text", 0, 10);
    assert_eq!(buffer.trunc_current_line_from_cursor(), b" text");
    assert_eq!(lines_of(&buffer), vec!["  indented"]);

    assert_eq!(buffer.trunc_current_line_from_start(), b"indented");
    assert_eq!(lines_of(&buffer), vec!["  "]);
    assert_eq!(buffer.cursor(), Position::new(0, 2));
}

#[test]
fn test_clamp_col_prefers_remembered_column() {
    let mut buffer = buffer_at("short\na much longer line", 1, 12);
    buffer.set_pref_col(PrefCol::Col(12));
    buffer.set_cursor(Position::new(0, 0));

    buffer.clamp_col(true);
    assert_eq!(buffer.cursor().col, 4);
    buffer.clamp_col(false);
    assert_eq!(buffer.cursor().col, 5);

    buffer.set_pref_col(PrefCol::LineEnd);
    buffer.set_cursor(Position::new(1, 0));
    buffer.clamp_col(true);
    assert_eq!(buffer.cursor().col, 17);
}

#[test]
fn test_line_helpers() {
    let line = Line::from("   - [ ] item");
    assert_eq!(line.starting_index(), 3);
    assert_eq!(line.char_at(3), Some(b'-'));
    assert_eq!(line.char_at(100), None);
    assert!(line.char_at_is(5, b"[("));
    assert_eq!(line.word_span(9, false), 9..13);
    assert_eq!(line.word_span(9, true), 8..13);
}

#[test]
fn test_toggle_check_item() {
    let mut buffer = Buffer::from_text(b"- [ ] task\nplain line");

    assert!(buffer.toggle_check_item());
    assert_eq!(lines_of(&buffer)[0], "- [x] task");
    assert!(buffer.toggle_check_item());
    assert_eq!(lines_of(&buffer)[0], "- [ ] task");

    buffer.set_cursor(Position::new(1, 0));
    assert!(!buffer.toggle_check_item());
    assert_eq!(lines_of(&buffer)[1], "plain line");
}

#[test]
fn test_viewport_follows_cursor() {
    let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let mut buffer = Buffer::from_text(text.as_bytes());
    buffer.set_viewport_size(80, 10);

    buffer.set_cursor(Position::new(30, 0));
    buffer.mv_view_into_cursor();
    assert_eq!(buffer.viewport().y, 21);

    buffer.set_cursor(Position::new(5, 0));
    buffer.mv_view_into_cursor();
    assert_eq!(buffer.viewport().y, 5);
}

#[test]
fn test_scroll_view_drags_cursor() {
    let text = (0..50).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let mut buffer = Buffer::from_text(text.as_bytes());
    buffer.set_viewport_size(80, 10);

    buffer.scroll_view(3);
    assert_eq!(buffer.viewport().y, 3);
    assert_eq!(buffer.cursor().row, 3);

    buffer.scroll_view(-10);
    assert_eq!(buffer.viewport().y, 0);
    assert_eq!(buffer.cursor().row, 3);
}

#[test]
fn test_iter_word_start_forward() {
    let buffer = buffer_at("one two three", 0, 0);
    let mut it = BufIter::new(&buffer);
    it.seek_by_word_start(2, Direction::Forward);

    assert_eq!(it.position(), Position::new(0, 8));
    assert_eq!(it.pref_col(), PrefCol::Col(8));
}

#[test]
fn test_iter_word_start_crosses_blank_line() {
    let buffer = buffer_at("word\n\nnext", 0, 0);
    let mut it = BufIter::new(&buffer);
    it.seek_by_word_start(1, Direction::Forward);
    assert_eq!(it.position(), Position::new(1, 0));

    it.seek_by_word_start(1, Direction::Forward);
    assert_eq!(it.position(), Position::new(2, 0));
}

#[test]
fn test_iter_word_start_backward() {
    let buffer = buffer_at("one two three", 0, 10);
    let mut it = BufIter::new(&buffer);
    it.seek_by_word_start(1, Direction::Backward);
    assert_eq!(it.position(), Position::new(0, 8));

    it.seek_by_word_start(2, Direction::Backward);
    assert_eq!(it.position(), Position::new(0, 0));
}

#[test]
fn test_iter_inclusive_stops_at_eol() {
    let buffer = buffer_at("one two", 0, 4);
    let mut it = BufIter::new(&buffer).with_policy(EolPolicy::Inclusive);
    it.seek_by_word_start(1, Direction::Forward);

    assert_eq!(it.position(), Position::new(0, 7));
    assert_eq!(it.bounds(), (Position::new(0, 4), Position::new(0, 7)));
}

#[test]
fn test_iter_word_end() {
    let buffer = buffer_at("one two three", 0, 0);
    let mut it = BufIter::new(&buffer);
    it.seek_by_word_end(1);
    assert_eq!(it.position(), Position::new(0, 2));

    it.seek_by_word_end(1);
    assert_eq!(it.position(), Position::new(0, 6));
}

#[test]
fn test_iter_seek_by_x_keeps_pref_col_when_clamped() {
    let buffer = buffer_at("abcdef", 0, 2);
    let mut it = BufIter::new(&buffer);

    it.seek_by_x(2);
    assert_eq!(it.position().col, 4);
    assert_eq!(it.pref_col(), PrefCol::Col(4));

    it.seek_by_x(10);
    assert_eq!(it.position().col, 5);
    assert_eq!(it.pref_col(), PrefCol::Col(4));

    it.seek_by_x(-10);
    assert_eq!(it.position().col, 0);
    assert_eq!(it.pref_col(), PrefCol::Col(4));
}

#[test]
fn test_iter_seek_by_y_uses_pref_col() {
    let mut buffer = buffer_at("a long line\nab\nanother long line", 0, 8);
    buffer.set_pref_col(PrefCol::Col(8));
    let mut it = BufIter::new(&buffer);

    it.seek_by_y(1);
    assert_eq!(it.position(), Position::new(1, 1));
    it.seek_by_y(1);
    assert_eq!(it.position(), Position::new(2, 8));
    it.seek_by_y(10);
    assert_eq!(it.position(), Position::new(2, 8));
    assert_eq!(it.y_bounds(), (0, 2));
}

#[test]
fn test_iter_view_relative_lines() {
    let text = (0..40).map(|i| format!("row {}", i)).collect::<Vec<_>>().join("\n");
    let mut buffer = Buffer::from_text(text.as_bytes());
    buffer.set_viewport_size(80, 10);
    buffer.set_cursor(Position::new(5, 0));

    let mut it = BufIter::new(&buffer);
    it.seek_nth_line_from_top(2);
    assert_eq!(it.position().row, 2);
    it.seek_nth_line_from_bot(0);
    assert_eq!(it.position().row, 9);
    it.seek_nth_line_from_bot(3);
    assert_eq!(it.position().row, 6);
}
