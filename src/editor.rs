//! # Editor Controller
//!
//! Owns the buffer, the mode state machine and the highlighter. Input events
//! come in through [`Editor::process_event`]; in Normal mode text is folded
//! into a [`CommandAccumulator`] and completed commands are dispatched to
//! buffer primitives, in Insert mode text goes straight into the buffer.
//!
//! Two flags are exposed to the host, both edge-triggered and cleared when
//! read: [`Editor::save_requested`] and [`Editor::has_changed`].

use std::collections::VecDeque;

use log::debug;

use crate::buffer::{BufIter, Buffer, Direction, EolPolicy, Line, Position, PrefCol};
use crate::command::{
    Command, CommandAccumulator, Feed, Modifier, Motion, Operator, SimpleCommand, TextObjectScope,
};
use crate::config::EditorConfig;
use crate::highlight::{Highlighter, MarkdownHighlighter, StyleMarks};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    // Declared for parity with vi; no transitions lead here yet.
    InsertNormal,
    Visual,
    VisualLine,
    VisualBlock,
    Command,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::InsertNormal => "(INSERT)",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "V-LINE",
            Mode::VisualBlock => "V-BLOCK",
            Mode::Command => "COMMAND",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyName {
    Backspace,
    Delete,
    Enter,
    Escape,
    Char(char),
}

/// A non-text key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub name: KeyName,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(name: KeyName) -> Self {
        Self {
            name,
            modifiers: Modifiers::NONE,
        }
    }

    /// Ctrl chord. Letters are stored upper-case.
    pub fn ctrl(c: char) -> Self {
        Self {
            name: KeyName::Char(c.to_ascii_uppercase()),
            modifiers: Modifiers::CTRL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Text(String),
    Key(KeyPress),
}

impl InputEvent {
    pub fn text(s: &str) -> Self {
        InputEvent::Text(s.to_string())
    }

    pub fn key(name: KeyName) -> Self {
        InputEvent::Key(KeyPress::new(name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Addition,
    Deletion,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeContent {
    /// Text inside or across lines, rows joined by `\n`.
    Bytes(Vec<u8>),
    /// Whole rows.
    Lines(Vec<Line>),
}

/// Content delta produced by an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub from: Position,
    pub content: ChangeContent,
}

impl Change {
    fn deleted_bytes(from: Position, bytes: Vec<u8>) -> Self {
        Self {
            kind: ChangeKind::Deletion,
            from,
            content: ChangeContent::Bytes(bytes),
        }
    }

    fn deleted_lines(from: Position, lines: Vec<Line>) -> Self {
        Self {
            kind: ChangeKind::Deletion,
            from,
            content: ChangeContent::Lines(lines),
        }
    }

    /// Nothing was added or removed.
    pub fn is_empty(&self) -> bool {
        match &self.content {
            ChangeContent::Bytes(bytes) => bytes.is_empty(),
            ChangeContent::Lines(lines) => lines.is_empty(),
        }
    }
}

/// History entry: the command that ran and what it did to the text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    pub command: Option<Command>,
    pub change: Option<Change>,
}

pub struct Editor {
    buf: Buffer,
    mode: Mode,
    pending: CommandAccumulator,
    /// Insert session in progress.
    active: Option<Action>,
    history: VecDeque<Action>,
    history_limit: usize,
    scroll_lines: usize,
    highlighter: Box<dyn Highlighter>,
    styles: StyleMarks,
    req_save: bool,
    changed: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Box::new(MarkdownHighlighter), &EditorConfig::default())
    }
}

impl Editor {
    pub fn new(highlighter: Box<dyn Highlighter>, config: &EditorConfig) -> Self {
        let buf = Buffer::new();
        let styles = highlighter.highlight(&buf);
        Self {
            buf,
            mode: Mode::Normal,
            pending: CommandAccumulator::new(),
            active: None,
            history: VecDeque::new(),
            history_limit: config.history_limit,
            scroll_lines: config.scroll_lines.max(1),
            highlighter,
            styles,
            req_save: false,
            changed: false,
        }
    }

    /// Replace the document. Loading content does not count as a change.
    pub fn set_text(&mut self, data: &[u8]) {
        self.buf.set_text(data);
        self.buf.clamp_cursor_normal();
        self.buf.mv_view_into_cursor();
        self.styles = self.highlighter.highlight(&self.buf);
    }

    pub fn text(&self) -> Vec<u8> {
        self.buf.text()
    }

    /// Insert `txt` verbatim at the cursor, whatever the mode. `\n` splits
    /// lines.
    pub fn insert_text(&mut self, txt: &str) {
        if txt.is_empty() {
            return;
        }
        for (i, part) in txt.split('\n').enumerate() {
            if i > 0 {
                self.buf.insert_new_line();
            }
            self.buf.insert(part);
        }
        if let Some(Change {
            kind: ChangeKind::Addition,
            content: ChangeContent::Bytes(bytes),
            ..
        }) = self.active.as_mut().and_then(|a| a.change.as_mut())
        {
            bytes.extend_from_slice(txt.as_bytes());
        }
        self.text_changed();
        self.buf.mv_view_into_cursor();
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match self.mode {
            Mode::Normal => self.normal_event(event),
            Mode::Insert => self.insert_event(event),
            mode => debug!("ignoring input in {:?} mode", mode),
        }
        self.buf.mv_view_into_cursor();
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        self.buf.cursor().to_tuple()
    }

    /// Re-run the highlighter over the current content.
    pub fn highlight(&mut self) -> &StyleMarks {
        self.styles = self.highlighter.highlight(&self.buf);
        &self.styles
    }

    /// Marks from the last text change.
    pub fn style_marks(&self) -> &StyleMarks {
        &self.styles
    }

    /// Whether a save was requested since the last call.
    pub fn save_requested(&mut self) -> bool {
        std::mem::take(&mut self.req_save)
    }

    /// Whether the text changed since the last call.
    pub fn has_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buf
    }

    pub fn set_viewport_size(&mut self, w: usize, h: usize) {
        self.buf.set_viewport_size(w, h);
        self.buf.mv_view_into_cursor();
    }

    pub fn history(&self) -> &VecDeque<Action> {
        &self.history
    }

    /// Keys typed towards a command that is not complete yet.
    pub fn has_pending_command(&self) -> bool {
        !self.pending.is_empty()
    }

    fn text_changed(&mut self) {
        self.styles = self.highlighter.highlight(&self.buf);
        self.changed = true;
    }

    fn record(&mut self, action: Action) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(action);
    }

    fn ctrl_chord(&mut self, c: char) {
        match c.to_ascii_uppercase() {
            'S' => self.req_save = true,
            'E' if self.mode == Mode::Normal => self.buf.scroll_view(self.scroll_lines as isize),
            'Y' if self.mode == Mode::Normal => {
                self.buf.scroll_view(-(self.scroll_lines as isize))
            }
            'R' if self.mode == Mode::Normal => debug!("redo is not supported"),
            _ => {}
        }
    }

    // ---- Normal mode ----

    fn normal_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(key) if key.modifiers.ctrl => {
                if let KeyName::Char(c) = key.name {
                    self.ctrl_chord(c);
                }
            }
            InputEvent::Key(key) => match key.name {
                KeyName::Delete => {
                    if self.pending.is_empty() {
                        self.exec(Command::Simple {
                            cmd: SimpleCommand::DeleteChar,
                            count: 0,
                        });
                    } else {
                        self.pending.reset();
                    }
                }
                KeyName::Escape => self.pending.reset(),
                KeyName::Char(c) => self.feed(c),
                KeyName::Backspace | KeyName::Enter => {}
            },
            InputEvent::Text(txt) => {
                for (i, c) in txt.char_indices() {
                    if self.mode != Mode::Normal {
                        // The command switched modes; the rest is typed text.
                        self.insert_event(&InputEvent::text(&txt[i..]));
                        return;
                    }
                    self.feed(c);
                }
            }
        }
    }

    fn feed(&mut self, key: char) {
        match self.pending.feed(key) {
            Feed::Complete(cmd) => self.exec(cmd),
            Feed::Pending => {}
            Feed::Discarded => debug!("discarded command sequence ending in {:?}", key),
        }
    }

    fn exec(&mut self, cmd: Command) {
        match cmd {
            Command::Motion { motion, count } => self.move_cursor(motion, count),
            Command::Operator {
                op: Operator::Yank,
                ..
            } => debug!("yank is not supported: {:?}", cmd),
            Command::Operator { op, motion, count } => self.operate(cmd, op, motion, count),
            Command::Simple { cmd: simple, count } => self.simple(cmd, simple, count),
            Command::Modified {
                modifier: Modifier::G,
                key: ' ',
            } => {
                if self.buf.toggle_check_item() {
                    self.text_changed();
                }
            }
            Command::Modified { .. } => debug!("unhandled command {:?}", cmd),
        }
    }

    fn move_cursor(&mut self, motion: Motion, count: usize) {
        let n = count.max(1);
        let mut it = BufIter::new(&self.buf);
        match motion {
            Motion::Left => it.seek_by_x(-(n as isize)),
            Motion::Right => it.seek_by_x(n as isize),
            Motion::Down => it.seek_by_y(n as isize),
            Motion::Up => it.seek_by_y(-(n as isize)),
            Motion::LineStart => it.seek_line_start(),
            Motion::LineEnd => it.seek_line_end(),
            Motion::WordStart => it.seek_by_word_start(n, Direction::Forward),
            Motion::WordBack => it.seek_by_word_start(n, Direction::Backward),
            Motion::WordEnd => it.seek_by_word_end(n),
            Motion::ViewTop => it.seek_nth_line_from_top(count.saturating_sub(1)),
            Motion::ViewBottom => it.seek_nth_line_from_bot(count.saturating_sub(1)),
            Motion::Line | Motion::Word(_) => return,
        }
        let (pos, pref_col) = (it.position(), it.pref_col());
        self.buf.set_cursor(pos);
        self.buf.set_pref_col(pref_col);
    }

    fn simple(&mut self, cmd: Command, simple: SimpleCommand, count: usize) {
        match simple {
            SimpleCommand::Insert => self.enter_insert(cmd),
            SimpleCommand::Append => {
                self.buf.cursor_right();
                self.enter_insert(cmd);
            }
            SimpleCommand::InsertLineStart => {
                self.buf.cursor_to_line_start();
                self.enter_insert(cmd);
            }
            SimpleCommand::AppendLineEnd => {
                self.buf.cursor_to_line_end();
                self.enter_insert(cmd);
            }
            SimpleCommand::OpenBelow | SimpleCommand::OpenAbove => {
                self.buf
                    .start_new_line(simple == SimpleCommand::OpenBelow);
                self.text_changed();
                self.enter_insert(cmd);
            }
            SimpleCommand::DeleteChar => {
                let from = self.buf.cursor();
                let len = self.buf.current_line_len();
                if len == 0 {
                    return;
                }
                let col = from.col.min(len - 1);
                let removed = self.buf.delete_in_line(from.row, col..col + count.max(1));
                self.buf.set_cursor(Position::new(from.row, col));
                self.buf.clamp_cursor_normal();
                self.buf.set_pref_col(PrefCol::Col(self.buf.cursor().col));
                self.record(Action {
                    command: Some(cmd),
                    change: Some(Change::deleted_bytes(Position::new(from.row, col), removed)),
                });
                self.text_changed();
            }
            SimpleCommand::ChangeToLineEnd => {
                let from = self.buf.cursor();
                let removed = self.buf.trunc_current_line_from_cursor();
                self.record(Action {
                    command: Some(cmd),
                    change: Some(Change::deleted_bytes(from, removed)),
                });
                self.text_changed();
                self.enter_insert(cmd);
            }
            SimpleCommand::SubstituteLine => {
                let removed = self.buf.trunc_current_line_from_start();
                let from = self.buf.cursor();
                self.record(Action {
                    command: Some(cmd),
                    change: Some(Change::deleted_bytes(from, removed)),
                });
                self.text_changed();
                self.enter_insert(cmd);
            }
            SimpleCommand::Undo => debug!("undo is not supported"),
            SimpleCommand::Repeat => debug!("repeat is not supported"),
        }
    }

    fn operate(&mut self, cmd: Command, op: Operator, motion: Motion, count: usize) {
        let change = match self.delete_motion(op, motion, count) {
            Some(change) if !change.is_empty() => change,
            _ => {
                // Empty range: the text is untouched, but `c` still starts
                // an insert.
                if op == Operator::Change {
                    self.enter_insert(cmd);
                }
                return;
            }
        };
        if op == Operator::Delete {
            self.buf.clamp_cursor_normal();
            self.buf.set_pref_col(PrefCol::Col(self.buf.cursor().col));
        }
        self.record(Action {
            command: Some(cmd),
            change: Some(change),
        });
        self.text_changed();
        if op == Operator::Change {
            self.enter_insert(cmd);
        }
    }

    /// Remove the range `motion` covers from the cursor. Cursor lands at the
    /// start of the removed range with insert-style bounds.
    fn delete_motion(&mut self, op: Operator, motion: Motion, count: usize) -> Option<Change> {
        let n = count.max(1);
        let start = self.buf.cursor();
        let row = start.row;

        let change = match motion {
            Motion::LineStart => {
                let removed = self.buf.delete_in_line(row, 0..start.col);
                let from = Position::new(row, 0);
                self.buf.set_cursor(from);
                Change::deleted_bytes(from, removed)
            }
            Motion::LineEnd => {
                let removed = self.buf.trunc_current_line_from_cursor();
                Change::deleted_bytes(self.buf.cursor(), removed)
            }
            Motion::Left => {
                let mut it = BufIter::new(&self.buf);
                it.seek_by_x(-(n as isize));
                let from = Position::new(row, it.position().col);
                let removed = self.buf.delete_in_line(row, from.col..start.col);
                self.buf.set_cursor(from);
                Change::deleted_bytes(from, removed)
            }
            Motion::Right => {
                let mut it = BufIter::new(&self.buf).with_policy(EolPolicy::Inclusive);
                it.seek_by_x(n as isize);
                let end = it.position().col;
                let removed = self.buf.delete_in_line(row, start.col..end);
                Change::deleted_bytes(start, removed)
            }
            Motion::WordStart
                if op == Operator::Change
                    && self
                        .buf
                        .current_line()
                        .char_at(start.col)
                        .is_some_and(|c| !crate::buffer::is_space(c)) =>
            {
                // cw on a word stops at the end of that word, even when the
                // cursor already sits on its last byte.
                let span = self.buf.current_line().word_span(start.col, false);
                let mut end = Position::new(row, span.end - 1);
                if n > 1 {
                    let mut it = BufIter::new(&self.buf).with_position(end);
                    it.seek_by_word_end(n - 1);
                    end = it.position();
                }
                let removed = self
                    .buf
                    .delete_block(start, Position::new(end.row, end.col + 1));
                Change::deleted_bytes(start, removed)
            }
            Motion::WordStart => {
                let mut it = BufIter::new(&self.buf).with_policy(EolPolicy::Inclusive);
                it.seek_by_word_start(n, Direction::Forward);
                let (p1, p2) = it.bounds();
                let removed = self.buf.delete_block(p1, p2);
                Change::deleted_bytes(p1, removed)
            }
            Motion::WordBack => {
                let mut it = BufIter::new(&self.buf);
                it.seek_by_word_start(n, Direction::Backward);
                let (p1, p2) = it.bounds();
                let removed = self.buf.delete_block(p1, p2);
                Change::deleted_bytes(p1, removed)
            }
            Motion::WordEnd => {
                let mut it = BufIter::new(&self.buf);
                it.seek_by_word_end(n);
                let end = it.position();
                let removed = self
                    .buf
                    .delete_block(start, Position::new(end.row, end.col + 1));
                Change::deleted_bytes(start, removed)
            }
            Motion::Down | Motion::Up | Motion::ViewTop | Motion::ViewBottom => {
                let mut it = BufIter::new(&self.buf);
                match motion {
                    Motion::Down => it.seek_by_y(n as isize),
                    Motion::Up => it.seek_by_y(-(n as isize)),
                    Motion::ViewTop => it.seek_nth_line_from_top(count.saturating_sub(1)),
                    _ => it.seek_nth_line_from_bot(count.saturating_sub(1)),
                }
                let vertical = matches!(motion, Motion::Down | Motion::Up);
                if vertical && it.position().row == row {
                    return None;
                }
                let (y1, y2) = it.y_bounds();
                self.delete_rows(op, y1, y2)
            }
            Motion::Line => self.delete_rows(op, row, row + n - 1),
            Motion::Word(scope) => {
                let span = self
                    .buf
                    .current_line()
                    .word_span(start.col, scope == TextObjectScope::Around);
                let from = Position::new(row, span.start);
                let removed = self.buf.delete_in_line(row, span);
                self.buf.set_cursor(from);
                Change::deleted_bytes(from, removed)
            }
        };
        Some(change)
    }

    /// Linewise removal. The change operator keeps the first row, emptied
    /// down to its indentation, as the line to type into.
    fn delete_rows(&mut self, op: Operator, y1: usize, y2: usize) -> Change {
        let from = Position::new(y1, 0);
        if op != Operator::Change {
            let removed = self.buf.delete_lines(y1, y2);
            return Change::deleted_lines(from, removed);
        }
        let tail = if y2 > y1 {
            self.buf.delete_lines(y1 + 1, y2)
        } else {
            Vec::new()
        };
        self.buf.set_cursor(from);
        let first = self.buf.trunc_current_line_from_start();
        let mut removed = vec![Line::from_bytes(&first)];
        removed.extend(tail);
        Change::deleted_lines(from, removed)
    }

    // ---- Insert mode ----

    fn enter_insert(&mut self, cmd: Command) {
        self.mode = Mode::Insert;
        self.active = Some(Action {
            command: Some(cmd),
            change: Some(Change {
                kind: ChangeKind::Addition,
                from: self.buf.cursor(),
                content: ChangeContent::Bytes(Vec::new()),
            }),
        });
    }

    fn exit_insert(&mut self) {
        let cursor = self.buf.cursor();
        let col = cursor.col.saturating_sub(1);
        self.buf.set_cursor(Position::new(cursor.row, col));
        self.buf.set_pref_col(PrefCol::Col(col));
        self.mode = Mode::Normal;
        if let Some(action) = self.active.take() {
            self.record(action);
        }
    }

    fn insert_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Text(txt) => self.insert_text(txt),
            InputEvent::Key(key) if key.modifiers.ctrl => {
                if let KeyName::Char(c) = key.name {
                    self.ctrl_chord(c);
                }
            }
            InputEvent::Key(key) => match key.name {
                KeyName::Escape => self.exit_insert(),
                KeyName::Char(c) => self.insert_text(c.encode_utf8(&mut [0; 4])),
                KeyName::Enter => self.insert_text("\n"),
                KeyName::Backspace => {
                    self.buf.delete_back();
                    if let Some(Change {
                        content: ChangeContent::Bytes(bytes),
                        ..
                    }) = self.active.as_mut().and_then(|a| a.change.as_mut())
                    {
                        bytes.pop();
                    }
                    self.text_changed();
                }
                KeyName::Delete => {
                    self.buf.delete_forward_insert();
                    self.text_changed();
                }
            },
        }
    }
}
