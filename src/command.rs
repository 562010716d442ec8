//! Normal-mode command grammar.
//!
//! Keys arrive one at a time and are folded into a [`CommandAccumulator`]
//! until they form a complete [`Command`]. Counts, a two-key modifier prefix
//! (`g`, `z`), operators (`c`, `d`, `y`) with their motion or text object,
//! and single-key commands are recognised; anything else discards the
//! pending sequence.

/// Operators that act on the range a motion covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Change,
    Delete,
    Yank,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Operator::Change),
            'd' => Some(Operator::Delete),
            'y' => Some(Operator::Yank),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextObjectScope {
    Inner,
    Around,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// `h`
    Left,
    /// `l` or space
    Right,
    /// `j`
    Down,
    /// `k`
    Up,
    /// `0`
    LineStart,
    /// `$`
    LineEnd,
    /// `w`
    WordStart,
    /// `e`
    WordEnd,
    /// `b`
    WordBack,
    /// `H`
    ViewTop,
    /// `L`
    ViewBottom,
    /// Doubled operator (`dd`, `cc`): whole lines.
    Line,
    /// `iw` / `aw`
    Word(TextObjectScope),
}

impl Motion {
    fn from_char(c: char) -> Option<Self> {
        let motion = match c {
            'h' => Motion::Left,
            'l' | ' ' => Motion::Right,
            'j' => Motion::Down,
            'k' => Motion::Up,
            '0' => Motion::LineStart,
            '$' => Motion::LineEnd,
            'w' => Motion::WordStart,
            'e' => Motion::WordEnd,
            'b' => Motion::WordBack,
            'H' => Motion::ViewTop,
            'L' => Motion::ViewBottom,
            _ => return None,
        };
        Some(motion)
    }
}

/// Single-key commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimpleCommand {
    /// `i`
    Insert,
    /// `a`
    Append,
    /// `I`
    InsertLineStart,
    /// `A`
    AppendLineEnd,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
    /// `x`
    DeleteChar,
    /// `C`
    ChangeToLineEnd,
    /// `S`
    SubstituteLine,
    /// `u`
    Undo,
    /// `.`
    Repeat,
}

impl SimpleCommand {
    fn from_char(c: char) -> Option<Self> {
        let cmd = match c {
            'i' => SimpleCommand::Insert,
            'a' => SimpleCommand::Append,
            'I' => SimpleCommand::InsertLineStart,
            'A' => SimpleCommand::AppendLineEnd,
            'o' => SimpleCommand::OpenBelow,
            'O' => SimpleCommand::OpenAbove,
            'x' => SimpleCommand::DeleteChar,
            'C' => SimpleCommand::ChangeToLineEnd,
            'S' => SimpleCommand::SubstituteLine,
            'u' => SimpleCommand::Undo,
            '.' => SimpleCommand::Repeat,
            _ => return None,
        };
        Some(cmd)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    G,
    Z,
}

/// A complete normal-mode command. A `count` of 0 means no count was typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Motion {
        motion: Motion,
        count: usize,
    },
    Operator {
        op: Operator,
        motion: Motion,
        count: usize,
    },
    Simple {
        cmd: SimpleCommand,
        count: usize,
    },
    Modified {
        modifier: Modifier,
        key: char,
    },
}

impl Command {
    pub fn count(&self) -> usize {
        match *self {
            Command::Motion { count, .. }
            | Command::Operator { count, .. }
            | Command::Simple { count, .. } => count,
            Command::Modified { .. } => 0,
        }
    }

    /// Count with the implicit 1 applied.
    pub fn repeat(&self) -> usize {
        self.count().max(1)
    }
}

/// Where the accumulator is within a key sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ParseState {
    #[default]
    Start,
    Modifier(Modifier),
    OperatorPending(Operator),
    TextObject(Operator, TextObjectScope),
}

/// Result of feeding one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feed {
    /// More keys are needed.
    Pending,
    /// The sequence formed a command; the accumulator is empty again.
    Complete(Command),
    /// The key did not fit; the sequence was dropped.
    Discarded,
}

enum Step {
    Done(Command),
    Next(ParseState),
    Reject,
}

#[derive(Clone, Debug, Default)]
pub struct CommandAccumulator {
    state: ParseState,
    count: usize,
}

impl CommandAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing has been typed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.state == ParseState::Start && self.count == 0
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold one key into the pending command.
    pub fn feed(&mut self, key: char) -> Feed {
        if let Some(digit) = key.to_digit(10) {
            // A leading 0 is the line-start motion, not a count.
            let leading_zero = digit == 0 && self.count == 0;
            let takes_count = matches!(
                self.state,
                ParseState::Start | ParseState::OperatorPending(_)
            );
            if takes_count && !leading_zero {
                self.count = self.count.saturating_mul(10).saturating_add(digit as usize);
                return Feed::Pending;
            }
        }

        let step = match self.state {
            ParseState::Start => self.start_step(key),
            ParseState::Modifier(modifier) => Step::Done(Command::Modified { modifier, key }),
            ParseState::OperatorPending(op) => self.operator_step(op, key),
            ParseState::TextObject(op, scope) if key == 'w' => Step::Done(Command::Operator {
                op,
                motion: Motion::Word(scope),
                count: self.count,
            }),
            ParseState::TextObject(..) => Step::Reject,
        };

        match step {
            Step::Done(cmd) => {
                self.reset();
                Feed::Complete(cmd)
            }
            Step::Next(state) => {
                self.state = state;
                Feed::Pending
            }
            Step::Reject => {
                self.reset();
                Feed::Discarded
            }
        }
    }

    fn start_step(&self, key: char) -> Step {
        let count = self.count;
        match key {
            'g' => return Step::Next(ParseState::Modifier(Modifier::G)),
            'z' => return Step::Next(ParseState::Modifier(Modifier::Z)),
            _ => {}
        }
        if let Some(op) = Operator::from_char(key) {
            return Step::Next(ParseState::OperatorPending(op));
        }
        if let Some(cmd) = SimpleCommand::from_char(key) {
            return Step::Done(Command::Simple { cmd, count });
        }
        match Motion::from_char(key) {
            Some(motion) => Step::Done(Command::Motion { motion, count }),
            None => Step::Reject,
        }
    }

    fn operator_step(&self, op: Operator, key: char) -> Step {
        let count = self.count;
        if Operator::from_char(key) == Some(op) {
            return Step::Done(Command::Operator {
                op,
                motion: Motion::Line,
                count,
            });
        }
        match key {
            'i' => Step::Next(ParseState::TextObject(op, TextObjectScope::Inner)),
            'a' => Step::Next(ParseState::TextObject(op, TextObjectScope::Around)),
            _ => match Motion::from_char(key) {
                Some(motion) => Step::Done(Command::Operator { op, motion, count }),
                None => Step::Reject,
            },
        }
    }
}
