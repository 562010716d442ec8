//! Modal markdown editor library: the editing core plus the terminal host.

pub mod app;
pub mod buffer;
pub mod command;
pub mod config;
pub mod editor;
pub mod fs;
pub mod highlight;
pub mod input;
pub mod ui;
pub mod widgets;

// Re-export main types for convenience
pub use app::{App, StatusMessage};
pub use buffer::{Buffer, Position};
pub use command::{Command, CommandAccumulator};
pub use editor::{Editor, InputEvent, KeyName, KeyPress, Mode};
pub use highlight::{Highlighter, MarkdownHighlighter, MdStyle, StyleMark, StyleMarks};
