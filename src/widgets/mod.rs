pub mod editor;

pub use editor::{EditorView, Theme};
