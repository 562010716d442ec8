//! Translation of crossterm key events into editor input.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::{InputEvent, KeyName, KeyPress, Modifiers};

/// What the host should do with a terminal key event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostInput {
    Quit,
    Editor(InputEvent),
    Ignored,
}

fn modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        shift: m.contains(KeyModifiers::SHIFT),
        alt: m.contains(KeyModifiers::ALT),
    }
}

pub fn translate(key: KeyEvent) -> HostInput {
    if key.kind == KeyEventKind::Release {
        return HostInput::Ignored;
    }
    let mods = modifiers(key.modifiers);

    let name = match key.code {
        KeyCode::Char(c) if mods.ctrl => {
            if c.eq_ignore_ascii_case(&'q') {
                return HostInput::Quit;
            }
            return HostInput::Editor(InputEvent::Key(KeyPress::ctrl(c)));
        }
        KeyCode::Char(_) if mods.alt => return HostInput::Ignored,
        KeyCode::Char(c) => return HostInput::Editor(InputEvent::Text(c.to_string())),
        KeyCode::Tab => return HostInput::Editor(InputEvent::text("\t")),
        KeyCode::Backspace => KeyName::Backspace,
        KeyCode::Delete => KeyName::Delete,
        KeyCode::Enter => KeyName::Enter,
        KeyCode::Esc => KeyName::Escape,
        _ => return HostInput::Ignored,
    };
    HostInput::Editor(InputEvent::Key(KeyPress {
        name,
        modifiers: mods,
    }))
}
