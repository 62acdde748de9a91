//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    Sync,
    Refresh,
    FocusForm,
    NextField,
    Submit,
    Cancel,
    Insert(char),
    DeleteBack,
}

/// Whether keystrokes navigate the list or edit the post form. Text entry
/// claims almost every printable key, so mapping is mode-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Edit,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match mode {
        InputMode::Browse => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('s') => Some(Action::Sync),
            KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab => Some(Action::FocusForm),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        InputMode::Edit => match code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::NextField),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteBack),
            KeyCode::Char(c) => Some(Action::Insert(c)),
            _ => None,
        },
    }
}
