//! Key mapping from terminal events to line-editor keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editing intent of a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Drop the whole pending line.
    Discard,
    Submit,
}

/// Map keyboard input to editor keys.
pub fn handle_key_event(key: KeyEvent) -> Option<EditorKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('a') | KeyCode::Char('A') => Some(EditorKey::Home),
            KeyCode::Char('e') | KeyCode::Char('E') => Some(EditorKey::End),
            KeyCode::Char('u') | KeyCode::Char('U') => Some(EditorKey::Discard),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(EditorKey::Insert(c)),
        KeyCode::Backspace => Some(EditorKey::Backspace),
        KeyCode::Delete => Some(EditorKey::Delete),
        KeyCode::Left => Some(EditorKey::Left),
        KeyCode::Right => Some(EditorKey::Right),
        KeyCode::Home => Some(EditorKey::Home),
        KeyCode::End => Some(EditorKey::End),
        KeyCode::Esc => Some(EditorKey::Discard),
        KeyCode::Enter => Some(EditorKey::Submit),
        _ => None,
    }
}

/// Ctrl+C asks to leave; it goes through the same confirmation as `exit`.
pub fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Answer to a yes/no confirmation. Only an explicit yes confirms.
pub fn confirm_answer(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => Some(false),
        _ if is_interrupt(key) => Some(false),
        _ => None,
    }
}
