use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Orientation;

/// What a key press asks the front end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Orientation),
    Restart,
    Quit,
    None,
}

/// Maps terminal key events onto game actions
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(orientation) = Self::orientation_for(key.code) {
            return KeyAction::Turn(orientation);
        }

        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => KeyAction::Quit,
                'r' => KeyAction::Restart,
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }

    /// Arrow keys and WASD, either case
    fn orientation_for(code: KeyCode) -> Option<Orientation> {
        let orientation = match code {
            KeyCode::Up => Orientation::Up,
            KeyCode::Down => Orientation::Down,
            KeyCode::Left => Orientation::Left,
            KeyCode::Right => Orientation::Right,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Orientation::Up,
                's' => Orientation::Down,
                'a' => Orientation::Left,
                'd' => Orientation::Right,
                _ => return None,
            },
            _ => return None,
        };
        Some(orientation)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
