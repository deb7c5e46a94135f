use crate::types::Direction;

/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key, already shifted ('A' when SHIFT is held with 'a').
    Char(char),
    /// The Escape key, used to exit modes and collapse selections.
    Esc,
    Left,
    Down,
    Up,
    Right,
    /// The Enter/Return key. Not a key class of its own; hosts handle it.
    Enter,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }
}

/// The key classes the interpreter has an entry point for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    Arrow(Direction),
    Escape,
    /// `:` - opens the line/command prompt in Command mode.
    Colon,
    /// `/` - opens the search prompt in Command mode.
    Slash,
    /// Ctrl+A
    Increment,
    /// Ctrl+X
    Decrement,
}

impl Key {
    /// Classify a host key event.
    ///
    /// Returns `None` for keys the interpreter does not bind, which the host
    /// should handle itself.
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        let ctrl = event.mods.contains(Modifiers::CTRL);
        match event.code {
            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'a' => Some(Key::Increment),
                'x' => Some(Key::Decrement),
                _ => None,
            },
            _ if event.mods.intersects(Modifiers::ALT | Modifiers::META) => None,
            KeyCode::Char(':') => Some(Key::Colon),
            KeyCode::Char('/') => Some(Key::Slash),
            KeyCode::Char(c) if !c.is_control() => Some(Key::Char(c)),
            KeyCode::Char(_) => None,
            KeyCode::Esc => Some(Key::Escape),
            KeyCode::Left => Some(Key::Arrow(Direction::Left)),
            KeyCode::Down => Some(Key::Arrow(Direction::Down)),
            KeyCode::Up => Some(Key::Arrow(Direction::Up)),
            KeyCode::Right => Some(Key::Arrow(Direction::Right)),
            KeyCode::Enter => None,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            ':' => Key::Colon,
            '/' => Key::Slash,
            c => Key::Char(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_keys_map_to_increment_and_decrement() {
        let ev = KeyEvent::new(KeyCode::Char('a'), Modifiers::CTRL);
        assert_eq!(Key::from_event(ev), Some(Key::Increment));
        let ev = KeyEvent::new(KeyCode::Char('x'), Modifiers::CTRL);
        assert_eq!(Key::from_event(ev), Some(Key::Decrement));
        let ev = KeyEvent::new(KeyCode::Char('z'), Modifiers::CTRL);
        assert_eq!(Key::from_event(ev), None);
    }

    #[test]
    fn triggers_and_plain_chars() {
        assert_eq!(
            Key::from_event(KeyEvent::plain(KeyCode::Char(':'))),
            Some(Key::Colon)
        );
        assert_eq!(
            Key::from_event(KeyEvent::plain(KeyCode::Char('/'))),
            Some(Key::Slash)
        );
        assert_eq!(
            Key::from_event(KeyEvent::new(KeyCode::Char('D'), Modifiers::SHIFT)),
            Some(Key::Char('D'))
        );
        assert_eq!(Key::from_event(KeyEvent::plain(KeyCode::Enter)), None);
    }
}
