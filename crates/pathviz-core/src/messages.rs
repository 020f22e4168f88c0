//! Input events: [`Msg`], [`Key`], [`MouseAction`].

use std::fmt;
use std::time::Instant;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A keyboard key. Only the keys the demonstrator binds are delivered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Escape,
    Enter,
    Space,
    /// A printable character.
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Escape => f.write_str("Esc"),
            Key::Enter => f.write_str("Enter"),
            Key::Space => f.write_str("Space"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MouseAction
// ---------------------------------------------------------------------------

/// A mouse action. Only the primary button edits the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    /// Primary (left) button pressed.
    Main,
    /// Button released.
    Release,
    /// Pointer moved, with or without a button held.
    Move,
}

// ---------------------------------------------------------------------------
// Msg
// ---------------------------------------------------------------------------

/// A message delivered to the application model.
#[derive(Clone, Debug)]
pub enum Msg {
    /// A key was pressed.
    KeyDown { key: Key, time: Instant },
    /// A mouse event at a screen position.
    Mouse {
        action: MouseAction,
        pos: Point,
        time: Instant,
    },
    /// Periodic clock tick, sent by the application loop when a tick
    /// interval is configured.
    Tick { time: Instant },
    /// The screen / terminal was resized.
    Screen {
        width: i32,
        height: i32,
        time: Instant,
    },
    /// Sent once when the application starts.
    Init,
    /// Request to quit.
    Quit,
}

impl Msg {
    /// Convenience: create a `KeyDown` stamped with the current time.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            time: Instant::now(),
        }
    }

    /// Convenience: create a `Mouse` message stamped with the current time.
    pub fn mouse(action: MouseAction, pos: Point) -> Self {
        Self::Mouse {
            action,
            pos,
            time: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display() {
        assert_eq!(Key::Char('r').to_string(), "r");
        assert_eq!(Key::Enter.to_string(), "Enter");
        assert_eq!(Key::Escape.to_string(), "Esc");
    }

    #[test]
    fn mouse_constructor() {
        match Msg::mouse(MouseAction::Release, Point::new(1, 2)) {
            Msg::Mouse { action, pos, .. } => {
                assert_eq!(action, MouseAction::Release);
                assert_eq!(pos, Point::new(1, 2));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
