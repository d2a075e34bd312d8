//! Logical key model: what the user pressed, independent of the hardware code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `value` field of a kernel `EV_KEY` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum KeyValue {
    /// The key was released.
    Up = 0,
    /// The key was pressed.
    Down = 1,
    /// Autorepeat while the key is held.
    Repeat = 2,
}

impl KeyValue {
    /// Converts the raw kernel value.  Anything outside 0–2 returns `None`.
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyValue::Up),
            1 => Some(KeyValue::Down),
            2 => Some(KeyValue::Repeat),
            _ => None,
        }
    }

    /// Returns the raw kernel value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// `true` for [`KeyValue::Down`] and [`KeyValue::Repeat`], i.e. the key is held.
    pub fn is_held(self) -> bool {
        self != KeyValue::Up
    }
}

/// A non-character key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Backspace,
    Tab,
    Enter,
    Esc,
    Space,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    ShiftLeft,
    ShiftRight,
    CtrlLeft,
    CtrlRight,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

/// A decoded key press: either a character or a named control key.
///
/// Produced by the decoder for `Down` events only, consumed by the trigger
/// buffer, and also the unit the virtual keyboard injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalKey {
    Char(char),
    Named(NamedKey),
}

impl From<char> for LogicalKey {
    fn from(c: char) -> Self {
        LogicalKey::Char(c)
    }
}

impl From<NamedKey> for LogicalKey {
    fn from(key: NamedKey) -> Self {
        LogicalKey::Named(key)
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalKey::Char(c) => write!(f, "{c:?}"),
            LogicalKey::Named(key) => write!(f, "<{key:?}>"),
        }
    }
}
