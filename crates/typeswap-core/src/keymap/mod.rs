//! Key code translation tables.
//!
//! The canonical hardware representation is the Linux `EV_KEY` code
//! ([`codes::KeyCode`]).  The canonical logical representation is
//! [`LogicalKey`].  This module translates between the two in both directions:
//! decoding captured events and resolving keys to inject.

pub mod chars;
pub mod codes;

pub use codes::KeyCode;

use crate::domain::key::{LogicalKey, NamedKey};

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a key code to a [`NamedKey`].
    ///
    /// Returns `None` for character keys and for keys with no name in the table.
    pub fn code_to_named(code: KeyCode) -> Option<NamedKey> {
        code_to_named(code)
    }

    /// Translates a [`NamedKey`] to the key code that produces it.
    ///
    /// Every named key has exactly one code; for sided modifiers the named
    /// variant already carries the side.
    pub fn named_to_code(key: NamedKey) -> KeyCode {
        named_to_code(key)
    }

    /// Returns the unshifted character printed on a key, if any.
    pub fn code_to_base_char(code: KeyCode) -> Option<char> {
        chars::base_char(code)
    }

    /// Resolves a [`LogicalKey`] to its key code and whether Shift must be
    /// held while tapping it.
    ///
    /// Returns `None` if the key cannot be typed on a US layout.
    pub fn logical_to_code(key: LogicalKey) -> Option<(KeyCode, bool)> {
        match key {
            LogicalKey::Char(c) => chars::char_to_key(c),
            LogicalKey::Named(named) => Some((named_to_code(named), false)),
        }
    }
}

fn code_to_named(code: KeyCode) -> Option<NamedKey> {
    let named = match code {
        KeyCode::Backspace => NamedKey::Backspace,
        KeyCode::Tab => NamedKey::Tab,
        KeyCode::Enter => NamedKey::Enter,
        KeyCode::Esc => NamedKey::Esc,
        KeyCode::Space => NamedKey::Space,
        KeyCode::Delete => NamedKey::Delete,
        KeyCode::Up => NamedKey::Up,
        KeyCode::Down => NamedKey::Down,
        KeyCode::Left => NamedKey::Left,
        KeyCode::Right => NamedKey::Right,
        KeyCode::Home => NamedKey::Home,
        KeyCode::End => NamedKey::End,
        KeyCode::PageUp => NamedKey::PageUp,
        KeyCode::PageDown => NamedKey::PageDown,
        KeyCode::LeftShift => NamedKey::ShiftLeft,
        KeyCode::RightShift => NamedKey::ShiftRight,
        KeyCode::LeftCtrl => NamedKey::CtrlLeft,
        KeyCode::RightCtrl => NamedKey::CtrlRight,
        KeyCode::LeftAlt => NamedKey::AltLeft,
        KeyCode::RightAlt => NamedKey::AltRight,
        KeyCode::LeftMeta => NamedKey::MetaLeft,
        KeyCode::RightMeta => NamedKey::MetaRight,
        KeyCode::CapsLock => NamedKey::CapsLock,
        KeyCode::F1 => NamedKey::F1,
        KeyCode::F2 => NamedKey::F2,
        KeyCode::F3 => NamedKey::F3,
        KeyCode::F4 => NamedKey::F4,
        KeyCode::F5 => NamedKey::F5,
        KeyCode::F6 => NamedKey::F6,
        KeyCode::F7 => NamedKey::F7,
        KeyCode::F8 => NamedKey::F8,
        KeyCode::F9 => NamedKey::F9,
        KeyCode::F10 => NamedKey::F10,
        KeyCode::F11 => NamedKey::F11,
        KeyCode::F12 => NamedKey::F12,
        _ => return None,
    };
    Some(named)
}

fn named_to_code(key: NamedKey) -> KeyCode {
    match key {
        NamedKey::Backspace => KeyCode::Backspace,
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::Enter => KeyCode::Enter,
        NamedKey::Esc => KeyCode::Esc,
        NamedKey::Space => KeyCode::Space,
        NamedKey::Delete => KeyCode::Delete,
        NamedKey::Up => KeyCode::Up,
        NamedKey::Down => KeyCode::Down,
        NamedKey::Left => KeyCode::Left,
        NamedKey::Right => KeyCode::Right,
        NamedKey::Home => KeyCode::Home,
        NamedKey::End => KeyCode::End,
        NamedKey::PageUp => KeyCode::PageUp,
        NamedKey::PageDown => KeyCode::PageDown,
        NamedKey::ShiftLeft => KeyCode::LeftShift,
        NamedKey::ShiftRight => KeyCode::RightShift,
        NamedKey::CtrlLeft => KeyCode::LeftCtrl,
        NamedKey::CtrlRight => KeyCode::RightCtrl,
        NamedKey::AltLeft => KeyCode::LeftAlt,
        NamedKey::AltRight => KeyCode::RightAlt,
        NamedKey::MetaLeft => KeyCode::LeftMeta,
        NamedKey::MetaRight => KeyCode::RightMeta,
        NamedKey::CapsLock => KeyCode::CapsLock,
        NamedKey::F1 => KeyCode::F1,
        NamedKey::F2 => KeyCode::F2,
        NamedKey::F3 => KeyCode::F3,
        NamedKey::F4 => KeyCode::F4,
        NamedKey::F5 => KeyCode::F5,
        NamedKey::F6 => KeyCode::F6,
        NamedKey::F7 => KeyCode::F7,
        NamedKey::F8 => KeyCode::F8,
        NamedKey::F9 => KeyCode::F9,
        NamedKey::F10 => KeyCode::F10,
        NamedKey::F11 => KeyCode::F11,
        NamedKey::F12 => KeyCode::F12,
    }
}
