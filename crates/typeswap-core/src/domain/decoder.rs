//! Turns raw key events into logical key presses.
//!
//! # Decoding rules
//!
//! For every event:
//!
//! 1. If the code is a modifier or Caps Lock, update the [`ModifierTracker`]
//!    (for any `value`).
//! 2. If `value` is not `Down`, stop.  Releases and autorepeats never produce
//!    a [`LogicalKey`].
//! 3. Look the code up in the named-key table; a hit yields `Named(key)`.
//! 4. Otherwise look up the base character.  Letters are upper-cased when
//!    exactly one of Shift and Caps Lock is active.  Other characters take
//!    their shifted symbol while Shift is held.
//! 5. Codes in neither table yield nothing.

use crate::domain::event::RawInputEvent;
use crate::domain::key::{KeyValue, LogicalKey};
use crate::domain::modifiers::{ModifierState, ModifierTracker};
use crate::keymap::chars;
use crate::keymap::codes::KeyCode;
use crate::keymap::KeyMapper;

/// Resolves a pressed key to its logical value under a given modifier state.
///
/// Pure function: the result depends only on `code` and `state`.
pub fn resolve_key(code: KeyCode, state: ModifierState) -> Option<LogicalKey> {
    if let Some(named) = KeyMapper::code_to_named(code) {
        return Some(LogicalKey::Named(named));
    }

    let base = chars::base_char(code)?;
    let resolved = if base.is_ascii_alphabetic() {
        if state.shift ^ state.caps {
            base.to_ascii_uppercase()
        } else {
            base
        }
    } else if state.shift {
        chars::shifted_symbol(base).unwrap_or(base)
    } else {
        base
    };
    Some(LogicalKey::Char(resolved))
}

/// Stateful decoder: owns the session's [`ModifierTracker`].
#[derive(Debug, Default, Clone)]
pub struct KeyEventDecoder {
    modifiers: ModifierTracker,
}

impl KeyEventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw event and returns the logical key it produced, if any.
    pub fn decode(&mut self, event: &RawInputEvent) -> Option<LogicalKey> {
        let code = KeyCode::from_u16(event.code)?;
        self.modifiers.observe(code, event.value);
        if event.value != KeyValue::Down {
            return None;
        }
        resolve_key(code, self.modifiers.state())
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers.state()
    }
}
