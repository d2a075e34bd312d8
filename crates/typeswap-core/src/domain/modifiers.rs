//! Live modifier key state derived from observed press/release events.

use crate::domain::key::KeyValue;
use crate::keymap::codes::KeyCode;

/// Snapshot of the modifier state used for character resolution.
///
/// `shift`, `ctrl`, `alt` and `meta` are `true` while either side is held.
/// `caps` is the Caps Lock toggle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    pub shift: bool,
    pub caps: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Tracks modifier keys across key-down/up events.
///
/// Left and right keys are tracked independently so that releasing one side
/// while the other is still held keeps the modifier active.
#[derive(Debug, Default, Clone)]
pub struct ModifierTracker {
    left_shift: bool,
    right_shift: bool,
    left_ctrl: bool,
    right_ctrl: bool,
    left_alt: bool,
    right_alt: bool,
    left_meta: bool,
    right_meta: bool,
    caps: bool,
}

impl ModifierTracker {
    /// Creates a tracker with nothing held and Caps Lock off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the state for one event.
    ///
    /// Returns `true` if `code` is a modifier or Caps Lock, whether or not the
    /// state actually changed.  Caps Lock toggles on `Down` only; `Repeat` and
    /// `Up` leave it unchanged.
    pub fn observe(&mut self, code: KeyCode, value: KeyValue) -> bool {
        let held = value.is_held();
        match code {
            KeyCode::LeftShift => self.left_shift = held,
            KeyCode::RightShift => self.right_shift = held,
            KeyCode::LeftCtrl => self.left_ctrl = held,
            KeyCode::RightCtrl => self.right_ctrl = held,
            KeyCode::LeftAlt => self.left_alt = held,
            KeyCode::RightAlt => self.right_alt = held,
            KeyCode::LeftMeta => self.left_meta = held,
            KeyCode::RightMeta => self.right_meta = held,
            KeyCode::CapsLock => {
                if value == KeyValue::Down {
                    self.caps = !self.caps;
                }
            }
            _ => return false,
        }
        true
    }

    /// Returns the current state.
    pub fn state(&self) -> ModifierState {
        ModifierState {
            shift: self.left_shift || self.right_shift,
            caps: self.caps,
            ctrl: self.left_ctrl || self.right_ctrl,
            alt: self.left_alt || self.right_alt,
            meta: self.left_meta || self.right_meta,
        }
    }

    /// Releases every held modifier and turns Caps Lock off.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
