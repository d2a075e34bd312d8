//! VirtualKeyboard: synthetic keystroke primitives on top of a key emitter.
//!
//! This use case sits at the application layer and delegates to a
//! [`PlatformKeyEmitter`] for the raw kernel writes.  The uinput
//! implementation lives in the infrastructure layer.
//!
//! # Primitives
//!
//! - [`VirtualKeyboard::tap`] – press and release one logical key, wrapped in
//!   Left Shift when the character needs it (`'A'`, `'!'`, …).
//! - [`VirtualKeyboard::pressed`] – press a key and return a guard that
//!   releases it when dropped.  Used for chords such as Ctrl+V.
//! - [`VirtualKeyboard::type_text`] – tap every character of a string,
//!   skipping (and reporting) the ones that cannot be typed.
//!
//! Every method takes `&mut self`, so two taps on the same keyboard can never
//! interleave.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use typeswap_core::{KeyCode, KeyMapper, KeyValue, LogicalKey, NamedKey};

/// Error type for input emulation operations.
#[derive(Debug, Error)]
pub enum EmulationError {
    /// The key has no code on a US layout (accented letters, emoji, …).
    #[error("no key code for {0}")]
    Unmapped(LogicalKey),

    /// Writing to the virtual device failed.
    #[error("virtual device write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("platform error: {0}")]
    Platform(String),
}

/// Low-level key event sink.
///
/// Each call writes one key event followed by a synchronisation barrier
/// (`SYN_REPORT`), so the receiver sees every event as its own report.
pub trait PlatformKeyEmitter: Send {
    fn emit(&mut self, code: KeyCode, value: KeyValue) -> Result<(), EmulationError>;
}

impl<E: PlatformKeyEmitter + ?Sized> PlatformKeyEmitter for Box<E> {
    fn emit(&mut self, code: KeyCode, value: KeyValue) -> Result<(), EmulationError> {
        (**self).emit(code, value)
    }
}

/// One character `type_text` could not type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChar {
    /// Character index (not byte index) within the input string.
    pub index: usize,
    pub ch: char,
    pub reason: String,
}

/// Result of a best-effort [`VirtualKeyboard::type_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeOutcome {
    pub typed: usize,
    pub skipped: Vec<SkippedChar>,
}

impl TypeOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A synthetic keyboard built on a [`PlatformKeyEmitter`].
pub struct VirtualKeyboard<E: PlatformKeyEmitter> {
    emitter: E,
    settle: Duration,
}

impl<E: PlatformKeyEmitter> VirtualKeyboard<E> {
    /// Creates a keyboard that sleeps `settle` after every tap and press.
    ///
    /// Receivers that poll their input queue can coalesce or drop events
    /// written back-to-back; a few milliseconds avoids that.
    pub fn new(emitter: E, settle: Duration) -> Self {
        Self { emitter, settle }
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Presses and releases `key`.
    ///
    /// When the key needs Shift, the tap is bracketed by Left Shift down/up.
    /// Shift is released even if the inner tap fails.
    ///
    /// # Errors
    ///
    /// [`EmulationError::Unmapped`] if the key has no code (nothing is
    /// emitted), or the first emitter error.
    pub fn tap(&mut self, key: LogicalKey) -> Result<(), EmulationError> {
        let (code, needs_shift) =
            KeyMapper::logical_to_code(key).ok_or(EmulationError::Unmapped(key))?;

        if needs_shift {
            self.emitter.emit(KeyCode::LeftShift, KeyValue::Down)?;
        }
        let result = self.press_release(code);
        let shift_release = if needs_shift {
            self.emitter.emit(KeyCode::LeftShift, KeyValue::Up)
        } else {
            Ok(())
        };
        self.settle();
        result.and(shift_release)
    }

    /// Presses `key` and returns a guard that releases it on drop.
    ///
    /// Only the physical key is held; a character's Shift requirement is not
    /// applied.  The guard dereferences to the keyboard, so further taps can
    /// be issued while the key is held:
    ///
    /// ```ignore
    /// let mut ctrl = keyboard.pressed(NamedKey::CtrlLeft.into())?;
    /// ctrl.tap('v'.into())?;
    /// // Ctrl released here, on every path.
    /// ```
    pub fn pressed(&mut self, key: LogicalKey) -> Result<HeldKey<'_, E>, EmulationError> {
        let (code, _) = KeyMapper::logical_to_code(key).ok_or(EmulationError::Unmapped(key))?;
        self.emitter.emit(code, KeyValue::Down)?;
        self.settle();
        Ok(HeldKey {
            keyboard: self,
            code,
        })
    }

    /// Types `text` one character at a time.
    ///
    /// Characters that fail are skipped and reported; the rest are still typed.
    pub fn type_text(&mut self, text: &str) -> TypeOutcome {
        let mut outcome = TypeOutcome::default();
        for (index, ch) in text.chars().enumerate() {
            match self.tap(LogicalKey::Char(ch)) {
                Ok(()) => outcome.typed += 1,
                Err(e) => {
                    debug!(index, "skipping character: {e}");
                    outcome.skipped.push(SkippedChar {
                        index,
                        ch,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Taps Backspace `count` times.  Returns the number of failed taps.
    pub fn backspace(&mut self, count: usize) -> usize {
        let mut failed = 0;
        for _ in 0..count {
            if let Err(e) = self.tap(NamedKey::Backspace.into()) {
                warn!("backspace failed: {e}");
                failed += 1;
            }
        }
        failed
    }

    fn press_release(&mut self, code: KeyCode) -> Result<(), EmulationError> {
        self.emitter.emit(code, KeyValue::Down)?;
        self.emitter.emit(code, KeyValue::Up)
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }
}

/// A key held down by [`VirtualKeyboard::pressed`].  Releasing happens on drop.
pub struct HeldKey<'a, E: PlatformKeyEmitter> {
    keyboard: &'a mut VirtualKeyboard<E>,
    code: KeyCode,
}

impl<E: PlatformKeyEmitter> Deref for HeldKey<'_, E> {
    type Target = VirtualKeyboard<E>;

    fn deref(&self) -> &Self::Target {
        self.keyboard
    }
}

impl<E: PlatformKeyEmitter> DerefMut for HeldKey<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.keyboard
    }
}

impl<E: PlatformKeyEmitter> Drop for HeldKey<'_, E> {
    fn drop(&mut self) {
        if let Err(e) = self.keyboard.emitter.emit(self.code, KeyValue::Up) {
            warn!(code = self.code.as_u16(), "failed to release held key: {e}");
        }
        self.keyboard.settle();
    }
}
