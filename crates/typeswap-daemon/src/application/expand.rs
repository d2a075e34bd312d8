//! ExpansionOrchestrator: replaces a matched trigger with its snippet content.
//!
//! # State machine
//!
//! ```text
//!  Idle ──match──▶ Deleting ──▶ Injecting ──▶ Idle
//! ```
//!
//! 1. **Deleting** – one Backspace per character of the trigger.
//! 2. **Injecting** – content shorter than the clipboard threshold is typed
//!    key by key.  Longer content goes through the clipboard:
//!    snapshot → write content → settle → Ctrl+V → settle → restore snapshot.
//! 3. Back to **Idle**, on every path, including failures.
//!
//! # Failure handling (for beginners)
//!
//! Nothing here rolls back.  If a Backspace or a character fails, the
//! failure is counted in the [`ExpansionReport`] and the expansion carries
//! on.  If the clipboard cannot be written, the content is typed instead.
//! Only a failed Ctrl+V chord is returned as an error, because in that case
//! the content never reached the focused window.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use typeswap_core::{NamedKey, TriggerMatch};

use crate::application::emulate_input::{
    EmulationError, PlatformKeyEmitter, SkippedChar, VirtualKeyboard,
};
use crate::infrastructure::clipboard::Clipboard;

/// Error type for an expansion that could not complete.
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// The Ctrl+V chord could not be injected.
    #[error("paste chord failed: {0}")]
    Paste(#[source] EmulationError),
}

/// Tunables for the injection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionSettings {
    /// Content with at least this many characters is pasted.
    pub clipboard_threshold: usize,
    /// Pause between writing the clipboard and pressing Ctrl+V.
    pub clipboard_settle: Duration,
    /// Pause between Ctrl+V and restoring the previous clipboard content.
    pub restore_delay: Duration,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            clipboard_threshold: 50,
            clipboard_settle: Duration::from_millis(100),
            restore_delay: Duration::from_millis(200),
        }
    }
}

/// Where the orchestrator is in an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Idle,
    Deleting,
    Injecting,
}

/// How the content was injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionStrategy {
    /// Typed key by key.
    Typed,
    /// Pasted through the clipboard.  `restored` is true when the previous
    /// clipboard content was written back.
    Pasted { restored: bool },
    /// The clipboard write failed, so the content was typed.
    TypedAfterClipboardFailure,
}

/// What one expansion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionReport {
    pub backspaces: usize,
    pub failed_backspaces: usize,
    pub strategy: InjectionStrategy,
    /// Characters that could not be typed (typed strategies only).
    pub skipped: Vec<SkippedChar>,
}

/// Deletes a matched trigger and injects its replacement.
pub struct ExpansionOrchestrator<E: PlatformKeyEmitter, C: Clipboard> {
    keyboard: VirtualKeyboard<E>,
    clipboard: C,
    settings: ExpansionSettings,
    state: ExpansionState,
}

impl<E: PlatformKeyEmitter, C: Clipboard> ExpansionOrchestrator<E, C> {
    pub fn new(keyboard: VirtualKeyboard<E>, clipboard: C, settings: ExpansionSettings) -> Self {
        Self {
            keyboard,
            clipboard,
            settings,
            state: ExpansionState::Idle,
        }
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    pub fn keyboard(&self) -> &VirtualKeyboard<E> {
        &self.keyboard
    }

    pub fn settings(&self) -> &ExpansionSettings {
        &self.settings
    }

    /// Runs one expansion to completion.  The state is `Idle` afterwards,
    /// whatever the result.
    ///
    /// # Errors
    ///
    /// [`ExpansionError::Paste`] when the paste chord could not be injected.
    /// The previous clipboard content is still restored in that case.
    pub fn expand(&mut self, matched: &TriggerMatch) -> Result<ExpansionReport, ExpansionError> {
        let result = self.run(matched);
        self.state = ExpansionState::Idle;
        result
    }

    fn run(&mut self, matched: &TriggerMatch) -> Result<ExpansionReport, ExpansionError> {
        self.state = ExpansionState::Deleting;
        let backspaces = matched.trigger.chars().count();
        let failed_backspaces = self.keyboard.backspace(backspaces);

        self.state = ExpansionState::Injecting;
        let content_len = matched.content.chars().count();
        let (strategy, skipped) = if content_len < self.settings.clipboard_threshold {
            let outcome = self.keyboard.type_text(&matched.content);
            (InjectionStrategy::Typed, outcome.skipped)
        } else {
            self.paste(&matched.content)?
        };

        debug!(
            snippet_id = matched.snippet_id,
            backspaces,
            failed_backspaces,
            ?strategy,
            skipped = skipped.len(),
            "expansion finished"
        );
        Ok(ExpansionReport {
            backspaces,
            failed_backspaces,
            strategy,
            skipped,
        })
    }

    fn paste(
        &mut self,
        content: &str,
    ) -> Result<(InjectionStrategy, Vec<SkippedChar>), ExpansionError> {
        let snapshot = self.snapshot_clipboard();

        if let Err(e) = self.clipboard.copy(content) {
            warn!("clipboard write failed, typing instead: {e}");
            let outcome = self.keyboard.type_text(content);
            return Ok((InjectionStrategy::TypedAfterClipboardFailure, outcome.skipped));
        }

        sleep(self.settings.clipboard_settle);
        let chord = self.paste_chord();
        sleep(self.settings.restore_delay);

        let restored = match snapshot {
            Some(previous) => match self.clipboard.copy(&previous) {
                Ok(()) => true,
                Err(e) => {
                    warn!("clipboard restore failed: {e}");
                    false
                }
            },
            None => false,
        };

        chord.map_err(ExpansionError::Paste)?;
        Ok((InjectionStrategy::Pasted { restored }, Vec::new()))
    }

    /// Current clipboard text, or `None` when it is empty, unreadable or
    /// not valid UTF-8.
    fn snapshot_clipboard(&self) -> Option<String> {
        match self.clipboard.paste() {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) if !text.is_empty() => Some(text),
                Ok(_) => None,
                Err(_) => {
                    debug!("clipboard holds non-text data; it will not be restored");
                    None
                }
            },
            Err(e) => {
                warn!("clipboard snapshot failed: {e}");
                None
            }
        }
    }

    fn paste_chord(&mut self) -> Result<(), EmulationError> {
        let mut ctrl = self.keyboard.pressed(NamedKey::CtrlLeft.into())?;
        ctrl.tap('v'.into())?;
        Ok(())
    }
}

fn sleep(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use typeswap_core::{KeyCode, KeyValue};

    use super::*;
    use crate::infrastructure::clipboard::{ClipboardError, MemoryClipboard, MockClipboard};
    use crate::infrastructure::input_emulation::mock::MockKeyEmitter;

    fn quick_settings() -> ExpansionSettings {
        ExpansionSettings {
            clipboard_threshold: 50,
            clipboard_settle: Duration::ZERO,
            restore_delay: Duration::ZERO,
        }
    }

    fn orchestrator<C: Clipboard>(
        emitter: &MockKeyEmitter,
        clipboard: C,
    ) -> ExpansionOrchestrator<MockKeyEmitter, C> {
        let keyboard = VirtualKeyboard::new(emitter.clone(), Duration::ZERO);
        ExpansionOrchestrator::new(keyboard, clipboard, quick_settings())
    }

    fn matched(trigger: &str, content: &str) -> TriggerMatch {
        TriggerMatch {
            snippet_id: 1,
            trigger: trigger.to_string(),
            content: content.to_string(),
        }
    }

    fn ctrl_v_sequence() -> Vec<(KeyCode, KeyValue)> {
        vec![
            (KeyCode::LeftCtrl, KeyValue::Down),
            (KeyCode::V, KeyValue::Down),
            (KeyCode::V, KeyValue::Up),
            (KeyCode::LeftCtrl, KeyValue::Up),
        ]
    }

    #[test]
    fn test_short_content_is_typed_after_one_backspace_per_trigger_char() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        let clipboard = MemoryClipboard::with_content("untouched");
        let mut orch = orchestrator(&emitter, clipboard.clone());

        // Act
        let report = orch.expand(&matched(";sig", "hi")).unwrap();

        // Assert
        assert_eq!(report.backspaces, 4);
        assert_eq!(report.failed_backspaces, 0);
        assert_eq!(report.strategy, InjectionStrategy::Typed);
        assert_eq!(
            emitter.down_codes(),
            vec![
                KeyCode::Backspace,
                KeyCode::Backspace,
                KeyCode::Backspace,
                KeyCode::Backspace,
                KeyCode::H,
                KeyCode::I,
            ]
        );
        assert!(clipboard.history().is_empty());
        assert_eq!(orch.state(), ExpansionState::Idle);
    }

    #[test]
    fn test_backspace_count_uses_characters_not_bytes() {
        let emitter = MockKeyEmitter::new();
        let mut orch = orchestrator(&emitter, MemoryClipboard::new());

        let report = orch.expand(&matched("é;", "x")).unwrap();

        assert_eq!(report.backspaces, 2);
    }

    #[test]
    fn test_long_content_is_pasted_and_clipboard_restored() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        let clipboard = MemoryClipboard::with_content("previous");
        let mut orch = orchestrator(&emitter, clipboard.clone());
        let content = "a".repeat(120);

        // Act
        let report = orch.expand(&matched(";long", &content)).unwrap();

        // Assert
        assert_eq!(report.strategy, InjectionStrategy::Pasted { restored: true });
        assert_eq!(clipboard.history(), vec![content, "previous".to_string()]);
        assert_eq!(clipboard.content(), "previous");
        let events = emitter.events();
        assert_eq!(events[events.len() - 4..], ctrl_v_sequence()[..]);
        assert!(!emitter.down_codes().contains(&KeyCode::A));
    }

    #[test]
    fn test_threshold_boundary() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        let clipboard = MemoryClipboard::new();
        let mut orch = orchestrator(&emitter, clipboard.clone());

        // Act
        let below = orch.expand(&matched("x", &"b".repeat(49))).unwrap();
        let at = orch.expand(&matched("x", &"b".repeat(50))).unwrap();

        // Assert
        assert_eq!(below.strategy, InjectionStrategy::Typed);
        assert_eq!(at.strategy, InjectionStrategy::Pasted { restored: false });
    }

    #[test]
    fn test_empty_snapshot_is_not_restored() {
        let emitter = MockKeyEmitter::new();
        let clipboard = MemoryClipboard::new();
        let mut orch = orchestrator(&emitter, clipboard.clone());
        let content = "z".repeat(60);

        let report = orch.expand(&matched(";z", &content)).unwrap();

        assert_eq!(report.strategy, InjectionStrategy::Pasted { restored: false });
        assert_eq!(clipboard.history(), vec![content]);
    }

    #[test]
    fn test_non_utf8_snapshot_is_not_restored() {
        let emitter = MockKeyEmitter::new();
        let clipboard = MemoryClipboard::new();
        clipboard.set_bytes(&[0xff, 0xfe, 0x00]);
        let mut orch = orchestrator(&emitter, clipboard.clone());

        let report = orch.expand(&matched(";z", &"z".repeat(60))).unwrap();

        assert_eq!(report.strategy, InjectionStrategy::Pasted { restored: false });
        assert_eq!(clipboard.history().len(), 1);
    }

    #[test]
    fn test_snapshot_failure_still_pastes() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_paste()
            .returning(|| Err(ClipboardError::Unavailable("no display".into())));
        clipboard.expect_copy().times(1).returning(|_| Ok(()));
        let mut orch = orchestrator(&emitter, clipboard);

        // Act
        let report = orch.expand(&matched(";z", &"z".repeat(60))).unwrap();

        // Assert
        assert_eq!(report.strategy, InjectionStrategy::Pasted { restored: false });
        let events = emitter.events();
        assert_eq!(events[events.len() - 4..], ctrl_v_sequence()[..]);
    }

    #[test]
    fn test_clipboard_write_failure_falls_back_to_typing_without_restore() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_paste()
            .returning(|| Ok(b"previous".to_vec()));
        clipboard
            .expect_copy()
            .times(1)
            .returning(|_| Err(ClipboardError::Unavailable("denied".into())));
        let mut orch = orchestrator(&emitter, clipboard);
        let content = "q".repeat(55);

        // Act
        let report = orch.expand(&matched(";q", &content)).unwrap();

        // Assert
        assert_eq!(report.strategy, InjectionStrategy::TypedAfterClipboardFailure);
        let typed = emitter
            .down_codes()
            .into_iter()
            .filter(|c| *c == KeyCode::Q)
            .count();
        assert_eq!(typed, 55);
        assert!(!emitter.down_codes().contains(&KeyCode::LeftCtrl));
    }

    #[test]
    fn test_failed_chord_still_restores_and_releases_ctrl() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        emitter.fail_on(KeyCode::V);
        let clipboard = MemoryClipboard::with_content("previous");
        let mut orch = orchestrator(&emitter, clipboard.clone());

        // Act
        let result = orch.expand(&matched(";z", &"z".repeat(60)));

        // Assert
        assert!(matches!(result, Err(ExpansionError::Paste(_))));
        assert_eq!(clipboard.content(), "previous");
        assert_eq!(
            emitter.events().last(),
            Some(&(KeyCode::LeftCtrl, KeyValue::Up))
        );
        assert_eq!(orch.state(), ExpansionState::Idle);
    }

    #[test]
    fn test_backspace_failures_do_not_abort_injection() {
        // Arrange
        let emitter = MockKeyEmitter::new();
        emitter.fail_on(KeyCode::Backspace);
        let mut orch = orchestrator(&emitter, MemoryClipboard::new());

        // Act
        let report = orch.expand(&matched(";ok", "ok")).unwrap();

        // Assert
        assert_eq!(report.failed_backspaces, 3);
        assert_eq!(emitter.down_codes(), vec![KeyCode::O, KeyCode::K]);
    }

    #[test]
    fn test_unmappable_characters_are_reported_and_skipped() {
        let emitter = MockKeyEmitter::new();
        let mut orch = orchestrator(&emitter, MemoryClipboard::new());

        let report = orch.expand(&matched(";c", "café")).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].ch, 'é');
        assert_eq!(
            emitter.down_codes()[2..],
            [KeyCode::C, KeyCode::A, KeyCode::F]
        );
    }
}
