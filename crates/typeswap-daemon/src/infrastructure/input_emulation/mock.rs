//! Mock key emitter for unit and integration testing.
//!
//! # Why a mock emitter?
//!
//! The real [`UinputEmitter`](super::uinput::UinputEmitter) needs write
//! access to `/dev/uinput` and types into whatever window has focus on the
//! test machine.  `MockKeyEmitter` records every event in memory instead so
//! tests can assert exactly what was emitted and in what order.
//!
//! Clones share the same log, so a test keeps one handle while the keyboard
//! (or a whole listener thread) owns another.
//!
//! # Failure injection
//!
//! [`MockKeyEmitter::fail_on`] makes every event for one key code fail, and
//! [`MockKeyEmitter::fail_all`] makes every event fail.  Failed events are not
//! recorded.

use std::sync::{Arc, Mutex, MutexGuard};

use typeswap_core::{KeyCode, KeyValue};

use crate::application::emulate_input::{EmulationError, PlatformKeyEmitter};

#[derive(Debug, Default)]
struct MockState {
    events: Vec<(KeyCode, KeyValue)>,
    fail_on: Option<KeyCode>,
    should_fail: bool,
}

/// A mock emitter that records all calls without touching the OS.
#[derive(Debug, Clone, Default)]
pub struct MockKeyEmitter {
    state: Arc<Mutex<MockState>>,
}

impl MockKeyEmitter {
    /// Creates an emitter with an empty log and no failures configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded `(code, value)` pair, oldest first.
    pub fn events(&self) -> Vec<(KeyCode, KeyValue)> {
        self.lock().events.clone()
    }

    /// Codes of recorded `Down` events, oldest first.
    pub fn down_codes(&self) -> Vec<KeyCode> {
        self.lock()
            .events
            .iter()
            .filter(|(_, value)| *value == KeyValue::Down)
            .map(|(code, _)| *code)
            .collect()
    }

    /// Makes every event for `code` fail with [`EmulationError::Platform`].
    pub fn fail_on(&self, code: KeyCode) {
        self.lock().fail_on = Some(code);
    }

    /// Makes every event fail.
    pub fn fail_all(&self) {
        self.lock().should_fail = true;
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlatformKeyEmitter for MockKeyEmitter {
    fn emit(&mut self, code: KeyCode, value: KeyValue) -> Result<(), EmulationError> {
        let mut state = self.lock();
        if state.should_fail || state.fail_on == Some(code) {
            return Err(EmulationError::Platform("mock failure".into()));
        }
        state.events.push((code, value));
        Ok(())
    }
}
