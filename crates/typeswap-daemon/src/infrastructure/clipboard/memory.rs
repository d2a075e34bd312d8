//! In-memory clipboard for tests and headless runs.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Clipboard, ClipboardError};

#[derive(Debug, Default)]
struct MemoryState {
    content: Vec<u8>,
    history: Vec<String>,
    fail_copy: bool,
    fail_paste: bool,
}

/// A clipboard that lives in process memory.
///
/// Clones share state, and every successful `copy` is appended to a history
/// so tests can check the full sequence of writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard already holding `content`.
    pub fn with_content(content: &str) -> Self {
        let clipboard = Self::new();
        clipboard.lock().content = content.as_bytes().to_vec();
        clipboard
    }

    /// Replaces the content with raw bytes, bypassing the history.
    pub fn set_bytes(&self, bytes: &[u8]) {
        self.lock().content = bytes.to_vec();
    }

    /// Current content, lossily decoded.
    pub fn content(&self) -> String {
        String::from_utf8_lossy(&self.lock().content).into_owned()
    }

    /// Every successful `copy`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    pub fn fail_copy(&self) {
        self.lock().fail_copy = true;
    }

    pub fn fail_paste(&self) {
        self.lock().fail_paste = true;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.lock();
        if state.fail_copy {
            return Err(ClipboardError::Unavailable("memory clipboard write disabled".into()));
        }
        state.content = text.as_bytes().to_vec();
        state.history.push(text.to_string());
        Ok(())
    }

    fn paste(&self) -> Result<Vec<u8>, ClipboardError> {
        let state = self.lock();
        if state.fail_paste {
            return Err(ClipboardError::Unavailable("memory clipboard read disabled".into()));
        }
        Ok(state.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_then_paste() {
        let clipboard = MemoryClipboard::new();

        clipboard.copy("hello").unwrap();

        assert_eq!(clipboard.paste().unwrap(), b"hello");
        assert_eq!(clipboard.history(), vec!["hello"]);
    }

    #[test]
    fn test_failures_are_reported() {
        let clipboard = MemoryClipboard::with_content("kept");
        clipboard.fail_copy();
        clipboard.fail_paste();

        assert!(clipboard.copy("x").is_err());
        assert!(clipboard.paste().is_err());
        assert_eq!(clipboard.content(), "kept");
    }
}
