//! The rolling trigger buffer.
//!
//! # How matching works (for beginners)
//!
//! The buffer remembers the last [`DEFAULT_BUFFER_CAPACITY`] characters the
//! user typed.  After every key press it checks whether the text *ends with*
//! one of the snippet triggers:
//!
//! ```text
//! typed:    h e l l o ␣ ; s i g
//! buffer:   "hello ;sig"
//! triggers: ";sig", ";addr"
//!                       ^^^^ suffix match on ";sig"
//! ```
//!
//! On a match the buffer is emptied, so an expansion can never chain into
//! another expansion.
//!
//! The buffer only sees logical keys, so it has no idea *where* the text
//! cursor is.  Moving the cursor with the arrow keys or the mouse does not
//! clear it.

use std::collections::VecDeque;

use crate::domain::key::{LogicalKey, NamedKey};
use crate::domain::snippet::{Snippet, SnippetId};

/// Default number of characters kept in the buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 50;

/// A trigger found at the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub snippet_id: SnippetId,
    pub trigger: String,
    pub content: String,
}

/// Bounded FIFO of recently typed characters.
#[derive(Debug, Clone)]
pub struct TriggerBuffer {
    chars: VecDeque<char>,
    capacity: usize,
}

impl Default for TriggerBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl TriggerBuffer {
    /// Creates an empty buffer.  A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            chars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns the buffered text, oldest character first.
    pub fn contents(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Applies the buffer mutation rule for one key press.
    ///
    /// Characters and Space append, Backspace removes the last character,
    /// Enter clears everything, and every other named key is ignored.
    pub fn apply(&mut self, key: &LogicalKey) {
        match key {
            LogicalKey::Char(c) => self.push(*c),
            LogicalKey::Named(NamedKey::Space) => self.push(' '),
            LogicalKey::Named(NamedKey::Backspace) => {
                self.chars.pop_back();
            }
            LogicalKey::Named(NamedKey::Enter) => self.chars.clear(),
            LogicalKey::Named(_) => {}
        }
    }

    /// Applies `key`, then checks the buffer suffix against `snippets`.
    ///
    /// The first snippet (in slice order) whose non-empty trigger is a suffix
    /// of the buffer wins and the buffer is cleared.  Without a match the
    /// buffer is left exactly as [`apply`](Self::apply) made it.
    pub fn feed(&mut self, key: &LogicalKey, snippets: &[Snippet]) -> Option<TriggerMatch> {
        self.apply(key);

        let found = snippets.iter().find_map(|snippet| {
            let trigger = snippet.active_trigger()?;
            self.ends_with(trigger).then(|| TriggerMatch {
                snippet_id: snippet.id,
                trigger: trigger.to_string(),
                content: snippet.content.clone(),
            })
        })?;

        tracing::debug!(
            snippet_id = found.snippet_id,
            trigger_len = found.trigger.chars().count(),
            "trigger matched"
        );
        self.chars.clear();
        Some(found)
    }

    fn push(&mut self, c: char) {
        if self.chars.len() == self.capacity {
            self.chars.pop_front();
        }
        self.chars.push_back(c);
    }

    fn ends_with(&self, suffix: &str) -> bool {
        let n = suffix.chars().count();
        if n > self.chars.len() {
            return false;
        }
        self.chars
            .iter()
            .skip(self.chars.len() - n)
            .copied()
            .eq(suffix.chars())
    }
}
