//! Snippets and the interface to the store that holds them.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primary key of a snippet in its store.
pub type SnippetId = i64;

/// A named piece of expansion text, optionally bound to a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub name: String,
    /// The typed abbreviation that expands to `content`.  `None` or `""`
    /// means the snippet can only be inserted by other means.
    pub trigger: Option<String>,
    pub content: String,
}

impl Snippet {
    /// Returns the trigger if it is present and non-empty.
    pub fn active_trigger(&self) -> Option<&str> {
        self.trigger.as_deref().filter(|t| !t.is_empty())
    }
}

/// Errors raised by a snippet store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed (database locked, corrupt file, …).
    #[error("snippet store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No snippet has the requested id.
    #[error("snippet {0} not found")]
    NotFound(SnippetId),
}

impl StoreError {
    /// Wraps any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

/// Read access to the snippet collection.
///
/// `list_all` is called once per decoded key press, so implementations must
/// return the most recently committed state without caching stale data.
/// The order of the returned vector is the match precedence order.
pub trait SnippetStore: Send + Sync {
    /// Returns a point-in-time snapshot of every snippet.
    fn list_all(&self) -> Result<Vec<Snippet>, StoreError>;

    /// Returns one snippet, or `Ok(None)` if the id does not exist.
    fn get(&self, id: SnippetId) -> Result<Option<Snippet>, StoreError>;
}

impl<S: SnippetStore + ?Sized> SnippetStore for Arc<S> {
    fn list_all(&self) -> Result<Vec<Snippet>, StoreError> {
        (**self).list_all()
    }

    fn get(&self, id: SnippetId) -> Result<Option<Snippet>, StoreError> {
        (**self).get(id)
    }
}

/// In-memory snippet store.
///
/// Clones share the same underlying collection, so a test can keep one handle
/// for writes while the pipeline reads through another.  Iteration order is
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySnippetStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    snippets: Vec<Snippet>,
    next_id: SnippetId,
}

impl MemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snippet and returns its id.
    pub fn insert(&self, name: &str, trigger: Option<&str>, content: &str) -> SnippetId {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner.snippets.push(Snippet {
            id,
            name: name.to_string(),
            trigger: trigger.map(str::to_string),
            content: content.to_string(),
        });
        id
    }

    /// Removes a snippet.  Returns `false` if the id did not exist.
    pub fn remove(&self, id: SnippetId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = inner.snippets.len();
        inner.snippets.retain(|s| s.id != id);
        inner.snippets.len() != before
    }
}

impl SnippetStore for MemorySnippetStore {
    fn list_all(&self) -> Result<Vec<Snippet>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.snippets.clone())
    }

    fn get(&self, id: SnippetId) -> Result<Option<Snippet>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.snippets.iter().find(|s| s.id == id).cloned())
    }
}
