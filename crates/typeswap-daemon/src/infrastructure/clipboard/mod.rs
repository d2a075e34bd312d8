//! System clipboard bridge.
//!
//! Long expansions are pasted rather than typed: the content is placed on
//! the clipboard and a Ctrl+V chord is injected.  Every clipboard failure is
//! recoverable for the caller, which falls back to typing.

use thiserror::Error;

pub mod command;
pub mod memory;

pub use command::CommandClipboard;
pub use memory::MemoryClipboard;

/// Error type for clipboard operations.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard tool could be started (not installed, not on `PATH`).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the desktop clipboard.
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard: Send {
    /// Replaces the clipboard content with `text`.
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;

    /// Returns the current clipboard content as raw bytes.
    fn paste(&self) -> Result<Vec<u8>, ClipboardError>;
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).copy(text)
    }

    fn paste(&self) -> Result<Vec<u8>, ClipboardError> {
        (**self).paste()
    }
}
