//! # typeswap-core
//!
//! Shared library for the typeswap text expander containing the Linux key code
//! tables, the keystroke decoder and the trigger-matching buffer.
//!
//! This crate has zero dependencies on OS APIs, device files or databases.
//! Everything in it is a pure function of its inputs, which is what makes the
//! capture → decode → match path unit-testable without a keyboard attached.
//!
//! # Architecture overview (for beginners)
//!
//! typeswap watches raw keystrokes from every keyboard on the machine,
//! notices when the user has just typed a short *trigger* (for example
//! `;sig`), erases it, and types a longer *expansion* in its place.
//!
//! This crate (`typeswap-core`) is the platform-free part of that pipeline:
//!
//! - **`keymap`** – Tables that translate Linux input key codes
//!   (`KEY_A` = 30, `KEY_ENTER` = 28, …) to characters and named keys, and
//!   back again for injection.  Characters are keyed by *physical position*
//!   on a US layout, not by the active locale.
//!
//! - **`domain`** – The logical model: raw events, modifier tracking, the
//!   decoder that turns raw events into logical key presses, the rolling
//!   trigger buffer, and the snippet-store interface.
//!
//! The device I/O (evdev capture, uinput injection), the SQLite store and the
//! expansion orchestration live in `typeswap-daemon`.

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `typeswap_core::TriggerBuffer` instead of the full module path.
pub use domain::decoder::{resolve_key, KeyEventDecoder};
pub use domain::event::{DeviceId, RawInputEvent};
pub use domain::key::{KeyValue, LogicalKey, NamedKey};
pub use domain::modifiers::{ModifierState, ModifierTracker};
pub use domain::snippet::{MemorySnippetStore, Snippet, SnippetId, SnippetStore, StoreError};
pub use domain::trigger::{TriggerBuffer, TriggerMatch, DEFAULT_BUFFER_CAPACITY};
pub use keymap::codes::KeyCode;
pub use keymap::KeyMapper;
