//! typeswap-daemon library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the daemon do? (for beginners)
//!
//! typeswap is a text expander.  You store a snippet such as
//! `;sig` → `Jane Doe`, and whenever you type `;sig` in *any* application the
//! daemon erases those four characters and types `Jane Doe` instead.
//!
//! It does this below the display server, so it works the same on X11, on
//! Wayland and on a bare console:
//!
//! 1. Reads raw key events from every keyboard under `/dev/input/event*`
//!    (the kernel's evdev interface).
//! 2. Decodes them into characters with `typeswap-core`, tracking Shift and
//!    Caps Lock itself.
//! 3. Keeps a short buffer of recent characters and checks it against the
//!    snippet triggers stored in SQLite.
//! 4. On a match, types Backspace once per trigger character and then the
//!    expansion, through a *virtual keyboard* registered with `/dev/uinput`.
//!    Long expansions go through the clipboard and a Ctrl+V instead.
//!
//! Capture and injection run on one thread, one event batch at a time, so
//! injected keystrokes can never interleave with the user's own.

/// Application layer: the virtual keyboard primitives, expansion and the
/// listener session.
pub mod application;

/// Infrastructure layer: evdev, uinput, clipboard, SQLite and config adapters.
pub mod infrastructure;
