//! Domain entities for typeswap.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What lives here (for beginners)
//!
//! A keystroke travels through the domain in four steps:
//!
//! 1. [`event::RawInputEvent`] – one kernel `EV_KEY` record: a key code and
//!    whether the key went down, up, or autorepeated.
//! 2. [`modifiers::ModifierTracker`] – remembers which of Shift, Ctrl, Alt and
//!    Meta are held right now, and whether Caps Lock is on.
//! 3. [`decoder::KeyEventDecoder`] – turns a raw event plus the modifier state
//!    into a [`key::LogicalKey`] such as `Char('A')` or `Named(Enter)`.
//! 4. [`trigger::TriggerBuffer`] – keeps the last few typed characters and
//!    reports when they end with a snippet trigger.
//!
//! Snippets themselves come from a [`snippet::SnippetStore`], an interface
//! implemented by the SQLite store in the daemon and by an in-memory store
//! here for tests.

pub mod decoder;
pub mod event;
pub mod key;
pub mod modifiers;
pub mod snippet;
pub mod trigger;
