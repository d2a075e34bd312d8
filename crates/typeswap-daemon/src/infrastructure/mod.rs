//! Infrastructure layer for the typeswap daemon.
//!
//! Contains OS-facing adapters: kernel input devices, the clipboard, the
//! snippet database and the config file.
//!
//! **Dependency rule**: this layer may depend on `application` traits and
//! `typeswap_core`, but the application layer reaches it only through those
//! traits.
//!
//! # Sub-modules
//!
//! - **`input_capture`** – evdev keyboards multiplexed with `poll(2)`, plus a
//!   `MockInputSource`.
//! - **`input_emulation`** – the uinput virtual keyboard, plus a
//!   `MockKeyEmitter`.
//! - **`clipboard`** – `wl-copy`/`wl-paste` or `xclip` via subprocesses, plus
//!   an in-memory clipboard.
//! - **`storage`** – the SQLite snippet store and the TOML config file.
//! - **`environment`** – permission checks behind `typeswap doctor`.
//! - **`signals`** – SIGINT/SIGTERM streams for a clean shutdown.

pub mod clipboard;
pub mod environment;
pub mod input_capture;
pub mod input_emulation;
pub mod signals;
pub mod storage;
