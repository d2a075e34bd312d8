//! Storage infrastructure: configuration file and snippet database.
//!
//! - **`config`** – reads the TOML configuration from the XDG config
//!   directory, falling back to defaults when the file does not exist yet.
//! - **`snippets`** – the SQLite snippet store.  The daemon reads it on every
//!   key press; the `typeswap snippets` commands (and any editor sharing the
//!   file) write to it.

pub mod config;
pub mod snippets;
