//! Application layer for the typeswap daemon.
//!
//! Use cases here orchestrate the domain (`typeswap_core`) and depend on the
//! infrastructure only through traits (`PlatformKeyEmitter`, `Clipboard`,
//! `InputSource`, `SnippetStore`), so every path is testable with mocks.
//! The one exception is `startup`, which wires the real adapters together.

pub mod emulate_input;
pub mod expand;
pub mod listen;
pub mod startup;
