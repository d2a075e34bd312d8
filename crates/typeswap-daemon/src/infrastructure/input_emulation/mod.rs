//! Key emitter implementations.
//!
//! - [`uinput::UinputEmitter`] registers a virtual keyboard through
//!   `/dev/uinput` and writes real kernel events.
//! - [`mock::MockKeyEmitter`] records events in memory for tests.

pub mod mock;
pub mod uinput;
