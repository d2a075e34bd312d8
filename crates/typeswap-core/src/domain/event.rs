//! Raw keyboard events as read from the kernel device interface.

use std::fmt;
use std::time::SystemTime;

use super::key::KeyValue;

/// Identifies one open input device for the lifetime of a capture session.
///
/// Ids are assigned in discovery order and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev#{}", self.0)
    }
}

/// One `EV_KEY` record from a keyboard device.
///
/// Non-key records (`EV_SYN`, `EV_MSC`, `EV_LED`, …) never become a
/// `RawInputEvent`; the capture layer filters them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    /// Device the event was read from.
    pub device: DeviceId,
    /// Kernel key code (see [`crate::keymap::codes::KeyCode`]).
    pub code: u16,
    /// Press, release or autorepeat.
    pub value: KeyValue,
    /// Kernel timestamp of the event.
    pub timestamp: SystemTime,
}

impl RawInputEvent {
    /// Builds an event stamped with the current time.
    ///
    /// Mostly useful for tests and mock sources.
    pub fn now(device: DeviceId, code: u16, value: KeyValue) -> Self {
        Self {
            device,
            code,
            value,
            timestamp: SystemTime::now(),
        }
    }
}
