//! Keyboard capture infrastructure.
//!
//! On Linux every keyboard is exposed by the kernel as a character device
//! under `/dev/input/event*`.  Reading one yields fixed-size
//! `input_event` records `{time, type, code, value}`.  This module opens every
//! device that looks like a keyboard and multiplexes them into one ordered
//! stream of [`RawInputEvent`]s.
//!
//! # Layout
//!
//! - [`multiplexer::DeviceMultiplexer`] – `poll(2)` across any set of
//!   [`KeyboardDevice`]s, dropping devices that fail mid-stream.
//! - [`evdev`] – the real device type and discovery.
//! - [`mock::MockInputSource`] – channel-backed source for tests.
//!
//! # Testability
//!
//! The [`InputSource`] trait lets the listener run against synthetic events
//! without a keyboard or `/dev/input` access.

use std::io;
use std::os::fd::RawFd;
use std::time::{Duration, SystemTime};

use thiserror::Error;
use typeswap_core::RawInputEvent;

pub mod evdev;
pub mod mock;
pub mod multiplexer;

/// Error type for input capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Discovery found no device with key events including `KEY_A`.
    #[error("no keyboard devices found")]
    NoDevices,

    /// `/dev/input` could not be listed.
    #[error("failed to enumerate input devices: {0}")]
    Enumerate(#[source] io::Error),

    /// `poll(2)` itself failed (not a single device).
    #[error("input poll failed: {0}")]
    Poll(#[source] io::Error),

    /// The source has been closed and will never produce events again.
    #[error("input source closed")]
    Closed,
}

/// A source of raw key events.
///
/// Implementations block in `poll` for at most `timeout` and return every
/// event that became available, in arrival order per device.
pub trait InputSource: Send {
    /// Waits up to `timeout` and returns the ready events (possibly none).
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawInputEvent>, CaptureError>;

    /// Number of devices still being read.
    fn device_count(&self) -> usize;
}

/// One `EV_KEY` record read from a device, before it is tagged with a
/// [`DeviceId`](typeswap_core::DeviceId).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub code: u16,
    pub value: i32,
    pub timestamp: SystemTime,
}

/// A readable keyboard device the multiplexer can wait on.
pub trait KeyboardDevice: Send {
    /// Human-readable device name (for logs).
    fn name(&self) -> &str;

    /// File descriptor to pass to `poll(2)`.
    fn raw_fd(&self) -> RawFd;

    /// Reads the key records currently available without blocking.
    ///
    /// Returns `Err` with [`io::ErrorKind::WouldBlock`] when nothing is
    /// pending.  Any other error means the device is gone.
    fn read_key_records(&mut self) -> io::Result<Vec<KeyRecord>>;
}
