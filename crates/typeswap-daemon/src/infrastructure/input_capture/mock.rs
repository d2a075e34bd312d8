//! Mock input source for unit testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without requiring
//! `/dev/input` access or a physical keyboard.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use typeswap_core::{DeviceId, KeyCode, KeyValue, RawInputEvent};

use super::{CaptureError, InputSource};

/// Cloneable handle used by a test to push events into a [`MockInputSource`].
#[derive(Debug, Clone)]
pub struct MockInjector {
    sender: Sender<RawInputEvent>,
    device: DeviceId,
}

impl MockInjector {
    /// Injects a synthetic event, as if read from hardware.
    ///
    /// Returns `false` once the source has been dropped.
    pub fn inject(&self, event: RawInputEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    /// Injects a Down then an Up for `code`.
    pub fn tap(&self, code: KeyCode) -> bool {
        self.key(code, KeyValue::Down) && self.key(code, KeyValue::Up)
    }

    pub fn key(&self, code: KeyCode, value: KeyValue) -> bool {
        self.inject(RawInputEvent::now(self.device, code.as_u16(), value))
    }

    /// A handle that tags events with another device id.
    pub fn for_device(&self, device: DeviceId) -> Self {
        Self {
            sender: self.sender.clone(),
            device,
        }
    }
}

/// A channel-backed [`InputSource`].
pub struct MockInputSource {
    receiver: Receiver<RawInputEvent>,
    injector: MockInjector,
}

impl MockInputSource {
    /// Creates a new mock source.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            receiver,
            injector: MockInjector {
                sender,
                device: DeviceId(0),
            },
        }
    }

    /// Returns an injector for device 0.
    pub fn injector(&self) -> MockInjector {
        self.injector.clone()
    }
}

impl Default for MockInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MockInputSource {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawInputEvent>, CaptureError> {
        let first = match self.receiver.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => return Err(CaptureError::Closed),
        };
        let mut events = vec![first];
        events.extend(self.receiver.try_iter());
        Ok(events)
    }

    fn device_count(&self) -> usize {
        1
    }
}
