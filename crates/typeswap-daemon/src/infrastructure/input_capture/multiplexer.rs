//! Multiplexed reads across every open keyboard.
//!
//! # How it works (for beginners)
//!
//! Reading a device file blocks until the user presses a key on *that*
//! keyboard.  With two keyboards attached we cannot block on either one, so
//! we hand all of their file descriptors to `poll(2)`, which sleeps until at
//! least one is readable (or the timeout expires) and tells us which.
//!
//! ```text
//!   kbd A ─┐
//!   kbd B ─┼─► poll(fds, timeout) ─► read ready devices ─► Vec<RawInputEvent>
//!   kbd C ─┘
//! ```
//!
//! Events from one device keep their order.  When two devices are ready in
//! the same round, their events are concatenated in device order, not sorted
//! by timestamp.
//!
//! # Unplugging
//!
//! A device that reports `POLLNVAL`, or whose read fails with anything other
//! than `EAGAIN`/`EINTR`, is dropped from the set with a warning.  The other
//! devices are unaffected.

use std::io;
use std::time::Duration;

use tracing::{debug, warn};
use typeswap_core::{DeviceId, KeyValue, RawInputEvent};

use super::{CaptureError, InputSource, KeyboardDevice};

struct Slot<D> {
    id: DeviceId,
    device: D,
}

/// Merges several keyboards into one event stream.
pub struct DeviceMultiplexer<D: KeyboardDevice> {
    slots: Vec<Slot<D>>,
    next_id: u32,
}

impl<D: KeyboardDevice> Default for DeviceMultiplexer<D> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }
}

impl<D: KeyboardDevice> DeviceMultiplexer<D> {
    /// Creates a multiplexer over `devices`, assigning ids in order.
    pub fn new(devices: impl IntoIterator<Item = D>) -> Self {
        let mut mux = Self::default();
        for device in devices {
            mux.add(device);
        }
        mux
    }

    /// Adds a device and returns the id its events will carry.
    pub fn add(&mut self, device: D) -> DeviceId {
        let id = DeviceId(self.next_id);
        self.next_id += 1;
        debug!(%id, name = device.name(), "device added");
        self.slots.push(Slot { id, device });
        id
    }

    /// Ids of the devices still open, in read order.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    fn drop_slot(&mut self, index: usize, reason: &dyn std::fmt::Display) {
        let slot = self.slots.remove(index);
        warn!(
            id = %slot.id,
            name = slot.device.name(),
            remaining = self.slots.len(),
            "keyboard lost, continuing without it: {reason}"
        );
    }
}

impl<D: KeyboardDevice> InputSource for DeviceMultiplexer<D> {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawInputEvent>, CaptureError> {
        if self.slots.is_empty() {
            std::thread::sleep(timeout);
            return Ok(Vec::new());
        }

        let mut fds: Vec<libc::pollfd> = self
            .slots
            .iter()
            .map(|slot| libc::pollfd {
                fd: slot.device.raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();
        let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        // SAFETY: `fds` is a valid, exclusively borrowed array of `fds.len()`
        // pollfd structs that outlives the call.
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(CaptureError::Poll(err));
        }
        if rc == 0 {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        let mut lost: Vec<(usize, String)> = Vec::new();

        for (index, pfd) in fds.iter().enumerate() {
            if pfd.revents == 0 {
                continue;
            }
            let slot = &mut self.slots[index];
            if pfd.revents & libc::POLLNVAL != 0 {
                lost.push((index, "invalid file descriptor".to_string()));
                continue;
            }
            match slot.device.read_key_records() {
                Ok(records) => {
                    events.extend(records.into_iter().filter_map(|record| {
                        let value = KeyValue::from_raw(record.value)?;
                        Some(RawInputEvent {
                            device: slot.id,
                            code: record.code,
                            value,
                            timestamp: record.timestamp,
                        })
                    }));
                }
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => lost.push((index, e.to_string())),
            }
        }

        for (index, reason) in lost.into_iter().rev() {
            self.drop_slot(index, &reason);
        }
        if self.slots.is_empty() {
            warn!("no keyboards left to read; waiting idle");
        }

        Ok(events)
    }

    fn device_count(&self) -> usize {
        self.slots.len()
    }
}
