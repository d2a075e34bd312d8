//! Virtual keyboard registration through the kernel uinput interface.
//!
//! # What is uinput? (for beginners)
//!
//! `/dev/uinput` lets a user-space process create an input device that the
//! rest of the system cannot tell apart from a physical one.  The process
//! declares which key codes the device can produce, then writes
//! `input_event` records to it.  The kernel publishes them on a new
//! `/dev/input/eventN` node, where the display server (or the console) picks
//! them up like any other keyboard.
//!
//! Because the events enter the system at the kernel level, they reach X11,
//! Wayland compositors and virtual consoles alike, with no XTest or portal
//! involved.
//!
//! # Permissions
//!
//! Opening `/dev/uinput` for writing normally requires root or membership in
//! a group granted access by a udev rule (commonly `input` or `uinput`).
//!
//! # Lifetime
//!
//! The device is unregistered when the [`UinputEmitter`] is dropped (closing
//! the file descriptor destroys the device).

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::info;
use typeswap_core::{KeyCode, KeyValue};

use crate::application::emulate_input::{EmulationError, PlatformKeyEmitter};

/// A registered uinput keyboard.
pub struct UinputEmitter {
    device: VirtualDevice,
    name: String,
}

impl UinputEmitter {
    /// Registers a virtual keyboard named `name` able to emit every code in
    /// [`KeyCode::ALL`].
    ///
    /// # Errors
    ///
    /// [`EmulationError::Io`] if `/dev/uinput` cannot be opened or the device
    /// cannot be created (typically `EACCES`).
    pub fn register(name: &str) -> Result<Self, EmulationError> {
        let mut keys = AttributeSet::<Key>::new();
        for code in KeyCode::ALL {
            keys.insert(Key::new(code.as_u16()));
        }

        let device = VirtualDeviceBuilder::new()?
            .name(name)
            .with_keys(&keys)?
            .build()?;

        info!(name, key_count = KeyCode::ALL.len(), "virtual keyboard registered");
        Ok(Self {
            device,
            name: name.to_string(),
        })
    }

    /// The device name other processes (and our own discovery) see.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PlatformKeyEmitter for UinputEmitter {
    /// Writes one `EV_KEY` event; `VirtualDevice::emit` appends the
    /// `SYN_REPORT` barrier.
    fn emit(&mut self, code: KeyCode, value: KeyValue) -> Result<(), EmulationError> {
        let event = InputEvent::new(EventType::KEY, code.as_u16(), value.as_raw());
        self.device.emit(&[event])?;
        Ok(())
    }
}

impl Drop for UinputEmitter {
    fn drop(&mut self) {
        info!(name = %self.name, "virtual keyboard unregistered");
    }
}
