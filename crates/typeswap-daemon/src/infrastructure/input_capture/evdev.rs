//! Keyboard discovery and reading through the `evdev` crate.
//!
//! # Which devices count as keyboards?
//!
//! `/dev/input` also holds mice, touchpads, power buttons, lid switches and
//! media-key pads, several of which advertise `EV_KEY`.  A device is treated
//! as a keyboard when it reports `EV_KEY` *and* its key capability set
//! contains `KEY_A`.  Power buttons and mice never have a letter key.
//!
//! # Permissions
//!
//! Device nodes are usually `root:input 0660`.  [`evdev::enumerate`] silently
//! skips nodes it cannot open, so a user outside the `input` group sees no
//! keyboards at all, which discovery reports as [`CaptureError::NoDevices`].

use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::path::PathBuf;

use ::evdev::{Device, EventType, Key};
use tracing::{debug, info};

use super::{CaptureError, KeyRecord, KeyboardDevice};

/// One keyboard opened for non-blocking reads.
pub struct EvdevKeyboard {
    path: PathBuf,
    name: String,
    device: Device,
}

impl EvdevKeyboard {
    fn open(path: PathBuf, device: Device) -> io::Result<Self> {
        set_nonblocking(device.as_raw_fd())?;
        let name = device.name().unwrap_or("unnamed device").to_string();
        Ok(Self { path, name, device })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl KeyboardDevice for EvdevKeyboard {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_fd(&self) -> RawFd {
        self.device.as_raw_fd()
    }

    fn read_key_records(&mut self) -> io::Result<Vec<KeyRecord>> {
        let events = self.device.fetch_events()?;
        Ok(events
            .filter(|e| e.event_type() == EventType::KEY)
            .map(|e| KeyRecord {
                code: e.code(),
                value: e.value(),
                timestamp: e.timestamp(),
            })
            .collect())
    }
}

/// Summary of one input device, for the `devices` command.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_keyboard: bool,
}

/// Returns `true` if the device reports key events including `KEY_A`.
pub fn is_keyboard(device: &Device) -> bool {
    device.supported_events().contains(EventType::KEY)
        && device
            .supported_keys()
            .map_or(false, |keys| keys.contains(Key::KEY_A))
}

/// Lists every input device this process can open.
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = ::evdev::enumerate()
        .map(|(path, device)| DeviceInfo {
            name: device.name().unwrap_or("unnamed device").to_string(),
            is_keyboard: is_keyboard(&device),
            path,
        })
        .collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}

/// Opens every keyboard, skipping any device named `exclude_name`.
///
/// Pass the virtual keyboard's own name as `exclude_name` so injected
/// keystrokes are never read back as user input.
///
/// # Errors
///
/// [`CaptureError::NoDevices`] if nothing qualifies.
pub fn discover(exclude_name: Option<&str>) -> Result<Vec<EvdevKeyboard>, CaptureError> {
    let mut candidates: Vec<(PathBuf, Device)> = ::evdev::enumerate().collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut keyboards = Vec::new();
    for (path, device) in candidates {
        let name = device.name().unwrap_or_default();
        if exclude_name.is_some_and(|excluded| excluded == name) {
            debug!(path = %path.display(), "skipping own virtual keyboard");
            continue;
        }
        if !is_keyboard(&device) {
            continue;
        }
        match EvdevKeyboard::open(path.clone(), device) {
            Ok(keyboard) => {
                info!(path = %path.display(), name = keyboard.name(), "keyboard found");
                keyboards.push(keyboard);
            }
            Err(e) => debug!(path = %path.display(), "cannot use device: {e}"),
        }
    }

    if keyboards.is_empty() {
        return Err(CaptureError::NoDevices);
    }
    Ok(keyboards)
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fcntl on a descriptor we own; F_GETFL/F_SETFL take no pointers.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
