//! Daemon start-up: wires the real infrastructure into a listener session.
//!
//! Order matters:
//!
//! 1. Open the snippet database.
//! 2. Register the virtual keyboard.
//! 3. Discover physical keyboards, skipping the virtual keyboard by name.
//!
//! Registering first means the virtual keyboard already exists when
//! discovery runs, so it is reliably excluded.  If any step fails, the
//! resources acquired so far are dropped (the virtual keyboard is
//! unregistered) and the caller gets a [`StartupError`] whose message tells
//! the operator how to fix it.

use std::path::Path;

use thiserror::Error;
use tracing::info;
use typeswap_core::StoreError;

use crate::application::emulate_input::{EmulationError, VirtualKeyboard};
use crate::application::expand::{ExpansionOrchestrator, ExpansionSettings};
use crate::application::listen::ExpansionSession;
use crate::infrastructure::clipboard::CommandClipboard;
use crate::infrastructure::input_capture::evdev::{discover, EvdevKeyboard};
use crate::infrastructure::input_capture::multiplexer::DeviceMultiplexer;
use crate::infrastructure::input_capture::CaptureError;
use crate::infrastructure::input_emulation::uinput::UinputEmitter;
use crate::infrastructure::storage::config::{AppConfig, ExpansionConfig};
use crate::infrastructure::storage::snippets::SqliteSnippetStore;

/// Remedy shown when no keyboard can be read.
pub const INPUT_GROUP_REMEDY: &str =
    "add your user to the `input` group (sudo usermod -aG input $USER) and log in again";

/// Remedy shown when the virtual keyboard cannot be created.
pub const UINPUT_REMEDY: &str = "load the uinput module (sudo modprobe uinput) and make /dev/uinput \
writable, e.g. with the udev rule KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\"";

/// A failure that prevents the daemon from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no readable keyboard devices found; {}", INPUT_GROUP_REMEDY)]
    NoKeyboards,

    #[error("cannot read input devices: {0}; {}", INPUT_GROUP_REMEDY)]
    Capture(#[source] CaptureError),

    #[error("cannot create the virtual keyboard: {0}; {}", UINPUT_REMEDY)]
    VirtualDevice(#[source] EmulationError),

    #[error("cannot open the snippet database: {0}")]
    Store(#[from] StoreError),
}

impl From<CaptureError> for StartupError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::NoDevices => StartupError::NoKeyboards,
            other => StartupError::Capture(other),
        }
    }
}

/// The session type the daemon runs.
pub type DaemonSession = ExpansionSession<SqliteSnippetStore, UinputEmitter, CommandClipboard>;

/// Everything the listener thread needs, fully initialised.
pub struct Daemon {
    pub source: DeviceMultiplexer<EvdevKeyboard>,
    pub session: DaemonSession,
}

/// Maps the `[expansion]` config section to orchestrator settings.
pub fn expansion_settings(cfg: &ExpansionConfig) -> ExpansionSettings {
    ExpansionSettings {
        clipboard_threshold: cfg.clipboard_threshold,
        clipboard_settle: cfg.clipboard_settle(),
        restore_delay: cfg.restore_delay(),
    }
}

/// Builds the daemon from `config`, using the snippet database at `database`.
///
/// # Errors
///
/// Any [`StartupError`]; nothing stays registered on failure.
pub fn bootstrap(config: &AppConfig, database: &Path) -> Result<Daemon, StartupError> {
    let store = SqliteSnippetStore::open(database)?;
    info!(path = %database.display(), "snippet database opened");

    let emitter =
        UinputEmitter::register(&config.device.name).map_err(StartupError::VirtualDevice)?;

    let keyboards = discover(Some(emitter.name()))?;
    let source = DeviceMultiplexer::new(keyboards);
    info!(devices = source.device_ids().len(), "capturing keyboards");

    let keyboard = VirtualKeyboard::new(emitter, config.expansion.key_settle());
    let orchestrator = ExpansionOrchestrator::new(
        keyboard,
        CommandClipboard::from_env(),
        expansion_settings(&config.expansion),
    );
    let session = ExpansionSession::new(store, orchestrator, config.expansion.buffer_capacity);

    Ok(Daemon { source, session })
}
