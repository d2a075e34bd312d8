//! Environment checks for `typeswap doctor`.
//!
//! The daemon needs read access to the keyboard device files and write
//! access to `/dev/uinput`.  Without either, start-up fails; these checks
//! report the same conditions up front, each with a remedy.

use std::fs::{self, OpenOptions};
use std::path::Path;

use serde::Serialize;

use crate::application::startup::{INPUT_GROUP_REMEDY, UINPUT_REMEDY};
use crate::infrastructure::clipboard::command::ClipboardBackend;
use crate::infrastructure::clipboard::CommandClipboard;

pub const INPUT_DIR: &str = "/dev/input";
pub const UINPUT_PATH: &str = "/dev/uinput";

/// Result of one environment check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    /// The daemon cannot start while a required check fails.
    pub required: bool,
    pub detail: String,
    /// What to do when the check fails.
    pub remedy: Option<&'static str>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: String) -> Self {
        Self {
            name,
            passed: true,
            required: true,
            detail,
            remedy: None,
        }
    }

    fn fail(name: &'static str, detail: String, remedy: &'static str) -> Self {
        Self {
            name,
            passed: false,
            required: true,
            detail,
            remedy: Some(remedy),
        }
    }

    fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// True when this result should make `doctor` exit non-zero.
    pub fn is_blocking(&self) -> bool {
        self.required && !self.passed
    }
}

/// Runs every check against the real system paths.
pub fn run_checks() -> Vec<CheckResult> {
    vec![
        check_input_devices(Path::new(INPUT_DIR)),
        check_uinput(Path::new(UINPUT_PATH)),
        check_clipboard_tools(&CommandClipboard::from_env()),
    ]
}

/// Passes when at least one `event*` node under `dir` can be opened for reading.
pub fn check_input_devices(dir: &Path) -> CheckResult {
    const NAME: &str = "input devices readable";

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            return CheckResult::fail(NAME, format!("{}: {e}", dir.display()), INPUT_GROUP_REMEDY)
        }
    };

    let mut total = 0usize;
    let mut readable = 0usize;
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with("event") {
            continue;
        }
        total += 1;
        if OpenOptions::new().read(true).open(entry.path()).is_ok() {
            readable += 1;
        }
    }

    let detail = format!("{readable} of {total} event devices readable in {}", dir.display());
    if readable > 0 {
        CheckResult::pass(NAME, detail)
    } else {
        CheckResult::fail(NAME, detail, INPUT_GROUP_REMEDY)
    }
}

/// Passes when `path` can be opened for writing.
pub fn check_uinput(path: &Path) -> CheckResult {
    const NAME: &str = "uinput writable";

    match OpenOptions::new().write(true).open(path) {
        Ok(_) => CheckResult::pass(NAME, format!("{} is writable", path.display())),
        Err(e) => CheckResult::fail(NAME, format!("{}: {e}", path.display()), UINPUT_REMEDY),
    }
}

/// Passes when a clipboard tool for this session is on `PATH`.
///
/// Without one, long snippets are typed instead of pasted.
pub fn check_clipboard_tools(clipboard: &CommandClipboard) -> CheckResult {
    const NAME: &str = "clipboard tool available";
    const REMEDY: &str = "install wl-clipboard (Wayland) or xclip (X11)";

    let found: Vec<&str> = clipboard
        .backends()
        .iter()
        .map(|b| match b {
            ClipboardBackend::WlClipboard => "wl-copy",
            ClipboardBackend::Xclip => "xclip",
        })
        .filter(|program| on_path(program))
        .collect();

    let result = if found.is_empty() {
        CheckResult::fail(NAME, "no clipboard tool found on PATH".to_string(), REMEDY)
    } else {
        CheckResult::pass(NAME, format!("found {}", found.join(", ")))
    };
    result.optional()
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
