//! Clipboard access through the standard command-line tools.
//!
//! | Session | Write            | Read                         |
//! |---------|------------------|------------------------------|
//! | Wayland | `wl-copy`        | `wl-paste --no-newline`      |
//! | X11     | `xclip -selection clipboard` | `xclip -selection clipboard -o` |
//!
//! On Wayland (`WAYLAND_DISPLAY` set) the `wl-clipboard` tools are tried
//! first and `xclip` is the fallback, which covers XWayland-only setups.
//!
//! Both `wl-copy` and `xclip` fork a background process that keeps serving
//! the selection after the tool itself exits.  That process inherits the
//! tool's stdio, so `copy` never reads the tool's output pipes: it writes
//! stdin, closes it and waits for the exit status only.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use super::{Clipboard, ClipboardError};

/// A clipboard tool pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    WlClipboard,
    Xclip,
}

impl ClipboardBackend {
    fn copy_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            ClipboardBackend::WlClipboard => ("wl-copy", &[]),
            ClipboardBackend::Xclip => ("xclip", &["-selection", "clipboard"]),
        }
    }

    fn paste_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            ClipboardBackend::WlClipboard => ("wl-paste", &["--no-newline"]),
            ClipboardBackend::Xclip => ("xclip", &["-selection", "clipboard", "-o"]),
        }
    }
}

/// Clipboard backed by external commands, tried in order.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    backends: Vec<ClipboardBackend>,
    /// Run the tools from this directory instead of looking them up on `PATH`.
    tool_dir: Option<PathBuf>,
}

impl CommandClipboard {
    /// Picks backends from the session environment.
    pub fn from_env() -> Self {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty());
        Self::for_session(wayland)
    }

    pub fn for_session(wayland: bool) -> Self {
        let backends = if wayland {
            vec![ClipboardBackend::WlClipboard, ClipboardBackend::Xclip]
        } else {
            vec![ClipboardBackend::Xclip]
        };
        Self {
            backends,
            tool_dir: None,
        }
    }

    pub fn backends(&self) -> &[ClipboardBackend] {
        &self.backends
    }

    fn command(&self, program: &str) -> Command {
        match &self.tool_dir {
            Some(dir) => Command::new(dir.join(program)),
            None => Command::new(program),
        }
    }

    /// Runs `f` on each backend until one succeeds; returns the last error.
    fn first_success<T>(
        &self,
        mut f: impl FnMut(ClipboardBackend) -> Result<T, ClipboardError>,
    ) -> Result<T, ClipboardError> {
        let mut last = ClipboardError::Unavailable("no clipboard backend configured".into());
        for &backend in &self.backends {
            match f(backend) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(?backend, "clipboard backend failed: {e}");
                    last = e;
                }
            }
        }
        Err(last)
    }
}

impl Clipboard for CommandClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.first_success(|backend| {
            let (program, args) = backend.copy_command();
            let spawn_err = |source| ClipboardError::Spawn {
                program: program.to_string(),
                source,
            };
            let mut child = self
                .command(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map_err(spawn_err)?;
            // stdin is dropped at the end of the closure, which sends EOF.
            let written = child
                .stdin
                .take()
                .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));
            let status = child.wait().map_err(spawn_err)?;
            check_status(program, status, &[])?;
            written.map_err(spawn_err)
        })
    }

    fn paste(&self) -> Result<Vec<u8>, ClipboardError> {
        self.first_success(|backend| {
            let (program, args) = backend.paste_command();
            let output = self
                .command(program)
                .args(args)
                .stdin(Stdio::null())
                .output()
                .map_err(|source| ClipboardError::Spawn {
                    program: program.to_string(),
                    source,
                })?;
            check_status(program, output.status, &output.stderr)?;
            Ok(output.stdout)
        })
    }
}

fn check_status(program: &str, status: ExitStatus, stderr: &[u8]) -> Result<(), ClipboardError> {
    if status.success() {
        return Ok(());
    }
    Err(ClipboardError::CommandFailed {
        program: program.to_string(),
        status,
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    })
}
