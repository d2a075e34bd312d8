//! TOML-based configuration for the daemon.
//!
//! Reads `AppConfig` from `$XDG_CONFIG_HOME/typeswap/config.toml`
//! (`~/.config/typeswap/config.toml` when the variable is unset).
//!
//! # Example
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [capture]
//! poll_timeout_ms = 500
//!
//! [expansion]
//! buffer_capacity = 50
//! clipboard_threshold = 50
//! key_settle_ms = 10
//! clipboard_settle_ms = 100
//! restore_delay_ms = 200
//!
//! [device]
//! name = "typeswap virtual keyboard"
//!
//! [storage]
//! database_path = "/home/jane/.local/share/typeswap/snippets.db"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "…")]`, so a file that sets only
//! one value (or an empty file) is valid and everything else keeps its
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typeswap_core::DEFAULT_BUFFER_CAPACITY;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine config directory (HOME is not set)")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`,
    /// or any `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Upper bound on how long one device poll blocks.  Also bounds how long
    /// shutdown waits for the listener thread.
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpansionConfig {
    /// Characters kept for trigger matching.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Content with at least this many characters is pasted, not typed.
    #[serde(default = "default_clipboard_threshold")]
    pub clipboard_threshold: usize,
    /// Pause after each synthetic tap.
    #[serde(default = "default_key_settle_ms")]
    pub key_settle_ms: u64,
    /// Pause between writing the clipboard and pressing Ctrl+V.
    #[serde(default = "default_clipboard_settle_ms")]
    pub clipboard_settle_ms: u64,
    /// Pause between Ctrl+V and restoring the previous clipboard.
    #[serde(default = "default_restore_delay_ms")]
    pub restore_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Name of the uinput device.  Discovery skips input devices with this name.
    #[serde(default = "default_device_name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// SQLite file.  Defaults to `$XDG_DATA_HOME/typeswap/snippets.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_poll_timeout_ms() -> u64 {
    500
}
fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}
fn default_clipboard_threshold() -> usize {
    50
}
fn default_key_settle_ms() -> u64 {
    10
}
fn default_clipboard_settle_ms() -> u64 {
    100
}
fn default_restore_delay_ms() -> u64 {
    200
}
fn default_device_name() -> String {
    "typeswap virtual keyboard".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            clipboard_threshold: default_clipboard_threshold(),
            key_settle_ms: default_key_settle_ms(),
            clipboard_settle_ms: default_clipboard_settle_ms(),
            restore_delay_ms: default_restore_delay_ms(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_device_name(),
        }
    }
}

impl CaptureConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl ExpansionConfig {
    pub fn key_settle(&self) -> Duration {
        Duration::from_millis(self.key_settle_ms)
    }

    pub fn clipboard_settle(&self) -> Duration {
        Duration::from_millis(self.clipboard_settle_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// `$XDG_CONFIG_HOME/typeswap`, or `~/.config/typeswap`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither variable is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    xdg_dir("XDG_CONFIG_HOME", ".config").ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// `$XDG_DATA_HOME/typeswap/snippets.db`, or `~/.local/share/typeswap/snippets.db`.
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .map(|dir| dir.join("snippets.db"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

impl AppConfig {
    /// The configured database path, or the XDG default.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    let base = std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(home_fallback)))?;
    Some(base.join("typeswap"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
