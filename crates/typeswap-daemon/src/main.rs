//! typeswap — entry point.
//!
//! Parses the command line, loads the configuration and either runs the
//! expansion daemon or one of the maintenance commands.
//!
//! # Usage
//!
//! ```text
//! typeswap [OPTIONS] [COMMAND]
//!
//! Commands:
//!   run       Run the expansion daemon (default)
//!   devices   List input devices and whether each is treated as a keyboard
//!   doctor    Check device permissions and clipboard tools
//!   snippets  List, add or remove snippets
//!
//! Options:
//!   --config <PATH>      Config file [default: $XDG_CONFIG_HOME/typeswap/config.toml]
//!   --database <PATH>    Snippet database (overrides the config file)
//!   --log-level <LEVEL>  Log filter (overrides the config file; RUST_LOG wins)
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ bootstrap()            -- open db, register uinput, discover keyboards
//!  └─ Listener::spawn()      -- capture → decode → match → expand thread
//!  └─ wait for SIGINT / SIGTERM, or the listener exiting on its own
//!  └─ Listener::stop()       -- join the thread; uinput device unregistered
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use typeswap_core::{Snippet, SnippetId, SnippetStore};
use typeswap_daemon::application::listen::Listener;
use typeswap_daemon::application::startup::{bootstrap, Daemon, INPUT_GROUP_REMEDY};
use typeswap_daemon::infrastructure::environment::run_checks;
use typeswap_daemon::infrastructure::input_capture::evdev::list_devices;
use typeswap_daemon::infrastructure::signals::ShutdownSignals;
use typeswap_daemon::infrastructure::storage::config::{
    config_file_path, load_config_from, AppConfig,
};
use typeswap_daemon::infrastructure::storage::snippets::SqliteSnippetStore;

/// How often the main task checks whether the listener thread died.
const LISTENER_CHECK_INTERVAL: Duration = Duration::from_millis(250);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Text expander for Linux, working at the kernel input layer.
#[derive(Debug, Parser)]
#[command(name = "typeswap", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "TYPESWAP_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the SQLite snippet database.
    #[arg(long, env = "TYPESWAP_DATABASE")]
    database: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `typeswap_daemon=trace`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the expansion daemon until SIGINT or SIGTERM.
    Run,
    /// List input devices and whether each is treated as a keyboard.
    Devices,
    /// Check device permissions and clipboard tools.
    Doctor,
    /// Manage the snippet database.
    #[command(subcommand)]
    Snippets(SnippetsCommand),
}

#[derive(Debug, Subcommand)]
enum SnippetsCommand {
    /// Print every snippet, in match precedence order.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Add a snippet.
    Add {
        name: String,
        content: String,
        /// Abbreviation that expands to the content.
        #[arg(long)]
        trigger: Option<String>,
    },
    /// Remove a snippet by id.
    Remove { id: SnippetId },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path()?,
    };
    let config = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    init_tracing(cli.log_level.as_deref().unwrap_or(&config.general.log_level));

    let database = match &cli.database {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&config, &database).await,
        Command::Devices => {
            print_devices();
            Ok(ExitCode::SUCCESS)
        }
        Command::Doctor => Ok(doctor()),
        Command::Snippets(cmd) => {
            manage_snippets(cmd, &database)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Installs the `tracing` subscriber.  `RUST_LOG` wins over `level`; an
/// invalid `level` falls back to `info`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// ── run ───────────────────────────────────────────────────────────────────────

async fn run(config: &AppConfig, database: &Path) -> anyhow::Result<ExitCode> {
    info!("typeswap starting");

    let Daemon { source, session } = match bootstrap(config, database) {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("start-up failed: {e}");
            eprintln!("typeswap: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut listener = Listener::spawn(source, session, config.capture.poll_timeout())
        .context("failed to spawn listener thread")?;
    let mut signals = ShutdownSignals::install().context("failed to install signal handlers")?;
    let mut check = tokio::time::interval(LISTENER_CHECK_INTERVAL);

    info!("typeswap ready");

    let mut exit = ExitCode::SUCCESS;
    loop {
        tokio::select! {
            received = signals.recv() => {
                info!(signal = ?received, "shutdown requested");
                break;
            }
            _ = check.tick() => {
                if listener.is_finished() {
                    error!("listener exited unexpectedly");
                    exit = ExitCode::FAILURE;
                    break;
                }
            }
        }
    }

    // Joining blocks for up to one poll timeout.
    tokio::task::spawn_blocking(move || listener.stop())
        .await
        .context("listener shutdown task failed")?;

    info!("typeswap stopped");
    Ok(exit)
}

// ── devices / doctor ──────────────────────────────────────────────────────────

fn print_devices() {
    let devices = list_devices();
    if devices.is_empty() {
        println!("no readable input devices; {INPUT_GROUP_REMEDY}");
        return;
    }
    for device in devices {
        let kind = if device.is_keyboard { "keyboard" } else { "-" };
        println!("{:<24} {:<9} {}", device.path.display(), kind, device.name);
    }
}

fn doctor() -> ExitCode {
    let results = run_checks();
    for result in &results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("[{status}] {}: {}", result.name, result.detail);
        if let (false, Some(remedy)) = (result.passed, result.remedy) {
            println!("       fix: {remedy}");
        }
    }

    if results.iter().any(|r| r.is_blocking()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ── snippets ──────────────────────────────────────────────────────────────────

fn manage_snippets(cmd: SnippetsCommand, database: &Path) -> anyhow::Result<()> {
    let store = SqliteSnippetStore::open(database)
        .with_context(|| format!("failed to open {}", database.display()))?;

    match cmd {
        SnippetsCommand::List { json } => {
            let snippets = store.list_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snippets)?);
            } else {
                for snippet in &snippets {
                    print_snippet_row(snippet);
                }
            }
        }
        SnippetsCommand::Add {
            name,
            content,
            trigger,
        } => {
            let id = store.add(&name, &content, trigger.as_deref())?;
            println!("added snippet {id}");
        }
        SnippetsCommand::Remove { id } => {
            store.delete(id)?;
            println!("removed snippet {id}");
        }
    }
    Ok(())
}

fn print_snippet_row(snippet: &Snippet) {
    const PREVIEW_CHARS: usize = 40;

    let first_line = snippet.content.lines().next().unwrap_or("");
    let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || snippet.content.lines().count() > 1 {
        preview.push('…');
    }
    println!(
        "{:>5}  {:<12}  {:<20}  {}",
        snippet.id,
        snippet.active_trigger().unwrap_or("-"),
        snippet.name,
        preview
    );
}
