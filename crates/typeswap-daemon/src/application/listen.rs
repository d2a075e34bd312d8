//! Listener: the capture → decode → match → expand pipeline.
//!
//! # Threading model (for beginners)
//!
//! Everything runs on one background thread.  The thread polls the input
//! source, decodes each event, feeds the trigger buffer and, on a match,
//! runs the expansion before it polls again.  Because injection happens on
//! the same thread that reads input, synthetic keystrokes can never be
//! interleaved with (or mistaken for) the next batch of user input.
//!
//! Stopping is cooperative: [`Listener::stop`] clears a flag that the loop
//! checks once per poll, so the thread exits within one poll timeout.  An
//! expansion that has already started always runs to completion.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use typeswap_core::{KeyEventDecoder, RawInputEvent, SnippetStore, TriggerBuffer};

use crate::application::emulate_input::PlatformKeyEmitter;
use crate::application::expand::{ExpansionError, ExpansionOrchestrator, ExpansionReport};
use crate::infrastructure::clipboard::Clipboard;
use crate::infrastructure::input_capture::InputSource;

// ── Session ───────────────────────────────────────────────────────────────────

/// Per-listener state: decoder (with its modifier tracker), trigger buffer,
/// snippet store and orchestrator.
pub struct ExpansionSession<S, E, C>
where
    S: SnippetStore,
    E: PlatformKeyEmitter,
    C: Clipboard,
{
    decoder: KeyEventDecoder,
    buffer: TriggerBuffer,
    store: S,
    orchestrator: ExpansionOrchestrator<E, C>,
}

impl<S, E, C> ExpansionSession<S, E, C>
where
    S: SnippetStore,
    E: PlatformKeyEmitter,
    C: Clipboard,
{
    pub fn new(store: S, orchestrator: ExpansionOrchestrator<E, C>, buffer_capacity: usize) -> Self {
        Self {
            decoder: KeyEventDecoder::new(),
            buffer: TriggerBuffer::new(buffer_capacity),
            store,
            orchestrator,
        }
    }

    pub fn buffer(&self) -> &TriggerBuffer {
        &self.buffer
    }

    pub fn decoder(&self) -> &KeyEventDecoder {
        &self.decoder
    }

    pub fn orchestrator(&self) -> &ExpansionOrchestrator<E, C> {
        &self.orchestrator
    }

    /// Processes one raw event.
    ///
    /// Returns `None` unless the event completed a trigger, in which case the
    /// expansion has already run and its result is returned.  The store is
    /// only queried when the event decodes to a key press.
    pub fn handle_event(
        &mut self,
        event: &RawInputEvent,
    ) -> Option<Result<ExpansionReport, ExpansionError>> {
        let key = self.decoder.decode(event)?;

        let snippets = match self.store.list_all() {
            Ok(snippets) => snippets,
            Err(e) => {
                warn!("snippet store read failed: {e}");
                Vec::new()
            }
        };

        let matched = self.buffer.feed(&key, &snippets)?;
        debug!(snippet_id = matched.snippet_id, "trigger matched");

        let result = self.orchestrator.expand(&matched);
        if let Err(e) = &result {
            error!(snippet_id = matched.snippet_id, "expansion aborted: {e}");
        }
        Some(result)
    }
}

// ── Listener thread ───────────────────────────────────────────────────────────

/// Handle to the background listener thread.
///
/// Dropping the handle stops the thread and waits for it.
pub struct Listener {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    /// Starts the listener thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<I, S, E, C>(
        source: I,
        session: ExpansionSession<S, E, C>,
        poll_timeout: Duration,
    ) -> io::Result<Self>
    where
        I: InputSource + 'static,
        S: SnippetStore + 'static,
        E: PlatformKeyEmitter + 'static,
        C: Clipboard + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = std::thread::Builder::new()
            .name("typeswap-listener".to_string())
            .spawn(move || listen_loop(source, session, poll_timeout, flag))?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// True once the thread has exited (stopped, or the source failed).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the thread to stop and joins it.  Blocks for at most one poll
    /// timeout plus any expansion in progress.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("listener thread panicked");
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The loop executed on the listener thread.
fn listen_loop<I, S, E, C>(
    mut source: I,
    mut session: ExpansionSession<S, E, C>,
    poll_timeout: Duration,
    running: Arc<AtomicBool>,
) where
    I: InputSource,
    S: SnippetStore,
    E: PlatformKeyEmitter,
    C: Clipboard,
{
    let mut devices = source.device_count();
    info!(devices, "listener started");

    while running.load(Ordering::Relaxed) {
        let events = match source.poll(poll_timeout) {
            Ok(events) => events,
            Err(e) => {
                error!("input capture failed, listener exiting: {e}");
                break;
            }
        };

        for event in &events {
            session.handle_event(event);
        }

        let now = source.device_count();
        if now != devices {
            if now == 0 {
                warn!("no keyboard devices left; waiting for shutdown");
            } else {
                info!(devices = now, "keyboard device set changed");
            }
            devices = now;
        }
    }

    running.store(false, Ordering::Relaxed);
    info!("listener stopped");
}
