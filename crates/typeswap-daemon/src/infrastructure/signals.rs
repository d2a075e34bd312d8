//! Shutdown signals for the daemon's main task.
//!
//! Both handlers are registered once, up front.  A signal that arrives while
//! the main task is busy elsewhere stays pending on its stream and is seen by
//! the next [`ShutdownSignals::recv`].

use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};

/// Which signal asked the daemon to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT (Ctrl-C in a terminal).
    Interrupt,
    /// SIGTERM (systemd stop, `kill`).
    Terminate,
}

/// SIGINT and SIGTERM streams.
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl ShutdownSignals {
    /// Registers both handlers.  Must be called inside a Tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Waits for the next SIGINT or SIGTERM.  Cancel-safe, so it can sit in a
    /// `select!` loop.
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.interrupt.recv() => ShutdownSignal::Interrupt,
            _ = self.terminate.recv() => ShutdownSignal::Terminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_interrupt_raised_before_waiting_is_still_received() {
        // Arrange
        let mut signals = ShutdownSignals::install().unwrap();

        // Act: nobody is waiting on the stream when the signal lands
        // SAFETY: a SIGINT handler is registered above, so the process is not
        // terminated by the default action.
        let rc = unsafe { libc::raise(libc::SIGINT) };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let received = tokio::time::timeout(Duration::from_secs(2), signals.recv()).await;

        // Assert
        assert_eq!(rc, 0);
        assert_eq!(received.ok(), Some(ShutdownSignal::Interrupt));
    }
}
