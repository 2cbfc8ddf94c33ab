//! Periodic "still starting" signal while cluster startup is in flight.
//!
//! The scheduler owns one named worker thread. Each cycle arms a one-shot
//! timer from the configured [`Clock`] and selects between it and the cancel
//! channel, so the next firing is always scheduled relative to the end of
//! the previous one and firings never overlap. Emission is gated by the
//! shared [`StartingFlag`], not by the worker's liveness.
//!
//! [`HeartbeatScheduler::stop`] closes the cancel channel and joins the
//! worker: once it returns no further signal can be emitted. The worker is
//! an ordinary detached thread, so it never keeps the process alive if the
//! owner exits without stopping it.

mod clock;
mod flag;

use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;
use tracing::{debug, warn};

use crate::health::HealthReporter;

pub use clock::{Clock, SystemClock};
pub use flag::StartingFlag;

/// Interval between heartbeat firings.
pub const DEFAULT_HEARTBEAT_PERIOD: Duration = Duration::from_secs(1);

const HEARTBEAT_TARGET: &str = "kindle::heartbeat";
const WORKER_NAME: &str = "kindle-starting";

/// Errors raised while starting the heartbeat worker.
#[derive(Debug, Error)]
pub enum HeartbeatError {
    /// The operating system refused to spawn the worker thread.
    #[error("failed to spawn heartbeat worker: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Cancellable fixed-delay heartbeat.
pub struct HeartbeatScheduler {
    period: Duration,
    clock: Arc<dyn Clock>,
    worker: Option<Worker>,
}

struct Worker {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

enum Wake {
    Elapsed,
    Cancelled,
    ClockStopped,
}

impl HeartbeatScheduler {
    /// Builds a stopped scheduler firing every `period` on `clock`.
    #[must_use]
    pub fn new(period: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            period,
            clock,
            worker: None,
        }
    }

    /// Interval between firings.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether a worker is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawns the worker. A second call while running is ignored.
    ///
    /// The first firing happens one period after this call.
    pub fn start(
        &mut self,
        flag: StartingFlag,
        reporter: Arc<dyn HealthReporter>,
    ) -> Result<(), HeartbeatError> {
        if self.worker.is_some() {
            debug!(target: HEARTBEAT_TARGET, "heartbeat already running");
            return Ok(());
        }

        let (cancel, cancelled) = crossbeam_channel::bounded(0);
        let clock = Arc::clone(&self.clock);
        let period = self.period;
        let handle = thread::Builder::new()
            .name(WORKER_NAME.to_owned())
            .spawn(move || run_heartbeat(&*clock, period, &cancelled, &flag, &*reporter))
            .map_err(|source| HeartbeatError::Spawn { source })?;

        debug!(
            target: HEARTBEAT_TARGET,
            period_ms = period.as_millis(),
            "heartbeat started"
        );
        self.worker = Some(Worker { cancel, handle });
        Ok(())
    }

    /// Cancels all future firings and waits for the worker to exit.
    ///
    /// A firing already in progress completes first. Safe to call when the
    /// scheduler never started or has already stopped.
    pub fn stop(&mut self) {
        let Some(Worker { cancel, handle }) = self.worker.take() else {
            return;
        };
        drop(cancel);
        if handle.join().is_err() {
            warn!(target: HEARTBEAT_TARGET, "heartbeat worker panicked");
        } else {
            debug!(target: HEARTBEAT_TARGET, "heartbeat stopped");
        }
    }
}

impl Default for HeartbeatScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_PERIOD, Arc::new(SystemClock))
    }
}

impl fmt::Debug for HeartbeatScheduler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HeartbeatScheduler")
            .field("period", &self.period)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Drop for HeartbeatScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_heartbeat(
    clock: &dyn Clock,
    period: Duration,
    cancelled: &Receiver<()>,
    flag: &StartingFlag,
    reporter: &dyn HealthReporter,
) {
    loop {
        let timer = clock.after(period);
        let wake = crossbeam_channel::select! {
            recv(cancelled) -> _ => Wake::Cancelled,
            recv(timer) -> fired => if fired.is_ok() { Wake::Elapsed } else { Wake::ClockStopped },
        };
        match wake {
            Wake::Elapsed => {
                if flag.is_raised() {
                    reporter.still_starting();
                }
            }
            Wake::Cancelled => return,
            Wake::ClockStopped => {
                warn!(target: HEARTBEAT_TARGET, "heartbeat clock stopped");
                return;
            }
        }
    }
}
