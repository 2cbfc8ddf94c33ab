use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

/// Source of one-shot timers for the heartbeat loop.
pub trait Clock: Send + Sync + 'static {
    /// Returns a channel that delivers a single message once `delay` has
    /// elapsed.
    fn after(&self, delay: Duration) -> Receiver<Instant>;
}

/// Wall-clock timers backed by [`crossbeam_channel::after`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn after(&self, delay: Duration) -> Receiver<Instant> {
        crossbeam_channel::after(delay)
    }
}
