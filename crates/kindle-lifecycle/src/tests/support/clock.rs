//! Virtual clock that lets tests advance heartbeat time deterministically.
//!
//! Timers armed through [`Clock::after`] fire only from [`ManualClock::advance`].
//! After each firing `advance` waits for the consumer to re-arm before moving
//! virtual time further, so a fixed-delay loop observes exactly one firing
//! per elapsed period regardless of wall-clock scheduling.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::heartbeat::Clock;

// Wall-clock allowance for a worker to arm (or re-arm) its timer.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    state: Mutex<ClockState>,
    armed: Condvar,
}

#[derive(Debug, Default)]
struct ClockState {
    elapsed: Duration,
    armings: u64,
    timers: Vec<Timer>,
}

#[derive(Debug)]
struct Timer {
    deadline: Duration,
    sender: Sender<Instant>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(ClockState::default()),
            armed: Condvar::new(),
        }
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Moves virtual time forward, firing every timer that falls due.
    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        let target = state.elapsed + by;
        loop {
            state = self.wait_for_timer(state);
            let Some(index) = state.next_due(target) else {
                break;
            };
            let timer = state.timers.swap_remove(index);
            state.elapsed = timer.deadline;
            let armings = state.armings;
            if timer.sender.send(self.origin + timer.deadline).is_err() {
                continue;
            }
            state = self.wait_for_rearm(state, armings);
        }
        state.elapsed = target;
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().expect("manual clock mutex poisoned")
    }

    fn wait_for_timer<'a>(&self, state: MutexGuard<'a, ClockState>) -> MutexGuard<'a, ClockState> {
        self.armed
            .wait_timeout_while(state, SETTLE_TIMEOUT, |state| state.timers.is_empty())
            .expect("manual clock mutex poisoned")
            .0
    }

    fn wait_for_rearm<'a>(
        &self,
        state: MutexGuard<'a, ClockState>,
        armings: u64,
    ) -> MutexGuard<'a, ClockState> {
        self.armed
            .wait_timeout_while(state, SETTLE_TIMEOUT, |state| state.armings == armings)
            .expect("manual clock mutex poisoned")
            .0
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockState {
    fn next_due(&self, target: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= target)
            .min_by_key(|(_, timer)| timer.deadline)
            .map(|(index, _)| index)
    }
}

impl Clock for ManualClock {
    fn after(&self, delay: Duration) -> Receiver<Instant> {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let mut state = self.lock();
        let deadline = state.elapsed + delay;
        state.timers.push(Timer { deadline, sender });
        state.armings += 1;
        self.armed.notify_all();
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_timers_that_fall_due() {
        let clock = ManualClock::new();
        let early = clock.after(Duration::from_secs(1));
        let late = clock.after(Duration::from_secs(5));

        clock.advance(Duration::from_secs(2));

        assert!(early.try_recv().is_ok());
        assert!(late.try_recv().is_err());
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }
}
