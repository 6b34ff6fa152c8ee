//! Drift-free countdown clock.
//!
//! The clock owns no thread and no timer. The host samples it on its own
//! schedule (about once a second) and every sample recomputes the remaining
//! time from a fixed end instant, so late or throttled samples never make the
//! countdown lag behind wall-clock time.
//!
//! ```text
//! reinit(epoch, duration) -> start(remaining, now) -> sample(now)* -> completed
//!                                  ^                       |
//!                                  +------- stop() <-------+
//! ```

/// One reading of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    /// Epoch the clock was initialised for when this sample was taken.
    pub epoch: u64,
    pub remaining_ms: u64,
    /// True on the single sample that first reached zero in this epoch.
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct CountdownClock {
    epoch: u64,
    remaining_ms: u64,
    /// Target end instant while sampling is active.
    end_at_ms: Option<u64>,
    fired: bool,
}

impl CountdownClock {
    pub fn new(epoch: u64, duration_ms: u64) -> Self {
        Self {
            epoch,
            remaining_ms: duration_ms,
            end_at_ms: None,
            fired: false,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Last reported remaining time.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.end_at_ms.is_some()
    }

    pub fn has_completed(&self) -> bool {
        self.fired
    }

    /// Throw away all state and prepare for a new epoch.
    ///
    /// Any active sampling is cancelled before the new duration is recorded.
    pub fn reinit(&mut self, epoch: u64, duration_ms: u64) {
        self.end_at_ms = None;
        self.epoch = epoch;
        self.remaining_ms = duration_ms;
        self.fired = false;
    }

    /// Begin counting down `initial_remaining_ms` from `now_ms`.
    ///
    /// Takes the first sample immediately, so a zero start reports completion
    /// without waiting for the next sampling interval.
    pub fn start(&mut self, initial_remaining_ms: u64, now_ms: u64) -> ClockSample {
        self.end_at_ms = Some(now_ms.saturating_add(initial_remaining_ms));
        self.remaining_ms = initial_remaining_ms;
        self.take_sample(now_ms)
    }

    /// Halt sampling. The remaining time stays at its last reported value.
    pub fn stop(&mut self) {
        self.end_at_ms = None;
    }

    /// Record a completion reported outside of sampling. Later starts in this
    /// epoch read zero without completing again.
    pub fn mark_completed(&mut self) {
        self.end_at_ms = None;
        self.remaining_ms = 0;
        self.fired = true;
    }

    /// Read the clock. `None` when it is not running.
    pub fn sample(&mut self, now_ms: u64) -> Option<ClockSample> {
        self.end_at_ms?;
        Some(self.take_sample(now_ms))
    }

    fn take_sample(&mut self, now_ms: u64) -> ClockSample {
        let end_at = self.end_at_ms.unwrap_or(now_ms);
        self.remaining_ms = end_at.saturating_sub(now_ms);

        let mut completed = false;
        if self.remaining_ms == 0 {
            self.end_at_ms = None;
            completed = !self.fired;
            self.fired = true;
        }

        ClockSample {
            epoch: self.epoch,
            remaining_ms: self.remaining_ms,
            completed,
        }
    }
}
