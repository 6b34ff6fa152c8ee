//! Long-press reset gesture.
//!
//! Turns a sustained hold into a single "reset counter" action. The host
//! calls [`LongPressReset::frame`] once per display frame while
//! [`LongPressReset::wants_frames`] is true and draws the reported progress.

use crate::storage::GestureConfig;

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldFrame {
    /// 0.0 ..= 1.0
    pub progress: f64,
    /// The hold just completed; run the reset action.
    pub reset: bool,
}

#[derive(Debug, Clone)]
pub struct LongPressReset {
    hold_ms: u64,
    settle_ms: u64,
    /// Set while the sampling loop runs.
    started_at_ms: Option<u64>,
    /// Pending drop back to zero after a completed hold.
    clear_at_ms: Option<u64>,
    progress: f64,
}

impl LongPressReset {
    pub fn new(hold_ms: u64, settle_ms: u64) -> Self {
        Self {
            hold_ms,
            settle_ms,
            started_at_ms: None,
            clear_at_ms: None,
            progress: 0.0,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.hold_ms, config.settle_ms)
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_holding(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// True while the host should keep delivering frames.
    pub fn wants_frames(&self) -> bool {
        self.started_at_ms.is_some() || self.clear_at_ms.is_some()
    }

    /// Start a hold. Ignored if one is already running.
    pub fn begin(&mut self, now_ms: u64) -> bool {
        if self.started_at_ms.is_some() {
            return false;
        }
        self.started_at_ms = Some(now_ms);
        self.clear_at_ms = None;
        true
    }

    /// Advance the gesture to `now_ms`. `None` when there is nothing to report.
    pub fn frame(&mut self, now_ms: u64) -> Option<HoldFrame> {
        if let Some(started_at) = self.started_at_ms {
            self.progress = self.progress_since(started_at, now_ms);
            let reset = self.progress >= 1.0;
            if reset {
                self.started_at_ms = None;
                self.clear_at_ms = Some(now_ms.saturating_add(self.settle_ms));
            }
            return Some(HoldFrame {
                progress: self.progress,
                reset,
            });
        }

        match self.clear_at_ms {
            Some(clear_at) if now_ms >= clear_at => {
                self.clear_at_ms = None;
                self.progress = 0.0;
                Some(HoldFrame {
                    progress: 0.0,
                    reset: false,
                })
            }
            _ => None,
        }
    }

    /// Early release. Cancels the loop and drops progress to zero if the hold
    /// had not completed. Returns the progress to display, or `None` when no
    /// hold was active.
    pub fn end(&mut self) -> Option<f64> {
        self.started_at_ms.take()?;
        if self.progress < 1.0 {
            self.progress = 0.0;
        }
        Some(self.progress)
    }

    fn progress_since(&self, started_at: u64, now_ms: u64) -> f64 {
        if self.hold_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(started_at) as f64;
        (elapsed / self.hold_ms as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u64 = 900;

    fn run_frames(gesture: &mut LongPressReset, from: u64, to: u64, step: u64) -> Vec<HoldFrame> {
        let mut frames = Vec::new();
        let mut t = from;
        while t <= to {
            if let Some(frame) = gesture.frame(t) {
                frames.push(frame);
            }
            t += step;
        }
        frames
    }

    #[test]
    fn full_hold_fires_once() {
        let mut g = LongPressReset::new(HOLD, 150);
        assert!(g.begin(0));
        let frames = run_frames(&mut g, 16, 2_000, 16);

        assert_eq!(frames.iter().filter(|f| f.reset).count(), 1);
        assert!(frames
            .windows(2)
            .take_while(|w| !w[0].reset)
            .all(|w| w[0].progress <= w[1].progress));
        assert_eq!(g.progress(), 0.0);
        assert!(!g.wants_frames());
    }

    #[test]
    fn exactly_hold_ms_completes() {
        let mut g = LongPressReset::new(HOLD, 150);
        g.begin(1_000);
        let frame = g.frame(1_000 + HOLD).unwrap();
        assert_eq!(frame.progress, 1.0);
        assert!(frame.reset);
        assert!(!g.is_holding());
        assert_eq!(g.progress(), 1.0);
    }

    #[test]
    fn progress_settles_after_delay() {
        let mut g = LongPressReset::new(HOLD, 150);
        g.begin(0);
        g.frame(HOLD);
        assert_eq!(g.frame(HOLD + 100), None);
        assert_eq!(g.progress(), 1.0);
        let cleared = g.frame(HOLD + 150).unwrap();
        assert_eq!(cleared.progress, 0.0);
        assert!(!cleared.reset);
    }

    #[test]
    fn early_release_never_fires() {
        let mut g = LongPressReset::new(HOLD, 150);
        g.begin(0);
        let partial = g.frame(450).unwrap();
        assert!((partial.progress - 0.5).abs() < 1e-9);

        assert_eq!(g.end(), Some(0.0));
        assert_eq!(g.progress(), 0.0);
        assert!(!g.wants_frames());
        assert_eq!(g.frame(HOLD * 3), None);
    }

    #[test]
    fn release_after_completion_keeps_full_ring() {
        let mut g = LongPressReset::new(HOLD, 150);
        g.begin(0);
        assert!(g.frame(HOLD).unwrap().reset);
        assert_eq!(g.end(), None);
        assert_eq!(g.progress(), 1.0);
    }

    #[test]
    fn end_without_hold_is_noop() {
        let mut g = LongPressReset::new(HOLD, 150);
        assert_eq!(g.end(), None);
    }

    #[test]
    fn begin_twice_keeps_original_start() {
        let mut g = LongPressReset::new(HOLD, 150);
        assert!(g.begin(0));
        assert!(!g.begin(800));
        assert!(g.frame(HOLD).unwrap().reset);
    }

    #[test]
    fn each_hold_fires_independently() {
        let mut g = LongPressReset::new(HOLD, 150);
        let mut fired = 0;
        for start in [0, 5_000] {
            g.begin(start);
            fired += run_frames(&mut g, start, start + 2_000, 10)
                .iter()
                .filter(|f| f.reset)
                .count();
            g.end();
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn zero_hold_fires_on_first_frame() {
        let mut g = LongPressReset::new(0, 0);
        g.begin(10);
        assert!(g.frame(10).unwrap().reset);
    }
}
