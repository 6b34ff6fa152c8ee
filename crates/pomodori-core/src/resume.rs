//! Runtime snapshot codec for resuming a countdown across restarts.
//!
//! The snapshot is stored as JSON under [`RUNTIME_KEY`]:
//!
//! ```json
//! {"session":"focus","mode":"playing","remainingMs":5000,"updatedAt":1700000000000}
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timer::{SessionType, TimerMode};

pub const RUNTIME_KEY: &str = "pomodoro:runtime";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub session: SessionType,
    pub mode: TimerMode,
    pub remaining_ms: u64,
    /// Wall-clock time of the write, epoch milliseconds.
    pub updated_at: u64,
}

/// Wire shape before numeric validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    session: SessionType,
    mode: TimerMode,
    remaining_ms: f64,
    updated_at: f64,
}

/// Engine state recovered from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resumed {
    pub session: SessionType,
    pub mode: TimerMode,
    pub remaining_ms: u64,
}

impl RuntimeSnapshot {
    pub fn capture(session: SessionType, mode: TimerMode, remaining_ms: u64, now_ms: u64) -> Self {
        Self {
            session,
            mode,
            remaining_ms,
            updated_at: now_ms,
        }
    }

    /// Validate an untyped stored value. Any shape or type mismatch yields `None`.
    pub fn decode(raw: &serde_json::Value) -> Option<Self> {
        let parsed = match RawSnapshot::deserialize(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(error = %err, "runtime snapshot has wrong shape");
                return None;
            }
        };
        if !is_non_negative(parsed.remaining_ms) || !is_non_negative(parsed.updated_at) {
            debug!("runtime snapshot has negative or non-finite numbers");
            return None;
        }
        Some(Self {
            session: parsed.session,
            mode: parsed.mode,
            remaining_ms: parsed.remaining_ms.floor() as u64,
            updated_at: parsed.updated_at.floor() as u64,
        })
    }

    /// Advance a playing snapshot by the wall time since it was written.
    ///
    /// Returns `None` when nothing is left to resume: the countdown ran out
    /// while nobody was watching, so the caller starts fresh instead of
    /// firing a completion.
    pub fn reconcile(&self, now_ms: u64) -> Option<Resumed> {
        let remaining_ms = match self.mode {
            TimerMode::Playing => {
                let elapsed = now_ms.saturating_sub(self.updated_at);
                self.remaining_ms.saturating_sub(elapsed)
            }
            TimerMode::Paused => self.remaining_ms,
        };
        if remaining_ms == 0 {
            return None;
        }
        Some(Resumed {
            session: self.session,
            mode: self.mode,
            remaining_ms,
        })
    }
}

fn is_non_negative(n: f64) -> bool {
    n.is_finite() && n >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const T0: u64 = 1_700_000_000_000;

    fn playing_focus() -> RuntimeSnapshot {
        RuntimeSnapshot::decode(&json!({
            "session": "focus",
            "mode": "playing",
            "remainingMs": 5000,
            "updatedAt": T0,
        }))
        .unwrap()
    }

    #[test]
    fn playing_snapshot_is_advanced_by_elapsed_time() {
        let resumed = playing_focus().reconcile(T0 + 3000).unwrap();
        assert_eq!(resumed.remaining_ms, 2000);
        assert_eq!(resumed.mode, TimerMode::Playing);
        assert_eq!(resumed.session, SessionType::Focus);
    }

    #[test]
    fn expired_playing_snapshot_is_absent() {
        assert_eq!(playing_focus().reconcile(T0 + 6000), None);
        assert_eq!(playing_focus().reconcile(T0 + 5000), None);
    }

    #[test]
    fn paused_snapshot_keeps_remaining() {
        let snap = RuntimeSnapshot::capture(SessionType::Long, TimerMode::Paused, 42_000, T0);
        let resumed = snap.reconcile(T0 + 10_000_000).unwrap();
        assert_eq!(resumed.remaining_ms, 42_000);
        assert_eq!(resumed.mode, TimerMode::Paused);
    }

    #[test]
    fn paused_snapshot_at_zero_is_absent() {
        let snap = RuntimeSnapshot::capture(SessionType::Focus, TimerMode::Paused, 0, T0);
        assert_eq!(snap.reconcile(T0), None);
    }

    #[test]
    fn clock_moving_backwards_counts_as_no_elapsed_time() {
        let resumed = playing_focus().reconcile(T0 - 60_000).unwrap();
        assert_eq!(resumed.remaining_ms, 5000);
    }

    #[test]
    fn decode_rejects_bad_shapes() {
        let bad = [
            json!(null),
            json!("focus"),
            json!({"session": "nap", "mode": "playing", "remainingMs": 1, "updatedAt": 1}),
            json!({"session": "focus", "mode": "running", "remainingMs": 1, "updatedAt": 1}),
            json!({"session": "focus", "mode": "paused", "remainingMs": -1, "updatedAt": 1}),
            json!({"session": "focus", "mode": "paused", "remainingMs": "10", "updatedAt": 1}),
            json!({"session": "focus", "mode": "paused", "remainingMs": 10}),
        ];
        for raw in bad {
            assert_eq!(RuntimeSnapshot::decode(&raw), None, "accepted {raw}");
        }
    }

    #[test]
    fn decode_floors_fractional_values() {
        let snap = RuntimeSnapshot::decode(&json!({
            "session": "short", "mode": "paused", "remainingMs": 1500.7, "updatedAt": 10.2,
        }))
        .unwrap();
        assert_eq!(snap.remaining_ms, 1500);
        assert_eq!(snap.updated_at, 10);
    }

    #[test]
    fn encoded_snapshot_decodes_to_itself() {
        let snap = RuntimeSnapshot::capture(SessionType::Short, TimerMode::Playing, 90_000, T0);
        let raw = serde_json::to_value(snap).unwrap();
        assert_eq!(raw["remainingMs"], 90_000);
        assert_eq!(raw["updatedAt"], T0);
        assert_eq!(RuntimeSnapshot::decode(&raw), Some(snap));
    }
}
