use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DurationsMin, SessionType, TimerMode};

/// Every engine state change produces an Event.
/// The presentation layer subscribes to them through
/// [`PomodoroEngine::subscribe`](crate::timer::PomodoroEngine::subscribe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    SessionSelected {
        session: SessionType,
        duration_ms: u64,
        epoch: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        session: SessionType,
        duration_ms: u64,
        epoch: u64,
        at: DateTime<Utc>,
    },
    DurationsSaved {
        durations: DurationsMin,
        /// Applied as a live preview, without forcing a pause.
        preview: bool,
        at: DateTime<Utc>,
    },
    Tick {
        epoch: u64,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session: SessionType,
        session_counter: u64,
        at: DateTime<Utc>,
    },
    CounterChanged {
        session_counter: u64,
        at: DateTime<Utc>,
    },
    ResumeToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
}
