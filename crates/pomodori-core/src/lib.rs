//! # Pomodori Core Library
//!
//! Core logic for the Pomodori focus timer: a countdown that cycles through
//! Focus / Short Break / Long Break sessions, keeps preferences across
//! restarts and announces finished sessions.
//!
//! ## Architecture
//!
//! - **Session engine**: [`PomodoroEngine`] owns session selection, play/pause,
//!   the completed-focus counter and settings changes. It runs no thread; the
//!   host calls [`PomodoroEngine::tick`] periodically.
//! - **Countdown clock**: [`CountdownClock`] derives the remaining time from a
//!   fixed end instant, so late ticks never drift.
//! - **Storage**: [`PersistentStore`] reads and writes JSON values over a
//!   [`KvBackend`] (SQLite or in-memory) and never fails; [`Config`] holds
//!   host tuning in TOML.
//! - **Resume**: [`RuntimeSnapshot`] lets a running countdown survive a restart.
//! - **Gesture / notifications**: [`LongPressReset`] and
//!   [`NotificationDispatcher`] serve the surrounding UI.

pub mod error;
pub mod events;
pub mod gesture;
pub mod notify;
pub mod resume;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, StoreError};
pub use events::EngineEvent;
pub use gesture::{HoldFrame, LongPressReset};
pub use notify::{
    DesktopNotifier, NoopNotifier, NotificationDispatcher, NotificationSender, Permission,
};
pub use resume::{Resumed, RuntimeSnapshot, RUNTIME_KEY};
pub use storage::{Config, KvBackend, MemoryKv, PersistentStore, SqliteKv};
pub use timer::{
    ApplyMode, CountdownClock, DurationsInput, DurationsMin, EngineView, PomodoroEngine,
    SessionType, SettingsUpdate, SystemTime, TimeSource, TimerMode,
};
