mod clock;
mod display;
mod engine;
mod session;
mod time;

pub use clock::{ClockSample, CountdownClock};
pub use display::format_remaining;
pub use engine::{
    ApplyMode, EngineView, ListenerId, PomodoroEngine, SettingsUpdate, COUNTER_KEY,
    DURATIONS_KEY, RESUME_ENABLED_KEY, SESSION_KEY,
};
pub use session::{
    normalize_minutes, DurationsInput, DurationsMin, SessionType, TimerMode, MAX_MINUTES,
    MIN_MINUTES,
};
pub use time::{ManualTime, SystemTime, TimeSource};
