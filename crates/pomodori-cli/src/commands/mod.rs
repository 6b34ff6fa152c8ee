pub mod config;
pub mod counter;
pub mod durations;
pub mod resume;
pub mod run;
pub mod timer;

use pomodori_core::{
    Config, DesktopNotifier, NotificationDispatcher, PersistentStore, PomodoroEngine, SqliteKv,
    SystemTime,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the engine over the on-disk store, resuming when enabled.
pub fn open_engine() -> CliResult<PomodoroEngine> {
    let kv = SqliteKv::open_default()?;
    Ok(PomodoroEngine::load(PersistentStore::new(kv), SystemTime))
}

pub fn dispatcher(config: &Config) -> NotificationDispatcher<DesktopNotifier> {
    NotificationDispatcher::new(DesktopNotifier)
        .with_toast_duration(config.notifications.toast_duration_ms)
        .with_os_notifications(config.notifications.enabled)
}

pub fn print_view(engine: &PomodoroEngine) -> CliResult {
    println!("{}", serde_json::to_string_pretty(&engine.view())?);
    Ok(())
}
