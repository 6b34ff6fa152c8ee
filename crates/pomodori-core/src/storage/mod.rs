mod config;
pub mod kv;
mod store;

pub use config::{ClockConfig, Config, DisplayConfig, GestureConfig, NotificationsConfig};
pub use kv::{KvBackend, MemoryKv, SqliteKv};
pub use store::PersistentStore;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// Resolution order:
/// - `POMODORI_HOME` when set (used by tests and portable installs)
/// - `~/.config/pomodori-dev/` when `POMODORI_ENV=dev`
/// - `~/.config/pomodori/` otherwise
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMODORI_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMODORI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomodori-dev")
            } else {
                base_dir.join("pomodori")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
