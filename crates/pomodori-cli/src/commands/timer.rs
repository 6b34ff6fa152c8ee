use pomodori_core::{Config, PomodoroEngine, SessionType, SystemTime, TimeSource, TimerMode};

use super::{dispatcher, open_engine, print_view, CliResult};

/// Each invocation is a restart. Without resume the countdown does not
/// outlive the process, so say so instead of silently dropping it.
fn warn_if_not_resumable(engine: &PomodoroEngine) {
    if engine.mode() == TimerMode::Playing && !engine.resume_enabled() {
        eprintln!(
            "note: resume is off, the countdown stops when this command exits \
             (use `pomodori resume on` or `pomodori run`)"
        );
    }
}

/// Sample the clock, announce a completion that happened during this call,
/// and print the view.
pub fn status() -> CliResult {
    let mut engine = open_engine()?;
    if let Some(done) = engine.tick() {
        let config = Config::load_or_default();
        dispatcher(&config).notify_session_end(done, SystemTime.now_ms());
    }
    print_view(&engine)
}

pub fn select(session: SessionType) -> CliResult {
    let mut engine = open_engine()?;
    engine.select_session(session);
    print_view(&engine)
}

async fn play(mut engine: PomodoroEngine) -> CliResult {
    let config = Config::load_or_default();
    let mut notifier = dispatcher(&config);
    notifier.ensure_permission().await;
    if let Some(done) = engine.set_mode(TimerMode::Playing) {
        notifier.notify_session_end(done, SystemTime.now_ms());
    }
    warn_if_not_resumable(&engine);
    print_view(&engine)
}

pub async fn start() -> CliResult {
    play(open_engine()?).await
}

pub fn pause() -> CliResult {
    let mut engine = open_engine()?;
    engine.set_mode(TimerMode::Paused);
    print_view(&engine)
}

pub async fn toggle() -> CliResult {
    let mut engine = open_engine()?;
    match engine.mode() {
        TimerMode::Paused => play(engine).await,
        TimerMode::Playing => {
            engine.set_mode(TimerMode::Paused);
            print_view(&engine)
        }
    }
}

pub fn reset() -> CliResult {
    let mut engine = open_engine()?;
    engine.reset_to_base();
    print_view(&engine)
}
