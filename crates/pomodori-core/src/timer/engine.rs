//! Session engine.
//!
//! Owns the active session type, play/pause mode, the per-session base
//! durations and the completed-focus counter, and drives a [`CountdownClock`].
//! Like the clock, it runs no thread: the host calls [`PomodoroEngine::tick`]
//! about once a second while playing.
//!
//! ## Control state
//!
//! ```text
//! (Focus | Short | Long) x (Paused | Playing)
//!
//! select_session / reset_to_base / save_durations -> Paused, remaining = base, new epoch
//! set_mode(Playing) -> clock started from the current remaining
//! clock reaches zero -> complete_current_session -> Paused, remaining = 0
//! ```
//!
//! Every discontinuous change opens a new epoch. Clock samples carry the
//! epoch they were taken in, and samples from an older epoch are dropped.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::clock::{ClockSample, CountdownClock};
use super::display::format_remaining;
use super::session::{DurationsInput, DurationsMin, SessionType, TimerMode};
use super::time::TimeSource;
use crate::events::EngineEvent;
use crate::resume::{RuntimeSnapshot, RUNTIME_KEY};
use crate::storage::PersistentStore;

pub const DURATIONS_KEY: &str = "pomodoroDurations";
pub const SESSION_KEY: &str = "pomodoro:session";
pub const COUNTER_KEY: &str = "pomodoro:sessionCounter";
pub const RESUME_ENABLED_KEY: &str = "pomodoro:resumeEnabled";

/// How a settings change is applied to the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Saved from the settings form: an affected session is reset and paused.
    Commit,
    /// Live feedback while editing: an affected session is reset but keeps its mode.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsUpdate {
    pub durations: DurationsInput,
    pub resume_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Read model for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineView {
    pub session: SessionType,
    pub mode: TimerMode,
    pub duration_ms: u64,
    pub base_duration_ms: u64,
    pub remaining_ms: u64,
    pub remaining: String,
    pub session_counter: u64,
    pub resume_enabled: bool,
    pub epoch: u64,
    pub durations: DurationsMin,
}

type Listener = Box<dyn FnMut(&EngineEvent)>;

pub struct PomodoroEngine {
    store: PersistentStore,
    time: Box<dyn TimeSource>,
    clock: CountdownClock,
    durations: DurationsMin,
    session: SessionType,
    mode: TimerMode,
    session_counter: u64,
    resume_enabled: bool,
    /// Countdown length of the current epoch. Equals the base duration except
    /// right after resuming from a snapshot.
    duration_ms: u64,
    remaining_ms: u64,
    /// When `remaining_ms` was last written.
    remaining_synced_at_ms: u64,
    epoch: u64,
    resumed: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl PomodoroEngine {
    /// Build the engine from persisted preferences, resuming a runtime
    /// snapshot when resume is enabled and the snapshot is still live.
    pub fn load(store: PersistentStore, time: impl TimeSource + 'static) -> Self {
        let durations = DurationsMin::normalize(
            store.load(DURATIONS_KEY, DurationsInput::from(DurationsMin::default())),
        );
        let session = store.load(SESSION_KEY, SessionType::Focus);
        let session_counter = store.load(COUNTER_KEY, 0u64);
        let resume_enabled = store.load(RESUME_ENABLED_KEY, false);
        let duration_ms = durations.duration_ms(session);
        let now = time.now_ms();

        let mut engine = Self {
            store,
            time: Box::new(time),
            clock: CountdownClock::new(0, duration_ms),
            durations,
            session,
            mode: TimerMode::Paused,
            session_counter,
            resume_enabled,
            duration_ms,
            remaining_ms: duration_ms,
            remaining_synced_at_ms: now,
            epoch: 0,
            resumed: false,
            listeners: Vec::new(),
            next_listener_id: 0,
        };

        if engine.resume_enabled {
            engine.try_resume();
        }
        engine.persist_runtime();
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> SessionType {
        self.session
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Configured duration of the active session.
    pub fn base_duration_ms(&self) -> u64 {
        self.durations.duration_ms(self.session)
    }

    /// Last synced remaining time.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session_counter(&self) -> u64 {
        self.session_counter
    }

    pub fn durations(&self) -> DurationsMin {
        self.durations
    }

    pub fn resume_enabled(&self) -> bool {
        self.resume_enabled
    }

    /// True if startup state came from a runtime snapshot.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Remaining time extrapolated to `now_ms` while playing.
    pub fn live_remaining_ms(&self, now_ms: u64) -> u64 {
        match self.mode {
            TimerMode::Playing => {
                let elapsed = now_ms.saturating_sub(self.remaining_synced_at_ms);
                self.remaining_ms.saturating_sub(elapsed)
            }
            TimerMode::Paused => self.remaining_ms,
        }
    }

    /// Window title: `idle_title` while paused, the live countdown while playing.
    pub fn title_text(&self, idle_title: &str) -> String {
        match self.mode {
            TimerMode::Playing => format_remaining(self.live_remaining_ms(self.now_ms())),
            TimerMode::Paused => idle_title.to_string(),
        }
    }

    pub fn view(&self) -> EngineView {
        EngineView {
            session: self.session,
            mode: self.mode,
            duration_ms: self.duration_ms,
            base_duration_ms: self.base_duration_ms(),
            remaining_ms: self.remaining_ms,
            remaining: format_remaining(self.remaining_ms),
            session_counter: self.session_counter,
            resume_enabled: self.resume_enabled,
            epoch: self.epoch,
            durations: self.durations,
        }
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch session type. Always lands paused with a full countdown.
    pub fn select_session(&mut self, session: SessionType) {
        self.session = session;
        self.store.save(SESSION_KEY, &session);
        self.rebase(true);
        debug!(?session, epoch = self.epoch, "session selected");
        self.emit(EngineEvent::SessionSelected {
            session,
            duration_ms: self.duration_ms,
            epoch: self.epoch,
            at: self.at(),
        });
        self.persist_runtime();
    }

    /// Play or pause without touching the remaining time.
    ///
    /// Returns the completed session if starting the clock finished it
    /// immediately (a countdown already at zero).
    pub fn set_mode(&mut self, mode: TimerMode) -> Option<SessionType> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        debug!(?mode, remaining_ms = self.remaining_ms, "mode changed");
        self.emit(EngineEvent::ModeChanged {
            mode,
            remaining_ms: self.remaining_ms,
            at: self.at(),
        });

        let completed = match mode {
            TimerMode::Playing => {
                let now = self.now_ms();
                let sample = self.clock.start(self.remaining_ms, now);
                self.handle_clock_sample(sample)
            }
            TimerMode::Paused => {
                self.clock.stop();
                None
            }
        };
        self.persist_runtime();
        completed
    }

    pub fn toggle(&mut self) -> Option<SessionType> {
        self.set_mode(self.mode.toggled())
    }

    /// Back to the full base duration of the current session, paused.
    pub fn reset_to_base(&mut self) {
        self.rebase(true);
        debug!(session = ?self.session, epoch = self.epoch, "timer reset");
        self.emit_reset();
        self.persist_runtime();
    }

    /// Normalize and persist durations. Resets the active session when its
    /// base duration changed.
    pub fn save_durations(&mut self, next: DurationsInput) -> DurationsMin {
        self.apply_durations(next, ApplyMode::Commit)
    }

    /// Like [`save_durations`](Self::save_durations) but keeps the current mode.
    pub fn preview_durations(&mut self, next: DurationsInput) -> DurationsMin {
        self.apply_durations(next, ApplyMode::Preview)
    }

    pub fn set_resume_enabled(&mut self, enabled: bool) {
        self.resume_enabled = enabled;
        self.store.save(RESUME_ENABLED_KEY, &enabled);
        self.emit(EngineEvent::ResumeToggled {
            enabled,
            at: self.at(),
        });
        self.persist_runtime();
    }

    /// Settings form entry point: durations and the resume flag together.
    pub fn apply_settings(&mut self, update: SettingsUpdate, apply: ApplyMode) -> DurationsMin {
        let durations = self.apply_durations(update.durations, apply);
        if update.resume_enabled != self.resume_enabled {
            self.set_resume_enabled(update.resume_enabled);
        }
        durations
    }

    /// Finish the active session: paused, zero remaining, and one more on the
    /// counter if it was a focus session.
    pub fn complete_current_session(&mut self) -> SessionType {
        let session = self.session;
        self.clock.mark_completed();
        self.mode = TimerMode::Paused;
        self.remaining_ms = 0;
        self.remaining_synced_at_ms = self.now_ms();
        if session == SessionType::Focus {
            self.session_counter += 1;
            self.store.save(COUNTER_KEY, &self.session_counter);
        }
        info!(?session, session_counter = self.session_counter, "session completed");
        self.emit(EngineEvent::SessionCompleted {
            session,
            session_counter: self.session_counter,
            at: self.at(),
        });
        self.persist_runtime();
        session
    }

    pub fn set_session_counter(&mut self, n: u64) {
        self.session_counter = n;
        self.store.save(COUNTER_KEY, &n);
        self.emit(EngineEvent::CounterChanged {
            session_counter: n,
            at: self.at(),
        });
    }

    /// Store a remaining-time reading, floored and clamped to `[0, duration]`.
    pub fn sync_remaining(&mut self, ms: f64) {
        let ms = if ms.is_nan() { 0.0 } else { ms.floor().max(0.0) };
        self.remaining_ms = (ms as u64).min(self.duration_ms);
        self.remaining_synced_at_ms = self.now_ms();
        self.emit(EngineEvent::Tick {
            epoch: self.epoch,
            remaining_ms: self.remaining_ms,
            at: self.at(),
        });
        self.persist_runtime();
    }

    /// Sample the clock. Returns the completed session when the countdown
    /// reached zero on this sample.
    pub fn tick(&mut self) -> Option<SessionType> {
        let sample = self.clock.sample(self.now_ms())?;
        self.handle_clock_sample(sample)
    }

    /// Apply one clock reading. Readings from an older epoch are ignored.
    pub fn handle_clock_sample(&mut self, sample: ClockSample) -> Option<SessionType> {
        if sample.epoch != self.epoch {
            debug!(
                sample_epoch = sample.epoch,
                epoch = self.epoch,
                "dropping stale clock sample"
            );
            return None;
        }
        self.sync_remaining(sample.remaining_ms as f64);
        if sample.completed {
            return Some(self.complete_current_session());
        }
        if sample.remaining_ms == 0 && self.mode == TimerMode::Playing {
            // Zero already reported in this epoch: settle without counting again.
            self.mode = TimerMode::Paused;
            self.emit(EngineEvent::ModeChanged {
                mode: TimerMode::Paused,
                remaining_ms: 0,
                at: self.at(),
            });
            self.persist_runtime();
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_durations(&mut self, next: DurationsInput, apply: ApplyMode) -> DurationsMin {
        let before = self.base_duration_ms();
        let next = DurationsMin::normalize(next);
        self.durations = next;
        self.store.save(DURATIONS_KEY, &next);
        self.emit(EngineEvent::DurationsSaved {
            durations: next,
            preview: apply == ApplyMode::Preview,
            at: self.at(),
        });

        if self.base_duration_ms() != before {
            self.rebase(apply == ApplyMode::Commit);
            debug!(?apply, duration_ms = self.duration_ms, "active session re-derived");
            self.emit_reset();
            self.persist_runtime();
        }
        next
    }

    /// Full countdown of the base duration in a fresh epoch.
    fn rebase(&mut self, force_pause: bool) {
        if force_pause {
            self.mode = TimerMode::Paused;
        }
        let now = self.now_ms();
        self.duration_ms = self.base_duration_ms();
        self.remaining_ms = self.duration_ms;
        self.remaining_synced_at_ms = now;
        self.open_epoch();
        if self.mode == TimerMode::Playing {
            let sample = self.clock.start(self.remaining_ms, now);
            self.handle_clock_sample(sample);
        }
    }

    fn open_epoch(&mut self) {
        self.epoch += 1;
        self.clock.reinit(self.epoch, self.duration_ms);
    }

    fn try_resume(&mut self) {
        let Some(raw) = self.store.load_raw(RUNTIME_KEY) else {
            return;
        };
        let Some(snapshot) = RuntimeSnapshot::decode(&raw) else {
            return;
        };
        let now = self.now_ms();
        let Some(resumed) = snapshot.reconcile(now) else {
            debug!(session = ?snapshot.session, "runtime snapshot ran out while away, starting fresh");
            return;
        };

        self.session = resumed.session;
        self.store.save(SESSION_KEY, &resumed.session);
        self.duration_ms = resumed.remaining_ms;
        self.remaining_ms = resumed.remaining_ms;
        self.remaining_synced_at_ms = now;
        self.mode = resumed.mode;
        self.open_epoch();
        if self.mode == TimerMode::Playing {
            self.clock.start(self.remaining_ms, now);
        }
        self.resumed = true;
        info!(
            session = ?resumed.session,
            mode = ?resumed.mode,
            remaining_ms = resumed.remaining_ms,
            "resumed from runtime snapshot"
        );
    }

    fn persist_runtime(&self) {
        if !self.resume_enabled {
            self.store.remove(RUNTIME_KEY);
            return;
        }
        let now = self.now_ms();
        let snapshot = RuntimeSnapshot::capture(
            self.session,
            self.mode,
            self.live_remaining_ms(now),
            now,
        );
        self.store.save(RUNTIME_KEY, &snapshot);
    }

    fn emit_reset(&mut self) {
        self.emit(EngineEvent::TimerReset {
            session: self.session,
            duration_ms: self.duration_ms,
            epoch: self.epoch,
            at: self.at(),
        });
    }

    fn emit(&mut self, event: EngineEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    fn at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms() as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
