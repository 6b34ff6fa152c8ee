//! Interactive foreground timer.
//!
//! Owns the event loop the engine itself does not have: a countdown ticker,
//! display frames for the long-press gesture, line commands from stdin and
//! ctrl-c.

use std::io::Write;
use std::time::Duration;

use pomodori_core::timer::format_remaining;
use pomodori_core::{
    Config, DesktopNotifier, LongPressReset, NotificationDispatcher, PomodoroEngine, SessionType,
    SystemTime, TimeSource, TimerMode,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::{dispatcher, open_engine, CliResult};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const HELP: &str = "commands: p toggle | r reset | f/s/l session | hold, release reset counter | q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Reset,
    Select(SessionType),
    Hold,
    Release,
    Help,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" | "p" | "space" | "toggle" => Some(Self::Toggle),
            "r" | "reset" => Some(Self::Reset),
            "hold" | "h" => Some(Self::Hold),
            "release" | "u" => Some(Self::Release),
            "?" | "help" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            other => other.parse().ok().map(Self::Select),
        }
    }
}

struct Session {
    config: Config,
    engine: PomodoroEngine,
    notifier: NotificationDispatcher<DesktopNotifier>,
    gesture: LongPressReset,
    time: SystemTime,
}

impl Session {
    fn on_tick(&mut self) {
        let now = self.time.now_ms();
        if let Some(done) = self.engine.tick() {
            self.notifier.notify_session_end(done, now);
        }
        self.notifier.expire(now);
    }

    fn on_frame(&mut self) {
        let now = self.time.now_ms();
        if let Some(frame) = self.gesture.frame(now) {
            if frame.reset {
                self.engine.set_session_counter(0);
                self.notifier.show_toast("Session counter reset", now);
            }
        }
    }

    /// Apply one input. Returns false to quit.
    async fn on_input(&mut self, input: Input) -> bool {
        let now = self.time.now_ms();
        match input {
            Input::Toggle => {
                if self.engine.mode() == TimerMode::Paused {
                    self.notifier.ensure_permission().await;
                }
                if let Some(done) = self.engine.toggle() {
                    self.notifier.notify_session_end(done, now);
                }
            }
            Input::Reset => self.engine.reset_to_base(),
            Input::Select(session) => self.engine.select_session(session),
            Input::Hold => {
                self.gesture.begin(now);
            }
            Input::Release => {
                self.gesture.end();
            }
            Input::Help => self.notifier.show_toast(HELP, now),
            Input::Quit => return false,
        }
        true
    }

    fn status_line(&self) -> String {
        let mut line = format!(
            "{:<11} {:>8}  {:<7} focus x{}",
            self.engine.session().label(),
            format_remaining(self.engine.remaining_ms()),
            match self.engine.mode() {
                TimerMode::Playing => "playing",
                TimerMode::Paused => "paused",
            },
            self.engine.session_counter(),
        );
        if self.gesture.wants_frames() || self.gesture.progress() > 0.0 {
            line.push_str(&format!("  reset {:>3}%", (self.gesture.progress() * 100.0).round()));
        }
        if let Some(toast) = self.notifier.toast(self.time.now_ms()) {
            line.push_str("  | ");
            line.push_str(toast);
        }
        line
    }

    fn render(&self) -> std::io::Result<()> {
        let title = self.engine.title_text(&self.config.display.idle_title);
        let mut out = std::io::stdout();
        write!(out, "\x1b]0;{title}\x07\r\x1b[2K{}", self.status_line())?;
        out.flush()
    }
}

pub async fn run() -> CliResult {
    let config = Config::load_or_default();
    let mut engine = open_engine()?;
    engine.subscribe(|event| debug!(?event, "engine event"));
    if engine.resumed() {
        debug!(view = ?engine.view(), "resumed previous countdown");
    }

    let mut ticker = interval(Duration::from_millis(config.clock.tick_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frames = interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut session = Session {
        notifier: dispatcher(&config),
        gesture: LongPressReset::from_config(&config.gesture),
        time: SystemTime,
        engine,
        config,
    };
    eprintln!("{HELP}");

    loop {
        session.render()?;
        tokio::select! {
            _ = ticker.tick() => session.on_tick(),
            _ = frames.tick(), if session.gesture.wants_frames() => session.on_frame(),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Some(input) => {
                        if !session.on_input(input).await {
                            break;
                        }
                    }
                    None => {
                        let now = session.time.now_ms();
                        session.notifier.show_toast(format!("unknown command: {}", line.trim()), now);
                    }
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    let title = &session.config.display.idle_title;
    println!("\x1b]0;{title}\x07");
    Ok(())
}
