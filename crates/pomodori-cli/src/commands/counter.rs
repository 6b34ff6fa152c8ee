use std::future::Future;
use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomodori_core::{Config, LongPressReset, SystemTime, TimeSource};
use tokio::time::{interval, MissedTickBehavior};

use super::{open_engine, CliResult};

#[derive(Subcommand)]
pub enum CounterAction {
    /// Print completed focus sessions
    Show,
    /// Reset the counter to zero
    Reset {
        /// Require a long press: hold for the configured time, ctrl-c to let go
        #[arg(long)]
        hold: bool,
    },
}

pub async fn run(action: CounterAction) -> CliResult {
    let mut engine = open_engine()?;

    match action {
        CounterAction::Show => println!("{}", engine.session_counter()),
        CounterAction::Reset { hold: false } => {
            engine.set_session_counter(0);
            eprintln!("Session counter reset");
            println!("0");
        }
        CounterAction::Reset { hold: true } => {
            let config = Config::load_or_default();
            let mut gesture = LongPressReset::from_config(&config.gesture);
            if hold_until_reset(&mut gesture, tokio::signal::ctrl_c()).await? {
                engine.set_session_counter(0);
                eprintln!("Session counter reset");
            } else {
                eprintln!("released early, counter unchanged");
            }
            println!("{}", engine.session_counter());
        }
    }
    Ok(())
}

/// Drive the gesture at ~60 frames per second until it settles or `release`
/// resolves. Returns whether it fired.
async fn hold_until_reset<R>(gesture: &mut LongPressReset, release: R) -> CliResult<bool>
where
    R: Future,
{
    let time = SystemTime;
    let mut frames = interval(Duration::from_millis(16));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut fired = false;
    tokio::pin!(release);

    gesture.begin(time.now_ms());
    while gesture.wants_frames() {
        tokio::select! {
            _ = frames.tick() => {
                if let Some(frame) = gesture.frame(time.now_ms()) {
                    fired |= frame.reset;
                    draw_ring(frame.progress)?;
                }
            }
            _ = &mut release => {
                if let Some(progress) = gesture.end() {
                    draw_ring(progress)?;
                }
                break;
            }
        }
    }
    eprintln!();
    Ok(fired)
}

fn draw_ring(progress: f64) -> std::io::Result<()> {
    const WIDTH: usize = 24;
    let filled = (progress * WIDTH as f64).round() as usize;
    let mut err = std::io::stderr();
    write!(
        err,
        "\r[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        (progress * 100.0).round() as u32
    )?;
    err.flush()
}
