use clap::Subcommand;
use pomodori_core::DurationsInput;

use super::{open_engine, CliResult};

#[derive(Subcommand)]
pub enum DurationsAction {
    /// Print configured durations in minutes
    Show,
    /// Change durations (values are clamped to 1..=180 minutes)
    Set {
        /// Focus minutes
        #[arg(long, allow_negative_numbers = true)]
        focus: Option<f64>,
        /// Short break minutes
        #[arg(long, allow_negative_numbers = true)]
        short: Option<f64>,
        /// Long break minutes
        #[arg(long, allow_negative_numbers = true)]
        long: Option<f64>,
        /// Apply without pausing a running countdown
        #[arg(long)]
        preview: bool,
    },
}

pub fn run(action: DurationsAction) -> CliResult {
    let mut engine = open_engine()?;

    match action {
        DurationsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&engine.durations())?);
        }
        DurationsAction::Set {
            focus,
            short,
            long,
            preview,
        } => {
            let current = DurationsInput::from(engine.durations());
            let next = DurationsInput {
                focus_min: focus.unwrap_or(current.focus_min),
                short_min: short.unwrap_or(current.short_min),
                long_min: long.unwrap_or(current.long_min),
            };
            let saved = if preview {
                engine.preview_durations(next)
            } else {
                let saved = engine.save_durations(next);
                eprintln!("Timer settings saved");
                saved
            };
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }
    Ok(())
}
