use clap::ValueEnum;

use super::{open_engine, print_view, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub fn run(state: Switch) -> CliResult {
    let mut engine = open_engine()?;
    engine.set_resume_enabled(matches!(state, Switch::On));
    print_view(&engine)
}
