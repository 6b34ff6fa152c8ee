use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use pomodori_core::SessionType;

#[derive(Parser)]
#[command(name = "pomodori", version, about = "Pomodori focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print current timer state as JSON
    Status,
    /// Switch to a session type (pauses and resets the countdown)
    Session {
        /// focus, short or long
        session: SessionType,
    },
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Toggle between playing and paused
    Toggle,
    /// Reset the countdown to the full session length
    Reset,
    /// Session durations
    Durations {
        #[command(subcommand)]
        action: commands::durations::DurationsAction,
    },
    /// Resume a running countdown after restarting
    Resume {
        #[arg(value_enum)]
        state: commands::resume::Switch,
    },
    /// Completed focus session counter
    Counter {
        #[command(subcommand)]
        action: commands::counter::CounterAction,
    },
    /// Host configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive foreground timer
    Run,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("POMODORI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::timer::status(),
        Commands::Session { session } => commands::timer::select(session),
        Commands::Start => commands::timer::start().await,
        Commands::Pause => commands::timer::pause(),
        Commands::Toggle => commands::timer::toggle().await,
        Commands::Reset => commands::timer::reset(),
        Commands::Durations { action } => commands::durations::run(action),
        Commands::Resume { state } => commands::resume::run(state),
        Commands::Counter { action } => commands::counter::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Run => commands::run::run().await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
