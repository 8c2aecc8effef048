use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "peon", version, about = "peon-ping event hook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one host event (reads JSON from stdin unless --event-type is given)
    Handle(commands::handle::HandleArgs),
    /// Mute sounds and notifications
    Pause,
    /// Unmute sounds and notifications
    Resume,
    /// Print current settings as JSON
    Status,
}

/// Log to stderr; stdout is reserved for the terminal title escape.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PEON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Handle(args) => commands::handle::run(args),
        Commands::Pause => commands::pause::pause(),
        Commands::Resume => commands::pause::resume(),
        Commands::Status => commands::pause::status(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
