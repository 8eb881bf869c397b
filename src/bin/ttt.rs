//! ttt CLI - Train, play against, and inspect tabular Q-learning agents
//!
//! This CLI provides a unified interface for:
//! - Training an agent by self-play and saving timestamped tables
//! - Playing against a saved table on the terminal
//! - Inspecting the action values a table holds for a board

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ttt")]
#[command(version, about = "Tic-tac-toe Q-learning by self-play", long_about = None)]
struct Cli {
    /// Log library internals at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent by self-play
    Train(Box<tictactoe_rl::cli::commands::train::TrainArgs>),

    /// Play against a trained agent
    Play(tictactoe_rl::cli::commands::play::PlayArgs),

    /// Inspect a saved Q-table
    Inspect(tictactoe_rl::cli::commands::inspect::InspectArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,tictactoe_rl=debug"
    } else {
        "info,tictactoe_rl=info"
    };

    // Logs go to stderr so they never interleave with the play prompt.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => tictactoe_rl::cli::commands::train::execute(*args),
        Commands::Play(args) => tictactoe_rl::cli::commands::play::execute(args),
        Commands::Inspect(args) => tictactoe_rl::cli::commands::inspect::execute(args),
    }
}
