//! Command-line interface for tictactoe_rooms.

use clap::{Parser, Subcommand};

/// Tic-Tac-Toe Rooms - two-player game over a shared cloud record
#[derive(Parser, Debug)]
#[command(name = "tictactoe_rooms")]
#[command(about = "Two-player tic-tac-toe over a shared cloud room", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML store config; falls back to TTT_* environment
    /// variables (a .env file is honored)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enter a room and play interactively
    Play {
        /// Room code to join
        #[arg(short, long, default_value = "8888")]
        room: String,
    },

    /// Fetch and print the current room record
    Status {
        /// Room code to inspect
        #[arg(short, long, default_value = "8888")]
        room: String,
    },

    /// Delete every record for a room (stuck or abandoned rooms)
    Clean {
        /// Room code to clean
        #[arg(short, long, default_value = "8888")]
        room: String,
    },
}
