//! Tic-Tac-Toe Rooms - CLI client
//!
//! Enters a shared room record, plays moves, and reconciles with the
//! opponent via explicit refresh.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::Write;
use tictactoe_rooms::{
    EnteredRoom, MoveOutcome, RestRoomStore, RoomSession, SessionError, StoreConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::from_env()?,
    };
    let store = RestRoomStore::new(&config)?;

    match cli.command {
        Command::Play { room } => run_play(store, &room).await,
        Command::Status { room } => run_status(store, &room).await,
        Command::Clean { room } => run_clean(store, &room).await,
    }
}

/// Enter the room and run the interactive loop.
async fn run_play(store: RestRoomStore, room_id: &str) -> Result<()> {
    let mut session = RoomSession::new(store);
    println!("Device: {}...", &session.device().as_str()[..8]);

    match session.enter(room_id).await {
        Ok(mark) => println!("Entered room {room_id} as {mark}"),
        Err(e) => {
            println!("Could not enter room {room_id}: {e}");
            return Ok(());
        }
    }
    if let Some(room) = session.room() {
        print_room(room);
    }
    print_help();

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let mut words = line.split_whitespace();

        match words.next() {
            Some("move") => {
                let Some(cell) = words.next().and_then(|w| w.parse::<usize>().ok()) else {
                    println!("Usage: move <0-8>");
                    continue;
                };
                match session.play(cell).await {
                    Ok(report) => {
                        match report.outcome {
                            MoveOutcome::NextTurn(next) => {
                                println!("Move saved, {next} to play. Opponent refreshes to see it.")
                            }
                            MoveOutcome::Finished(verdict) => println!("Game over: {verdict}!"),
                        }
                        if let Some(e) = report.sync_error {
                            println!("Warning: move kept locally, sync failed: {e}");
                        }
                        if let Some(room) = session.room() {
                            print_room(room);
                        }
                    }
                    Err(e) => println!("Move rejected: {e}"),
                }
            }
            Some("refresh") => match session.restore().await {
                Ok(()) => {
                    println!("Refreshed from the room record.");
                    if let Some(room) = session.room() {
                        print_room(room);
                    }
                }
                Err(e @ (SessionError::RoomMissing | SessionError::NotAMember)) => {
                    println!("{e}; re-enter the room.");
                    break;
                }
                Err(e) => println!("Refresh failed: {e}"),
            },
            Some("restart") => match session.restart().await {
                Ok(None) => {
                    println!("Game restarted.");
                    if let Some(room) = session.room() {
                        print_room(room);
                    }
                }
                Ok(Some(e)) => println!("Restarted locally, sync failed: {e}"),
                Err(e) => println!("Restart rejected: {e}"),
            },
            Some("leave") => {
                session.leave().await?;
                println!("Left room {room_id}.");
                break;
            }
            Some("quit") | Some("exit") => break,
            Some("help") => print_help(),
            Some(other) => println!("Unknown command: {other} (try 'help')"),
            None => {}
        }
    }

    Ok(())
}

/// One-shot fetch and print of the remote record.
async fn run_status(store: RestRoomStore, room_id: &str) -> Result<()> {
    use tictactoe_rooms::RoomStore;

    match store.find(room_id).await? {
        None => println!("No record for room {room_id}."),
        Some(record) => {
            println!("Room {room_id} (record {})", record.object_id);
            println!("{}", record.state.board.display());
            println!("Players: {}/2", record.players.len());
            match (record.state.game_over, record.state.winner) {
                (true, Some(verdict)) => println!("Game over: {verdict}"),
                _ => match record.state.current_player {
                    Some(mark) => println!("Turn: {mark}"),
                    None => println!("Turn: -"),
                },
            }
        }
    }
    Ok(())
}

/// Delete every record for the room.
async fn run_clean(store: RestRoomStore, room_id: &str) -> Result<()> {
    let mut session = RoomSession::new(store);
    let count = session.force_clean(room_id).await?;
    info!(room_id, count, "Force clean finished");
    println!("Removed {count} record(s) for room {room_id}.");
    Ok(())
}

fn print_room(room: &EnteredRoom) {
    println!();
    println!("{}", room.state.board.display());
    println!(
        "Room {} (players: {}/2) | You are {}",
        room.room_id,
        room.players.len(),
        room.mark
    );
    if room.state.game_over {
        match room.state.winner {
            Some(verdict) => println!("Game over: {verdict}!"),
            None => println!("Game over."),
        }
    } else if room.state.current_player == Some(room.mark) {
        println!("Your turn.");
    } else {
        println!("Waiting for opponent (refresh to see their move).");
    }
    println!();
}

fn print_help() {
    println!("Commands: move <0-8> | refresh | restart | leave | quit");
}
