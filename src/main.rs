//! Goban: a Go rules engine.
//!
//! ## Usage
//!
//! - `goban` - Show a demo
//! - `goban gtp` - Start a GTP referee for GUI integration
//! - `goban demo` - Replay a short game with a capture
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban::constants::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use goban::game::{GameState, Move};
use goban::gtp::GtpEngine;

const DEMO_MIN_SIZE: usize = 5;

/// Goban: a Go rules engine
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) referee for use with GUI applications
    Gtp {
        /// Initial board size
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = board_size)]
        size: usize,
    },
    /// Replay a short demo game
    Demo {
        /// Board size
        #[arg(long, default_value_t = 9, value_parser = demo_board_size)]
        size: usize,
    },
}

fn board_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("board size must be {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}"))
    }
}

/// The demo game reaches row and column 5.
fn demo_board_size(s: &str) -> Result<usize, String> {
    let size = board_size(s)?;
    if size < DEMO_MIN_SIZE {
        return Err(format!("the demo needs a board of at least {DEMO_MIN_SIZE}"));
    }
    Ok(size)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { size }) => GtpEngine::new(size).run(),
        Some(Commands::Demo { size }) => run_demo(size),
        None => run_demo(9),
    }
}

fn run_demo(size: usize) -> anyhow::Result<()> {
    println!("Goban: Go rules engine\n");

    // Black surrounds the white stone at D4 and captures it with D5.
    let moves = ["D3", "D4", "C4", "A1", "E4", "A2", "D5"];
    let mut game = GameState::new_game(size);
    for text in moves {
        let mv: Move = text.parse()?;
        let player = game.next_player();
        game = game.try_apply_move(mv)?;
        println!(
            "{player} {mv} (captures: black {}, white {}, hash {:#018x})",
            game.captures(goban::Player::Black),
            game.captures(goban::Player::White),
            game.board().zobrist_hash()
        );
        println!("{}", game.board());
    }

    let retake: Move = "D4".parse()?;
    match game.check_move(retake) {
        Ok(()) => println!("White may play {retake}"),
        Err(err) => println!("White {retake}: {err}"),
    }
    Ok(())
}
