//! Dots-Rust: territory-capture game with a minimax AI.
//!
//! ## Usage
//!
//! - `dots-rust` - Show a demo
//! - `dots-rust play` - Start the text protocol on stdin/stdout
//! - `dots-rust demo` - Watch a random player face the AI

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dots_rust::board::Player;
use dots_rust::constants::{DEFAULT_BOARD_SIZE, DEFAULT_SEARCH_DEPTH};
use dots_rust::movegen::MoveGeneration;
use dots_rust::protocol::TextEngine;
use dots_rust::search::SearchConfig;
use dots_rust::service::{GameService, ServiceConfig};
use dots_rust::strategy::{AiStrategy, RandomStrategy};

/// Dots-Rust: territory-capture game engine with a minimax AI
#[derive(Parser)]
#[command(name = "dots-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    engine: EngineArgs,

    /// Increase log detail (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct EngineArgs {
    /// Board side length for new games
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, global = true)]
    size: usize,

    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH, global = true)]
    depth: u32,

    /// Search root moves on all cores
    #[arg(long, global = true)]
    parallel: bool,

    /// Consider every empty cell instead of only cells near enemy stones
    #[arg(long, global = true)]
    exhaustive: bool,

    /// Stop searching after this many milliseconds and play the best move so far
    #[arg(long, global = true)]
    time_limit_ms: Option<u64>,

    /// Let the AI move first
    #[arg(long, global = true)]
    ai_first: bool,
}

impl EngineArgs {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            starting_player: if self.ai_first { Player::Ai } else { Player::Human },
            search: SearchConfig {
                depth: self.depth,
                parallel: self.parallel,
                move_generation: if self.exhaustive {
                    MoveGeneration::Exhaustive
                } else {
                    MoveGeneration::Frontier
                },
                time_limit: self.time_limit_ms.map(Duration::from_millis),
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server on stdin/stdout
    Play,
    /// Play a random opponent against the AI and print every position
    Demo {
        /// Seed for the random opponent
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let service = GameService::new(cli.engine.service_config())
        .context("invalid engine configuration")?;

    match cli.command {
        Some(Commands::Play) => {
            let mut engine = TextEngine::new(service, cli.engine.size);
            engine.run(std::io::stdin().lock(), std::io::stdout())?;
        }
        Some(Commands::Demo { seed }) => run_demo(service, cli.engine.size, seed)?,
        None => run_demo(service, cli.engine.size, 1)?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo(mut service: GameService, size: usize, seed: u64) -> Result<()> {
    println!("Dots-Rust: random player (H) vs minimax AI (A)\n");

    let id = service.create_game(size)?;
    let mut human = RandomStrategy::with_seed(seed);

    loop {
        let state = service.get_state(&id)?;
        if state.is_game_over {
            break;
        }
        let state = match state.current_player {
            Player::Human => {
                let mv = human.next_move(state)?;
                service.apply_human_move(&id, mv.row, mv.col)?
            }
            Player::Ai => service.apply_ai_move(&id)?,
            Player::None => bail!("game {id} has no side to move but is not over"),
        };
        if let Some(mv) = state.last_move {
            let captured = state
                .last_move_result
                .as_ref()
                .map_or(0, |r| r.captured.len());
            println!(
                "{} plays ({}, {}), captures {captured}; Human {} AI {}",
                mv.player, mv.row, mv.col, state.scores.human, state.scores.ai
            );
        }
        println!("{}", state.board);
    }

    let state = service.end_game(&id)?;
    match state.winner {
        Player::None => println!("Tie at {} points each", state.scores.human),
        winner => println!(
            "{winner} wins, Human {} AI {}",
            state.scores.human, state.scores.ai
        ),
    }
    Ok(())
}
