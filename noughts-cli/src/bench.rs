//! Bench command - heuristic opponent against uniformly random play
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game()

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use noughts_core::{
    ai, apply_move, computer_turn, new_game, GameResult, HeuristicAI, Player, Reason, SessionConfig,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchArgs {
    /// Number of games to play
    #[arg(long, default_value = "1000")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Copy, Debug)]
struct GameRecord {
    result: GameResult,
    moves: usize,
    computer_moves: [u32; 3],
}

/// Aggregated results, from the computer's (O) point of view
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BenchResults {
    pub games: usize,
    pub computer_wins: usize,
    pub random_wins: usize,
    pub draws: usize,
    pub avg_moves: f32,
    /// Computer moves chosen by each rule
    pub winning_moves: u32,
    pub blocking_moves: u32,
    pub random_moves: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run bench command. The seed comes from the config file or `--seed`.
pub fn run(args: BenchArgs, config: SessionConfig) -> Result<()> {
    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }
    let seed = bench_seed(&config);

    tracing::info!("Starting bench: {} games, seed {}", args.games, seed);

    let results = play_games(args.games, seed);
    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn bench_seed(config: &SessionConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

/// Play `games` independent games in parallel
fn play_games(games: usize, seed: u64) -> BenchResults {
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| play_single_game(seed.wrapping_add(i as u64)))
        .collect();

    let mut results = BenchResults {
        games,
        ..Default::default()
    };
    let mut total_moves = 0;

    for record in &records {
        match record.result {
            GameResult::Won(Player::O) => results.computer_wins += 1,
            GameResult::Won(Player::X) => results.random_wins += 1,
            _ => results.draws += 1,
        }
        total_moves += record.moves;
        results.winning_moves += record.computer_moves[0];
        results.blocking_moves += record.computer_moves[1];
        results.random_moves += record.computer_moves[2];
    }
    results.avg_moves = total_moves as f32 / games as f32;

    results
}

fn report_results(results: &BenchResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    let pct = |n: usize| 100.0 * n as f32 / results.games as f32;
    println!("Games:          {}", results.games);
    println!("Computer wins:  {} ({:.1}%)", results.computer_wins, pct(results.computer_wins));
    println!("Random wins:    {} ({:.1}%)", results.random_wins, pct(results.random_wins));
    println!("Draws:          {} ({:.1}%)", results.draws, pct(results.draws));
    println!("Avg moves:      {:.2}", results.avg_moves);
    println!(
        "Computer moves: {} win, {} block, {} random",
        results.winning_moves, results.blocking_moves, results.random_moves
    );
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Random X against heuristic O, X moving first
fn play_single_game(seed: u64) -> GameRecord {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut computer = HeuristicAI::with_seed(seed.rotate_left(32));
    let mut state = new_game();
    let mut computer_moves = [0u32; 3];

    while !state.is_over() {
        let Some(index) = ai::random_move(state.board(), &mut rng) else {
            break;
        };
        apply_move(&mut state, index, Player::X);
        if state.is_over() {
            break;
        }

        let outcome = computer_turn(&mut state, &mut computer);
        match outcome.reason {
            Some(Reason::Win) => computer_moves[0] += 1,
            Some(Reason::Block) => computer_moves[1] += 1,
            Some(Reason::Random) => computer_moves[2] += 1,
            None => {}
        }
    }

    GameRecord {
        result: state.result(),
        moves: state.board().mark_count(),
        computer_moves,
    }
}
