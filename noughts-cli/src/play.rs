//! Play command - interactive session in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_session() - the read/apply/reply loop
//! - Level 3: human_turn(), computer_turn(), finish_round()
//! - Level 4: parse_command(), pause(), formatting

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use noughts_core::{DisplayNames, Milestone, Session, SessionConfig, TurnReport};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Your name on the scoreboard
    #[arg(long)]
    pub name: Option<String>,

    /// The computer's name in result messages
    #[arg(long)]
    pub computer_name: Option<String>,

    /// Pause before the computer replies, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after this many finished rounds
    #[arg(long)]
    pub rounds: Option<u32>,
}

/// One line of user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(usize),
    NewRound,
    Reset,
    Score,
    ClearScore,
    Help,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, config: SessionConfig) -> Result<()> {
    let config = configure_session(&args, config);
    let mut session = Session::new(config);

    tracing::info!("Starting terminal session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_session(&mut session, stdin.lock(), stdout.lock(), args.rounds)
}

fn configure_session(args: &PlayArgs, mut config: SessionConfig) -> SessionConfig {
    if let Some(name) = &args.name {
        config.names.player = name.clone();
    }
    if let Some(name) = &args.computer_name {
        config.names.computer = name.clone();
    }
    if let Some(delay) = args.delay_ms {
        config.computer_delay_ms = delay;
    }
    config
}

// ============================================================================
// LEVEL 2 - SESSION LOOP
// ============================================================================

/// Read commands until quit, end of input, or the round limit
fn play_session<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut out: W,
    max_rounds: Option<u32>,
) -> Result<()> {
    let mut finished_rounds = 0u32;
    let mut lines = input.lines();

    writeln!(out, "You are X. Enter a cell number (1-9); 'h' for help.")?;
    writeln!(out)?;
    write!(out, "{}", session.game().board())?;

    loop {
        if max_rounds.is_some_and(|limit| finished_rounds >= limit) {
            break;
        }

        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_command(&line) {
            Some(Command::Move(index)) => {
                if human_turn(session, index, &mut out)? {
                    finished_rounds += 1;
                }
            }
            Some(Command::NewRound) => {
                session.new_round();
                write!(out, "\n{}", session.game().board())?;
            }
            Some(Command::Reset) => {
                session.reset();
                writeln!(out, "Board and scores cleared.")?;
                write!(out, "\n{}", session.game().board())?;
            }
            Some(Command::Score) => write_score(session, &mut out)?,
            Some(Command::ClearScore) => {
                session.reset_scores();
                write_score(session, &mut out)?;
            }
            Some(Command::Help) => write_help(&mut out)?,
            Some(Command::Quit) => break,
            None => writeln!(out, "Unrecognised input: {}", line.trim())?,
        }
    }

    write_score(session, &mut out)?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - TURNS
// ============================================================================

/// Apply the human move and, if due, the computer's reply.
/// Returns true when the round finished.
fn human_turn<W: Write>(session: &mut Session, index: usize, out: &mut W) -> Result<bool> {
    let report = session.human_move(index);
    if let Some(rejection) = report.outcome.rejection {
        writeln!(out, "Move ignored: {}", rejection)?;
        return Ok(false);
    }

    if let Some(ticket) = report.computer_turn {
        write!(out, "\n{}", session.game().board())?;
        pause(session.config().computer_delay_ms);
        let reply = session.computer_move(ticket);
        if let Some(cell) = reply.outcome.index {
            writeln!(out, "\n{} plays {}", session.config().names.computer, cell + 1)?;
        }
        return finish_turn(session, &reply, out);
    }

    finish_turn(session, &report, out)
}

/// Show the board and, for a finished round, the result
fn finish_turn<W: Write>(session: &mut Session, report: &TurnReport, out: &mut W) -> Result<bool> {
    write!(out, "\n{}", session.game().board())?;

    let Some(message) = &report.message else {
        return Ok(false);
    };
    writeln!(out, "\n{}", message)?;
    write_score(session, out)?;

    if let Some(milestone) = report.milestone {
        writeln!(out, "{}", milestone_text(milestone, &session.config().names))?;
    }

    if report.auto_reset {
        pause(session.config().reset_delay_ms);
        session.new_round();
        write!(out, "\nNew round.\n{}", session.game().board())?;
    } else {
        writeln!(out, "Enter 'n' for a new round.")?;
    }
    Ok(true)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Option<Command> {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "q" | "quit" | "exit" => Some(Command::Quit),
        "n" | "new" => Some(Command::NewRound),
        "r" | "reset" => Some(Command::Reset),
        "s" | "score" => Some(Command::Score),
        "c" | "clear" => Some(Command::ClearScore),
        "h" | "help" | "?" => Some(Command::Help),
        _ => match word.parse::<usize>() {
            // Cells are numbered from 1 on screen
            Ok(n) if n > 0 => Some(Command::Move(n - 1)),
            _ => None,
        },
    }
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

fn milestone_text(milestone: Milestone, names: &DisplayNames) -> String {
    match milestone {
        Milestone::PlayerStreak { wins } => {
            format!("Congratulations {}, that's {} wins!", names.player, wins)
        }
        Milestone::ComputerStreak { wins } => {
            format!("{} has beaten you {} times. A nemesis is born.", names.computer, wins)
        }
    }
}

fn write_score<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    let score = session.current_score();
    let names = &session.config().names;
    writeln!(
        out,
        "{}: {}  {}: {}",
        names.player, score.player_wins, names.computer, score.computer_wins
    )
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "1-9    place your X")?;
    writeln!(out, "n      new round (scores kept)")?;
    writeln!(out, "r      reset board and scores")?;
    writeln!(out, "s      show score")?;
    writeln!(out, "c      clear score")?;
    writeln!(out, "q      quit")
}

// ============================================================================
// TESTS
// ============================================================================
