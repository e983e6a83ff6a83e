//! Lunar Dome — keep a Moon colony alive for as many years as you can.
//!
//! Usage:
//!   cargo run -p lunardome-cli
//!   cargo run -p lunardome-cli -- --difficulty 2 --seed 1979
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=lunardome_logic=debug`).

mod game;
mod input;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lunardome_logic::constants::scores::DEFAULT_FILE;
use lunardome_logic::{Difficulty, ScoreTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, EnvFilter};

use game::{GameError, Session};
use input::Prompter;

/// Turn-based colony survival on the Moon
#[derive(Parser, Debug)]
#[command(name = "lunardome", version)]
#[command(about = "Keep a Moon colony alive for as many years as you can")]
struct Args {
    /// Difficulty level, 0 (easiest) to 4 (hardest); asked for when omitted
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=4))]
    difficulty: Option<u8>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// High-score file
    #[arg(long, default_value = DEFAULT_FILE)]
    scores: PathBuf,

    /// Skip the instructions screen
    #[arg(long)]
    no_instructions: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Load the leaderboard. A file that cannot be read is never saved over.
fn open_scores(path: &Path) -> (ScoreTable, Option<PathBuf>) {
    match ScoreTable::load(path) {
        Ok(table) => (table, Some(path.to_path_buf())),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "could not read scores: {}; new scores will not be saved",
                e
            );
            (ScoreTable::new(), None)
        }
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (scores, scores_path) = open_scores(&args.scores);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let mut session = Session::new(rng, scores, scores_path);

    prompter.say(&ui::title())?;
    if !args.no_instructions && prompter.ask_yes_no("Would you like instructions?", true)? {
        prompter.say(&ui::instructions())?;
    }

    loop {
        let difficulty = match args.difficulty {
            Some(index) => Difficulty::from_index(index as usize)?,
            None => session.choose_difficulty(&mut prompter)?,
        };

        let dome = session.play(&mut prompter, difficulty)?;
        session.record_score(&mut prompter, &dome)?;

        if !prompter.ask_yes_no("Play again?", false)? {
            break;
        }
    }

    prompter.say("Thank you for playing Lunar Dome.")?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_end_of_input() => {
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("lunardome: {}", e);
            ExitCode::FAILURE
        }
    }
}
