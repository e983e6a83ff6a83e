//! Lunar Dome Headless Simulation Harness
//!
//! Plays seeded games with a scripted administrator at every difficulty
//! and checks the dome's invariants after every step. Runs entirely
//! in-process — no terminal input, no score file.
//!
//! Usage:
//!   cargo run -p lunardome-simtest
//!   cargo run -p lunardome-simtest -- --games 50 --seed 7 --verbose
//!   cargo run -p lunardome-simtest -- --json > report.json

use clap::Parser;
use lunardome_logic::{
    Commodity, Difficulty, DomeState, EventCatalog, EventOutcome, ScoreEntry, ScoreTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Safety valve against a game that never ends.
const MAX_YEARS: u32 = 500;

#[derive(Parser, Debug)]
#[command(name = "lunardome-simtest")]
#[command(about = "Play seeded Lunar Dome games and validate invariants")]
struct Args {
    /// Games to play per difficulty level
    #[arg(short, long, default_value = "20")]
    games: u64,

    /// Base seed; game `n` uses `seed + n`
    #[arg(long, default_value = "1979")]
    seed: u64,

    /// Print every check, not only failures
    #[arg(short, long)]
    verbose: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    json: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Default, Serialize)]
struct LevelSummary {
    difficulty: Difficulty,
    games: u64,
    mean_years: f64,
    max_years: u32,
    max_colonists: i64,
    events_fired: u64,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    games_per_level: u64,
    levels: Vec<LevelSummary>,
    results: Vec<TestResult>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !args.json {
        println!("=== Lunar Dome Simulation Harness ===\n");
    }

    let mut results = Vec::new();
    let mut levels = Vec::new();
    let mut finished = Vec::new();

    // 1. Construction and the year-0 turn
    results.extend(validate_construction(&args));

    // 2. Scripted games at every difficulty
    for level in Difficulty::ALL {
        let (summary, level_results, entries) = validate_games(&args, level);
        levels.push(summary);
        results.extend(level_results);
        finished.extend(entries);
    }

    // 3. Leaderboard built from the games just played
    results.extend(validate_score_table(&args, finished));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if args.json {
        let report = Report {
            seed: args.seed,
            games_per_level: args.games,
            levels,
            results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("could not encode report: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for summary in &levels {
            println!(
                "  {:<24} mean {:>5.1} years, best {:>3} years, {:>6} colonists max, {} events",
                summary.difficulty.to_string(),
                summary.mean_years,
                summary.max_years,
                summary.max_colonists,
                summary.events_fired
            );
        }
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || args.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Construction ─────────────────────────────────────────────────────

fn validate_construction(args: &Args) -> Vec<TestResult> {
    if !args.json {
        println!("--- Construction ---");
    }
    let mut results = Vec::new();

    for level in Difficulty::ALL {
        let mut problems = Vec::new();
        for n in 0..args.games {
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(n));
            let dome = DomeState::new(level, &mut rng);
            if dome.year() != 1 {
                problems.push(format!("seed {}: year {} after construction", n, dome.year()));
            }
            if dome.colonists() != 100 || dome.soup() != 2000 || dome.oxygen() != 3000 {
                problems.push(format!("seed {}: year-0 turn consumed stock", n));
            }
            problems.extend(check_invariants(&dome));
        }
        results.push(TestResult {
            name: format!("construction_{}", level.name().to_lowercase()),
            passed: problems.is_empty(),
            detail: summarize(&problems, "fresh domes are valid"),
        });
    }
    results
}

// ── 2. Scripted games ───────────────────────────────────────────────────

fn validate_games(
    args: &Args,
    level: Difficulty,
) -> (LevelSummary, Vec<TestResult>, Vec<ScoreEntry>) {
    if !args.json {
        println!("--- Games at {} ---", level);
    }
    let mut summary = LevelSummary {
        difficulty: level,
        games: args.games,
        ..LevelSummary::default()
    };
    let mut problems = Vec::new();
    let mut entries = Vec::new();
    let mut total_years = 0u64;

    for n in 0..args.games {
        let seed = args.seed.wrapping_add(n);
        let (dome, events) = play_game(level, seed, &mut problems);

        total_years += dome.year() as u64;
        summary.max_years = summary.max_years.max(dome.year());
        summary.max_colonists = summary.max_colonists.max(dome.colonists());
        summary.events_fired += events;
        entries.push(ScoreEntry::from_dome(&dome).with_player(&format!("sim-{}", seed)));
    }
    if args.games > 0 {
        summary.mean_years = total_years as f64 / args.games as f64;
    }

    let name = level.name().to_lowercase();
    let results = vec![
        TestResult {
            name: format!("invariants_{}", name),
            passed: problems.is_empty(),
            detail: summarize(&problems, "every step kept the dome consistent"),
        },
        TestResult {
            name: format!("games_end_{}", name),
            passed: summary.max_years < MAX_YEARS,
            detail: format!(
                "{} games, mean {:.1} years, longest {}",
                args.games, summary.mean_years, summary.max_years
            ),
        },
    ];
    (summary, results, entries)
}

/// Play one game with the scripted policy, recording invariant breaches.
fn play_game(level: Difficulty, seed: u64, problems: &mut Vec<String>) -> (DomeState, u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dome = DomeState::new(level, &mut rng);
    let mut catalog = EventCatalog::new();
    let mut events = 0;
    let mut peak = dome.peak_credits();

    while dome.is_viable() && dome.year() < MAX_YEARS {
        if let Some(outcome) = catalog.maybe_trigger(&mut dome, &mut rng) {
            events += 1;
            problems.extend(check_event(&outcome));
        }

        administer(&mut dome, problems);

        let year = dome.year();
        dome.end_turn(&mut rng);
        if dome.year() != year + 1 {
            problems.push(format!("seed {}: year went {} -> {}", seed, year, dome.year()));
        }

        problems.extend(check_invariants(&dome));
        if dome.peak_credits() < peak {
            problems.push(format!("seed {}: peak credits fell", seed));
        }
        peak = dome.peak_credits();
    }

    if dome.is_viable() {
        problems.push(format!("seed {}: still viable after {} years", seed, MAX_YEARS));
    }
    (dome, events)
}

/// Sculpt surplus oxygen, repair when affordable, then stock up for next
/// year as far as credits allow.
fn administer(dome: &mut DomeState, problems: &mut Vec<String>) {
    let oxygen_needed = dome.required_next_year(Commodity::Oxygen);
    let surplus = (dome.oxygen() - oxygen_needed).max(0);
    if dome.sculpture_cost() > 0 {
        let count = (surplus / dome.sculpture_cost()).min(dome.max_sculptures());
        if let Err(e) = dome.produce_sculptures(count) {
            problems.push(format!("sculpting {} refused: {}", count, e));
        }
    }

    dome.perform_maintenance();

    for commodity in [Commodity::Soup, Commodity::Oxygen] {
        let shortfall = (dome.required_next_year(commodity) - dome.stock(commodity)).max(0);
        let quantity = match dome.max_affordable(commodity) {
            Ok(max) => shortfall.min(max),
            Err(e) => {
                problems.push(e.to_string());
                continue;
            }
        };
        if let Err(e) = dome.buy(commodity, quantity) {
            problems.push(format!("buying {} {} refused: {}", quantity, commodity, e));
        }
    }
}

fn check_invariants(dome: &DomeState) -> Vec<String> {
    let mut problems = Vec::new();
    let year = dome.year();

    for (name, value) in [
        ("credits", dome.credits()),
        ("colonists", dome.colonists()),
        ("soup", dome.soup()),
        ("oxygen", dome.oxygen()),
    ] {
        if value < 0 {
            problems.push(format!("year {}: {} is negative ({})", year, name, value));
        }
    }
    if !(0..=100).contains(&dome.integrity()) {
        problems.push(format!("year {}: integrity {} out of range", year, dome.integrity()));
    }
    if dome.peak_credits() < dome.credits() {
        problems.push(format!("year {}: peak credits below credits", year));
    }

    let expected_cost = ((100 - dome.integrity()) as f64 * dome.difficulty().multiplier())
        .floor() as i64
        * 100;
    if dome.maintenance_cost() != expected_cost {
        problems.push(format!(
            "year {}: maintenance cost {} != {}",
            year,
            dome.maintenance_cost(),
            expected_cost
        ));
    }

    let exhausted = dome.soup() <= 0 || dome.oxygen() <= 0 || dome.integrity() <= 0;
    if dome.is_viable() == exhausted {
        problems.push(format!("year {}: viability disagrees with stocks", year));
    }
    problems
}

fn check_event(outcome: &EventOutcome) -> Vec<String> {
    let sign_ok = if outcome.is_favorable() {
        outcome.amount >= 0
    } else {
        outcome.amount <= 0
    };
    if sign_ok {
        Vec::new()
    } else {
        vec![format!(
            "{:?} applied {} with the wrong sign",
            outcome.preset, outcome.amount
        )]
    }
}

// ── 3. Score table ──────────────────────────────────────────────────────

fn validate_score_table(args: &Args, finished: Vec<ScoreEntry>) -> Vec<TestResult> {
    if !args.json {
        println!("--- Score Table ---");
    }
    let mut results = Vec::new();
    let mut table = ScoreTable::new();
    let mut admitted = 0;

    for entry in finished {
        if table.is_high_score(&entry) {
            admitted += 1;
            table.add(entry);
        }
    }

    let ranked = table
        .entries()
        .windows(2)
        .all(|w| w[0].rank_key() >= w[1].rank_key());
    results.push(TestResult {
        name: "scores_ranked".into(),
        passed: ranked && table.len() <= 10,
        detail: format!("{} entries after {} admissions", table.len(), admitted),
    });

    let reloaded = ScoreTable::from_text(&table.to_text());
    results.push(TestResult {
        name: "scores_text_roundtrip".into(),
        passed: reloaded == table,
        detail: format!("{} bytes of score text", table.to_text().len()),
    });

    results
}

fn summarize(problems: &[String], ok: &str) -> String {
    match problems.first() {
        None => ok.to_string(),
        Some(first) if problems.len() == 1 => first.clone(),
        Some(first) => format!("{} (and {} more)", first, problems.len() - 1),
    }
}
