//! Integration tests for whole games and the score file.
//!
//! Exercises: Difficulty → DomeState → EventCatalog → end_turn loop
//! → ScoreEntry → ScoreTable → file on disk and back.

use std::path::PathBuf;

use lunardome_logic::{
    Commodity, Difficulty, DomeState, EventCatalog, MaintenanceOutcome, ScoreEntry, ScoreTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

fn temp_score_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "lunardome-{}-{}.txt",
        name,
        std::process::id()
    ))
}

/// Play until the dome fails, maintaining whenever it is affordable.
fn play_to_the_end(level: Difficulty, seed: u64) -> DomeState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dome = DomeState::new(level, &mut rng);
    let mut catalog = EventCatalog::new();

    while dome.is_viable() {
        catalog.maybe_trigger(&mut dome, &mut rng);
        dome.perform_maintenance();
        dome.end_turn(&mut rng);
        assert!(dome.year() < 1000, "game never ended");
    }
    dome
}

// ── Turn loop ──────────────────────────────────────────────────────────

#[test]
fn five_idle_turns_from_a_fixed_seed() {
    let mut rng = StdRng::seed_from_u64(2022);
    let mut dome = DomeState::new(Difficulty::Cadet, &mut rng);

    // Enough soup for the first year and one unit short of the second.
    dome.set_soup(dome.required_next_year(Commodity::Soup) * 2 - 1);

    let mut viable_by_year = Vec::new();
    for _ in 0..5 {
        dome.end_turn(&mut rng);
        viable_by_year.push((dome.year(), dome.is_viable()));
        if dome.year() == 3 {
            assert_eq!(dome.soup(), 0);
            assert_eq!(dome.exhausted(), vec![Commodity::Soup]);
        }
    }

    assert_eq!(dome.year(), 6);
    assert_eq!(
        viable_by_year,
        vec![(2, true), (3, false), (4, false), (5, false), (6, false)]
    );
    assert_eq!(dome.soup(), 0);
    assert!(dome.oxygen() > 0);
    assert!(dome.integrity() > 0);
}

#[test]
fn same_seed_same_game() {
    let a = play_to_the_end(Difficulty::Overseer, 99);
    let b = play_to_the_end(Difficulty::Overseer, 99);
    assert_eq!(a.year(), b.year());
    assert_eq!(a.colonists(), b.colonists());
    assert_eq!(a.peak_credits(), b.peak_credits());
    assert_eq!(a.exhausted(), b.exhausted());
}

#[test]
fn every_game_ends_with_an_exhausted_commodity() {
    for level in Difficulty::ALL {
        for seed in 0..5 {
            let dome = play_to_the_end(level, seed);
            assert!(!dome.is_viable());
            assert!(!dome.exhausted().is_empty());
            assert!(dome.integrity() >= 0 && dome.integrity() <= 100);
            assert!(dome.credits() >= 0);
        }
    }
}

#[test]
fn maintenance_then_decay() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut dome = DomeState::new(Difficulty::Engineer, &mut rng);
    dome.end_turn(&mut rng);
    assert_eq!(dome.integrity(), 90);

    let cost = dome.maintenance_cost();
    assert_eq!(cost, 1500);
    assert_eq!(dome.perform_maintenance(), MaintenanceOutcome::Repaired { cost });
    assert_eq!(dome.integrity(), 100);
    assert_eq!(dome.credits(), 4500 - cost);
}

// ── Scores ─────────────────────────────────────────────────────────────

#[test]
fn finished_game_enters_the_table() {
    let dome = play_to_the_end(Difficulty::Cadet, 3);
    let mut table = ScoreTable::empty();
    let entry = ScoreEntry::from_dome(&dome).with_player("Armstrong");

    assert!(table.is_high_score(&entry));
    table.add(entry.clone());
    assert_eq!(table.entries(), &[entry]);
}

#[test]
fn score_file_roundtrip() {
    let path = temp_score_path("roundtrip");
    let mut table = ScoreTable::new();
    table.add(ScoreEntry::new("Collins", 40, 900, 12000));
    table.add(ScoreEntry::new("Aldrin", 11, 20, 1));
    table.save(&path).unwrap();

    let loaded = ScoreTable::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, table);
    assert_eq!(loaded.entries()[0].player(), "Collins");
}

#[test]
fn missing_score_file_gives_defaults() {
    let path = temp_score_path("missing");
    let _ = std::fs::remove_file(&path);
    assert_eq!(ScoreTable::load(&path).unwrap(), ScoreTable::new());
}

#[test]
fn empty_score_file_gives_defaults() {
    let path = temp_score_path("empty");
    std::fs::write(&path, "").unwrap();
    let loaded = ScoreTable::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, ScoreTable::new());
}

#[test]
fn undecodable_score_line_keeps_the_rest() {
    let path = temp_score_path("undecodable");
    std::fs::write(&path, b"Ann,4,120,5000\nMik\xffe,3,1,1\nCy,9,300,4000\n").unwrap();
    let loaded = ScoreTable::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.entries()[0], ScoreEntry::new("Cy", 9, 300, 4000));
    assert_eq!(loaded.entries()[1], ScoreEntry::new("Ann", 4, 120, 5000));
}
