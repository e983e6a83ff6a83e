//! High scores — ranking completed games and persisting the leaderboard.
//!
//! The score file is flat text, one `player,years,colonists,peak_credits`
//! record per line with no header, so it stays human-editable. Loading is
//! best-effort: a missing file or one without a single readable record
//! leaves the default table in place.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::scores;
use crate::dome::DomeState;
use crate::error::ScoreError;

/// Strip commas and control characters, trim, and cap at 20 characters.
pub fn sanitize_player_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| *c != ',' && !c.is_control())
        .collect();
    cleaned.trim().chars().take(scores::MAX_PLAYER_NAME).collect()
}

/// Outcome of one completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    player: String,
    pub years: u32,
    pub colonists: u64,
    pub peak_credits: u64,
}

impl ScoreEntry {
    pub fn new(player: &str, years: u32, colonists: u64, peak_credits: u64) -> Self {
        Self {
            player: sanitize_player_name(player),
            years,
            colonists,
            peak_credits,
        }
    }

    /// Snapshot a finished dome; the player name is attached afterwards.
    pub fn from_dome(dome: &DomeState) -> Self {
        Self::new(
            "",
            dome.year(),
            u64::try_from(dome.colonists()).unwrap_or(0),
            u64::try_from(dome.peak_credits()).unwrap_or(0),
        )
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn set_player(&mut self, name: &str) {
        self.player = sanitize_player_name(name);
    }

    pub fn with_player(mut self, name: &str) -> Self {
        self.set_player(name);
        self
    }

    /// Years, then colonists, then peak credits, all descending.
    pub fn rank_key(&self) -> (u32, u64, u64) {
        (self.years, self.colonists, self.peak_credits)
    }

    /// The leaderboard's "better than" test.
    ///
    /// Strict on years and colonists, non-strict on peak credits, so an
    /// exact tie still counts as beating an existing entry.
    pub fn outranks(&self, other: &ScoreEntry) -> bool {
        if self.years != other.years {
            return self.years > other.years;
        }
        if self.colonists != other.colonists {
            return self.colonists > other.colonists;
        }
        self.peak_credits >= other.peak_credits
    }

    fn to_record(&self) -> String {
        format!(
            "{},{},{},{}",
            self.player, self.years, self.colonists, self.peak_credits
        )
    }

    fn parse_record(line_number: usize, line: &str) -> Result<Self, ScoreError> {
        let malformed = |reason: String| ScoreError::Malformed {
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
        }

        let years = fields[1]
            .trim()
            .parse::<u32>()
            .map_err(|e| malformed(format!("years: {}", e)))?;
        let colonists = fields[2]
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(format!("colonists: {}", e)))?;
        let peak_credits = fields[3]
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(format!("peak credits: {}", e)))?;

        Ok(Self::new(fields[0], years, colonists, peak_credits))
    }
}

/// Up to ten entries, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    /// A table seeded with ten placeholder entries.
    pub fn new() -> Self {
        let entries = (0..scores::TABLE_SIZE as u64)
            .map(|i| {
                ScoreEntry::new(
                    scores::DEFAULT_PLAYER,
                    (scores::TABLE_SIZE as u64 - i) as u32,
                    200 - 15 * i,
                    5000 - 250 * i,
                )
            })
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the table is empty or `candidate` outranks any entry.
    pub fn is_high_score(&self, candidate: &ScoreEntry) -> bool {
        self.entries.is_empty() || self.entries.iter().any(|e| candidate.outranks(e))
    }

    /// 1-based position `candidate` would take if added now, or `None` if
    /// it would fall off the bottom.
    pub fn rank_of(&self, candidate: &ScoreEntry) -> Option<usize> {
        let ahead = self
            .entries
            .iter()
            .filter(|e| e.rank_key() >= candidate.rank_key())
            .count();
        (ahead < scores::TABLE_SIZE).then_some(ahead + 1)
    }

    /// Insert, re-rank and keep the top ten.
    pub fn add(&mut self, entry: ScoreEntry) {
        log::info!(
            "Adding score for {:?}: {} years, {} colonists, {} peak credits",
            entry.player(),
            entry.years,
            entry.colonists,
            entry.peak_credits
        );
        self.entries.push(entry);
        self.rerank();
    }

    fn rerank(&mut self) {
        // Stable sort: among equal scores the earlier entry stays ahead.
        self.entries.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
        self.entries.truncate(scores::TABLE_SIZE);
    }

    // ── Text format ────────────────────────────────────────────────────

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_record() + "\n")
            .collect()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ScoreError> {
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parse score records, starting from the default table.
    ///
    /// Unreadable lines are skipped; if none are readable the defaults are
    /// kept untouched.
    pub fn from_text(text: &str) -> Self {
        Self::from_records(text.split('\n').map(|l| Ok(l.as_bytes().to_vec())))
            .unwrap_or_else(|_| Self::new())
    }

    /// Parse records from `reader`.
    ///
    /// Lines are split on raw bytes, so a line that is not valid UTF-8 is
    /// skipped like any other malformed record. Only a failed read is an
    /// error.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, ScoreError> {
        Self::from_records(reader.split(b'\n'))
    }

    fn from_records<I>(lines: I) -> Result<Self, ScoreError>
    where
        I: Iterator<Item = std::io::Result<Vec<u8>>>,
    {
        let mut loaded = Vec::new();
        for (index, bytes) in lines.enumerate() {
            let line = match String::from_utf8(bytes?) {
                Ok(line) => line,
                Err(e) => {
                    let error = ScoreError::Malformed {
                        line: index + 1,
                        reason: format!("not UTF-8: {}", e.utf8_error()),
                    };
                    log::warn!("Skipping score record: {}", error);
                    continue;
                }
            };
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match ScoreEntry::parse_record(index + 1, line) {
                Ok(entry) => loaded.push(entry),
                Err(e) => log::warn!("Skipping score record: {}", e),
            }
        }

        if loaded.is_empty() {
            return Ok(Self::new());
        }

        let mut table = Self { entries: loaded };
        table.rerank();
        Ok(table)
    }

    // ── Filesystem ─────────────────────────────────────────────────────

    /// Load from `path`; a missing file yields the default table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let table = Self::read_from(BufReader::new(file))?;
                log::info!("Loaded {} scores from {}", table.len(), path.display());
                Ok(table)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No score file at {}; using defaults", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreError> {
        let path = path.as_ref();
        self.write_to(BufWriter::new(File::create(path)?))?;
        log::info!("Saved {} scores to {}", self.len(), path.display());
        Ok(())
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(years: u32, colonists: u64, credits: u64) -> ScoreEntry {
        ScoreEntry::new("Tester", years, colonists, credits)
    }

    fn is_ranked(table: &ScoreTable) -> bool {
        table
            .entries()
            .windows(2)
            .all(|w| w[0].rank_key() >= w[1].rank_key())
    }

    #[test]
    fn test_outranks_tie_break_chain() {
        assert!(entry(10, 5, 100).outranks(&entry(10, 5, 100)));
        assert!(!entry(9, 500, 9999).outranks(&entry(10, 5, 100)));
        assert!(entry(11, 0, 0).outranks(&entry(10, 500, 9999)));
        assert!(!entry(10, 4, 9999).outranks(&entry(10, 5, 100)));
        assert!(entry(10, 6, 0).outranks(&entry(10, 5, 100)));
        assert!(!entry(10, 5, 99).outranks(&entry(10, 5, 100)));
    }

    #[test]
    fn test_default_table() {
        let table = ScoreTable::new();
        assert_eq!(table.len(), 10);
        assert!(is_ranked(&table));
        assert!(table
            .entries()
            .iter()
            .all(|e| e.player() == scores::DEFAULT_PLAYER));
    }

    #[test]
    fn test_empty_table_accepts_anything() {
        let table = ScoreTable::empty();
        assert!(table.is_high_score(&entry(0, 0, 0)));
        assert_eq!(table.rank_of(&entry(0, 0, 0)), Some(1));
    }

    #[test]
    fn test_is_high_score() {
        let table = ScoreTable::new();
        let last = table.entries().last().unwrap().clone();
        assert!(table.is_high_score(&last));
        assert!(!table.is_high_score(&entry(last.years - 1, 0, 0)));
        assert!(table.is_high_score(&entry(100, 0, 0)));
    }

    #[test]
    fn test_add_keeps_top_ten_sorted() {
        let mut table = ScoreTable::new();
        table.add(entry(5, 999, 0));
        table.add(entry(50, 1, 1));
        table.add(entry(0, 0, 0));
        assert_eq!(table.len(), 10);
        assert!(is_ranked(&table));
        assert_eq!(table.entries()[0].years, 50);
        assert!(table.entries().iter().all(|e| e.years > 0));
    }

    #[test]
    fn test_add_to_partial_table() {
        let mut table = ScoreTable::empty();
        table.add(entry(3, 10, 10));
        table.add(entry(7, 10, 10));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].years, 7);
    }

    #[test]
    fn test_rank_of() {
        let table = ScoreTable::new();
        assert_eq!(table.rank_of(&entry(100, 0, 0)), Some(1));
        assert_eq!(table.rank_of(&entry(0, 0, 0)), None);
    }

    #[test]
    fn test_sanitize_player_name() {
        assert_eq!(sanitize_player_name("Ann, the Bold"), "Ann the Bold");
        assert_eq!(
            sanitize_player_name("abcdefghijklmnopqrstuvwxyz"),
            "abcdefghijklmnopqrst"
        );
        assert_eq!(sanitize_player_name("  line\nbreak "), "linebreak");
        let mut e = ScoreEntry::new("a,b", 1, 1, 1);
        assert_eq!(e.player(), "ab");
        e.set_player("Zed");
        assert_eq!(e.player(), "Zed");
    }

    #[test]
    fn test_text_roundtrip() {
        let mut table = ScoreTable::empty();
        table.add(entry(12, 340, 8000).with_player("Neil"));
        table.add(entry(12, 340, 7000).with_player("Buzz"));
        table.add(entry(3, 100, 5000).with_player("Mike"));

        let text = table.to_text();
        assert_eq!(text.lines().next(), Some("Neil,12,340,8000"));
        assert_eq!(ScoreTable::from_text(&text), table);
    }

    #[test]
    fn test_from_text_skips_bad_lines() {
        let text = "Ann,4,120,5000\nnot a record\nBob,x,1,1\n\nCy,9,300,4000\n";
        let table = ScoreTable::from_text(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].player(), "Cy");
        assert_eq!(table.entries()[1].player(), "Ann");
    }

    #[test]
    fn test_read_from_skips_undecodable_lines() {
        let bytes = b"Ann,4,120,5000\r\nMik\xffe,3,1,1\nCy,9,300,4000\n".to_vec();
        let table = ScoreTable::read_from(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].player(), "Cy");
        assert_eq!(table.entries()[1].player(), "Ann");
        assert_eq!(table.entries()[1].peak_credits, 5000);
    }

    #[test]
    fn test_from_text_without_records_keeps_defaults() {
        assert_eq!(ScoreTable::from_text(""), ScoreTable::new());
        assert_eq!(ScoreTable::from_text("garbage\n,,,\n"), ScoreTable::new());
    }

    #[test]
    fn test_from_text_truncates_long_files() {
        let text: String = (0..15).map(|i| format!("P{},{},1,1\n", i, i)).collect();
        let table = ScoreTable::from_text(&text);
        assert_eq!(table.len(), 10);
        assert_eq!(table.entries()[0].years, 14);
        assert_eq!(table.entries()[9].years, 5);
    }
}
