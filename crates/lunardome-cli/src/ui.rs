//! Text rendering for the terminal game.
//!
//! Functions here only read state and return strings; printing is left to
//! the caller.

use lunardome_logic::{
    Commodity, Difficulty, DomeState, EventOutcome, MaintenanceOutcome, ScoreEntry, ScoreTable,
    TurnReport,
};

const RULE: &str = "────────────────────────────────────────────────────────────";

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn title() -> String {
    format!(
        "{rule}\n                         LUNAR DOME\n{rule}",
        rule = RULE
    )
}

pub fn instructions() -> String {
    [
        "You are the administrator of a dome colony on the Moon.",
        "",
        "Every year each colonist eats Soup and breathes Oxygen, and the",
        "dome loses one point of Integrity for every ten colonists. The",
        "population grows each year, and so do its needs.",
        "",
        "Each turn you may buy Soup and Oxygen with credits, turn spare",
        "Oxygen into sculptures to sell for credits, and pay to restore",
        "the dome to full Integrity. Prices change every year.",
        "",
        "Now and then something unexpected happens, for better or worse.",
        "",
        "The colony fails when Soup, Oxygen or Integrity runs out. Keep it",
        "alive as long as you can; the longest-lived domes make the",
        "high-score table.",
    ]
    .join("\n")
}

pub fn difficulty_menu() -> String {
    let mut lines = vec!["Choose a difficulty:".to_string()];
    for level in Difficulty::ALL {
        lines.push(format!("  {}) {}", level.index(), level));
    }
    lines.join("\n")
}

pub fn render_state(dome: &DomeState) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!(
            "Year {}: {} colonists live in the dome.",
            dome.year(),
            group_thousands(dome.colonists())
        ),
        format!(
            "Credits: {} (peak {})",
            group_thousands(dome.credits()),
            group_thousands(dome.peak_credits())
        ),
        format!(
            "Soup stocks stand at {} units; each colonist needs {} per year. Soup costs {} credits per unit.",
            group_thousands(dome.soup()),
            dome.soup_required_per_colonist(),
            dome.soup_cost()
        ),
        format!(
            "Oxygen tanks hold {} units; each colonist needs {} per year. Oxygen costs {} credits per unit.",
            group_thousands(dome.oxygen()),
            dome.oxygen_required_per_colonist(),
            dome.oxygen_cost()
        ),
        format!(
            "A sculpture uses {} Oxygen and sells for {} credits.",
            dome.sculpture_cost(),
            dome.sculpture_value()
        ),
        format!(
            "Dome integrity is at {}%; maintenance costs {} credits.",
            dome.integrity(),
            group_thousands(dome.maintenance_cost())
        ),
    ];
    if dome.is_medium_or_lower_difficulty() {
        lines.push(render_hints(dome));
    }
    lines.join("\n")
}

/// Next year's needs, shown on the gentler difficulty levels.
pub fn render_hints(dome: &DomeState) -> String {
    format!(
        "Next year the colony will need {} Soup and {} Oxygen, and the dome will lose {}% integrity.",
        group_thousands(dome.required_next_year(Commodity::Soup)),
        group_thousands(dome.required_next_year(Commodity::Oxygen)),
        dome.required_next_year(Commodity::Integrity)
    )
}

pub fn render_event(outcome: &EventOutcome) -> String {
    let tag = if outcome.is_favorable() {
        "[GOOD NEWS]"
    } else {
        "[BAD NEWS]"
    };
    format!("{} {}", tag, outcome.message)
}

pub fn render_maintenance(outcome: &MaintenanceOutcome) -> String {
    match outcome {
        MaintenanceOutcome::NotNeeded => {
            "The dome is in perfect condition; no maintenance needed.".to_string()
        }
        MaintenanceOutcome::Repaired { cost } => format!(
            "Maintenance complete for {} credits; integrity restored to 100%.",
            group_thousands(*cost)
        ),
        MaintenanceOutcome::InsufficientFunds { cost, available } => format!(
            "Maintenance costs {} credits but you only have {}; the dome stays damaged.",
            group_thousands(*cost),
            group_thousands(*available)
        ),
    }
}

pub fn render_turn(report: &TurnReport) -> String {
    format!(
        "The colony used {} Soup and {} Oxygen; the dome lost {}% integrity. Population grew from {} to {}.",
        group_thousands(report.soup_consumed),
        group_thousands(report.oxygen_consumed),
        report.integrity_lost,
        group_thousands(report.colonists_before),
        group_thousands(report.colonists_after)
    )
}

pub fn render_game_over(dome: &DomeState) -> String {
    let causes: Vec<&str> = dome.exhausted().into_iter().map(|c| c.name()).collect();
    format!(
        "{rule}\nGAME OVER: the dome ran out of {causes} in year {year}.\n\
         {colonists} colonists survived; peak credits were {peak}.\n{rule}",
        rule = RULE,
        causes = causes.join(" and "),
        year = dome.year(),
        colonists = group_thousands(dome.colonists()),
        peak = group_thousands(dome.peak_credits())
    )
}

pub fn render_scores(table: &ScoreTable) -> String {
    let mut lines = vec![
        "HIGH SCORES".to_string(),
        format!(
            "{:>3}  {:<20}  {:>5}  {:>10}  {:>12}",
            "#", "Player", "Years", "Colonists", "Peak Credits"
        ),
    ];
    for (i, entry) in table.entries().iter().enumerate() {
        lines.push(render_score_row(i + 1, entry));
    }
    lines.join("\n")
}

fn render_score_row(rank: usize, entry: &ScoreEntry) -> String {
    format!(
        "{:>3}  {:<20}  {:>5}  {:>10}  {:>12}",
        rank,
        entry.player(),
        entry.years,
        group_thousands(entry.colonists as i64),
        group_thousands(entry.peak_credits as i64)
    )
}
