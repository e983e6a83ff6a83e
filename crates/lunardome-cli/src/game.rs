//! Game orchestration — the turn loop and the high-score step.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use lunardome_logic::{
    Commodity, Difficulty, DomeError, DomeState, EventCatalog, ScoreEntry, ScoreTable,
};
use rand::rngs::StdRng;
use thiserror::Error;

use crate::input::Prompter;
use crate::ui;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("input error: {0}")]
    Input(#[from] io::Error),

    /// A rule the game logic refused; the orchestrator never asks for
    /// these, so seeing one is a bug.
    #[error("internal error: {0}")]
    Logic(#[from] DomeError),
}

impl GameError {
    /// True when stdin closed; the session ends quietly.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, GameError::Input(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// One sitting at the terminal: shared RNG, events and scores across games.
pub struct Session {
    rng: StdRng,
    catalog: EventCatalog,
    scores: ScoreTable,
    scores_path: Option<PathBuf>,
}

impl Session {
    pub fn new(rng: StdRng, scores: ScoreTable, scores_path: Option<PathBuf>) -> Self {
        Self {
            rng,
            catalog: EventCatalog::new(),
            scores,
            scores_path,
        }
    }

    pub fn choose_difficulty<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Difficulty, GameError> {
        prompter.say(&ui::difficulty_menu())?;
        let index = prompter.ask_choice(
            "Difficulty",
            0,
            Difficulty::ALL.len() - 1,
            Difficulty::default().index(),
        )?;
        Ok(Difficulty::from_index(index)?)
    }

    /// Play one game to the end and return the failed dome.
    pub fn play<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        difficulty: Difficulty,
    ) -> Result<DomeState, GameError> {
        let mut dome = DomeState::new(difficulty, &mut self.rng);
        tracing::info!(%difficulty, "game started");

        // Viability is only checked here, never mid-turn.
        while dome.is_viable() {
            self.play_turn(prompter, &mut dome)?;
        }

        prompter.say(&ui::render_game_over(&dome))?;
        tracing::info!(
            year = dome.year(),
            colonists = dome.colonists(),
            "game over"
        );
        Ok(dome)
    }

    fn play_turn<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        dome: &mut DomeState,
    ) -> Result<(), GameError> {
        prompter.say(&ui::render_state(dome))?;

        if let Some(outcome) = self.catalog.maybe_trigger(dome, &mut self.rng) {
            prompter.say(&ui::render_event(&outcome))?;
        }

        offer_purchase(prompter, dome, Commodity::Soup)?;
        offer_purchase(prompter, dome, Commodity::Oxygen)?;
        offer_sculptures(prompter, dome)?;
        offer_maintenance(prompter, dome)?;

        let report = dome.end_turn(&mut self.rng);
        prompter.say(&ui::render_turn(&report))?;
        Ok(())
    }

    /// Offer a place on the leaderboard, then show it.
    pub fn record_score<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        dome: &DomeState,
    ) -> Result<(), GameError> {
        let mut entry = ScoreEntry::from_dome(dome);

        if self.scores.is_high_score(&entry) {
            prompter.say("You made the high-score table!")?;
            entry.set_player(&prompter.ask_name("Enter your name (20 characters max):")?);
            self.scores.add(entry);
            self.save_scores();
        } else {
            prompter.say("Your dome did not make the high-score table this time.")?;
        }

        prompter.say(&ui::render_scores(&self.scores))?;
        Ok(())
    }

    fn save_scores(&self) {
        if let Some(path) = &self.scores_path {
            if let Err(e) = self.scores.save(path) {
                tracing::warn!(path = %path.display(), "could not save scores: {}", e);
            }
        }
    }
}

fn offer_purchase<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    dome: &mut DomeState,
    commodity: Commodity,
) -> Result<(), GameError> {
    let max = dome.max_affordable(commodity)?;
    if max == 0 {
        prompter.say(&format!("You cannot afford any {} this year.", commodity))?;
        return Ok(());
    }

    let quantity = prompter.ask_quantity(&format!("How much {} will you buy?", commodity), max)?;
    if quantity > 0 {
        let spent = dome.buy(commodity, quantity)?;
        prompter.say(&format!(
            "Bought {} {} for {} credits.",
            ui::group_thousands(quantity),
            commodity,
            ui::group_thousands(spent)
        ))?;
    }
    Ok(())
}

fn offer_sculptures<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    dome: &mut DomeState,
) -> Result<(), GameError> {
    let max = dome.max_sculptures();
    if max == 0 {
        return Ok(());
    }

    let count = prompter.ask_quantity("How many sculptures will you make and sell?", max)?;
    if count > 0 {
        let earned = dome.produce_sculptures(count)?;
        prompter.say(&format!(
            "Sold {} sculptures for {} credits.",
            ui::group_thousands(count),
            ui::group_thousands(earned)
        ))?;
    }
    Ok(())
}

fn offer_maintenance<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    dome: &mut DomeState,
) -> Result<(), GameError> {
    if dome.maintenance_cost() == 0 {
        return Ok(());
    }

    let question = format!(
        "Repair the dome for {} credits?",
        ui::group_thousands(dome.maintenance_cost())
    );
    if prompter.ask_yes_no(&question, false)? {
        let outcome = dome.perform_maintenance();
        prompter.say(&ui::render_maintenance(&outcome))?;
    }
    Ok(())
}
