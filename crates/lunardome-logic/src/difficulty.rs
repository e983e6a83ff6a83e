//! Difficulty levels and their multipliers.

use serde::{Deserialize, Serialize};

use crate::constants::DIFFICULTY_MULTIPLIERS;
use crate::error::{DomeError, Result};

/// One of the five fixed difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Cadet = 0,
    Settler = 1,
    Engineer = 2,
    Overseer = 3,
    Administrator = 4,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Cadet,
        Difficulty::Settler,
        Difficulty::Engineer,
        Difficulty::Overseer,
        Difficulty::Administrator,
    ];

    /// Resolve a level from the 0-4 index used by the difficulty selector.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(DomeError::InvalidDifficulty(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Scaling factor applied to costs, requirements, decay and calamities.
    pub fn multiplier(self) -> f64 {
        DIFFICULTY_MULTIPLIERS[self.index()]
    }

    /// Whole part of the multiplier, used by the draw ranges.
    pub fn whole(self) -> i64 {
        self.multiplier().floor() as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Cadet => "Cadet",
            Difficulty::Settler => "Settler",
            Difficulty::Engineer => "Engineer",
            Difficulty::Overseer => "Overseer",
            Difficulty::Administrator => "Administrator",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (x{})", self.name(), self.multiplier())
    }
}
