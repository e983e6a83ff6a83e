//! Pure game logic for Lunar Dome.
//!
//! A colony dome on the Moon is simulated one year per turn: colonists eat
//! soup and breathe oxygen, the dome's structure decays, and the player
//! trades, sculpts and repairs against a stream of random events until the
//! colony is no longer viable. Nothing here touches the terminal; all
//! randomness comes in through a caller-supplied `rand::Rng`, so games are
//! reproducible from a seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Starting stocks, draw ranges, table sizes |
//! | [`difficulty`] | The five difficulty levels and their multipliers |
//! | [`dome`] | `DomeState`: clamped stocks, turn update, trading, maintenance |
//! | [`error`] | `DomeError` and `ScoreError` |
//! | [`events`] | Boons and calamities, the six presets and the session catalog |
//! | [`scores`] | `ScoreEntry` ranking and the persisted `ScoreTable` |

pub mod constants;
pub mod difficulty;
pub mod dome;
pub mod error;
pub mod events;
pub mod scores;

pub use difficulty::Difficulty;
pub use dome::{Commodity, DomeState, MaintenanceOutcome, TurnReport};
pub use error::{DomeError, ScoreError};
pub use events::{Event, EventCatalog, EventKind, EventOutcome, EventPreset};
pub use scores::{ScoreEntry, ScoreTable};
