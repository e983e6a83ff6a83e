//! Events — random boons and calamities that perturb the dome.
//!
//! Each event is plain data (kind, target, draw range, message); the six
//! presets are built once per session and kept in an [`EventCatalog`].
//! Calamities scale with difficulty, boons do not.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::events;
use crate::dome::{Commodity, DomeState};

/// Sign of an event's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Boon,
    Calamity,
}

impl EventKind {
    pub fn is_favorable(self) -> bool {
        self == EventKind::Boon
    }
}

/// The six fixed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventPreset {
    SoupDragon,
    MeteorStrike,
    MoonQuake,
    IronChicken,
    SoupGeyser,
    Astronaut,
}

impl EventPreset {
    pub const ALL: [EventPreset; 6] = [
        EventPreset::SoupDragon,
        EventPreset::MeteorStrike,
        EventPreset::MoonQuake,
        EventPreset::IronChicken,
        EventPreset::SoupGeyser,
        EventPreset::Astronaut,
    ];

    /// Build the event this preset describes.
    pub fn event(self) -> Event {
        use Commodity::*;
        use EventKind::*;

        let (kind, target, message) = match self {
            EventPreset::SoupDragon => (
                Calamity,
                Soup,
                "The Soup Dragon visits; it slurps {units} units of Soup!",
            ),
            EventPreset::MeteorStrike => (
                Calamity,
                Integrity,
                "A Meteor strikes the dome; Dome Integrity reduced by {units}!",
            ),
            EventPreset::MoonQuake => (
                Calamity,
                Oxygen,
                "A Moon Quake damages Oxygen storage; you lose {units} units!",
            ),
            EventPreset::IronChicken => (
                Boon,
                Oxygen,
                "The Iron Chicken visits; it deposits {units} units of Oxygen!",
            ),
            EventPreset::SoupGeyser => (
                Boon,
                Soup,
                "A Soup Geyser erupts; you harvest {units} units of Soup!",
            ),
            EventPreset::Astronaut => (
                Boon,
                Integrity,
                "An Astronaut arrives; they restore Dome Integrity by {units}!",
            ),
        };

        let (minimum, maximum) = match target {
            Integrity => (events::INTEGRITY_MIN, events::INTEGRITY_MAX),
            Soup | Oxygen => (events::STOCK_MIN, events::STOCK_MAX),
        };

        Event {
            preset: self,
            kind,
            target,
            minimum,
            maximum,
            message,
            last_amount: 0,
        }
    }
}

/// What a single application of an event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub preset: EventPreset,
    pub kind: EventKind,
    pub target: Commodity,
    /// Signed delta handed to the target's setter.
    pub amount: i64,
    /// Message with the unsigned magnitude filled in.
    pub message: String,
}

impl EventOutcome {
    pub fn is_favorable(&self) -> bool {
        self.kind.is_favorable()
    }
}

/// A stochastic perturbation of one dome commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub preset: EventPreset,
    pub kind: EventKind,
    pub target: Commodity,
    /// Inclusive lower bound of the magnitude draw.
    pub minimum: i64,
    /// Exclusive upper bound of the magnitude draw.
    pub maximum: i64,
    /// Template with a `{units}` slot.
    pub message: &'static str,
    last_amount: i64,
}

impl Event {
    /// Most recent signed delta; zero before the first application.
    pub fn last_amount(&self) -> i64 {
        self.last_amount
    }

    /// Draw a magnitude, apply it to the target commodity and describe it.
    ///
    /// Over- and under-shoot is absorbed by the dome's clamping setters.
    pub fn apply(&mut self, state: &mut DomeState, rng: &mut impl Rng) -> EventOutcome {
        let value = rng.gen_range(self.minimum..self.maximum);
        let amount = match self.kind {
            EventKind::Boon => value,
            EventKind::Calamity => {
                -((value as f64 * state.difficulty().multiplier()).abs().floor() as i64)
            }
        };

        state.adjust(self.target, amount);
        self.last_amount = amount;

        let message = self.render();
        log::info!("{:?} ({:+} {}): {}", self.preset, amount, self.target, message);

        EventOutcome {
            preset: self.preset,
            kind: self.kind,
            target: self.target,
            amount,
            message,
        }
    }

    /// The message template populated with `|last_amount|`.
    pub fn render(&self) -> String {
        self.message
            .replace("{units}", &self.last_amount.abs().to_string())
    }
}

/// The session's six events, built once and reused every turn.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self {
            events: EventPreset::ALL.iter().map(|p| p.event()).collect(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, preset: EventPreset) -> &Event {
        &self.events[preset as usize]
    }

    /// Fire `preset` unconditionally.
    pub fn trigger(
        &mut self,
        preset: EventPreset,
        state: &mut DomeState,
        rng: &mut impl Rng,
    ) -> EventOutcome {
        self.events[preset as usize].apply(state, rng)
    }

    /// With a 1-in-10 chance, apply one uniformly chosen event.
    ///
    /// Called once per turn; at most one event fires.
    pub fn maybe_trigger(
        &mut self,
        state: &mut DomeState,
        rng: &mut impl Rng,
    ) -> Option<EventOutcome> {
        if !rng.gen_ratio(events::TRIGGER_NUMERATOR, events::TRIGGER_DENOMINATOR) {
            return None;
        }
        let index = rng.gen_range(0..self.events.len());
        Some(self.events[index].apply(state, rng))
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}
