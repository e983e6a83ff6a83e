//! Game constants — starting stocks, draw ranges, table sizes.
//!
//! Plain `const` values grouped by concern. Ranges are closed-open
//! (`MIN..MAX`) to match `Rng::gen_range`.

/// Multipliers indexed by difficulty level (0 = easiest, 4 = hardest).
pub const DIFFICULTY_MULTIPLIERS: [f64; 5] = [1.0, 1.25, 1.5, 1.75, 2.0];

pub mod dome {
    pub const MAX_INTEGRITY: i64 = 100;
    pub const STARTING_COLONISTS: i64 = 100;
    pub const STARTING_SOUP: i64 = 2000;
    pub const STARTING_OXYGEN: i64 = 3000;
    /// Credits at multiplier 1.0; each whole step of difficulty removes
    /// `CREDITS_PER_DIFFICULTY`.
    pub const BASE_CREDITS: f64 = 5000.0;
    pub const CREDITS_PER_DIFFICULTY: f64 = 1000.0;
    /// Credits charged per point of `floor((100 - integrity) * difficulty)`.
    pub const MAINTENANCE_COST_PER_POINT: i64 = 100;
    /// Integrity lost per year for every this many colonists.
    pub const COLONISTS_PER_INTEGRITY_POINT: i64 = 10;
}

pub mod draws {
    /// Lower bound for per-colonist requirements and sculpture cost; the
    /// upper bound is `3 + floor(difficulty)`.
    pub const REQUIREMENT_MIN: i64 = 2;
    pub const REQUIREMENT_MAX_BASE: i64 = 3;
    /// Lower bound for soup/oxygen prices; the upper bound is
    /// `5 + floor(difficulty)`.
    pub const PRICE_MIN: i64 = 3;
    pub const PRICE_MAX_BASE: i64 = 5;
    /// Jitter added to `oxygen_cost * sculpture_cost` for the sale value.
    pub const SCULPTURE_JITTER_MIN: i64 = -2;
    pub const SCULPTURE_JITTER_MAX: i64 = 5;
    /// Population growth percent is drawn from `1..floor(difficulty) * 10`.
    pub const GROWTH_PERCENT_MIN: i64 = 1;
    pub const GROWTH_MODIFIER_PER_DIFFICULTY: i64 = 10;
}

pub mod events {
    /// Chance, as `numerator / denominator`, that an event fires in a turn.
    pub const TRIGGER_NUMERATOR: u32 = 1;
    pub const TRIGGER_DENOMINATOR: u32 = 10;
    /// Magnitude range for soup and oxygen events.
    pub const STOCK_MIN: i64 = 100;
    pub const STOCK_MAX: i64 = 300;
    /// Magnitude range for integrity events.
    pub const INTEGRITY_MIN: i64 = 10;
    pub const INTEGRITY_MAX: i64 = 45;
}

pub mod scores {
    pub const TABLE_SIZE: usize = 10;
    pub const MAX_PLAYER_NAME: usize = 20;
    pub const DEFAULT_PLAYER: &str = "Lunar Bot";
    pub const DEFAULT_FILE: &str = "lunardome_scores.txt";
}
