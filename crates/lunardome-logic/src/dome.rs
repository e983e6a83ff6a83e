//! Dome state — colony metrics and the once-per-turn economic update.
//!
//! Every stock has exactly one mutator that enforces its clamp, so no
//! arithmetic elsewhere in the crate can leave a stock negative or push
//! integrity past 100.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{dome, draws};
use crate::difficulty::Difficulty;
use crate::error::{DomeError, Result};

/// Quantities an event or a trade can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commodity {
    Oxygen,
    Soup,
    Integrity,
}

impl Commodity {
    pub const ALL: [Commodity; 3] = [Commodity::Oxygen, Commodity::Soup, Commodity::Integrity];

    pub fn name(self) -> &'static str {
        match self {
            Commodity::Oxygen => "Oxygen",
            Commodity::Soup => "Soup",
            Commodity::Integrity => "Integrity",
        }
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a maintenance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceOutcome {
    /// Integrity was already at 100.
    NotNeeded,
    /// Credits were spent and integrity restored to 100.
    Repaired { cost: i64 },
    /// Nothing changed; integrity keeps decaying next turn.
    InsufficientFunds { cost: i64, available: i64 },
}

/// What a call to [`DomeState::end_turn`] consumed and grew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnReport {
    /// Year after the increment.
    pub year: u32,
    pub soup_consumed: i64,
    pub oxygen_consumed: i64,
    pub integrity_lost: i64,
    pub colonists_before: i64,
    pub colonists_after: i64,
}

/// The colony's complete mutable state for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomeState {
    year: u32,
    difficulty: Difficulty,
    credits: i64,
    peak_credits: i64,
    colonists: i64,
    soup: i64,
    oxygen: i64,
    integrity: i64,

    // Fixed for the whole game.
    soup_required_per_colonist: i64,
    oxygen_required_per_colonist: i64,
    sculpture_cost: i64,

    // Re-rolled every turn.
    soup_cost: i64,
    oxygen_cost: i64,
    sculpture_value: i64,
}

impl DomeState {
    /// Create a dome at `difficulty` and materialize the first year's prices.
    ///
    /// On return `year == 1`: the initial `end_turn` skips consumption,
    /// decay and growth.
    pub fn new(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let multiplier = difficulty.multiplier();
        let credits = (dome::BASE_CREDITS - dome::CREDITS_PER_DIFFICULTY * (multiplier - 1.0))
            .round() as i64;
        let requirement_max = draws::REQUIREMENT_MAX_BASE + difficulty.whole();

        let mut state = Self {
            year: 0,
            difficulty,
            credits,
            peak_credits: credits,
            colonists: dome::STARTING_COLONISTS,
            soup: dome::STARTING_SOUP,
            oxygen: dome::STARTING_OXYGEN,
            integrity: dome::MAX_INTEGRITY,
            soup_required_per_colonist: rng.gen_range(draws::REQUIREMENT_MIN..requirement_max),
            oxygen_required_per_colonist: rng.gen_range(draws::REQUIREMENT_MIN..requirement_max),
            sculpture_cost: rng.gen_range(draws::REQUIREMENT_MIN..requirement_max),
            soup_cost: 0,
            oxygen_cost: 0,
            sculpture_value: 0,
        };
        state.end_turn(rng);

        log::debug!(
            "New dome at {}: {} credits, requirements soup={} oxygen={}, sculpture cost {}",
            difficulty,
            state.credits,
            state.soup_required_per_colonist,
            state.oxygen_required_per_colonist,
            state.sculpture_cost
        );
        state
    }

    // ── Getters ────────────────────────────────────────────────────────

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn peak_credits(&self) -> i64 {
        self.peak_credits
    }

    pub fn colonists(&self) -> i64 {
        self.colonists
    }

    pub fn soup(&self) -> i64 {
        self.soup
    }

    pub fn oxygen(&self) -> i64 {
        self.oxygen
    }

    pub fn integrity(&self) -> i64 {
        self.integrity
    }

    pub fn soup_required_per_colonist(&self) -> i64 {
        self.soup_required_per_colonist
    }

    pub fn oxygen_required_per_colonist(&self) -> i64 {
        self.oxygen_required_per_colonist
    }

    pub fn soup_cost(&self) -> i64 {
        self.soup_cost
    }

    pub fn oxygen_cost(&self) -> i64 {
        self.oxygen_cost
    }

    /// Oxygen units consumed to produce one sculpture.
    pub fn sculpture_cost(&self) -> i64 {
        self.sculpture_cost
    }

    /// Credits earned per sculpture sold this year.
    pub fn sculpture_value(&self) -> i64 {
        self.sculpture_value
    }

    /// Current stock of `commodity`.
    pub fn stock(&self, commodity: Commodity) -> i64 {
        match commodity {
            Commodity::Oxygen => self.oxygen,
            Commodity::Soup => self.soup,
            Commodity::Integrity => self.integrity,
        }
    }

    /// `floor((100 - integrity) * difficulty) * 100`; zero at full integrity.
    pub fn maintenance_cost(&self) -> i64 {
        let damage = (dome::MAX_INTEGRITY - self.integrity) as f64;
        (damage * self.difficulty.multiplier()).floor() as i64 * dome::MAINTENANCE_COST_PER_POINT
    }

    /// False once oxygen, soup or integrity has run out.
    pub fn is_viable(&self) -> bool {
        self.oxygen > 0 && self.soup > 0 && self.integrity > 0
    }

    /// Commodities that have run out, in display order.
    pub fn exhausted(&self) -> Vec<Commodity> {
        Commodity::ALL
            .into_iter()
            .filter(|c| self.stock(*c) <= 0)
            .collect()
    }

    pub fn is_medium_or_lower_difficulty(&self) -> bool {
        self.difficulty.multiplier() <= Difficulty::Engineer.multiplier()
    }

    // ── Clamping setters ───────────────────────────────────────────────

    pub fn set_soup(&mut self, value: i64) {
        self.soup = value.max(0);
    }

    pub fn set_oxygen(&mut self, value: i64) {
        self.oxygen = value.max(0);
    }

    pub fn set_integrity(&mut self, value: i64) {
        self.integrity = value.clamp(0, dome::MAX_INTEGRITY);
    }

    /// Clamp to zero and raise the high-water mark if exceeded.
    pub fn set_credits(&mut self, value: i64) {
        self.credits = value.max(0);
        if self.credits > self.peak_credits {
            self.peak_credits = self.credits;
        }
    }

    /// Add a signed `delta` to `commodity` through its setter.
    pub fn adjust(&mut self, commodity: Commodity, delta: i64) {
        match commodity {
            Commodity::Oxygen => self.set_oxygen(self.oxygen + delta),
            Commodity::Soup => self.set_soup(self.soup + delta),
            Commodity::Integrity => self.set_integrity(self.integrity + delta),
        }
    }

    // ── Turn update ────────────────────────────────────────────────────

    /// Advance one year.
    ///
    /// Prices are re-rolled first and the sculpture value derived from the
    /// new oxygen price. Consumption, decay and growth are skipped on the
    /// call made during construction (`year == 0`); otherwise they all read
    /// the pre-growth colonist count and growth is applied last.
    pub fn end_turn(&mut self, rng: &mut impl Rng) -> TurnReport {
        let price_max = draws::PRICE_MAX_BASE + self.difficulty.whole();
        self.soup_cost = rng.gen_range(draws::PRICE_MIN..price_max);
        self.oxygen_cost = rng.gen_range(draws::PRICE_MIN..price_max);
        self.sculpture_value = self.oxygen_cost * self.sculpture_cost
            + rng.gen_range(draws::SCULPTURE_JITTER_MIN..draws::SCULPTURE_JITTER_MAX);

        let mut report = TurnReport {
            colonists_before: self.colonists,
            colonists_after: self.colonists,
            ..TurnReport::default()
        };

        if self.year != 0 {
            report.soup_consumed = self.colonists * self.soup_required_per_colonist;
            report.oxygen_consumed = self.colonists * self.oxygen_required_per_colonist;
            report.integrity_lost = self.colonists / dome::COLONISTS_PER_INTEGRITY_POINT;

            self.set_soup(self.soup - report.soup_consumed);
            self.set_oxygen(self.oxygen - report.oxygen_consumed);
            self.set_integrity(self.integrity - report.integrity_lost);

            let modifier = self.difficulty.whole() * draws::GROWTH_MODIFIER_PER_DIFFICULTY;
            let percent = rng.gen_range(draws::GROWTH_PERCENT_MIN..modifier);
            self.colonists = self.colonists * (100 + percent) / 100;
            report.colonists_after = self.colonists;
        }

        self.year += 1;
        report.year = self.year;

        log::debug!(
            "Year {}: soup -{} oxygen -{} integrity -{} colonists {} -> {}; prices soup={} oxygen={} sculpture={}",
            self.year,
            report.soup_consumed,
            report.oxygen_consumed,
            report.integrity_lost,
            report.colonists_before,
            report.colonists_after,
            self.soup_cost,
            self.oxygen_cost,
            self.sculpture_value
        );
        report
    }

    /// Restore integrity to 100 if the credits cover the repair.
    pub fn perform_maintenance(&mut self) -> MaintenanceOutcome {
        if self.integrity == dome::MAX_INTEGRITY {
            return MaintenanceOutcome::NotNeeded;
        }

        let cost = self.maintenance_cost();
        if self.credits < cost {
            log::info!(
                "Maintenance refused: costs {} but only {} credits",
                cost,
                self.credits
            );
            return MaintenanceOutcome::InsufficientFunds {
                cost,
                available: self.credits,
            };
        }

        self.set_credits(self.credits - cost);
        self.set_integrity(dome::MAX_INTEGRITY);
        log::info!("Maintenance performed for {} credits", cost);
        MaintenanceOutcome::Repaired { cost }
    }

    // ── Trading ────────────────────────────────────────────────────────

    /// Price of one unit; integrity has no purchase path.
    pub fn unit_cost(&self, commodity: Commodity) -> Result<i64> {
        match commodity {
            Commodity::Soup => Ok(self.soup_cost),
            Commodity::Oxygen => Ok(self.oxygen_cost),
            Commodity::Integrity => Err(DomeError::NotPurchasable(commodity)),
        }
    }

    /// Largest quantity of `commodity` the current credits can buy.
    pub fn max_affordable(&self, commodity: Commodity) -> Result<i64> {
        let cost = self.unit_cost(commodity)?;
        Ok(if cost > 0 { self.credits / cost } else { 0 })
    }

    /// Buy `quantity` units, returning the credits spent.
    pub fn buy(&mut self, commodity: Commodity, quantity: i64) -> Result<i64> {
        debug_assert!(quantity >= 0, "purchase quantities are validated by the caller");
        let total = self.unit_cost(commodity)? * quantity;
        if total > self.credits {
            return Err(DomeError::InsufficientCredits {
                needed: total,
                available: self.credits,
            });
        }

        self.set_credits(self.credits - total);
        self.adjust(commodity, quantity);
        log::debug!("Bought {} {} for {} credits", quantity, commodity, total);
        Ok(total)
    }

    /// What the current population will use of `commodity` next turn.
    pub fn required_next_year(&self, commodity: Commodity) -> i64 {
        match commodity {
            Commodity::Soup => self.colonists * self.soup_required_per_colonist,
            Commodity::Oxygen => self.colonists * self.oxygen_required_per_colonist,
            Commodity::Integrity => self.colonists / dome::COLONISTS_PER_INTEGRITY_POINT,
        }
    }

    // ── Sculptures ─────────────────────────────────────────────────────

    /// Sculptures the current oxygen stock can pay for.
    pub fn max_sculptures(&self) -> i64 {
        if self.sculpture_cost > 0 {
            self.oxygen / self.sculpture_cost
        } else {
            0
        }
    }

    /// Turn oxygen into sculptures and sell them, returning credits earned.
    pub fn produce_sculptures(&mut self, count: i64) -> Result<i64> {
        debug_assert!(count >= 0, "production quantities are validated by the caller");
        let oxygen_used = count * self.sculpture_cost;
        if oxygen_used > self.oxygen {
            return Err(DomeError::InsufficientOxygen {
                needed: oxygen_used,
                available: self.oxygen,
            });
        }

        let earned = count * self.sculpture_value;
        self.set_oxygen(self.oxygen - oxygen_used);
        self.set_credits(self.credits + earned);
        log::debug!(
            "Sold {} sculptures for {} credits using {} oxygen",
            count,
            earned,
            oxygen_used
        );
        Ok(earned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_dome(level: Difficulty, seed: u64) -> DomeState {
        let mut rng = StdRng::seed_from_u64(seed);
        DomeState::new(level, &mut rng)
    }

    #[test]
    fn test_construction_all_levels() {
        for level in Difficulty::ALL {
            for seed in 0..20 {
                let dome = new_dome(level, seed);
                assert_eq!(dome.year(), 1);
                assert!(dome.credits() > 0);
                assert_eq!(dome.peak_credits(), dome.credits());
                assert_eq!(dome.colonists(), 100);
                assert_eq!(dome.soup(), 2000);
                assert_eq!(dome.oxygen(), 3000);
                assert_eq!(dome.integrity(), 100);
                assert!(dome.is_viable());

                let req_max = 3 + level.whole();
                assert!((2..req_max).contains(&dome.soup_required_per_colonist()));
                assert!((2..req_max).contains(&dome.oxygen_required_per_colonist()));
                assert!((2..req_max).contains(&dome.sculpture_cost()));
            }
        }
    }

    #[test]
    fn test_starting_credits() {
        let expected = [5000, 4750, 4500, 4250, 4000];
        for (level, credits) in Difficulty::ALL.iter().zip(expected) {
            assert_eq!(new_dome(*level, 1).credits(), credits);
        }
    }

    #[test]
    fn test_integrity_setter_clamps() {
        let mut dome = new_dome(Difficulty::Cadet, 3);
        dome.set_integrity(150);
        assert_eq!(dome.integrity(), 100);
        dome.set_integrity(-5);
        assert_eq!(dome.integrity(), 0);
        dome.set_integrity(40);
        assert_eq!(dome.integrity(), 40);
    }

    #[test]
    fn test_stock_setters_clamp_to_zero() {
        let mut dome = new_dome(Difficulty::Cadet, 3);
        dome.set_soup(-1);
        dome.set_oxygen(-400);
        assert_eq!(dome.soup(), 0);
        assert_eq!(dome.oxygen(), 0);
        assert!(!dome.is_viable());
        assert_eq!(dome.exhausted(), vec![Commodity::Oxygen, Commodity::Soup]);
    }

    #[test]
    fn test_credits_setter_tracks_peak() {
        let mut dome = new_dome(Difficulty::Cadet, 3);
        dome.set_credits(-10);
        assert_eq!(dome.credits(), 0);
        assert_eq!(dome.peak_credits(), 5000);

        dome.set_credits(7000);
        assert_eq!(dome.peak_credits(), 7000);

        dome.set_credits(6000);
        assert_eq!(dome.credits(), 6000);
        assert_eq!(dome.peak_credits(), 7000);
    }

    #[test]
    fn test_first_turn_skips_consumption() {
        // Construction ran the year-0 turn; prices exist but nothing was used.
        for seed in 0..10 {
            let dome = new_dome(Difficulty::Administrator, seed);
            assert_eq!(dome.year(), 1);
            assert!((3..7).contains(&dome.soup_cost()));
            assert!((3..7).contains(&dome.oxygen_cost()));
            let base = dome.oxygen_cost() * dome.sculpture_cost();
            assert!((base - 2..base + 5).contains(&dome.sculpture_value()));
            assert_eq!(dome.soup(), 2000);
            assert_eq!(dome.colonists(), 100);
        }
    }

    #[test]
    fn test_end_turn_consumes_then_grows() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut dome = DomeState::new(Difficulty::Cadet, &mut rng);
        let before = dome.clone();

        let report = dome.end_turn(&mut rng);

        let colonists = before.colonists();
        assert_eq!(dome.year(), 2);
        assert_eq!(report.year, 2);
        assert_eq!(
            dome.soup(),
            before.soup() - colonists * before.soup_required_per_colonist()
        );
        assert_eq!(
            dome.oxygen(),
            before.oxygen() - colonists * before.oxygen_required_per_colonist()
        );
        assert_eq!(dome.integrity(), 100 - colonists / 10);
        assert_eq!(report.colonists_before, colonists);

        // Growth percent drawn from 1..10 at multiplier 1.0.
        assert!(dome.colonists() >= colonists * 101 / 100);
        assert!(dome.colonists() <= colonists * 109 / 100);
        assert_eq!(report.colonists_after, dome.colonists());

        // Requirements and sculpture cost are fixed for the game.
        assert_eq!(
            dome.soup_required_per_colonist(),
            before.soup_required_per_colonist()
        );
        assert_eq!(dome.sculpture_cost(), before.sculpture_cost());
    }

    #[test]
    fn test_end_turn_clamps_exhausted_stocks() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut dome = DomeState::new(Difficulty::Settler, &mut rng);
        dome.set_soup(10);
        dome.set_integrity(3);
        dome.end_turn(&mut rng);
        assert_eq!(dome.soup(), 0);
        assert_eq!(dome.integrity(), 0);
        assert!(!dome.is_viable());
    }

    #[test]
    fn test_maintenance_cost_formula() {
        let mut dome = new_dome(Difficulty::Settler, 2);
        assert_eq!(dome.maintenance_cost(), 0);

        dome.set_integrity(90);
        // floor(10 * 1.25) * 100
        assert_eq!(dome.maintenance_cost(), 1200);

        let mut last = 0;
        for integrity in (0..100).rev() {
            dome.set_integrity(integrity);
            let cost = dome.maintenance_cost();
            assert!(cost > last, "cost must rise as integrity falls");
            last = cost;
        }
    }

    #[test]
    fn test_maintenance_outcomes() {
        let mut dome = new_dome(Difficulty::Cadet, 9);
        assert_eq!(dome.perform_maintenance(), MaintenanceOutcome::NotNeeded);

        dome.set_integrity(80);
        assert_eq!(
            dome.perform_maintenance(),
            MaintenanceOutcome::Repaired { cost: 2000 }
        );
        assert_eq!(dome.integrity(), 100);
        assert_eq!(dome.credits(), 3000);

        dome.set_integrity(50);
        dome.set_credits(100);
        assert_eq!(
            dome.perform_maintenance(),
            MaintenanceOutcome::InsufficientFunds {
                cost: 5000,
                available: 100
            }
        );
        assert_eq!(dome.integrity(), 50);
        assert_eq!(dome.credits(), 100);
    }

    #[test]
    fn test_buy_spends_credits() {
        let mut dome = new_dome(Difficulty::Cadet, 4);
        let price = dome.soup_cost();
        let spent = dome.buy(Commodity::Soup, 10).unwrap();
        assert_eq!(spent, 10 * price);
        assert_eq!(dome.soup(), 2010);
        assert_eq!(dome.credits(), 5000 - spent);
        assert_eq!(dome.peak_credits(), 5000);
    }

    #[test]
    fn test_buy_rejects_overspend() {
        let mut dome = new_dome(Difficulty::Cadet, 4);
        let max = dome.max_affordable(Commodity::Oxygen).unwrap();
        assert!(matches!(
            dome.buy(Commodity::Oxygen, max + 1),
            Err(DomeError::InsufficientCredits { .. })
        ));
        assert_eq!(dome.oxygen(), 3000);
        assert!(dome.buy(Commodity::Oxygen, max).is_ok());
        assert!(dome.credits() < dome.oxygen_cost());
    }

    #[test]
    fn test_integrity_not_purchasable() {
        let mut dome = new_dome(Difficulty::Cadet, 4);
        assert_eq!(
            dome.buy(Commodity::Integrity, 1),
            Err(DomeError::NotPurchasable(Commodity::Integrity))
        );
        assert!(dome.max_affordable(Commodity::Integrity).is_err());
    }

    #[test]
    fn test_sculptures_capped_by_oxygen() {
        let mut dome = new_dome(Difficulty::Engineer, 6);
        let max = dome.max_sculptures();
        assert_eq!(max, 3000 / dome.sculpture_cost());
        assert!(matches!(
            dome.produce_sculptures(max + 1),
            Err(DomeError::InsufficientOxygen { .. })
        ));

        let value = dome.sculpture_value();
        let earned = dome.produce_sculptures(5).unwrap();
        assert_eq!(earned, 5 * value);
        assert_eq!(dome.oxygen(), 3000 - 5 * dome.sculpture_cost());
        assert_eq!(dome.peak_credits(), dome.credits());
    }

    #[test]
    fn test_required_next_year() {
        let dome = new_dome(Difficulty::Cadet, 8);
        assert_eq!(
            dome.required_next_year(Commodity::Soup),
            100 * dome.soup_required_per_colonist()
        );
        assert_eq!(dome.required_next_year(Commodity::Integrity), 10);
    }

    #[test]
    fn test_medium_or_lower() {
        assert!(new_dome(Difficulty::Cadet, 1).is_medium_or_lower_difficulty());
        assert!(new_dome(Difficulty::Engineer, 1).is_medium_or_lower_difficulty());
        assert!(!new_dome(Difficulty::Overseer, 1).is_medium_or_lower_difficulty());
    }
}
