//! Upgrade tracks: leveled purchases with exponential cost curves.
//!
//! Two flavors share one purchase flow:
//!
//! | Data | Effect of buying level `n` |
//! |------|----------------------------|
//! | [`UpgradeData`] | click multiplier of `target` += `production_bonus_per_level` |
//! | [`AutoProductionUpgradeData`] | auto rate of `target` = `production_per_second * n` |
//!
//! Auto-production purchases overwrite the rate with the total for the new
//! level, so buying three levels of a 1/s upgrade gives 3/s, not 1+2+3.
//!
//! ```
//! use ransomrock_logic::prelude::*;
//! use ransomrock_logic::upgrades::{AutoProductionUpgradeData, UpgradeTrack};
//!
//! let mut engine = EconomyEngine::new();
//! engine.add_resource(ResourceKind::Stone, 1_000);
//! let mut crew = UpgradeTrack::new(AutoProductionUpgradeData {
//!     name: "Quarry Crew".into(),
//!     description: String::new(),
//!     target: ResourceKind::Stone,
//!     currency: ResourceKind::Stone,
//!     base_cost: 100.0,
//!     cost_multiplier: 1.5,
//!     production_per_second: 1.0,
//!     max_level: None,
//! });
//! crew.purchase(&mut engine).unwrap();
//! crew.purchase(&mut engine).unwrap();
//! assert_eq!(engine.get_auto_production_rate(ResourceKind::Stone), 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::EconomyEngine;
use crate::resources::ResourceKind;

/// Cost of buying the upgrade when `level` levels are already owned:
/// `base_cost * cost_multiplier^level` rounded half to even, saturating at
/// `u64::MAX`.
pub fn cost_at(base_cost: f64, cost_multiplier: f64, level: u32) -> u64 {
    let raw = base_cost * cost_multiplier.powi(level.min(i32::MAX as u32) as i32);
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    // `as` saturates, which also covers infinity.
    raw.round_ties_even() as u64
}

/// Click-multiplier upgrade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target: ResourceKind,
    pub currency: ResourceKind,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub production_bonus_per_level: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
}

/// Auto-production upgrade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoProductionUpgradeData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target: ResourceKind,
    pub currency: ResourceKind,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub production_per_second: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
}

impl AutoProductionUpgradeData {
    /// Units per second granted once `level` levels are owned.
    pub fn rate_at(&self, level: u32) -> f64 {
        self.production_per_second * level as f64
    }
}

/// What an upgrade costs and what buying a level does.
pub trait Upgrade {
    fn name(&self) -> &str;
    fn target(&self) -> ResourceKind;
    fn currency(&self) -> ResourceKind;
    fn max_level(&self) -> Option<u32>;

    /// Price of the next level when `level` are owned.
    fn cost_at(&self, level: u32) -> u64;

    /// Apply the effect of reaching `new_level`. Payment already happened.
    fn apply(&self, engine: &mut EconomyEngine, new_level: u32);
}

impl Upgrade for UpgradeData {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> ResourceKind {
        self.target
    }

    fn currency(&self) -> ResourceKind {
        self.currency
    }

    fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    fn cost_at(&self, level: u32) -> u64 {
        cost_at(self.base_cost, self.cost_multiplier, level)
    }

    fn apply(&self, engine: &mut EconomyEngine, _new_level: u32) {
        engine.add_multiplier_bonus(self.target, self.production_bonus_per_level);
    }
}

impl Upgrade for AutoProductionUpgradeData {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> ResourceKind {
        self.target
    }

    fn currency(&self) -> ResourceKind {
        self.currency
    }

    fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    fn cost_at(&self, level: u32) -> u64 {
        cost_at(self.base_cost, self.cost_multiplier, level)
    }

    fn apply(&self, engine: &mut EconomyEngine, new_level: u32) {
        engine.set_auto_production_rate(self.target, self.rate_at(new_level));
    }
}

/// Receipt for a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Level owned after the purchase.
    pub level: u32,
    /// Amount of the currency spent.
    pub cost: u64,
}

/// An upgrade plus how many levels the player owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTrack<U> {
    data: U,
    level: u32,
}

/// Click-multiplier upgrade with its owned level.
pub type MultiplierUpgrade = UpgradeTrack<UpgradeData>;

/// Auto-production upgrade with its owned level.
pub type AutoProductionUpgrade = UpgradeTrack<AutoProductionUpgradeData>;

impl<U: Upgrade> UpgradeTrack<U> {
    pub fn new(data: U) -> Self {
        Self { data, level: 0 }
    }

    pub fn data(&self) -> &U {
        &self.data
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_maxed(&self) -> bool {
        self.data.max_level().is_some_and(|max| self.level >= max)
    }

    /// Price of the next level, or `None` once maxed.
    pub fn current_cost(&self) -> Option<u64> {
        if self.is_maxed() {
            None
        } else {
            Some(self.data.cost_at(self.level))
        }
    }

    pub fn can_purchase(&self, engine: &EconomyEngine) -> bool {
        self.current_cost()
            .is_some_and(|cost| engine.can_afford(self.data.currency(), cost))
    }

    /// Buy the next level. Returns `None` without touching the engine when
    /// maxed or unaffordable.
    pub fn purchase(&mut self, engine: &mut EconomyEngine) -> Option<Purchase> {
        let cost = self.current_cost()?;
        if !engine.spend(self.data.currency(), cost) {
            return None;
        }
        self.level += 1;
        self.data.apply(engine, self.level);
        log::debug!(
            "Bought {} level {} for {} {}",
            self.data.name(),
            self.level,
            cost,
            self.data.currency()
        );
        Some(Purchase {
            level: self.level,
            cost,
        })
    }

    /// Forget owned levels, e.g. after [`EconomyEngine::reset_all`].
    pub fn reset(&mut self) {
        self.level = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickaxe() -> UpgradeData {
        UpgradeData {
            name: "Sharper Pickaxe".into(),
            description: String::new(),
            target: ResourceKind::Stone,
            currency: ResourceKind::Stone,
            base_cost: 10.0,
            cost_multiplier: 1.5,
            production_bonus_per_level: 0.5,
            max_level: None,
        }
    }

    fn coal_mine() -> AutoProductionUpgradeData {
        AutoProductionUpgradeData {
            name: "Coal Mine".into(),
            description: String::new(),
            target: ResourceKind::Coal,
            currency: ResourceKind::Coin,
            base_cost: 100.0,
            cost_multiplier: 1.5,
            production_per_second: 1.0,
            max_level: Some(3),
        }
    }

    #[test]
    fn test_cost_curve() {
        let costs: Vec<u64> = (0..4).map(|l| cost_at(10.0, 1.5, l)).collect();
        // 22.5 rounds to 22.
        assert_eq!(costs, vec![10, 15, 22, 34]);
    }

    #[test]
    fn test_cost_saturates() {
        assert_eq!(cost_at(10.0, 10.0, 400), u64::MAX);
        assert_eq!(cost_at(0.0, 1.5, 3), 0);
    }

    #[test]
    fn test_multiplier_purchase() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Stone, 25);
        let mut track: MultiplierUpgrade = UpgradeTrack::new(pickaxe());

        let first = track.purchase(&mut engine).unwrap();
        assert_eq!(first, Purchase { level: 1, cost: 10 });
        let second = track.purchase(&mut engine).unwrap();
        assert_eq!(second, Purchase { level: 2, cost: 15 });

        assert_eq!(engine.get_count(ResourceKind::Stone), 0);
        assert!((engine.get_multiplier(ResourceKind::Stone) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unaffordable_purchase_is_noop() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Stone, 9);
        let mut track = UpgradeTrack::new(pickaxe());
        assert!(!track.can_purchase(&engine));
        assert!(track.purchase(&mut engine).is_none());
        assert_eq!(track.level(), 0);
        assert_eq!(engine.get_count(ResourceKind::Stone), 9);
        assert_eq!(engine.get_multiplier(ResourceKind::Stone), 1.0);
    }

    #[test]
    fn test_auto_rate_overwrites() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coin, 10_000);
        let mut track: AutoProductionUpgrade = UpgradeTrack::new(coal_mine());
        for _ in 0..3 {
            track.purchase(&mut engine).unwrap();
        }
        assert_eq!(engine.get_auto_production_rate(ResourceKind::Coal), 3.0);
        // 100 + 150 + 225
        assert_eq!(engine.get_count(ResourceKind::Coin), 10_000 - 475);
    }

    #[test]
    fn test_max_level() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coin, 10_000);
        let mut track = UpgradeTrack::new(coal_mine());
        for _ in 0..3 {
            assert!(track.purchase(&mut engine).is_some());
        }
        assert!(track.is_maxed());
        assert_eq!(track.current_cost(), None);
        assert!(!track.can_purchase(&engine));
        let before = engine.get_count(ResourceKind::Coin);
        assert!(track.purchase(&mut engine).is_none());
        assert_eq!(engine.get_count(ResourceKind::Coin), before);
    }

    #[test]
    fn test_reset_level() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Stone, 10);
        let mut track = UpgradeTrack::new(pickaxe());
        track.purchase(&mut engine).unwrap();
        track.reset();
        assert_eq!(track.level(), 0);
        assert_eq!(track.current_cost(), Some(10));
    }
}
