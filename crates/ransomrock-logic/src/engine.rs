//! Economy engine: the single authoritative owner of game resources.
//!
//! Construct one [`EconomyEngine`] per session and hand `&mut` access to
//! whatever drives the game. There is no global instance.
//!
//! Every mutator that changes a quantity publishes one
//! [`ResourceChanged`] per affected kind, after the whole operation has been
//! applied. Changes to the ransom currency also re-check ransom
//! affordability and publish [`RansomAvailabilityChanged`] when it flips.
//!
//! ```
//! use ransomrock_logic::prelude::*;
//!
//! let mut engine = EconomyEngine::new();
//! engine.add_resource(ResourceKind::Coal, 19);
//! assert!(engine.trade(ResourceKind::Coal, 10, ResourceKind::Coin, 1));
//! assert_eq!(engine.get_count(ResourceKind::Coal), 9);
//! assert_eq!(engine.get_count(ResourceKind::Coin), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::clicks::click_yield;
use crate::config::EconomyConfig;
use crate::ledger::Ledger;
use crate::notify::{Channel, RansomAvailabilityChanged, ResourceChanged, Subscription};
use crate::production::ProductionModel;
use crate::ransom::{RansomConfig, RansomStatus};
use crate::resources::{ResourceKind, ResourceTable};

/// Main economy engine.
#[derive(Debug)]
pub struct EconomyEngine {
    /// Starting quantities restored by [`EconomyEngine::reset_all`].
    seeds: ResourceTable<u64>,
    ledger: Ledger,
    production: ProductionModel,
    ransom: RansomConfig,
    ransom_status: RansomStatus,

    resource_changed: Channel<ResourceChanged>,
    ransom_changed: Channel<RansomAvailabilityChanged>,
}

impl EconomyEngine {
    /// Empty ledger, default ransom.
    pub fn new() -> Self {
        Self::with_seeds(ResourceTable::filled(0), RansomConfig::default())
    }

    /// Engine whose ledger starts at `seeds`.
    pub fn with_seeds(seeds: ResourceTable<u64>, ransom: RansomConfig) -> Self {
        let ledger = Ledger::seeded(seeds);
        let ransom_status =
            RansomStatus::from_affordable(ledger.can_afford(ransom.currency, ransom.amount));
        Self {
            seeds,
            ledger,
            production: ProductionModel::new(),
            ransom,
            ransom_status,
            resource_changed: Channel::new(),
            ransom_changed: Channel::new(),
        }
    }

    /// Engine seeded from static economy data.
    pub fn from_config(config: &EconomyConfig) -> Self {
        Self::with_seeds(config.seed_table(), config.ransom)
    }

    // ── Ledger ──────────────────────────────────────────────────────────

    pub fn get_count(&self, kind: ResourceKind) -> u64 {
        self.ledger.count(kind)
    }

    pub fn can_afford(&self, kind: ResourceKind, amount: u64) -> bool {
        self.ledger.can_afford(kind, amount)
    }

    /// Increase `kind` by `amount` (saturating at `u64::MAX`). Publishes a
    /// change only when the quantity actually moved, so adding 0 is silent.
    pub fn add_resource(&mut self, kind: ResourceKind, amount: u64) {
        if self.ledger.credit(kind, amount) > 0 {
            self.publish_change(kind);
        }
    }

    /// Guarded decrement. Returns `false` and changes nothing when the
    /// balance is short.
    pub fn spend(&mut self, kind: ResourceKind, amount: u64) -> bool {
        if !self.ledger.debit(kind, amount) {
            log::debug!(
                "Cannot spend {} {}: only {} held",
                amount,
                kind,
                self.ledger.count(kind)
            );
            return false;
        }
        if amount > 0 {
            self.publish_change(kind);
        }
        true
    }

    // ── Production ──────────────────────────────────────────────────────

    pub fn get_multiplier(&self, kind: ResourceKind) -> f64 {
        self.production.multiplier(kind)
    }

    /// Stack `delta` onto the click multiplier of `kind`.
    pub fn add_multiplier_bonus(&mut self, kind: ResourceKind, delta: f64) {
        self.production.add_multiplier_bonus(kind, delta);
        log::debug!(
            "{} multiplier now {:.2}",
            kind,
            self.production.multiplier(kind)
        );
    }

    /// Overwrite the auto-production rate. Callers pass the cumulative rate
    /// for the new level, not an increment.
    pub fn set_auto_production_rate(&mut self, kind: ResourceKind, per_second: f64) {
        self.production.set_rate(kind, per_second);
    }

    pub fn get_auto_production_rate(&self, kind: ResourceKind) -> f64 {
        self.production.rate(kind)
    }

    /// Advance auto-production by `delta_seconds` of caller-measured time.
    /// Negative or non-finite deltas are ignored.
    pub fn tick(&mut self, delta_seconds: f64) {
        let earned = self.production.advance(delta_seconds);
        for (kind, units) in earned.iter() {
            if units > 0 {
                self.add_resource(kind, units);
            }
        }
    }

    /// Click on a resource node. Returns the units granted.
    pub fn collect_click(&mut self, kind: ResourceKind, amount_per_click: u64) -> u64 {
        let units = click_yield(amount_per_click, self.production.multiplier(kind));
        self.add_resource(kind, units);
        units
    }

    // ── Transactions ────────────────────────────────────────────────────

    /// Sell `sell_amount` of `sell_kind` for `buy_amount` of `buy_kind`.
    ///
    /// Both sides are applied before anyone is notified. Returns `false`
    /// with no mutation when the seller is short or the buyer's balance
    /// cannot absorb `buy_amount` in full.
    pub fn trade(
        &mut self,
        sell_kind: ResourceKind,
        sell_amount: u64,
        buy_kind: ResourceKind,
        buy_amount: u64,
    ) -> bool {
        if !self.ledger.can_afford(sell_kind, sell_amount) {
            log::debug!(
                "Trade refused: need {} {}, have {}",
                sell_amount,
                sell_kind,
                self.ledger.count(sell_kind)
            );
            return false;
        }
        let room = if sell_kind == buy_kind {
            (self.ledger.count(buy_kind) - sell_amount)
                .checked_add(buy_amount)
                .is_some()
        } else {
            self.ledger.has_room(buy_kind, buy_amount)
        };
        if !room {
            log::debug!(
                "Trade refused: {} {} would overflow {}",
                buy_amount,
                buy_kind,
                self.ledger.count(buy_kind)
            );
            return false;
        }
        if !self.ledger.debit(sell_kind, sell_amount) {
            return false;
        }
        let credited = self.ledger.credit(buy_kind, buy_amount);

        if sell_kind == buy_kind {
            if sell_amount != credited {
                self.publish_change(sell_kind);
            }
        } else {
            if sell_amount > 0 {
                self.publish_change(sell_kind);
            }
            if credited > 0 {
                self.publish_change(buy_kind);
            }
        }
        log::debug!(
            "Traded {} {} for {} {}",
            sell_amount,
            sell_kind,
            buy_amount,
            buy_kind
        );
        true
    }

    /// Pay the ransom. Returns `false` with no mutation if unaffordable.
    pub fn pay_ransom(&mut self) -> bool {
        let RansomConfig { currency, amount } = self.ransom;
        if !self.spend(currency, amount) {
            return false;
        }
        log::info!("Ransom of {} {} paid", amount, currency);
        true
    }

    pub fn ransom_config(&self) -> RansomConfig {
        self.ransom
    }

    pub fn ransom_status(&self) -> RansomStatus {
        self.ransom_status
    }

    pub fn is_ransom_available(&self) -> bool {
        self.ransom_status.is_available()
    }

    /// Restore seeds, unit multipliers, zero rates and empty accumulators.
    /// Publishes a change for every kind whose quantity moved.
    pub fn reset_all(&mut self) {
        let before = *self.ledger.counts();
        self.ledger = Ledger::seeded(self.seeds);
        self.production = ProductionModel::new();

        for (kind, old) in before.iter() {
            if old != self.ledger.count(kind) {
                self.publish_change(kind);
            }
        }
        self.refresh_ransom_status();
        log::info!("Economy reset to starting values");
    }

    // ── Notification ────────────────────────────────────────────────────

    /// Listen for quantity changes.
    pub fn on_resource_changed<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ResourceChanged) + 'static,
    {
        self.resource_changed.subscribe(listener)
    }

    /// Listen for ransom affordability flips.
    pub fn on_ransom_availability_changed<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RansomAvailabilityChanged) + 'static,
    {
        self.ransom_changed.subscribe(listener)
    }

    /// Listeners still registered across both channels. Zero after a clean
    /// teardown.
    pub fn listener_count(&self) -> usize {
        self.resource_changed.listener_count() + self.ransom_changed.listener_count()
    }

    fn publish_change(&mut self, kind: ResourceKind) {
        self.resource_changed.emit(&ResourceChanged {
            kind,
            count: self.ledger.count(kind),
        });
        if kind == self.ransom.currency {
            self.refresh_ransom_status();
        }
    }

    fn refresh_ransom_status(&mut self) {
        let status = RansomStatus::from_affordable(
            self.ledger.can_afford(self.ransom.currency, self.ransom.amount),
        );
        if status != self.ransom_status {
            self.ransom_status = status;
            self.ransom_changed.emit(&RansomAvailabilityChanged {
                available: status.is_available(),
            });
        }
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Read-only copy of the current state for display or reporting.
    pub fn snapshot(&self) -> EconomySnapshot {
        let mut rates = ResourceTable::filled(0.0);
        let mut multipliers = ResourceTable::filled(1.0);
        for kind in ResourceKind::ALL {
            rates[kind] = self.production.rate(kind);
            multipliers[kind] = self.production.multiplier(kind);
        }
        EconomySnapshot {
            counts: *self.ledger.counts(),
            rates,
            multipliers,
            ransom_available: self.ransom_status.is_available(),
        }
    }
}

impl Default for EconomyEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the economy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub counts: ResourceTable<u64>,
    pub rates: ResourceTable<f64>,
    pub multipliers: ResourceTable<f64>,
    pub ransom_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record_changes(engine: &EconomyEngine) -> Rc<RefCell<Vec<ResourceChanged>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = engine.on_resource_changed(move |e| sink.borrow_mut().push(*e));
        log
    }

    fn record_ransom(engine: &EconomyEngine) -> Rc<RefCell<Vec<bool>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub =
            engine.on_ransom_availability_changed(move |e| sink.borrow_mut().push(e.available));
        log
    }

    #[test]
    fn test_engine_creation() {
        let engine = EconomyEngine::new();
        for kind in ResourceKind::ALL {
            assert_eq!(engine.get_count(kind), 0);
            assert_eq!(engine.get_multiplier(kind), 1.0);
            assert_eq!(engine.get_auto_production_rate(kind), 0.0);
        }
        assert!(!engine.is_ransom_available());
    }

    #[test]
    fn test_add_resource_notifies_once_with_post_state() {
        let mut engine = EconomyEngine::new();
        let changes = record_changes(&engine);
        engine.add_resource(ResourceKind::Stone, 5);
        assert_eq!(
            *changes.borrow(),
            vec![ResourceChanged {
                kind: ResourceKind::Stone,
                count: 5
            }]
        );
    }

    #[test]
    fn test_add_zero_is_silent() {
        let mut engine = EconomyEngine::new();
        let changes = record_changes(&engine);
        engine.add_resource(ResourceKind::Stone, 0);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_spend_insufficient_is_noop() {
        let mut seeds = ResourceTable::filled(0);
        seeds[ResourceKind::Coin] = 999;
        let mut engine = EconomyEngine::with_seeds(seeds, RansomConfig::default());
        let changes = record_changes(&engine);

        assert!(!engine.spend(ResourceKind::Coin, 1000));
        assert_eq!(engine.get_count(ResourceKind::Coin), 999);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_spend_success() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 10);
        let changes = record_changes(&engine);
        assert!(engine.spend(ResourceKind::Coal, 4));
        assert_eq!(engine.get_count(ResourceKind::Coal), 6);
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_trade_notifies_after_both_sides() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 19);
        let changes = record_changes(&engine);

        assert!(engine.trade(ResourceKind::Coal, 10, ResourceKind::Coin, 1));
        let seen = changes.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            ResourceChanged {
                kind: ResourceKind::Coal,
                count: 9
            }
        );
        assert_eq!(
            seen[1],
            ResourceChanged {
                kind: ResourceKind::Coin,
                count: 1
            }
        );
    }

    #[test]
    fn test_trade_unaffordable_changes_nothing() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 9);
        let changes = record_changes(&engine);
        assert!(!engine.trade(ResourceKind::Coal, 10, ResourceKind::Coin, 1));
        assert_eq!(engine.get_count(ResourceKind::Coal), 9);
        assert_eq!(engine.get_count(ResourceKind::Coin), 0);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_trade_refused_when_buyer_would_overflow() {
        let mut seeds = ResourceTable::filled(0);
        seeds[ResourceKind::Coin] = u64::MAX;
        seeds[ResourceKind::Coal] = 10;
        let mut engine = EconomyEngine::with_seeds(seeds, RansomConfig::default());
        let changes = record_changes(&engine);

        assert!(!engine.trade(ResourceKind::Coal, 10, ResourceKind::Coin, 1));
        assert_eq!(engine.get_count(ResourceKind::Coal), 10);
        assert_eq!(engine.get_count(ResourceKind::Coin), u64::MAX);
        assert!(changes.borrow().is_empty());

        // Same-kind trades net out before the room check.
        assert!(engine.trade(ResourceKind::Coin, 5, ResourceKind::Coin, 5));
        assert!(!engine.trade(ResourceKind::Coin, 5, ResourceKind::Coin, 6));
        assert_eq!(engine.get_count(ResourceKind::Coin), u64::MAX);
    }

    #[test]
    fn test_teardown_leaves_no_listeners() {
        let engine = EconomyEngine::new();
        let a = engine.on_resource_changed(|_| {});
        let b = engine.on_ransom_availability_changed(|_| {});
        assert_eq!(engine.listener_count(), 2);
        a.unsubscribe();
        b.unsubscribe();
        assert_eq!(engine.listener_count(), 0);
    }

    #[test]
    fn test_same_kind_trade_notifies_once() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Stone, 10);
        let changes = record_changes(&engine);
        assert!(engine.trade(ResourceKind::Stone, 10, ResourceKind::Stone, 3));
        assert_eq!(engine.get_count(ResourceKind::Stone), 3);
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_tick_scenario() {
        let mut engine = EconomyEngine::new();
        engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
        let changes = record_changes(&engine);
        for _ in 0..3 {
            engine.tick(0.4);
        }
        assert_eq!(engine.get_count(ResourceKind::Coal), 2);
        assert_eq!(changes.borrow().len(), 2);
    }

    #[test]
    fn test_invalid_tick_ignored() {
        let mut engine = EconomyEngine::new();
        engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
        engine.tick(-1.0);
        engine.tick(f64::NAN);
        engine.tick(0.0);
        assert_eq!(engine.get_count(ResourceKind::Coal), 0);
        engine.tick(1.0);
        assert_eq!(engine.get_count(ResourceKind::Coal), 2);
    }

    #[test]
    fn test_collect_click_uses_multiplier() {
        let mut engine = EconomyEngine::new();
        assert_eq!(engine.collect_click(ResourceKind::Stone, 1), 1);
        engine.add_multiplier_bonus(ResourceKind::Stone, 0.5);
        engine.add_multiplier_bonus(ResourceKind::Stone, 0.5);
        assert_eq!(engine.collect_click(ResourceKind::Stone, 1), 2);
        assert_eq!(engine.get_count(ResourceKind::Stone), 3);
    }

    #[test]
    fn test_ransom_edge_trigger() {
        let ransom = RansomConfig {
            currency: ResourceKind::Coin,
            amount: 100,
        };
        let mut engine = EconomyEngine::with_seeds(ResourceTable::filled(0), ransom);
        let flips = record_ransom(&engine);

        engine.add_resource(ResourceKind::Coin, 99);
        assert!(flips.borrow().is_empty());
        engine.add_resource(ResourceKind::Coin, 1);
        assert_eq!(*flips.borrow(), vec![true]);
        engine.add_resource(ResourceKind::Coin, 50);
        engine.add_resource(ResourceKind::Stone, 50);
        assert_eq!(*flips.borrow(), vec![true]);

        assert!(engine.pay_ransom());
        assert_eq!(engine.get_count(ResourceKind::Coin), 50);
        assert_eq!(*flips.borrow(), vec![true, false]);
        assert!(!engine.is_ransom_available());
    }

    #[test]
    fn test_pay_ransom_unaffordable() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coin, 999);
        assert!(!engine.pay_ransom());
        assert_eq!(engine.get_count(ResourceKind::Coin), 999);
    }

    #[test]
    fn test_seeded_ransom_starts_available_without_event() {
        let mut seeds = ResourceTable::filled(0);
        seeds[ResourceKind::Coin] = 1000;
        let engine = EconomyEngine::with_seeds(seeds, RansomConfig::default());
        assert!(engine.is_ransom_available());
    }

    #[test]
    fn test_reset_all() {
        let mut seeds = ResourceTable::filled(0);
        seeds[ResourceKind::Coin] = 50;
        let mut engine = EconomyEngine::with_seeds(seeds, RansomConfig::default());
        engine.add_resource(ResourceKind::Stone, 10);
        engine.add_multiplier_bonus(ResourceKind::Stone, 0.5);
        engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
        engine.tick(0.25);

        let changes = record_changes(&engine);
        engine.reset_all();

        assert_eq!(engine.get_count(ResourceKind::Stone), 0);
        assert_eq!(engine.get_count(ResourceKind::Coin), 50);
        assert_eq!(engine.get_multiplier(ResourceKind::Stone), 1.0);
        assert_eq!(engine.get_auto_production_rate(ResourceKind::Coal), 0.0);
        let seen = changes.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ResourceKind::Stone);

        // Accumulated 0.5 coal was discarded along with the rate.
        drop(seen);
        engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
        engine.tick(0.25);
        assert_eq!(engine.get_count(ResourceKind::Coal), 0);
    }

    #[test]
    fn test_snapshot() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 3);
        engine.set_auto_production_rate(ResourceKind::Stone, 1.5);
        let snap = engine.snapshot();
        assert_eq!(snap.counts[ResourceKind::Coal], 3);
        assert_eq!(snap.rates[ResourceKind::Stone], 1.5);
        assert_eq!(snap.multipliers[ResourceKind::Coin], 1.0);
        assert!(!snap.ransom_available);
    }
}
