//! Trade desk: fixed-ratio, whole-unit exchanges between two kinds.
//!
//! A player picks an amount to sell; the desk rounds it down to a multiple
//! of the rate so only whole units are bought, and executes the exchange as
//! one [`EconomyEngine::trade`].

use serde::{Deserialize, Serialize};

use crate::engine::EconomyEngine;
use crate::resources::ResourceKind;

/// `sell_per_unit` of `sell` buys one `buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRate {
    pub sell: ResourceKind,
    pub buy: ResourceKind,
    pub sell_per_unit: u64,
}

impl Default for TradeRate {
    fn default() -> Self {
        Self {
            sell: ResourceKind::Coal,
            buy: ResourceKind::Coin,
            sell_per_unit: 10,
        }
    }
}

/// Result of pricing a selected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeQuote {
    /// Units of `sell` actually taken.
    pub sell_amount: u64,
    /// Units of `buy` received.
    pub receive_amount: u64,
    /// Part of the selection that does not make a whole unit.
    pub leftover: u64,
}

impl TradeQuote {
    pub fn is_tradeable(&self) -> bool {
        self.receive_amount > 0
    }
}

impl TradeRate {
    /// Price `selected` units of `sell`.
    pub fn quote(&self, selected: u64) -> TradeQuote {
        if self.sell_per_unit == 0 {
            return TradeQuote {
                leftover: selected,
                ..TradeQuote::default()
            };
        }
        let receive_amount = selected / self.sell_per_unit;
        let sell_amount = receive_amount * self.sell_per_unit;
        TradeQuote {
            sell_amount,
            receive_amount,
            leftover: selected - sell_amount,
        }
    }

    /// Largest whole-unit amount of `sell` the engine currently holds.
    pub fn max_tradeable(&self, engine: &EconomyEngine) -> u64 {
        self.quote(engine.get_count(self.sell)).sell_amount
    }

    /// Sell up to `selected` units. The selection is clamped to holdings and
    /// rounded down to whole units. Returns `None` when not even one unit
    /// can be bought.
    pub fn execute(&self, engine: &mut EconomyEngine, selected: u64) -> Option<TradeQuote> {
        let held = engine.get_count(self.sell);
        let quote = self.quote(selected.min(held));
        if !quote.is_tradeable() {
            return None;
        }
        engine
            .trade(self.sell, quote.sell_amount, self.buy, quote.receive_amount)
            .then_some(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_rounds_down() {
        let rate = TradeRate::default();
        assert_eq!(
            rate.quote(19),
            TradeQuote {
                sell_amount: 10,
                receive_amount: 1,
                leftover: 9
            }
        );
        assert!(!rate.quote(9).is_tradeable());
        assert_eq!(rate.quote(30).receive_amount, 3);
    }

    #[test]
    fn test_zero_rate_never_trades() {
        let rate = TradeRate {
            sell_per_unit: 0,
            ..TradeRate::default()
        };
        let quote = rate.quote(50);
        assert!(!quote.is_tradeable());
        assert_eq!(quote.leftover, 50);
    }

    #[test]
    fn test_execute_sells_19_coal() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 19);
        let rate = TradeRate::default();
        assert_eq!(rate.max_tradeable(&engine), 10);

        let quote = rate.execute(&mut engine, 19).unwrap();
        assert_eq!(quote.sell_amount, 10);
        assert_eq!(engine.get_count(ResourceKind::Coal), 9);
        assert_eq!(engine.get_count(ResourceKind::Coin), 1);
    }

    #[test]
    fn test_execute_clamps_to_holdings() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 25);
        let quote = TradeRate::default().execute(&mut engine, 500).unwrap();
        assert_eq!(quote.receive_amount, 2);
        assert_eq!(engine.get_count(ResourceKind::Coal), 5);
    }

    #[test]
    fn test_execute_below_one_unit() {
        let mut engine = EconomyEngine::new();
        engine.add_resource(ResourceKind::Coal, 9);
        assert!(TradeRate::default().execute(&mut engine, 9).is_none());
        assert_eq!(engine.get_count(ResourceKind::Coal), 9);
        assert_eq!(engine.get_count(ResourceKind::Coin), 0);
    }
}
