//! Pure economy logic for Ransom Rock.
//!
//! This crate owns the game's numeric state: how much of each resource the
//! player holds, how fast it accrues, and what it costs to trade or upgrade.
//! It has no rendering, input, audio or persistence. Presentation code
//! subscribes to change notifications and calls the engine's mutators.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`resources`] | Closed set of resource kinds and the per-kind table |
//! | [`ledger`] | Non-negative quantities with a guarded decrement |
//! | [`production`] | Auto-production rates, click multipliers, fractional accrual |
//! | [`notify`] | Subscriber lists with snapshot dispatch |
//! | [`engine`] | [`EconomyEngine`](engine::EconomyEngine): ledger + production + transactions + notifications |
//! | [`ransom`] | Win-condition amount and availability state |
//! | [`upgrades`] | Leveled multiplier and auto-production purchases |
//! | [`trader`] | Whole-unit exchange quotes |
//! | [`clicks`] | Click yield from base amount and multiplier |
//! | [`config`] | Static economy data, JSON loading and validation |
//!
//! # Example
//!
//! ```
//! use ransomrock_logic::prelude::*;
//!
//! let mut engine = EconomyEngine::new();
//! engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
//!
//! // Driven by the game loop with measured frame time.
//! for _ in 0..3 {
//!     engine.tick(0.4);
//! }
//! assert_eq!(engine.get_count(ResourceKind::Coal), 2);
//! ```

pub mod clicks;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod notify;
pub mod production;
pub mod ransom;
pub mod resources;
pub mod trader;
pub mod upgrades;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::EconomyConfig;
    pub use crate::engine::{EconomyEngine, EconomySnapshot};
    pub use crate::notify::{RansomAvailabilityChanged, ResourceChanged, Subscription};
    pub use crate::ransom::{RansomConfig, RansomStatus};
    pub use crate::resources::{ResourceKind, ResourceTable};
}
