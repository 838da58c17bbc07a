//! Static economy data: starting amounts, ransom, upgrades, trade rates
//! and click sources.
//!
//! The engine only reads this. Data is usually loaded from JSON with
//! [`EconomyConfig::from_json`], which also validates it.
//!
//! ```
//! use ransomrock_logic::config::{validate_config, EconomyConfig};
//!
//! let config = EconomyConfig::default();
//! assert!(validate_config(&config).is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clicks::ClickSource;
use crate::ransom::RansomConfig;
use crate::resources::{ResourceKind, ResourceTable};
use crate::trader::TradeRate;
use crate::upgrades::{AutoProductionUpgradeData, UpgradeData};

/// Starting quantity for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingAmount {
    pub kind: ResourceKind,
    pub amount: u64,
}

/// All static economy records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Kinds not listed start at 0.
    #[serde(default)]
    pub starting: Vec<StartingAmount>,
    #[serde(default)]
    pub ransom: RansomConfig,
    #[serde(default)]
    pub multiplier_upgrades: Vec<UpgradeData>,
    #[serde(default)]
    pub auto_upgrades: Vec<AutoProductionUpgradeData>,
    #[serde(default)]
    pub trades: Vec<TradeRate>,
    #[serde(default)]
    pub click_sources: Vec<ClickSource>,
}

/// Mirrors `data/economy.json`.
impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting: ResourceKind::ALL
                .iter()
                .map(|&kind| StartingAmount { kind, amount: 0 })
                .collect(),
            ransom: RansomConfig::default(),
            multiplier_upgrades: vec![
                UpgradeData {
                    name: "Sharper Pickaxe".into(),
                    description: "+0.5 stone per click".into(),
                    target: ResourceKind::Stone,
                    currency: ResourceKind::Stone,
                    base_cost: 10.0,
                    cost_multiplier: 1.5,
                    production_bonus_per_level: 0.5,
                    max_level: None,
                },
                UpgradeData {
                    name: "Coal Shovel".into(),
                    description: "+0.5 coal per click".into(),
                    target: ResourceKind::Coal,
                    currency: ResourceKind::Stone,
                    base_cost: 25.0,
                    cost_multiplier: 1.5,
                    production_bonus_per_level: 0.5,
                    max_level: None,
                },
            ],
            auto_upgrades: vec![
                AutoProductionUpgradeData {
                    name: "Quarry Crew".into(),
                    description: "Digs stone while you wait".into(),
                    target: ResourceKind::Stone,
                    currency: ResourceKind::Stone,
                    base_cost: 50.0,
                    cost_multiplier: 1.5,
                    production_per_second: 1.0,
                    max_level: None,
                },
                AutoProductionUpgradeData {
                    name: "Coal Mine".into(),
                    description: "Brings up coal while you wait".into(),
                    target: ResourceKind::Coal,
                    currency: ResourceKind::Stone,
                    base_cost: 100.0,
                    cost_multiplier: 1.6,
                    production_per_second: 2.0,
                    max_level: Some(25),
                },
            ],
            trades: vec![TradeRate::default()],
            click_sources: vec![
                ClickSource {
                    kind: ResourceKind::Stone,
                    amount_per_click: 1,
                },
                ClickSource {
                    kind: ResourceKind::Coal,
                    amount_per_click: 1,
                },
            ],
        }
    }
}

impl EconomyConfig {
    /// Parse and validate JSON economy data.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: EconomyConfig = serde_json::from_str(json)?;
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(LoadError::Invalid(errors));
        }
        log::info!(
            "Loaded economy: {} multiplier upgrades, {} auto upgrades, {} trades",
            config.multiplier_upgrades.len(),
            config.auto_upgrades.len(),
            config.trades.len()
        );
        Ok(config)
    }

    /// Starting quantities as a table.
    pub fn seed_table(&self) -> ResourceTable<u64> {
        let mut seeds = ResourceTable::filled(0);
        for start in &self.starting {
            seeds[start.kind] = start.amount;
        }
        seeds
    }

    /// First trade rate selling `sell`, if any.
    pub fn trade_for(&self, sell: ResourceKind) -> Option<TradeRate> {
        self.trades.iter().copied().find(|t| t.sell == sell)
    }
}

/// Economy data validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The same kind appears twice in `starting`.
    DuplicateStartingAmount(ResourceKind),
    /// A ransom of 0 would be won immediately.
    ZeroRansom,
    /// Upgrade has an empty name.
    EmptyUpgradeName,
    /// Base cost negative/non-finite or multiplier below 1.
    InvalidCostCurve { upgrade: String },
    /// Multiplier bonus is not a finite number.
    InvalidProductionBonus { upgrade: String },
    /// Auto-production rate is not positive and finite.
    InvalidProductionRate { upgrade: String },
    /// Trade exchanges a kind for itself.
    SelfTrade(ResourceKind),
    /// Trade rate of 0 sell units per bought unit.
    ZeroTradeRate { sell: ResourceKind, buy: ResourceKind },
    /// Click source grants nothing.
    ZeroClickAmount(ResourceKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateStartingAmount(kind) => {
                write!(f, "starting amount for {} listed twice", kind)
            }
            ConfigError::ZeroRansom => write!(f, "ransom amount must be positive"),
            ConfigError::EmptyUpgradeName => write!(f, "upgrade name is empty"),
            ConfigError::InvalidCostCurve { upgrade } => {
                write!(f, "upgrade '{}' has an invalid cost curve", upgrade)
            }
            ConfigError::InvalidProductionBonus { upgrade } => {
                write!(f, "upgrade '{}' has a non-finite production bonus", upgrade)
            }
            ConfigError::InvalidProductionRate { upgrade } => {
                write!(f, "upgrade '{}' must produce a positive rate", upgrade)
            }
            ConfigError::SelfTrade(kind) => write!(f, "trade sells {} for itself", kind),
            ConfigError::ZeroTradeRate { sell, buy } => {
                write!(f, "trade {} -> {} has a zero rate", sell, buy)
            }
            ConfigError::ZeroClickAmount(kind) => {
                write!(f, "click source for {} grants nothing", kind)
            }
        }
    }
}

fn valid_cost_curve(base_cost: f64, cost_multiplier: f64) -> bool {
    base_cost.is_finite()
        && base_cost >= 0.0
        && cost_multiplier.is_finite()
        && cost_multiplier >= 1.0
}

/// Validate economy data, returning all errors found.
pub fn validate_config(config: &EconomyConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let mut seen = ResourceTable::filled(false);
    for start in &config.starting {
        if seen[start.kind] {
            errors.push(ConfigError::DuplicateStartingAmount(start.kind));
        }
        seen[start.kind] = true;
    }

    if config.ransom.amount == 0 {
        errors.push(ConfigError::ZeroRansom);
    }

    for up in &config.multiplier_upgrades {
        if up.name.trim().is_empty() {
            errors.push(ConfigError::EmptyUpgradeName);
        }
        if !valid_cost_curve(up.base_cost, up.cost_multiplier) {
            errors.push(ConfigError::InvalidCostCurve {
                upgrade: up.name.clone(),
            });
        }
        if !up.production_bonus_per_level.is_finite() {
            errors.push(ConfigError::InvalidProductionBonus {
                upgrade: up.name.clone(),
            });
        }
    }

    for up in &config.auto_upgrades {
        if up.name.trim().is_empty() {
            errors.push(ConfigError::EmptyUpgradeName);
        }
        if !valid_cost_curve(up.base_cost, up.cost_multiplier) {
            errors.push(ConfigError::InvalidCostCurve {
                upgrade: up.name.clone(),
            });
        }
        if !(up.production_per_second.is_finite() && up.production_per_second > 0.0) {
            errors.push(ConfigError::InvalidProductionRate {
                upgrade: up.name.clone(),
            });
        }
    }

    for trade in &config.trades {
        if trade.sell == trade.buy {
            errors.push(ConfigError::SelfTrade(trade.sell));
        }
        if trade.sell_per_unit == 0 {
            errors.push(ConfigError::ZeroTradeRate {
                sell: trade.sell,
                buy: trade.buy,
            });
        }
    }

    for source in &config.click_sources {
        if source.amount_per_click == 0 {
            errors.push(ConfigError::ZeroClickAmount(source.kind));
        }
    }

    errors
}

/// Errors that can occur while loading economy data
#[derive(Debug)]
pub enum LoadError {
    Json(serde_json::Error),
    Invalid(Vec<ConfigError>),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Json(e) => write!(f, "JSON parse error: {}", e),
            LoadError::Invalid(errors) => {
                write!(f, "{} invalid economy records", errors.len())?;
                for e in errors {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Json(e) => Some(e),
            LoadError::Invalid(_) => None,
        }
    }
}
