//! Ransom: the fixed-cost win condition.

use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// Amount and currency of the ransom. Fixed for the life of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RansomConfig {
    pub currency: ResourceKind,
    pub amount: u64,
}

impl Default for RansomConfig {
    fn default() -> Self {
        Self {
            currency: ResourceKind::Coin,
            amount: 1000,
        }
    }
}

impl RansomConfig {
    /// Units still missing when holding `count` of the currency.
    pub fn shortfall(&self, count: u64) -> u64 {
        self.amount.saturating_sub(count)
    }

    pub fn is_affordable(&self, count: u64) -> bool {
        count >= self.amount
    }
}

/// Whether the ransom can currently be paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RansomStatus {
    Available,
    NotAvailable,
}

impl RansomStatus {
    pub fn from_affordable(affordable: bool) -> Self {
        if affordable {
            RansomStatus::Available
        } else {
            RansomStatus::NotAvailable
        }
    }

    pub fn is_available(self) -> bool {
        self == RansomStatus::Available
    }
}
