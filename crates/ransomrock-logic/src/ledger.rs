//! Resource ledger: the authoritative per-kind quantities.
//!
//! Quantities are `u64`, so a negative balance cannot be represented.
//! Additions saturate at `u64::MAX`. The only way to lower a quantity is
//! [`Ledger::debit`], which refuses when the balance is short.

use serde::{Deserialize, Serialize};

use crate::resources::{ResourceKind, ResourceTable};

/// Per-kind quantities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    counts: ResourceTable<u64>,
}

impl Ledger {
    /// Ledger with the given starting quantities.
    pub fn seeded(seeds: ResourceTable<u64>) -> Self {
        Self { counts: seeds }
    }

    pub fn count(&self, kind: ResourceKind) -> u64 {
        self.counts[kind]
    }

    pub fn can_afford(&self, kind: ResourceKind, amount: u64) -> bool {
        self.counts[kind] >= amount
    }

    /// Whether crediting `amount` fits without saturating.
    pub fn has_room(&self, kind: ResourceKind, amount: u64) -> bool {
        self.counts[kind].checked_add(amount).is_some()
    }

    /// Add `amount`, saturating. Returns the amount actually applied.
    pub fn credit(&mut self, kind: ResourceKind, amount: u64) -> u64 {
        let before = self.counts[kind];
        let after = before.saturating_add(amount);
        self.counts[kind] = after;
        after - before
    }

    /// Guarded decrement. Leaves the ledger untouched and returns `false`
    /// when the balance is below `amount`.
    pub fn debit(&mut self, kind: ResourceKind, amount: u64) -> bool {
        match self.counts[kind].checked_sub(amount) {
            Some(remaining) => {
                self.counts[kind] = remaining;
                true
            }
            None => false,
        }
    }

    /// All quantities, in table order.
    pub fn counts(&self) -> &ResourceTable<u64> {
        &self.counts
    }
}
