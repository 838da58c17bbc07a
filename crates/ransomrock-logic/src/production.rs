//! Production model: auto-production rates, click multipliers, and the
//! fractional accumulator that turns elapsed time into whole units.
//!
//! Each kind carries a fractional remainder between ticks, so the total
//! produced over a span equals `floor(rate * span)` no matter how the span
//! is split into ticks.
//!
//! ```
//! use ransomrock_logic::production::ProductionModel;
//! use ransomrock_logic::resources::ResourceKind;
//!
//! let mut model = ProductionModel::new();
//! model.set_rate(ResourceKind::Coal, 2.0);
//! let mut coal = 0;
//! for _ in 0..3 {
//!     coal += model.advance(0.4)[ResourceKind::Coal];
//! }
//! assert_eq!(coal, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::resources::{ResourceKind, ResourceTable};

/// Slack applied when splitting the accumulator into whole units.
///
/// Deltas like `0.1` are not exact in binary, so ten of them sum to
/// `0.9999999999999999`. Anything this close to the next integer counts as
/// reaching it.
pub const ACCRUAL_EPSILON: f64 = 1e-9;

/// Default click multiplier.
pub const BASE_MULTIPLIER: f64 = 1.0;

/// Rates, multipliers and carried fractions for every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionModel {
    multipliers: ResourceTable<f64>,
    rates: ResourceTable<f64>,
    accumulators: ResourceTable<f64>,
}

impl ProductionModel {
    pub fn new() -> Self {
        Self {
            multipliers: ResourceTable::filled(BASE_MULTIPLIER),
            rates: ResourceTable::filled(0.0),
            accumulators: ResourceTable::filled(0.0),
        }
    }

    pub fn multiplier(&self, kind: ResourceKind) -> f64 {
        self.multipliers[kind]
    }

    /// Stack `delta` onto the current multiplier. Non-finite deltas, and
    /// deltas that would leave the multiplier non-positive, are ignored.
    pub fn add_multiplier_bonus(&mut self, kind: ResourceKind, delta: f64) {
        let next = self.multipliers[kind] + delta;
        if !delta.is_finite() || !next.is_finite() || next <= 0.0 {
            log::warn!("Rejected multiplier bonus {} for {}", delta, kind);
            return;
        }
        self.multipliers[kind] = next;
    }

    pub fn rate(&self, kind: ResourceKind) -> f64 {
        self.rates[kind]
    }

    /// Overwrite the auto-production rate. Negative and non-finite values
    /// become zero.
    pub fn set_rate(&mut self, kind: ResourceKind, per_second: f64) {
        let rate = if per_second.is_finite() && per_second > 0.0 {
            per_second
        } else {
            if per_second != 0.0 {
                log::warn!(
                    "Rejected auto-production rate {} for {}, using 0",
                    per_second,
                    kind
                );
            }
            0.0
        };
        self.rates[kind] = rate;
    }

    /// Carried fraction for `kind`, always in `[0, 1)`.
    pub fn accumulated(&self, kind: ResourceKind) -> f64 {
        self.accumulators[kind]
    }

    /// Advance production by `delta_seconds` and return the whole units
    /// earned per kind. Kinds without a positive rate are untouched.
    /// Negative or non-finite deltas earn nothing and leave the
    /// accumulators as they were.
    pub fn advance(&mut self, delta_seconds: f64) -> ResourceTable<u64> {
        let mut earned = ResourceTable::filled(0u64);
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            log::warn!("Ignoring tick with invalid delta {}", delta_seconds);
            return earned;
        }
        for kind in ResourceKind::ALL {
            let rate = self.rates[kind];
            if rate <= 0.0 {
                continue;
            }

            let acc = self.accumulators[kind] + rate * delta_seconds;
            let whole = (acc + ACCRUAL_EPSILON).floor();
            if whole >= 1.0 {
                // `as` saturates for values past u64::MAX.
                earned[kind] = whole as u64;
                self.accumulators[kind] = (acc - whole).max(0.0);
            } else {
                self.accumulators[kind] = acc;
            }
        }
        earned
    }
}

impl Default for ProductionModel {
    fn default() -> Self {
        Self::new()
    }
}
