//! Click collection: how many units one click on a resource is worth.

use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// A clickable resource node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickSource {
    pub kind: ResourceKind,
    pub amount_per_click: u64,
}

/// Units granted by one click: `amount_per_click * multiplier`, rounded
/// half to even. Non-positive or non-finite products yield 0.
pub fn click_yield(amount_per_click: u64, multiplier: f64) -> u64 {
    let raw = amount_per_click as f64 * multiplier;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round_ties_even() as u64
}
