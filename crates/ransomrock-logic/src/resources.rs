//! Resource kinds and the fixed-size per-kind table.
//!
//! The kind set is closed: adding a resource means adding a variant here
//! and to [`ResourceKind::ALL`]. Every per-kind map in the crate is a
//! [`ResourceTable`], a plain array indexed by kind, so "for every kind"
//! is a loop over a static slice.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A tradeable or producible resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Stone,
    Coal,
    Coin,
}

impl ResourceKind {
    /// Every kind, in table order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Stone,
        ResourceKind::Coal,
        ResourceKind::Coin,
    ];

    /// Number of kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this kind in a [`ResourceTable`].
    pub const fn index(self) -> usize {
        match self {
            ResourceKind::Stone => 0,
            ResourceKind::Coal => 1,
            ResourceKind::Coin => 2,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Stone => "Stone",
            ResourceKind::Coal => "Coal",
            ResourceKind::Coin => "Coin",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`ResourceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable<T> {
    values: [T; ResourceKind::COUNT],
}

impl<T: Copy> ResourceTable<T> {
    /// Table with every kind set to `value`.
    pub const fn filled(value: T) -> Self {
        Self {
            values: [value; ResourceKind::COUNT],
        }
    }

    /// Iterate `(kind, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, T)> + '_ {
        ResourceKind::ALL
            .iter()
            .map(move |&kind| (kind, self.values[kind.index()]))
    }
}

impl<T: Copy + Default> Default for ResourceTable<T> {
    fn default() -> Self {
        Self::filled(T::default())
    }
}

impl<T> Index<ResourceKind> for ResourceTable<T> {
    type Output = T;

    fn index(&self, kind: ResourceKind) -> &T {
        &self.values[kind.index()]
    }
}

impl<T> IndexMut<ResourceKind> for ResourceTable<T> {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut T {
        &mut self.values[kind.index()]
    }
}
