//! Layer masks - category filtering for scan rays.
//!
//! Every scannable surface belongs to one or more layers; a scan only
//! registers hits on surfaces whose layers intersect its mask.

use serde::{Deserialize, Serialize};

/// Bitmask of scannable categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Static level geometry (walls, floors, cave rock).
    pub const GEOMETRY: Self = Self(1 << 0);
    /// Movable props and debris.
    pub const PROPS: Self = Self(1 << 1);
    /// Creatures. Scanning them is how you learn you should not have.
    pub const CREATURES: Self = Self(1 << 2);

    /// Builds a mask from a single layer index (0..32).
    #[must_use]
    pub const fn from_layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Returns true if any layer is shared between the two masks.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
