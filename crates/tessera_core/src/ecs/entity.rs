//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the entity table and the dense pools
//! - A generation counter for safe reuse

use super::component::ComponentMask;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the entity table
/// - Upper 32 bits: Generation counter for detecting stale references
///
/// An index of `u32::MAX` is reserved as the invalid sentinel. Destroyed
/// entity records carry the sentinel index so they never match a live handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Reserved index marking an invalid handle.
    pub const INVALID_INDEX: u32 = u32::MAX;

    /// The invalid handle returned when the entity table is full.
    pub const INVALID: Self = Self::new(Self::INVALID_INDEX, 0);

    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The index into the entity table (0 to 2^32-2)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks that the encoded index is not the sentinel.
    ///
    /// This says nothing about whether the entity is still alive in a given
    /// world; use [`World::is_alive`](crate::World::is_alive) for that.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.index() != Self::INVALID_INDEX
    }

    /// Raw 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds an ID from its raw 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}v{}", self.index(), self.generation())
        } else {
            write!(f, "invalid(v{})", self.generation())
        }
    }
}

/// One row of the entity table.
///
/// A live record holds the entity's current handle. A destroyed record holds
/// a handle with the sentinel index and the generation the slot will be
/// reissued with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityRecord {
    /// Current handle for this slot.
    pub id: EntityId,
    /// Bitmask of attached component slots.
    pub component_mask: ComponentMask,
}

impl EntityRecord {
    /// Creates a live record with no components.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            component_mask: ComponentMask::EMPTY,
        }
    }

    /// Whether this slot currently holds a live entity.
    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.id.is_valid()
    }

    /// Whether `id` names the entity currently stored in this slot.
    #[inline]
    #[must_use]
    pub fn matches(&self, id: EntityId) -> bool {
        self.is_alive() && self.id == id
    }

    /// Marks the record destroyed: bumps the generation and clears the mask.
    #[inline]
    pub fn kill(&mut self) {
        let generation = self.id.generation().wrapping_add(1);
        self.id = EntityId::new(EntityId::INVALID_INDEX, generation);
        self.component_mask = ComponentMask::EMPTY;
    }

    /// Brings a destroyed record back at `index`, keeping its generation.
    #[inline]
    pub fn revive(&mut self, index: u32) -> EntityId {
        self.id = EntityId::new(index, self.id.generation());
        self.component_mask = ComponentMask::EMPTY;
        self.id
    }
}
