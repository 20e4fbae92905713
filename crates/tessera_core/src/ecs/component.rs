//! # Component System
//!
//! Components are pure data containers with no behavior. Each component type
//! declares which storage strategy backs it; the world assigns it a slot the
//! first time the type is touched.

use super::storage::{ComponentPool, DensePool, ErasedPool, SmallPool};

/// Maximum number of distinct component types per world.
///
/// This is the width of [`ComponentMask`].
pub const MAX_COMPONENTS: usize = 32;

/// Marker trait for ECS components.
///
/// Components may own heap data; the pools drop stored values when they are
/// overwritten, removed, or their entity is destroyed.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, Dense, Small};
///
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {
///     type Storage = Dense;
/// }
///
/// // Held by a handful of entities at most.
/// struct Camera { zoom: f32 }
/// impl Component for Camera {
///     type Storage = Small;
/// }
/// ```
pub trait Component: Sized + 'static {
    /// Storage strategy backing every instance of this type.
    type Storage: StorageStrategy;
}

/// Which pool variant a component type lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One slot per possible entity index.
    Dense,
    /// A few slots shared through an index mapping.
    Small,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dense => f.write_str("dense"),
            Self::Small => f.write_str("small"),
        }
    }
}

/// Compile-time storage tag carried by [`Component::Storage`].
pub trait StorageStrategy: 'static {
    /// Runtime tag for this strategy.
    const KIND: StorageKind;

    /// Concrete pool instantiated per component type.
    type Pool<C: Component>: ComponentPool<C> + ErasedPool;
}

/// Dense storage: O(1) access, memory proportional to the entity capacity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dense;

impl StorageStrategy for Dense {
    const KIND: StorageKind = StorageKind::Dense;
    type Pool<C: Component> = DensePool<C>;
}

/// Small storage: fixed handful of slots, for components few entities hold.
#[derive(Clone, Copy, Debug, Default)]
pub struct Small;

impl StorageStrategy for Small {
    const KIND: StorageKind = StorageKind::Small;
    type Pool<C: Component> = SmallPool<C>;
}

/// Stable small integer assigned to one component type within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentSlot(u8);

impl ComponentSlot {
    /// Creates a slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` does not fit in a [`ComponentMask`].
    #[inline]
    #[must_use]
    pub const fn new(slot: u8) -> Self {
        assert!((slot as usize) < MAX_COMPONENTS, "component slot out of range");
        Self(slot)
    }

    /// Slot as an index into the pool table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << self.0
    }
}

/// Fixed-width bitset with one bit per component slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentMask(u32);

impl ComponentMask {
    /// Mask with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Sets the bit for `slot`.
    #[inline]
    pub fn insert(&mut self, slot: ComponentSlot) {
        self.0 |= slot.bit();
    }

    /// Clears the bit for `slot`.
    #[inline]
    pub fn remove(&mut self, slot: ComponentSlot) {
        self.0 &= !slot.bit();
    }

    /// Checks the bit for `slot`.
    #[inline]
    #[must_use]
    pub const fn contains(self, slot: ComponentSlot) -> bool {
        self.0 & slot.bit() != 0
    }

    /// Checks that every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// No bits set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of bits set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the set slots in ascending order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(self) -> impl Iterator<Item = ComponentSlot> {
        (0..MAX_COMPONENTS as u8)
            .map(ComponentSlot)
            .filter(move |slot| self.contains(*slot))
    }
}

impl FromIterator<ComponentSlot> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentSlot>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for slot in iter {
            mask.insert(slot);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_insert_remove() {
        let mut mask = ComponentMask::EMPTY;
        let slot = ComponentSlot::new(5);
        assert!(!mask.contains(slot));

        mask.insert(slot);
        assert!(mask.contains(slot));
        assert_eq!(mask.len(), 1);

        mask.remove(slot);
        assert!(!mask.contains(slot));
        assert!(mask.is_empty());
    }

    #[test]
    fn test_mask_superset() {
        let required: ComponentMask = [ComponentSlot::new(0), ComponentSlot::new(31)]
            .into_iter()
            .collect();
        let mut held = required;
        held.insert(ComponentSlot::new(7));

        assert!(held.contains_all(required));
        assert!(!required.contains_all(held));
        assert!(held.contains_all(ComponentMask::EMPTY));
        assert!(ComponentMask::EMPTY.contains_all(ComponentMask::EMPTY));
    }

    #[test]
    fn test_mask_iter_ascending() {
        let mask: ComponentMask = [9, 2, 31]
            .into_iter()
            .map(ComponentSlot::new)
            .collect();
        let slots: Vec<usize> = mask.iter().map(ComponentSlot::index).collect();
        assert_eq!(slots, vec![2, 9, 31]);
    }

    #[test]
    #[should_panic(expected = "component slot out of range")]
    fn test_slot_out_of_range() {
        let _ = ComponentSlot::new(32);
    }
}
