//! # Component Storage
//!
//! Pools hold every instance of one component type across all entities.
//! Two strategies are available:
//!
//! - [`DensePool`]: one slot per entity index, pre-allocated at creation.
//!   Access is O(1) via entity index.
//! - [`SmallPool`]: a handful of slots plus an entity index mapping that is
//!   searched linearly. The slot count is a hard ceiling.
//!
//! Both are append-only: a physical slot, once handed to an entity index,
//! stays with that index. Clearing a slot drops the stored value but keeps
//! the slot.

use std::any::{type_name, Any};

use super::component::{Component, StorageKind};
use crate::error::{EcsError, EcsResult};

/// Number of physical slots in a [`SmallPool`].
pub const SMALL_POOL_CAPACITY: usize = 8;

/// Shared capability of both pool strategies.
pub trait ComponentPool<C>: 'static {
    /// Builds an empty pool for a world of `max_entities` entities.
    fn with_entity_capacity(max_entities: usize) -> Self
    where
        Self: Sized;

    /// Returns the slot for `index`, reserving one if the index has none yet.
    ///
    /// # Errors
    ///
    /// Fails when no slot can address `index`.
    fn acquire(&mut self, index: u32) -> EcsResult<&mut Option<C>>;

    /// Looks up the slot for `index` without reserving.
    fn slot(&self, index: u32) -> Option<&Option<C>>;

    /// Looks up the slot for `index` mutably without reserving.
    fn slot_mut(&mut self, index: u32) -> Option<&mut Option<C>>;

    /// Stores `value` for `index`, dropping whatever the slot held.
    ///
    /// # Errors
    ///
    /// Fails when no slot can address `index`.
    fn insert(&mut self, index: u32, value: C) -> EcsResult<&mut C> {
        let slot = self.acquire(index)?;
        Ok(slot.insert(value))
    }

    /// Gets the value stored for `index`.
    fn get(&self, index: u32) -> Option<&C> {
        self.slot(index)?.as_ref()
    }

    /// Gets the value stored for `index` mutably.
    fn get_mut(&mut self, index: u32) -> Option<&mut C> {
        self.slot_mut(index)?.as_mut()
    }

    /// Takes the value out of the slot for `index`, leaving the slot reserved.
    fn take(&mut self, index: u32) -> Option<C> {
        self.slot_mut(index)?.take()
    }
}

/// Type-erased pool as stored in the world's pool table.
pub trait ErasedPool: Any {
    /// Strategy of the underlying pool.
    fn kind(&self) -> StorageKind;

    /// Type name of the pooled component.
    fn component_name(&self) -> &'static str;

    /// Drops the value stored for `index`, if any.
    fn clear(&mut self, index: u32);

    /// Number of slots currently holding a value.
    fn occupied(&self) -> usize;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// =============================================================================
// Dense
// =============================================================================

/// Pre-allocated storage with one slot per entity index.
///
/// # Example
///
/// ```rust
/// use tessera_core::{ComponentPool, Dense, DensePool, Component};
///
/// struct Health(u32);
/// impl Component for Health {
///     type Storage = Dense;
/// }
///
/// let mut pool: DensePool<Health> = DensePool::with_entity_capacity(16);
/// pool.insert(3, Health(100)).unwrap();
/// assert_eq!(pool.get(3).map(|h| h.0), Some(100));
/// ```
pub struct DensePool<C> {
    slots: Box<[Option<C>]>,
}

impl<C> DensePool<C> {
    /// Creates a pool with `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        // Pre-allocate all slots upfront
        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice();
        Self { slots }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterates over occupied slots with their entity indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u32, &C)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index as u32, value)))
    }
}

impl<C: Component> ComponentPool<C> for DensePool<C> {
    fn with_entity_capacity(max_entities: usize) -> Self {
        Self::new(max_entities)
    }

    #[inline]
    fn acquire(&mut self, index: u32) -> EcsResult<&mut Option<C>> {
        let capacity = self.slots.len();
        self.slots
            .get_mut(index as usize)
            .ok_or(EcsError::IndexOutOfBounds { index, capacity })
    }

    #[inline]
    fn slot(&self, index: u32) -> Option<&Option<C>> {
        self.slots.get(index as usize)
    }

    #[inline]
    fn slot_mut(&mut self, index: u32) -> Option<&mut Option<C>> {
        self.slots.get_mut(index as usize)
    }
}

impl<C: Component> ErasedPool for DensePool<C> {
    fn kind(&self) -> StorageKind {
        StorageKind::Dense
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn clear(&mut self, index: u32) {
        drop(self.take(index));
    }

    fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Small
// =============================================================================

/// Bounded sparse storage for components that very few entities hold.
///
/// Physical slot `n` belongs to the entity index at position `n` of the
/// mapping. A mapping entry is appended the first time an entity index
/// acquires a slot and is never removed, so a recycled entity index reuses
/// the slot of its predecessor.
pub struct SmallPool<C> {
    /// Entity index owning each physical slot, in slot order.
    index_mapping: Vec<u32>,
    slots: Box<[Option<C>]>,
}

impl<C> SmallPool<C> {
    /// Creates a pool with [`SMALL_POOL_CAPACITY`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SMALL_POOL_CAPACITY)
    }

    /// Creates a pool with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        Self {
            index_mapping: Vec::with_capacity(capacity),
            slots: (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice(),
        }
    }

    /// Fixed number of physical slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Entity indices that have been mapped to a slot, in slot order.
    ///
    /// This includes indices whose value has since been cleared.
    #[inline]
    #[must_use]
    pub fn active_entities(&self) -> &[u32] {
        &self.index_mapping
    }

    #[inline]
    fn position(&self, index: u32) -> Option<usize> {
        self.index_mapping.iter().position(|&mapped| mapped == index)
    }
}

impl<C> Default for SmallPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentPool<C> for SmallPool<C> {
    fn with_entity_capacity(_max_entities: usize) -> Self {
        Self::new()
    }

    fn acquire(&mut self, index: u32) -> EcsResult<&mut Option<C>> {
        let position = match self.position(index) {
            Some(position) => position,
            None => {
                let position = self.index_mapping.len();
                if position >= self.slots.len() {
                    return Err(EcsError::SmallPoolOverflow {
                        component: type_name::<C>(),
                        capacity: self.slots.len(),
                        index,
                    });
                }
                self.index_mapping.push(index);
                position
            }
        };
        Ok(&mut self.slots[position])
    }

    #[inline]
    fn slot(&self, index: u32) -> Option<&Option<C>> {
        self.position(index).map(|position| &self.slots[position])
    }

    #[inline]
    fn slot_mut(&mut self, index: u32) -> Option<&mut Option<C>> {
        self.position(index).map(|position| &mut self.slots[position])
    }
}

impl<C: Component> ErasedPool for SmallPool<C> {
    fn kind(&self) -> StorageKind {
        StorageKind::Small
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn clear(&mut self, index: u32) {
        drop(self.take(index));
    }

    fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{Dense, Small};
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Score(u32);
    impl Component for Score {
        type Storage = Dense;
    }

    #[derive(Debug, PartialEq)]
    struct Tag(&'static str);
    impl Component for Tag {
        type Storage = Small;
    }

    struct Tracked(#[allow(dead_code)] Rc<()>);
    impl Component for Tracked {
        type Storage = Dense;
    }

    #[test]
    fn test_dense_get_set() {
        let mut pool: DensePool<Score> = DensePool::new(100);
        assert_eq!(pool.capacity(), 100);

        pool.insert(50, Score(7)).unwrap();
        assert_eq!(pool.get(50), Some(&Score(7)));
        assert_eq!(pool.get(49), None);
        assert_eq!(pool.occupied(), 1);
    }

    #[test]
    fn test_dense_bounds() {
        let mut pool: DensePool<Score> = DensePool::new(100);
        assert!(pool.slot(99).is_some());
        assert!(pool.slot(100).is_none());
        assert_eq!(
            pool.acquire(100).unwrap_err(),
            EcsError::IndexOutOfBounds { index: 100, capacity: 100 }
        );
    }

    #[test]
    fn test_dense_iter_skips_empty() {
        let mut pool: DensePool<Score> = DensePool::new(10);
        pool.insert(8, Score(2)).unwrap();
        pool.insert(1, Score(1)).unwrap();
        let seen: Vec<(u32, u32)> = pool.iter().map(|(i, s)| (i, s.0)).collect();
        assert_eq!(seen, vec![(1, 1), (8, 2)]);
    }

    #[test]
    fn test_overwrite_and_clear_drop_values() {
        let marker = Rc::new(());
        let mut pool: DensePool<Tracked> = DensePool::new(4);

        pool.insert(0, Tracked(Rc::clone(&marker))).unwrap();
        assert_eq!(Rc::strong_count(&marker), 2);

        // Overwriting drops the previous value.
        pool.insert(0, Tracked(Rc::clone(&marker))).unwrap();
        assert_eq!(Rc::strong_count(&marker), 2);

        ErasedPool::clear(&mut pool, 0);
        assert_eq!(Rc::strong_count(&marker), 1);
        assert!(pool.slot(0).is_some(), "slot stays reserved");
    }

    #[test]
    fn test_small_hit_reuses_slot() {
        let mut pool: SmallPool<Tag> = SmallPool::new();
        pool.insert(40, Tag("a")).unwrap();
        pool.insert(40, Tag("b")).unwrap();

        assert_eq!(pool.active_entities(), &[40]);
        assert_eq!(pool.get(40), Some(&Tag("b")));
    }

    #[test]
    fn test_small_lookup_does_not_reserve() {
        let mut pool: SmallPool<Tag> = SmallPool::new();
        assert!(pool.slot(3).is_none());
        assert!(pool.get_mut(3).is_none());
        assert!(pool.active_entities().is_empty());
    }

    #[test]
    fn test_small_overflow_is_deterministic() {
        let mut pool: SmallPool<Tag> = SmallPool::new();
        for index in 0..SMALL_POOL_CAPACITY as u32 {
            pool.insert(index * 10, Tag("x")).unwrap();
        }
        assert_eq!(pool.active_entities().len(), SMALL_POOL_CAPACITY);

        let err = pool.insert(999, Tag("y")).unwrap_err();
        assert!(matches!(
            err,
            EcsError::SmallPoolOverflow { capacity: SMALL_POOL_CAPACITY, index: 999, .. }
        ));

        // Already-mapped indices keep working when full.
        assert!(pool.insert(0, Tag("z")).is_ok());
    }

    #[test]
    fn test_small_clear_keeps_mapping() {
        let mut pool: SmallPool<Tag> = SmallPool::with_capacity(2);
        pool.insert(5, Tag("a")).unwrap();
        ErasedPool::clear(&mut pool, 5);

        assert_eq!(pool.get(5), None);
        assert_eq!(pool.active_entities(), &[5]);
        assert_eq!(pool.occupied(), 0);
    }

    #[test]
    fn test_erased_downcast() {
        let pool: Box<dyn ErasedPool> = Box::new(SmallPool::<Tag>::new());
        assert_eq!(pool.kind(), StorageKind::Small);
        assert!(pool.component_name().ends_with("Tag"));
        assert!(pool.as_any().downcast_ref::<SmallPool<Tag>>().is_some());
        assert!(pool.as_any().downcast_ref::<DensePool<Tag>>().is_none());
    }
}
