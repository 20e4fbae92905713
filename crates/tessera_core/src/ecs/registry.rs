//! # Component Type Slots
//!
//! Each world numbers the component types it sees in first-use order. The
//! number is the bit position in every [`ComponentMask`](super::ComponentMask)
//! and the index into the world's pool table.

use std::any::{type_name, TypeId};

use super::component::{ComponentSlot, MAX_COMPONENTS};
use crate::error::{EcsError, EcsResult};

/// Per-world mapping from component type to slot.
///
/// Slots are assigned lazily and idempotently, grow monotonically, and are
/// never reused.
#[derive(Debug, Default, Clone)]
pub struct TypeSlots {
    /// Registered types; position is the slot.
    types: Vec<(TypeId, &'static str)>,
}

impl TypeSlots {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: Vec::with_capacity(MAX_COMPONENTS),
        }
    }

    /// Slot of `T`, if it has been registered.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get<T: 'static>(&self) -> Option<ComponentSlot> {
        let id = TypeId::of::<T>();
        self.types
            .iter()
            .position(|(registered, _)| *registered == id)
            .map(|slot| ComponentSlot::new(slot as u8))
    }

    /// Slot of `T`, registering it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeSlotOverflow`] if `T` is new and all
    /// [`MAX_COMPONENTS`] slots are taken.
    #[allow(clippy::cast_possible_truncation)]
    pub fn try_slot_for<T: 'static>(&mut self) -> EcsResult<ComponentSlot> {
        if let Some(slot) = self.get::<T>() {
            return Ok(slot);
        }

        if self.types.len() >= MAX_COMPONENTS {
            return Err(EcsError::TypeSlotOverflow {
                component: type_name::<T>(),
                max: MAX_COMPONENTS,
            });
        }

        let slot = ComponentSlot::new(self.types.len() as u8);
        self.types.push((TypeId::of::<T>(), type_name::<T>()));
        tracing::debug!(component = type_name::<T>(), slot = slot.index(), "registered component type");
        Ok(slot)
    }

    /// Slot of `T`, registering it on first use.
    ///
    /// # Panics
    ///
    /// Panics if `T` is new and all [`MAX_COMPONENTS`] slots are taken.
    pub fn slot_for<T: 'static>(&mut self) -> ComponentSlot {
        match self.try_slot_for::<T>() {
            Ok(slot) => slot,
            Err(err) => panic!("{err}"),
        }
    }

    /// Type name registered at `slot`.
    #[must_use]
    pub fn name(&self, slot: ComponentSlot) -> Option<&'static str> {
        self.types.get(slot.index()).map(|(_, name)| *name)
    }

    /// Number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// No types registered yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_slots_are_idempotent_and_monotonic() {
        let mut slots = TypeSlots::new();
        assert!(slots.get::<A>().is_none());

        let a = slots.slot_for::<A>();
        let b = slots.slot_for::<B>();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(slots.slot_for::<A>(), a);
        assert_eq!(slots.get::<B>(), Some(b));
        assert_eq!(slots.len(), 2);
        assert!(slots.name(a).is_some_and(|name| name.ends_with("::A")));
    }

    #[test]
    fn test_separate_registries_are_independent() {
        let mut first = TypeSlots::new();
        let mut second = TypeSlots::new();
        first.slot_for::<A>();
        first.slot_for::<B>();

        assert_eq!(second.slot_for::<B>().index(), 0);
    }

    struct Numbered<const N: usize>;

    macro_rules! register_all {
        ($slots:expr, $($n:literal)*) => {
            $( $slots.slot_for::<Numbered<$n>>(); )*
        };
    }

    #[test]
    fn test_overflow_is_checked() {
        let mut slots = TypeSlots::new();
        register_all!(slots, 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
                             16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(slots.len(), MAX_COMPONENTS);

        let err = slots.try_slot_for::<A>().unwrap_err();
        assert!(matches!(err, EcsError::TypeSlotOverflow { max: MAX_COMPONENTS, .. }));

        // Existing types still resolve.
        assert_eq!(slots.try_slot_for::<Numbered<31>>().unwrap().index(), 31);
    }

    #[test]
    #[should_panic(expected = "component slots are taken")]
    fn test_overflow_panics_on_slot_for() {
        let mut slots = TypeSlots::new();
        register_all!(slots, 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
                             16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        slots.slot_for::<B>();
    }
}
