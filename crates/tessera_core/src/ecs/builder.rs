//! # Entity Builder
//!
//! Chained component attachment for freshly spawned entities.

use super::component::Component;
use super::entity::EntityId;
use super::world::World;

/// Builder returned by [`World::create_entity`].
///
/// If the world was full when the builder was created, its handle is
/// [`EntityId::INVALID`] and every [`with`](Self::with) call is a no-op.
///
/// ```rust
/// use tessera_core::{Component, Dense, World};
///
/// #[derive(Default)]
/// struct Name(String);
/// impl Component for Name {
///     type Storage = Dense;
/// }
/// struct Health(u32);
/// impl Component for Health {
///     type Storage = Dense;
/// }
///
/// let mut world = World::new(1);
/// let player = world
///     .create_entity()
///     .with(Name("Frappe".into()))
///     .with(Health(100))
///     .id();
/// assert!(world.is_alive(player));
///
/// // The world is full: the builder is invalid and chaining does nothing.
/// let extra = world.create_entity().with_default::<Name>();
/// assert!(!extra.is_valid());
/// ```
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> EntityBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, id: EntityId) -> Self {
        Self { world, id }
    }

    /// Attaches `component` to the entity being built.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`World::add_component`].
    pub fn with<C: Component>(mut self, component: C) -> Self {
        if self.id.is_valid() {
            // A freshly spawned handle is always live, so this cannot be stale.
            if let Err(err) = self.world.add_component(self.id, component) {
                tracing::warn!(entity = %self.id, %err, "builder failed to attach component");
            }
        }
        self
    }

    /// Attaches a default-constructed `C`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`World::add_component`].
    pub fn with_default<C: Component + Default>(self) -> Self {
        if self.id.is_valid() {
            return self.with(C::default());
        }
        self
    }

    /// Handle of the entity being built; invalid if the world was full.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether an entity was actually created.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// Finishes building and returns the handle.
    #[inline]
    #[must_use]
    pub fn build(self) -> EntityId {
        self.id
    }

    /// The world the entity lives in.
    pub fn world(&mut self) -> &mut World {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{Dense, Small};

    #[derive(Debug, Default, PartialEq)]
    struct Health(u32);
    impl Component for Health {
        type Storage = Dense;
    }

    #[derive(Debug, Default, PartialEq)]
    struct Player;
    impl Component for Player {
        type Storage = Small;
    }

    #[test]
    fn test_builder_attaches_components() {
        let mut world = World::new(4);
        let id = world.create_entity().with(Health(100)).with_default::<Player>().build();

        assert_eq!(world.get_component::<Health>(id), &Health(100));
        assert!(world.has_component::<Player>(id));
    }

    #[test]
    fn test_invalid_builder_is_noop() {
        let mut world = World::new(1);
        let first = world.create_entity().with(Health(1)).id();

        let builder = world.create_entity().with(Health(2)).with_default::<Player>();
        assert!(!builder.is_valid());
        assert_eq!(builder.id(), EntityId::INVALID);

        assert_eq!(world.alive_count(), 1);
        assert_eq!(world.component_count::<Health>(), 1);
        assert_eq!(world.get_component::<Health>(first), &Health(1));
        assert_eq!(world.component_count::<Player>(), 0);
    }
}
