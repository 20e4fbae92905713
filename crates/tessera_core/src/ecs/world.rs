//! # ECS World
//!
//! The central container for all entities and components.
//! The entity table is reserved to full capacity at creation so it never
//! reallocates; component pools are created the first time their type is
//! attached to an entity.

use std::any::type_name;

use super::builder::EntityBuilder;
use super::component::{Component, ComponentMask, ComponentSlot, StorageKind, StorageStrategy};
use super::entity::{EntityId, EntityRecord};
use super::registry::TypeSlots;
use super::storage::{ComponentPool, ErasedPool, SmallPool};
use super::view::{Query, View, ViewCursor};
use crate::config::WorldConfig;
use crate::error::{EcsError, EcsResult};

/// Concrete pool type backing component `C`.
type PoolOf<C> = <<C as Component>::Storage as StorageStrategy>::Pool<C>;

/// The ECS World - container for all entities and their components.
///
/// # Capacity
///
/// The world has a fixed entity capacity set at creation. Once every slot is
/// live, [`spawn`](Self::spawn) returns [`EntityId::INVALID`] until an entity
/// is destroyed.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, Dense, World};
///
/// struct Position(f32, f32);
/// impl Component for Position {
///     type Storage = Dense;
/// }
///
/// let mut world = World::new(1_000);
/// let entity = world.create_entity().with(Position(1.0, 2.0)).id();
///
/// assert_eq!(world.get_component::<Position>(entity).0, 1.0);
/// assert_eq!(world.view::<(Position,)>().entities().collect::<Vec<_>>(), vec![entity]);
/// ```
pub struct World {
    /// Entity table, reserved to `capacity` up front.
    entities: Vec<EntityRecord>,
    /// Destroyed indices awaiting reuse (LIFO).
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Maximum capacity.
    capacity: usize,
    /// Component type to slot assignment.
    slots: TypeSlots,
    /// One pool per registered slot, indexed by slot.
    pools: Vec<Box<dyn ErasedPool>>,
}

impl World {
    /// Creates a new world with the specified entity capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of simultaneously live entities
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or does not fit below the invalid-index
    /// sentinel.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        match Self::from_config(WorldConfig::with_max_entities(capacity)) {
            Ok(world) => world,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a world from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the configuration is invalid.
    pub fn from_config(config: WorldConfig) -> EcsResult<Self> {
        config.validate()?;
        let capacity = config.max_entities;
        tracing::debug!(capacity, "creating world");

        Ok(Self {
            entities: Vec::with_capacity(capacity),
            free_indices: Vec::with_capacity(capacity),
            alive_count: 0,
            capacity,
            slots: TypeSlots::new(),
            pools: Vec::new(),
        })
    }

    /// Returns the maximum capacity of this world.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Number of entity table rows ever used, live or destroyed.
    #[inline]
    #[must_use]
    pub fn table_len(&self) -> usize {
        self.entities.len()
    }

    /// The entity table.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// The component type slot registry.
    #[inline]
    #[must_use]
    pub fn type_slots(&self) -> &TypeSlots {
        &self.slots
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Spawns a new entity, returning its ID.
    ///
    /// Destroyed indices are reused first (most recently destroyed first),
    /// keeping the generation their destruction assigned. Otherwise a new row
    /// is appended.
    ///
    /// # Returns
    ///
    /// The new entity's ID, or [`EntityId::INVALID`] if capacity is reached.
    pub fn spawn(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop() {
            let id = self.entities[index as usize].revive(index);
            self.alive_count += 1;
            tracing::trace!(entity = %id, "recycled entity");
            return id;
        }

        if self.entities.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "entity capacity exhausted");
            return EntityId::INVALID;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId::new(self.entities.len() as u32, 0);
        self.entities.push(EntityRecord::new(id));
        self.alive_count += 1;
        tracing::trace!(entity = %id, "spawned entity");
        id
    }

    /// Spawns a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if every slot is live.
    pub fn try_spawn(&mut self) -> EcsResult<EntityId> {
        let id = self.spawn();
        if id.is_valid() {
            Ok(id)
        } else {
            Err(EcsError::CapacityExceeded {
                capacity: self.capacity,
            })
        }
    }

    /// Spawns a new entity and returns a builder for attaching components.
    ///
    /// If the world is full the builder is invalid and its
    /// [`with`](EntityBuilder::with) calls do nothing.
    pub fn create_entity(&mut self) -> EntityBuilder<'_> {
        let id = self.spawn();
        EntityBuilder::new(self, id)
    }

    /// Destroys an entity, dropping its components and freeing its slot.
    ///
    /// The slot's generation is bumped so every existing handle to the entity
    /// becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if `id` is not a live entity; the
    /// world is left untouched.
    pub fn destroy_entity(&mut self, id: EntityId) -> EcsResult<()> {
        let index = self.live_index(id, "destroy_entity")?;
        let record = &mut self.entities[index as usize];

        for slot in record.component_mask.iter() {
            self.pools[slot.index()].clear(index);
        }
        record.kill();
        self.free_indices.push(index);
        self.alive_count -= 1;

        tracing::trace!(entity = %id, "destroyed entity");
        Ok(())
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities
            .get(id.index() as usize)
            .is_some_and(|record| record.matches(id))
    }

    /// Component mask of a live entity.
    #[must_use]
    pub fn mask_of(&self, id: EntityId) -> Option<ComponentMask> {
        self.entities
            .get(id.index() as usize)
            .filter(|record| record.matches(id))
            .map(|record| record.component_mask)
    }

    /// Iterates over all alive entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .filter(|record| record.is_alive())
            .map(|record| record.id)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Registers `C`, creating its pool, and returns its slot.
    ///
    /// Attaching a component registers its type implicitly; this is only
    /// needed to pin slot order up front.
    ///
    /// # Panics
    ///
    /// Panics if all component slots are taken.
    pub fn register<C: Component>(&mut self) -> ComponentSlot {
        let slot = self.slots.slot_for::<C>();
        if slot.index() == self.pools.len() {
            let pool = <PoolOf<C> as ComponentPool<C>>::with_entity_capacity(self.capacity);
            self.pools.push(Box::new(pool));
            let storage = <C::Storage as StorageStrategy>::KIND;
            tracing::debug!(
                component = type_name::<C>(),
                slot = slot.index(),
                storage = %storage,
                "created component pool"
            );
        }
        slot
    }

    /// Slot assigned to `C`, if it has been registered.
    #[inline]
    #[must_use]
    pub fn slot_of<C: Component>(&self) -> Option<ComponentSlot> {
        self.slots.get::<C>()
    }

    /// Attaches a component to an entity, replacing (and dropping) any
    /// previous value of the same type.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if `id` is not a live entity.
    ///
    /// # Panics
    ///
    /// Panics if `C` uses small storage and its pool has no slot left for
    /// this entity, or if all component slots are taken.
    pub fn add_component<C: Component>(&mut self, id: EntityId, component: C) -> EcsResult<&mut C> {
        let index = self.live_index(id, "add_component")?;
        let slot = self.register::<C>();

        let stored = match typed_pool_mut::<C>(&mut self.pools, slot).insert(index, component) {
            Ok(stored) => stored,
            Err(err) => panic!("add_component on {id}: {err}"),
        };
        self.entities[index as usize].component_mask.insert(slot);
        Ok(stored)
    }

    /// Detaches a component from an entity and returns it.
    ///
    /// Returns `Ok(None)` if the entity is alive but does not hold `C`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if `id` is not a live entity.
    pub fn remove_component<C: Component>(&mut self, id: EntityId) -> EcsResult<Option<C>> {
        let index = self.live_index(id, "remove_component")?;
        let Some(slot) = self.slots.get::<C>() else {
            return Ok(None);
        };

        let mask = &mut self.entities[index as usize].component_mask;
        if !mask.contains(slot) {
            return Ok(None);
        }
        mask.remove(slot);
        Ok(typed_pool_mut::<C>(&mut self.pools, slot).take(index))
    }

    /// Checks whether a live entity holds `C`.
    #[must_use]
    pub fn has_component<C: Component>(&self, id: EntityId) -> bool {
        match (self.mask_of(id), self.slots.get::<C>()) {
            (Some(mask), Some(slot)) => mask.contains(slot),
            _ => false,
        }
    }

    /// Gets a component of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if `id` is not a live entity and
    /// [`EcsError::MissingComponent`] if it does not hold `C`.
    pub fn try_get_component<C: Component>(&self, id: EntityId) -> EcsResult<&C> {
        let (index, slot) = self.component_location::<C>(id)?;
        typed_pool::<C>(&self.pools, slot)
            .get(index)
            .ok_or_else(|| missing::<C>(id))
    }

    /// Gets a component of a live entity mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::StaleEntity`] if `id` is not a live entity and
    /// [`EcsError::MissingComponent`] if it does not hold `C`.
    pub fn try_get_component_mut<C: Component>(&mut self, id: EntityId) -> EcsResult<&mut C> {
        let (index, slot) = self.component_location::<C>(id)?;
        typed_pool_mut::<C>(&mut self.pools, slot)
            .get_mut(index)
            .ok_or_else(|| missing::<C>(id))
    }

    /// Gets a component of an entity.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or the entity does not hold `C`. Both are
    /// caller bugs; use [`try_get_component`](Self::try_get_component) when
    /// absence is expected.
    #[must_use]
    pub fn get_component<C: Component>(&self, id: EntityId) -> &C {
        match self.try_get_component(id) {
            Ok(component) => component,
            Err(err) => panic!("get_component: {err}"),
        }
    }

    /// Gets a component of an entity mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or the entity does not hold `C`.
    #[must_use]
    pub fn get_component_mut<C: Component>(&mut self, id: EntityId) -> &mut C {
        match self.try_get_component_mut(id) {
            Ok(component) => component,
            Err(err) => panic!("get_component_mut: {err}"),
        }
    }

    /// Gets several components of an entity at once.
    ///
    /// ```rust,ignore
    /// let (position, health) = world.get_components::<(Position, Health)>(entity);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or the entity lacks any of the components.
    #[must_use]
    pub fn get_components<Q: Query>(&self, id: EntityId) -> Q::Item<'_> {
        match Q::fetch(self, id) {
            Some(components) => components,
            None => panic!(
                "get_components: entity {id} is stale or lacks one of {}",
                type_name::<Q>()
            ),
        }
    }

    /// Number of `C` values currently stored.
    #[must_use]
    pub fn component_count<C: Component>(&self) -> usize {
        self.slots
            .get::<C>()
            .map_or(0, |slot| self.pools[slot.index()].occupied())
    }

    /// Storage strategy of a registered component type.
    #[must_use]
    pub fn storage_kind<C: Component>(&self) -> Option<StorageKind> {
        self.slots
            .get::<C>()
            .map(|slot| self.pools[slot.index()].kind())
    }

    /// Entity indices mapped into the small pool of `C`.
    ///
    /// Returns `None` if `C` is unregistered or uses dense storage.
    #[must_use]
    pub fn small_pool_members<C: Component>(&self) -> Option<&[u32]> {
        let slot = self.slots.get::<C>()?;
        self.pools[slot.index()]
            .as_any()
            .downcast_ref::<SmallPool<C>>()
            .map(SmallPool::active_entities)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Creates a view over the entities holding every component in `Q`.
    #[must_use]
    pub fn view<Q: Query>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Creates a detached cursor over the entities holding every component in
    /// `Q`, allowing the world to be mutated between steps.
    #[must_use]
    pub fn cursor<Q: Query>(&self) -> ViewCursor {
        ViewCursor::new::<Q>(self)
    }

    /// Visits every live entity holding `C` with mutable access to it.
    pub fn for_each_mut<C, F>(&mut self, mut f: F)
    where
        C: Component,
        F: FnMut(EntityId, &mut C),
    {
        let Some(slot) = self.slots.get::<C>() else {
            return;
        };
        let pool = typed_pool_mut::<C>(&mut self.pools, slot);

        for record in &self.entities {
            if record.is_alive() && record.component_mask.contains(slot) {
                if let Some(component) = pool.get_mut(record.id.index()) {
                    f(record.id, component);
                }
            }
        }
    }

    /// Visits every live entity holding both `C` and `R`, with mutable access
    /// to `C` and shared access to `R`.
    ///
    /// # Panics
    ///
    /// Panics if `C` and `R` are the same type.
    pub fn for_each_mut_with<C, R, F>(&mut self, mut f: F)
    where
        C: Component,
        R: Component,
        F: FnMut(EntityId, &mut C, &R),
    {
        let (Some(write), Some(read)) = (self.slots.get::<C>(), self.slots.get::<R>()) else {
            return;
        };
        assert_ne!(write, read, "for_each_mut_with needs two distinct component types");

        let (write_pool, read_pool) = split_pools(&mut self.pools, write, read);
        let write_pool = downcast_mut::<C>(write_pool);
        let read_pool = downcast::<R>(read_pool);

        let required: ComponentMask = [write, read].into_iter().collect();
        for record in &self.entities {
            if !record.is_alive() || !record.component_mask.contains_all(required) {
                continue;
            }
            let index = record.id.index();
            if let (Some(c), Some(r)) = (write_pool.get_mut(index), read_pool.get(index)) {
                f(record.id, c, r);
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Index of a live entity, or a logged stale-handle error.
    fn live_index(&self, id: EntityId, operation: &'static str) -> EcsResult<u32> {
        if self.is_alive(id) {
            Ok(id.index())
        } else {
            tracing::warn!(entity = %id, operation, "rejected stale entity handle");
            Err(EcsError::StaleEntity(id))
        }
    }

    fn component_location<C: Component>(&self, id: EntityId) -> EcsResult<(u32, ComponentSlot)> {
        let mask = self.mask_of(id).ok_or(EcsError::StaleEntity(id))?;
        match self.slots.get::<C>() {
            Some(slot) if mask.contains(slot) => Ok((id.index(), slot)),
            _ => Err(missing::<C>(id)),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default().max_entities)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("capacity", &self.capacity)
            .field("alive_count", &self.alive_count)
            .field("table_len", &self.entities.len())
            .field("free_indices", &self.free_indices.len())
            .field("component_types", &self.slots.len())
            .finish_non_exhaustive()
    }
}

fn missing<C>(entity: EntityId) -> EcsError {
    EcsError::MissingComponent {
        entity,
        component: type_name::<C>(),
    }
}

// A slot is only ever registered through `World::register::<C>`, which
// creates a `PoolOf<C>` at that slot, so these downcasts cannot fail.

fn downcast<C: Component>(pool: &dyn ErasedPool) -> &PoolOf<C> {
    match pool.as_any().downcast_ref::<PoolOf<C>>() {
        Some(pool) => pool,
        None => panic!("pool of {} holds {}", type_name::<C>(), pool.component_name()),
    }
}

fn downcast_mut<C: Component>(pool: &mut dyn ErasedPool) -> &mut PoolOf<C> {
    let held = pool.component_name();
    match pool.as_any_mut().downcast_mut::<PoolOf<C>>() {
        Some(pool) => pool,
        None => panic!("pool of {} holds {held}", type_name::<C>()),
    }
}

fn typed_pool<C: Component>(pools: &[Box<dyn ErasedPool>], slot: ComponentSlot) -> &PoolOf<C> {
    downcast::<C>(&*pools[slot.index()])
}

fn typed_pool_mut<C: Component>(
    pools: &mut [Box<dyn ErasedPool>],
    slot: ComponentSlot,
) -> &mut PoolOf<C> {
    downcast_mut::<C>(&mut *pools[slot.index()])
}

/// Borrows two distinct pools, the first mutably.
fn split_pools(
    pools: &mut [Box<dyn ErasedPool>],
    write: ComponentSlot,
    read: ComponentSlot,
) -> (&mut dyn ErasedPool, &dyn ErasedPool) {
    let (w, r) = (write.index(), read.index());
    if w < r {
        let (head, tail) = pools.split_at_mut(r);
        (&mut *head[w], &*tail[0])
    } else {
        let (head, tail) = pools.split_at_mut(w);
        (&mut *tail[0], &*head[r])
    }
}
