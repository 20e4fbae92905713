//! # Views
//!
//! A view selects the live entities whose component mask contains every
//! component of a query. Iteration scans the entity table from index 0 and
//! yields handles in ascending index order.
//!
//! ```text
//! table:   [A: X|Y]  [B: Y]  [dead]  [C: X]
//! view<X>:  A                         C
//! view<()>: A         B               C
//! ```
//!
//! [`View`] borrows the world for its whole lifetime. When systems need to
//! destroy entities while walking a query, use [`ViewCursor`], which only
//! remembers its position and borrows the world one step at a time.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::component::{Component, ComponentMask};
use super::entity::{EntityId, EntityRecord};
use super::registry::TypeSlots;
use super::world::World;

/// A set of component types that can be queried together.
///
/// Implemented for `()` (every live entity) and tuples of up to eight
/// [`Component`] types.
pub trait Query: 'static {
    /// Shared references to the queried components of one entity.
    type Item<'w>;

    /// Required mask, or `None` if some type was never registered (in which
    /// case no entity can match).
    fn mask(slots: &TypeSlots) -> Option<ComponentMask>;

    /// Resolves the components of `id`, or `None` if it lacks any of them.
    fn fetch(world: &World, id: EntityId) -> Option<Self::Item<'_>>;
}

impl Query for () {
    type Item<'w> = ();

    fn mask(_slots: &TypeSlots) -> Option<ComponentMask> {
        Some(ComponentMask::EMPTY)
    }

    fn fetch(world: &World, id: EntityId) -> Option<Self::Item<'_>> {
        world.is_alive(id).then_some(())
    }
}

macro_rules! impl_query {
    ($($t:ident),+) => {
        impl<$($t: Component),+> Query for ($($t,)+) {
            type Item<'w> = ($(&'w $t,)+);

            fn mask(slots: &TypeSlots) -> Option<ComponentMask> {
                let mut mask = ComponentMask::EMPTY;
                $( mask.insert(slots.get::<$t>()?); )+
                Some(mask)
            }

            fn fetch(world: &World, id: EntityId) -> Option<Self::Item<'_>> {
                Some(($(world.try_get_component::<$t>(id).ok()?,)+))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);
impl_query!(A, B, C, D, E, F);
impl_query!(A, B, C, D, E, F, G);
impl_query!(A, B, C, D, E, F, G, H);

#[inline]
fn matches(record: &EntityRecord, mask: ComponentMask) -> bool {
    record.is_alive() && record.component_mask.contains_all(mask)
}

/// Query over a borrowed world.
///
/// The mask is computed once at construction. Restart iteration by calling
/// [`entities`](Self::entities) again or building a new view.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, Dense, View, World};
///
/// struct Health(u32);
/// impl Component for Health {
///     type Storage = Dense;
/// }
///
/// let mut world = World::new(16);
/// world.create_entity().with(Health(10));
/// world.create_entity();
/// world.create_entity().with(Health(30));
///
/// let total: u32 = View::<(Health,)>::new(&world).iter().map(|(_, (h,))| h.0).sum();
/// assert_eq!(total, 40);
/// assert_eq!(world.view::<()>().count(), 3);
/// ```
pub struct View<'w, Q: Query> {
    world: &'w World,
    mask: Option<ComponentMask>,
    _query: PhantomData<fn() -> Q>,
}

impl<'w, Q: Query> View<'w, Q> {
    /// Builds a view over `world`.
    #[must_use]
    pub fn new(world: &'w World) -> Self {
        Self {
            world,
            mask: Q::mask(world.type_slots()),
            _query: PhantomData,
        }
    }

    /// Required mask, or `None` if the view can match nothing.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> Option<ComponentMask> {
        self.mask
    }

    /// Handles of matching entities.
    #[must_use]
    pub fn entities(&self) -> Entities<'w> {
        match self.mask {
            Some(mask) => Entities {
                records: self.world.records(),
                mask,
                cursor: 0,
            },
            None => Entities {
                records: &[],
                mask: ComponentMask::EMPTY,
                cursor: 0,
            },
        }
    }

    /// Handles of matching entities together with their components.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Q::Item<'w>)> + 'w {
        let world = self.world;
        self.entities()
            .filter_map(move |id| Q::fetch(world, id).map(|components| (id, components)))
    }

    /// Calls `f` with the components of every matching entity.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Q::Item<'w>),
    {
        for (_, components) in self.iter() {
            f(components);
        }
    }

    /// Calls `f` with the handle and components of every matching entity.
    pub fn for_each_entity<F>(&self, mut f: F)
    where
        F: FnMut(EntityId, Q::Item<'w>),
    {
        for (id, components) in self.iter() {
            f(id, components);
        }
    }

    /// Number of matching entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities().count()
    }

    /// Whether no entity matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities().next().is_none()
    }
}

impl<'w, Q: Query> IntoIterator for &View<'w, Q> {
    type Item = EntityId;
    type IntoIter = Entities<'w>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities()
    }
}

impl<'w, Q: Query> IntoIterator for View<'w, Q> {
    type Item = EntityId;
    type IntoIter = Entities<'w>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities()
    }
}

/// Iterator over the handles selected by a [`View`].
#[derive(Clone, Debug)]
pub struct Entities<'w> {
    records: &'w [EntityRecord],
    mask: ComponentMask,
    cursor: usize,
}

impl Iterator for Entities<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while let Some(record) = self.records.get(self.cursor) {
            self.cursor += 1;
            if matches(record, self.mask) {
                return Some(record.id);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.records.len().saturating_sub(self.cursor)))
    }
}

impl FusedIterator for Entities<'_> {}

/// Detached position in a query scan.
///
/// The cursor holds the required mask and the entity table length at
/// construction, and is advanced with [`next_entity`](Self::next_entity)
/// against a world borrowed only for that call. Between steps the world may
/// be mutated:
///
/// - destroying any entity is supported; destroyed entities ahead of the
///   cursor are skipped;
/// - entities appended past the table length at creation are never visited;
/// - a recycled index ahead of the cursor may or may not be visited.
///
/// ```rust
/// use tessera_core::{Component, Dense, World};
///
/// struct Doomed;
/// impl Component for Doomed {
///     type Storage = Dense;
/// }
///
/// let mut world = World::new(8);
/// for _ in 0..4 {
///     world.create_entity().with(Doomed);
/// }
///
/// let mut cursor = world.cursor::<(Doomed,)>();
/// while let Some(id) = cursor.next_entity(&world) {
///     world.destroy_entity(id).unwrap();
/// }
/// assert_eq!(world.alive_count(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewCursor {
    mask: Option<ComponentMask>,
    position: usize,
    end: usize,
}

impl ViewCursor {
    /// Starts a scan of `world` for query `Q`.
    #[must_use]
    pub fn new<Q: Query>(world: &World) -> Self {
        Self {
            mask: Q::mask(world.type_slots()),
            position: 0,
            end: world.table_len(),
        }
    }

    /// Next matching entity, or `None` once the scan is complete.
    ///
    /// If a component type of the query is first registered after the
    /// cursor was created, the cursor still matches nothing.
    pub fn next_entity(&mut self, world: &World) -> Option<EntityId> {
        let mask = self.mask?;
        let records = world.records();
        let end = self.end.min(records.len());

        while self.position < end {
            let record = &records[self.position];
            self.position += 1;
            if matches(record, mask) {
                return Some(record.id);
            }
        }
        None
    }

    /// Table index the next step will examine.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewinds to the start of the scan.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
