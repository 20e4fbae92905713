//! # World Property Tests
//!
//! End-to-end checks of handle recycling, component masks, capacity limits
//! and view selection through the public API only.
//!
//! Run with: cargo test -p tessera_core --test world_properties

use tessera_core::{
    Component, Dense, EcsError, EntityId, Small, World, WorldConfig, SMALL_POOL_CAPACITY,
};

#[derive(Debug, Clone, PartialEq)]
struct X(u32);
impl Component for X {
    type Storage = Dense;
}

#[derive(Debug, Clone, PartialEq)]
struct Name(String);
impl Component for Name {
    type Storage = Dense;
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Camera {
    zoom: u32,
}
impl Component for Camera {
    type Storage = Small;
}

fn view_x(world: &World) -> Vec<EntityId> {
    world.view::<(X,)>().entities().collect()
}

// ============================================================================
// HANDLE ENCODING
// ============================================================================

#[test]
fn handle_roundtrips_index_and_generation() {
    for (index, generation) in [(0, 0), (1, 1), (99_999, 3), (u32::MAX - 1, u32::MAX)] {
        let id = EntityId::new(index, generation);
        assert_eq!((id.index(), id.generation()), (index, generation));
        assert!(id.is_valid());
    }
    assert!(!EntityId::INVALID.is_valid());
}

// ============================================================================
// GENERATIONS
// ============================================================================

#[test]
fn recycling_bumps_generation_once_per_destroy() {
    let mut world = World::new(4);
    let first = world.spawn();
    let mut previous = vec![first];
    let mut current = first;

    for cycle in 1..=5u32 {
        world.destroy_entity(current).unwrap();
        current = world.spawn();
        assert_eq!(current.index(), first.index());
        assert_eq!(current.generation(), cycle);

        for old in &previous {
            assert!(!world.is_alive(*old));
            assert_eq!(world.destroy_entity(*old), Err(EcsError::StaleEntity(*old)));
        }
        previous.push(current);
    }
    assert!(world.is_alive(current));
    assert_eq!(world.alive_count(), 1);
}

// ============================================================================
// MASKS AND VIEWS
// ============================================================================

#[test]
fn add_and_remove_toggle_mask_and_view_membership() {
    let mut world = World::new(8);
    let e = world.spawn();
    world.add_component(e, X(1)).unwrap();

    let slot = world.slot_of::<X>().unwrap();
    assert!(world.mask_of(e).unwrap().contains(slot));
    assert_eq!(view_x(&world), vec![e]);

    assert_eq!(world.remove_component::<X>(e), Ok(Some(X(1))));
    assert!(!world.mask_of(e).unwrap().contains(slot));
    assert!(view_x(&world).is_empty());
}

#[test]
fn view_yields_holders_in_creation_order() {
    let mut world = World::new(8);
    assert!(view_x(&world).is_empty());

    let a = world.create_entity().with(X(1)).id();
    let _b = world.create_entity().with(Name("b".into())).id();
    let c = world.create_entity().with(X(3)).id();

    assert_eq!(view_x(&world), vec![a, c]);
}

#[test]
fn recycled_entity_does_not_inherit_components() {
    let mut world = World::new(8);
    let d = world.create_entity().with(X(42)).id();
    world.destroy_entity(d).unwrap();

    let e = world.create_entity().id();
    assert_eq!(e.index(), d.index());
    assert_eq!(e.generation(), d.generation() + 1);

    assert!(view_x(&world).is_empty());
    assert_eq!(world.try_get_component::<X>(d), Err(EcsError::StaleEntity(d)));
    assert!(matches!(
        world.try_get_component::<X>(e),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[test]
fn get_components_bundles_lookups() {
    let mut world = World::new(4);
    let e = world
        .create_entity()
        .with(X(9))
        .with(Name("nine".into()))
        .id();

    let (x, name) = world.get_components::<(X, Name)>(e);
    assert_eq!(x, &X(9));
    assert_eq!(name.0, "nine");
}

#[test]
#[should_panic(expected = "get_components")]
fn get_components_panics_on_missing() {
    let mut world = World::new(4);
    let e = world.create_entity().with(X(9)).id();
    world.create_entity().with(Name("other".into()));

    let _ = world.get_components::<(X, Name)>(e);
}

// ============================================================================
// CAPACITY
// ============================================================================

#[test]
fn capacity_is_a_hard_limit() {
    const MAX: usize = 16;
    let mut world = World::from_config(WorldConfig::with_max_entities(MAX)).unwrap();

    let live: Vec<EntityId> = (0..MAX).map(|_| world.create_entity().with(X(0)).id()).collect();
    assert!(live.iter().all(|id| id.is_valid()));

    for _ in 0..10 {
        let builder = world.create_entity().with(X(1));
        assert!(!builder.is_valid());
    }
    assert_eq!(world.alive_count(), MAX);
    assert_eq!(world.table_len(), MAX);
    assert_eq!(world.view::<()>().count(), MAX);

    // Freeing one slot makes exactly one more creation succeed.
    world.destroy_entity(live[5]).unwrap();
    assert!(world.spawn().is_valid());
    assert!(!world.spawn().is_valid());
}

#[test]
fn small_pool_accepts_capacity_then_fails() {
    let mut world = World::new(64);
    for zoom in 0..SMALL_POOL_CAPACITY as u32 {
        world.create_entity().with(Camera { zoom });
    }
    assert_eq!(world.view::<(Camera,)>().count(), SMALL_POOL_CAPACITY);
    assert_eq!(world.small_pool_members::<Camera>().unwrap().len(), SMALL_POOL_CAPACITY);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        world.create_entity().with(Camera { zoom: 99 });
    }));
    assert!(result.is_err());
}

#[test]
fn small_pool_slot_is_reused_by_recycled_index() {
    let mut world = World::new(64);
    let holders: Vec<EntityId> = (0..SMALL_POOL_CAPACITY)
        .map(|_| world.create_entity().with_default::<Camera>().id())
        .collect();

    // Destroying and recreating at the same index maps to the same slot.
    world.destroy_entity(holders[2]).unwrap();
    let reborn = world.create_entity().with(Camera { zoom: 7 }).id();
    assert_eq!(reborn.index(), holders[2].index());
    assert_eq!(world.get_component::<Camera>(reborn).zoom, 7);
    assert_eq!(world.small_pool_members::<Camera>().unwrap().len(), SMALL_POOL_CAPACITY);
}

// ============================================================================
// MUTATION DURING ITERATION
// ============================================================================

#[test]
fn cursor_supports_destroying_while_scanning() {
    let mut world = World::new(32);
    for i in 0..20 {
        world.create_entity().with(X(i));
    }

    let mut cursor = world.cursor::<(X,)>();
    while let Some(id) = cursor.next_entity(&world) {
        if world.get_component::<X>(id).0 % 2 == 0 {
            world.destroy_entity(id).unwrap();
        }
    }

    let remaining: Vec<u32> = world.view::<(X,)>().iter().map(|(_, (x,))| x.0).collect();
    assert_eq!(remaining, (0..20).filter(|i| i % 2 == 1).collect::<Vec<_>>());
}
