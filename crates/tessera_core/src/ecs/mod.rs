//! # Entity Component System
//!
//! Entity/component storage with per-type pools and masked views.
//!
//! ## Design Philosophy
//!
//! - The entity table is reserved to full capacity at world creation
//! - Entity IDs are table indices with generation counters
//! - Each component type gets a slot, a mask bit, and its own pool
//! - Pools are dense (one slot per entity) or small (a few mapped slots)

mod builder;
mod component;
mod entity;
mod registry;
mod storage;
mod view;
mod world;

pub use builder::EntityBuilder;
pub use component::{
    Component, ComponentMask, ComponentSlot, Dense, Small, StorageKind, StorageStrategy,
    MAX_COMPONENTS,
};
pub use entity::{EntityId, EntityRecord};
pub use registry::TypeSlots;
pub use storage::{ComponentPool, DensePool, ErasedPool, SmallPool, SMALL_POOL_CAPACITY};
pub use view::{Entities, Query, View, ViewCursor};
pub use world::World;
