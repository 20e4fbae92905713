//! # TESSERA Core Engine
//!
//! Entity/component storage engine:
//! - Generation-tagged entity handles with LIFO index recycling
//! - Dense and small component pools chosen per component type
//! - Lazy, restartable views over entities holding a set of components
//!
//! ## Architecture Rules
//!
//! 1. **Fixed capacity** - The entity table never reallocates
//! 2. **Stale handles are detected** - Mutating through a destroyed handle is an error
//! 3. **Caller bugs panic** - Reading a component an entity lacks is a precondition violation
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{Component, Dense, Small, World};
//!
//! struct Transform { x: f32, y: f32 }
//! impl Component for Transform {
//!     type Storage = Dense;
//! }
//!
//! struct Player;
//! impl Component for Player {
//!     type Storage = Small;
//! }
//!
//! let mut world = World::new(1_000);
//! let player = world
//!     .create_entity()
//!     .with(Transform { x: 0.0, y: 0.0 })
//!     .with(Player)
//!     .id();
//!
//! for (id, (transform, _)) in world.view::<(Transform, Player)>().iter() {
//!     assert_eq!(id, player);
//!     assert_eq!(transform.x, 0.0);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::{WorldConfig, DEFAULT_MAX_ENTITIES};
pub use ecs::{
    Component, ComponentMask, ComponentPool, ComponentSlot, Dense, DensePool, Entities,
    EntityBuilder, EntityId, EntityRecord, ErasedPool, Query, Small, SmallPool, StorageKind,
    StorageStrategy, TypeSlots, View, ViewCursor, World, MAX_COMPONENTS, SMALL_POOL_CAPACITY,
};
pub use error::{EcsError, EcsResult};
