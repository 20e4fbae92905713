//! # Core Error Types
//!
//! Recoverable failures of the entity/component store. Caller bugs that
//! cannot be handled at runtime (reading a component the entity does not
//! hold, overflowing a small pool) panic instead; see the `# Panics`
//! sections on [`World`](crate::World).

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors that can occur in the entity/component store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity table is full.
    #[error("entity capacity exceeded: all {capacity} slots are in use")]
    CapacityExceeded {
        /// Maximum number of entities in the world.
        capacity: usize,
    },

    /// The handle does not name a live entity (destroyed, recycled, or invalid).
    #[error("stale entity handle {0}")]
    StaleEntity(EntityId),

    /// The entity is alive but does not hold the component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: EntityId,
        /// Type name of the missing component.
        component: &'static str,
    },

    /// A small pool ran out of physical slots.
    #[error("small pool for {component} is full ({capacity} slots), cannot map entity index {index}")]
    SmallPoolOverflow {
        /// Type name of the pooled component.
        component: &'static str,
        /// Fixed slot count of the pool.
        capacity: usize,
        /// Entity index that did not fit.
        index: u32,
    },

    /// More distinct component types than a mask can track.
    #[error("cannot register {component}: all {max} component slots are taken")]
    TypeSlotOverflow {
        /// Type name of the rejected component.
        component: &'static str,
        /// Maximum number of component types.
        max: usize,
    },

    /// Entity index past the end of a dense pool.
    #[error("entity index {index} out of bounds for capacity {capacity}")]
    IndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// Number of slots in the pool.
        capacity: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for entity/component operations.
pub type EcsResult<T> = Result<T, EcsError>;
