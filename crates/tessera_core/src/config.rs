//! # World Configuration
//!
//! Sizing for a [`World`](crate::World), loaded once at startup.
//!
//! ```toml
//! [world]
//! max_entities = 100000
//! ```

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};

/// Default entity capacity of a world.
pub const DEFAULT_MAX_ENTITIES: usize = 100_000;

/// Configuration for a [`World`](crate::World).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Size of the entity table and of every dense pool.
    pub max_entities: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}

impl WorldConfig {
    /// Config with the given entity capacity.
    #[must_use]
    pub const fn with_max_entities(max_entities: usize) -> Self {
        Self { max_entities }
    }

    /// Parses a config from TOML. Accepts either a bare table or one nested
    /// under `[world]`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] on malformed TOML or when
    /// [`validate`](Self::validate) fails.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Nested { world: WorldConfig },
            Flat(WorldConfig),
        }

        let document: Document =
            toml::from_str(source).map_err(|err| EcsError::InvalidConfig(err.to_string()))?;
        let config = match document {
            Document::Nested { world } | Document::Flat(world) => world,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the capacity fits the entity handle encoding.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `max_entities` is zero or does
    /// not fit below the invalid-index sentinel.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.max_entities >= u32::MAX as usize {
            return Err(EcsError::InvalidConfig(format!(
                "max_entities {} must be below {}",
                self.max_entities,
                u32::MAX
            )));
        }
        Ok(())
    }
}
