//! # Chase Components
//!
//! Plain data for the demo scene. Everything is dense except [`Player`],
//! which only one entity ever holds.

use std::ops::{Add, AddAssign, Mul, Sub};

use tessera_core::{Component, Dense, Small};

/// Arena width in world units.
pub const ARENA_WIDTH: f32 = 1280.0;
/// Arena height in world units.
pub const ARENA_HEIGHT: f32 = 1024.0;

/// 2D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length > f32::EPSILON {
            self * (1.0 / length)
        } else {
            Self::ZERO
        }
    }

    /// Clamps both coordinates into the arena.
    #[must_use]
    pub fn clamped_to_arena(self) -> Self {
        Self::new(self.x.clamp(0.0, ARENA_WIDTH), self.y.clamp(0.0, ARENA_HEIGHT))
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// World-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// Centre of the entity.
    pub position: Vec2,
}

impl Transform {
    /// Transform at `(x, y)`.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }
}

impl Component for Transform {
    type Storage = Dense;
}

/// Display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

impl Component for Name {
    type Storage = Dense;
}

/// Flat-coloured rectangle.
// Nothing draws headlessly; the fields are only carried.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Graphic {
    /// RGB colour.
    pub color: [u8; 3],
    /// Rectangle size.
    pub size: Vec2,
}

impl Component for Graphic {
    type Storage = Dense;
}

/// Circular hit area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleCollider {
    /// Radius in world units.
    pub radius: u32,
}

impl Default for CircleCollider {
    fn default() -> Self {
        Self { radius: 8 }
    }
}

impl Component for CircleCollider {
    type Storage = Dense;
}

/// The controllable entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Units per second.
    pub movement_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            movement_speed: 250.0,
        }
    }
}

impl Component for Player {
    type Storage = Small;
}

/// Chaser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    /// Base speed before distance scaling.
    pub movement_speed: f32,
    /// Enemies stop moving once this close to the player.
    pub stopping_distance: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            movement_speed: 25.0,
            stopping_distance: 10.0,
        }
    }
}

impl Component for Enemy {
    type Storage = Dense;
}

/// Hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health(pub u32);

impl Component for Health {
    type Storage = Dense;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
        assert!((v.normalized().length() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_clamped_to_arena() {
        let v = Vec2::new(-5.0, ARENA_HEIGHT + 1.0).clamped_to_arena();
        assert_eq!(v, Vec2::new(0.0, ARENA_HEIGHT));
    }
}
