//! # Chase Systems
//!
//! Each system is a free function over the world. Systems that only update
//! components borrow pools through the world's `for_each_mut*` helpers;
//! the collision system destroys entities, so it walks a detached cursor.

use tessera_core::{EntityId, World};

use crate::components::{
    CircleCollider, Enemy, Graphic, Health, Name, Player, Transform, Vec2, ARENA_HEIGHT,
    ARENA_WIDTH,
};

/// Spawns the player at the arena's default start point.
pub fn make_player(world: &mut World, name: &str) -> EntityId {
    world
        .create_entity()
        .with(Transform::at(200.0, 200.0))
        .with(Name(name.to_owned()))
        .with_default::<CircleCollider>()
        .with_default::<Player>()
        .with(Health(100))
        .id()
}

/// Spawns an enemy at `(x, y)`, tinted by its position.
///
/// Returns `false` if the world is full.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn make_enemy(world: &mut World, x: f32, y: f32) -> bool {
    let red = (x / ARENA_WIDTH).clamp(0.0, 1.0);
    let green = (y / ARENA_HEIGHT).clamp(0.0, 1.0);

    world
        .create_entity()
        .with(Transform::at(x, y))
        .with(Health(100))
        .with(Graphic {
            color: [(red * 255.0) as u8, (green * 255.0) as u8, 50],
            size: Vec2::new(4.0, 4.0),
        })
        .with(CircleCollider { radius: 2 })
        .with_default::<Enemy>()
        .is_valid()
}

/// Result of a burst spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BurstReport {
    /// Enemies created.
    pub spawned: usize,
    /// Creations refused because the world was full.
    pub rejected: usize,
}

/// Covers the arena with a lattice of enemies, `spacing` units apart.
///
/// Creation continues past a full world so the report counts every refusal.
pub fn spawn_burst(world: &mut World, spacing: f32) -> BurstReport {
    let mut report = BurstReport::default();
    let mut x = 0.0;
    while x < ARENA_WIDTH {
        let mut y = 0.0;
        while y < ARENA_HEIGHT {
            if make_enemy(world, x, y) {
                report.spawned += 1;
            } else {
                report.rejected += 1;
            }
            y += spacing;
        }
        x += spacing;
    }

    if report.rejected > 0 {
        tracing::warn!(
            spawned = report.spawned,
            rejected = report.rejected,
            capacity = world.capacity(),
            "burst hit entity capacity"
        );
    }
    report
}

/// Moves every enemy towards `target`, slowing down with distance.
pub fn enemy_chase(world: &mut World, target: Vec2, dt: f32) {
    world.for_each_mut_with::<Transform, Enemy, _>(|_, transform, enemy| {
        let path = target - transform.position;
        let distance = path.length();
        if distance > enemy.stopping_distance {
            transform.position += path.normalized() * (dt * enemy.movement_speed / (distance * 0.1));
        }
    });
}

/// Moves every player along `heading`, which is normalized if longer than 1.
pub fn player_movement(world: &mut World, heading: Vec2, dt: f32) {
    let heading = if heading.length_squared() > 1.0 {
        heading.normalized()
    } else {
        heading
    };
    world.for_each_mut_with::<Transform, Player, _>(|_, transform, player| {
        transform.position =
            (transform.position + heading * (dt * player.movement_speed)).clamped_to_arena();
    });
}

/// Destroys every enemy touching a player and returns how many died.
pub fn player_collision(world: &mut World) -> usize {
    let players: Vec<(Vec2, f32)> = world
        .view::<(Player, Transform, CircleCollider)>()
        .iter()
        .map(|(_, (_, transform, collider))| (transform.position, radius(collider)))
        .collect();
    if players.is_empty() {
        return 0;
    }

    let mut destroyed = 0;
    let mut cursor = world.cursor::<(Enemy, Transform, CircleCollider)>();
    while let Some(enemy) = cursor.next_entity(world) {
        let (transform, collider) = world.get_components::<(Transform, CircleCollider)>(enemy);
        let (position, enemy_radius) = (transform.position, radius(collider));

        let touched = players.iter().any(|&(player_position, player_radius)| {
            (position - player_position).length() < enemy_radius + player_radius
        });
        if touched && world.destroy_entity(enemy).is_ok() {
            destroyed += 1;
        }
    }
    destroyed
}

#[allow(clippy::cast_precision_loss)]
fn radius(collider: &CircleCollider) -> f32 {
    collider.radius as f32
}
