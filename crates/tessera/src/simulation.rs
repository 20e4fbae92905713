//! # Chase Simulation
//!
//! Fixed-step loop over the chase systems:
//!
//! ```text
//! tick N:
//!   1. enemy chase        (towards the player's position at tick start)
//!   2. player movement    (seeded wander, new heading every WANDER_TICKS)
//!   3. player collision   (destroys touched enemies mid-scan)
//!   4. burst spawn        (every burst_every ticks)
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::{EcsResult, EntityId, World};

use crate::components::{Enemy, Transform, Vec2};
use crate::config::DemoConfig;
use crate::systems;

/// Ticks between wander heading changes.
const WANDER_TICKS: u32 = 30;

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Enemies destroyed by collision.
    pub destroyed: usize,
    /// Enemies created by a burst.
    pub spawned: usize,
    /// Burst creations refused at capacity.
    pub rejected: usize,
}

/// Totals over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// Ticks executed.
    pub ticks: u32,
    /// Enemies destroyed by collision.
    pub destroyed: usize,
    /// Enemies created by bursts.
    pub spawned: usize,
    /// Burst creations refused at capacity.
    pub rejected: usize,
    /// Live entities at the end.
    pub alive: usize,
    /// Enemies alive at the end.
    pub enemies: usize,
    /// Player position at the end.
    pub player_position: Vec2,
}

/// The chase scene and its loop state.
pub struct Simulation {
    world: World,
    player: EntityId,
    rng: ChaCha8Rng,
    heading: Vec2,
    tick: u32,
    config: DemoConfig,
}

impl Simulation {
    /// Builds the scene: one player and a square grid of enemies.
    ///
    /// # Errors
    ///
    /// Fails if the world configuration is invalid.
    pub fn new(config: DemoConfig) -> EcsResult<Self> {
        let mut world = World::from_config(config.world)?;
        let player = systems::make_player(&mut world, "Frappe");

        let sim = &config.simulation;
        for x in 0..sim.enemy_grid {
            for y in 0..sim.enemy_grid {
                #[allow(clippy::cast_precision_loss)]
                let (x, y) = (x as f32 * sim.grid_spacing, y as f32 * sim.grid_spacing);
                systems::make_enemy(&mut world, x, y);
            }
        }
        tracing::info!(
            capacity = world.capacity(),
            enemies = world.view::<(Enemy,)>().count(),
            "scene ready"
        );

        Ok(Self {
            world,
            player,
            rng: ChaCha8Rng::seed_from_u64(sim.seed),
            heading: Vec2::ZERO,
            tick: 0,
            config,
        })
    }

    /// The simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Handle of the player.
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Runs one fixed step.
    pub fn step(&mut self) -> TickReport {
        let dt = self.config.simulation.dt;
        let mut report = TickReport::default();

        let target = self
            .world
            .try_get_component::<Transform>(self.player)
            .map(|transform| transform.position);
        if let Ok(target) = target {
            systems::enemy_chase(&mut self.world, target, dt);
        }

        if self.tick % WANDER_TICKS == 0 {
            self.heading = Vec2::new(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0));
        }
        systems::player_movement(&mut self.world, self.heading, dt);

        report.destroyed = systems::player_collision(&mut self.world);

        let burst_every = self.config.simulation.burst_every;
        if burst_every > 0 && self.tick > 0 && self.tick % burst_every == 0 {
            let burst = systems::spawn_burst(&mut self.world, self.config.simulation.burst_spacing);
            report.spawned = burst.spawned;
            report.rejected = burst.rejected;
            tracing::info!(tick = self.tick, spawned = burst.spawned, "enemy burst");
        }

        tracing::debug!(
            tick = self.tick,
            destroyed = report.destroyed,
            alive = self.world.alive_count(),
            "tick"
        );
        self.tick += 1;
        report
    }

    /// Runs `ticks` steps and returns the totals.
    pub fn run(&mut self, ticks: u32) -> Summary {
        let mut summary = Summary::default();
        for _ in 0..ticks {
            let report = self.step();
            summary.destroyed += report.destroyed;
            summary.spawned += report.spawned;
            summary.rejected += report.rejected;
        }

        summary.ticks = ticks;
        summary.alive = self.world.alive_count();
        summary.enemies = self.world.view::<(Enemy,)>().count();
        summary.player_position = self
            .world
            .try_get_component::<Transform>(self.player)
            .map_or(Vec2::ZERO, |transform| transform.position);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use tessera_core::WorldConfig;

    fn config(max_entities: usize, burst_every: u32) -> DemoConfig {
        DemoConfig {
            world: WorldConfig::with_max_entities(max_entities),
            simulation: SimulationConfig {
                burst_every,
                burst_spacing: 64.0,
                ..SimulationConfig::default()
            },
        }
    }

    #[test]
    fn test_scene_setup() {
        let sim = Simulation::new(config(1_000, 0)).unwrap();
        assert_eq!(sim.world().alive_count(), 26);
        assert_eq!(sim.world().view::<(Enemy,)>().count(), 25);
        assert!(sim.world().is_alive(sim.player()));
    }

    #[test]
    fn test_run_is_deterministic() {
        let a = Simulation::new(config(2_000, 50)).unwrap().run(200);
        let b = Simulation::new(config(2_000, 50)).unwrap().run(200);
        assert_eq!(a, b);
        assert_eq!(a.ticks, 200);
    }

    #[test]
    fn test_totals_balance() {
        let mut sim = Simulation::new(config(500, 40)).unwrap();
        let summary = sim.run(200);

        // Every enemy ever created is either alive or was destroyed.
        assert_eq!(summary.enemies, 25 + summary.spawned - summary.destroyed);
        assert_eq!(summary.alive, summary.enemies + 1);
        assert!(summary.alive <= 500);
    }

    #[test]
    fn test_bursts_fill_to_capacity() {
        let mut sim = Simulation::new(config(300, 10)).unwrap();
        let summary = sim.run(21);

        assert!(summary.rejected > 0);
        assert!(summary.alive <= 300);
    }
}
