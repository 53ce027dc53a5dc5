//! Obstacle and pickup spawning
//!
//! Every `interval` seconds one obstacle appears far down the road at a
//! random lateral offset, sometimes joined by a time-bonus pickup.

use rand::Rng;

use super::state::{GameState, Obstacle, ObstacleKind, Pickup};

/// Spawn timer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnDirector {
    /// Seconds since the last spawn tick
    pub timer: f32,
}

impl SpawnDirector {
    /// Accumulate `dt`; returns true when a spawn tick is due (and resets
    /// the timer)
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.timer += dt;
        if self.timer > interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

/// Kind for a uniform draw in [0, 1)
pub fn obstacle_kind_for(roll: f32, slow_threshold: f32) -> ObstacleKind {
    if roll > slow_threshold {
        ObstacleKind::Slow
    } else {
        ObstacleKind::Death
    }
}

/// Run the spawner for one frame. Only call while running.
pub fn spawn_tick(state: &mut GameState, dt: f32) {
    if !state.spawner.tick(dt, state.config.spawn.interval) {
        return;
    }

    let spawn = &state.config.spawn;
    let max_x = state.config.car.max_steer_x;
    let z = -spawn.distance;
    let (slow_threshold, pickup_probability) = (spawn.slow_threshold, spawn.pickup_probability);
    let (scale_min, scale_max) = (spawn.scale_min, spawn.scale_max);

    // Draw everything up front so the RNG stream doesn't depend on which
    // models happen to be loaded
    let rng = &mut state.rng;
    let kind = obstacle_kind_for(rng.random::<f32>(), slow_threshold);
    let x = rng.random_range(-max_x..=max_x);
    let scale = rng.random_range(scale_min..=scale_max);
    let yaw = rng.random_range(0.0..std::f32::consts::TAU);
    let wants_pickup = rng.random::<f32>() < pickup_probability;
    let pickup_x = rng.random_range(-max_x..=max_x);

    if state.models.obstacle(kind) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            x,
            z,
            scale,
            yaw,
        });
        log::debug!("Spawned {:?} obstacle {} at x={:.2}", kind, id, x);
    } else {
        log::debug!("Skipped {:?} obstacle spawn: model not loaded", kind);
    }

    if wants_pickup {
        if state.models.pickup {
            let id = state.next_entity_id();
            state.pickups.push(Pickup { id, x: pickup_x, z });
            log::debug!("Spawned pickup {} at x={:.2}", id, pickup_x);
        } else {
            log::debug!("Skipped pickup spawn: model not loaded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::state::ModelAvailability;

    fn state(seed: u64) -> GameState {
        GameState::new(Config::default(), seed).unwrap()
    }

    #[test]
    fn test_timer_fires_after_interval() {
        let mut director = SpawnDirector::default();
        assert!(!director.tick(1.0, 1.5));
        assert!(!director.tick(0.5, 1.5)); // exactly 1.5 is not past the interval
        assert!(director.tick(0.1, 1.5));
        assert_eq!(director.timer, 0.0);
    }

    #[test]
    fn test_kind_split() {
        assert_eq!(obstacle_kind_for(0.0, 0.2), ObstacleKind::Death);
        assert_eq!(obstacle_kind_for(0.2, 0.2), ObstacleKind::Death);
        assert_eq!(obstacle_kind_for(0.21, 0.2), ObstacleKind::Slow);
        assert_eq!(obstacle_kind_for(0.99, 0.2), ObstacleKind::Slow);
    }

    #[test]
    fn test_spawns_one_obstacle_ahead() {
        let mut state = state(3);
        spawn_tick(&mut state, 2.0);
        assert_eq!(state.obstacles.len(), 1);
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.z, -250.0);
        assert!(obstacle.x.abs() <= 5.0);
        assert!((0.8..=1.2).contains(&obstacle.scale));
        assert_eq!(state.spawner.timer, 0.0);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = state(3);
        spawn_tick(&mut state, 1.0);
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
        assert_eq!(state.spawner.timer, 1.0);
    }

    #[test]
    fn test_kind_ratio_roughly_matches_threshold() {
        let mut state = state(11);
        for _ in 0..2000 {
            spawn_tick(&mut state, 2.0);
        }
        let death = state
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Death)
            .count() as f32;
        let ratio = death / state.obstacles.len() as f32;
        assert!((0.15..0.25).contains(&ratio), "death ratio {ratio}");
        let pickup_ratio = state.pickups.len() as f32 / 2000.0;
        assert!((0.11..0.19).contains(&pickup_ratio), "pickup ratio {pickup_ratio}");
    }

    #[test]
    fn test_missing_models_skip_spawn() {
        let mut state = state(5);
        state.models = ModelAvailability {
            slow_obstacle: false,
            death_obstacle: false,
            pickup: false,
        };
        for _ in 0..50 {
            spawn_tick(&mut state, 2.0);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = state(99);
        let mut b = state(99);
        for _ in 0..20 {
            spawn_tick(&mut a, 2.0);
            spawn_tick(&mut b, 2.0);
        }
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.pickups, b.pickups);
    }
}
