//! Collision detection and response
//!
//! Obstacles use axis-aligned boxes recomputed from the current transform
//! every frame; pickups use a flat distance check. Nothing is cached.

use glam::Vec3;

use super::car::CarState;
use super::state::{EndReason, GameEvent, GameSession, Obstacle, ObstacleKind, Pickup};
use crate::config::Config;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Boxes touching on a face count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Box around the car, resting on the road
pub fn car_bounding_box(car: &CarState, config: &Config) -> Aabb {
    let half = config.car.half_extents;
    Aabb::from_center_half_extents(Vec3::new(car.x, half.y, 0.0), half)
}

/// Box fitted to an obstacle's geometry: model half extents scaled, then
/// rotated about Y, bottom resting on the road
pub fn bounding_box_of(obstacle: &Obstacle, config: &Config) -> Aabb {
    let base = match obstacle.kind {
        ObstacleKind::Slow => config.spawn.slow_half_extents,
        ObstacleKind::Death => config.spawn.death_half_extents,
    };
    let half = base * obstacle.scale;
    let (sin, cos) = obstacle.yaw.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let rotated = Vec3::new(
        cos * half.x + sin * half.z,
        half.y,
        sin * half.x + cos * half.z,
    );
    Aabb::from_center_half_extents(Vec3::new(obstacle.x, rotated.y, obstacle.z), rotated)
}

/// Flat (x/z) distance check between car and pickup
pub fn pickup_in_reach(car: &CarState, pickup: &Pickup, radius: f32) -> bool {
    let dx = pickup.x - car.x;
    let dz = pickup.z;
    (dx * dx + dz * dz).sqrt() <= radius
}

/// Test the car against every obstacle and pickup and apply the outcome.
///
/// Each entry is visited once: a hit entry is removed in the same pass that
/// prunes entries which slipped past the reset threshold. Once the session
/// is no longer running (a death hit earlier in the pass, or the timer) the
/// pass only prunes.
pub fn resolve(
    car: &CarState,
    obstacles: &mut Vec<Obstacle>,
    pickups: &mut Vec<Pickup>,
    session: &mut GameSession,
    config: &Config,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let threshold = config.world.reset_threshold;
    let car_box = car_bounding_box(car, config);

    obstacles.retain(|obstacle| {
        if obstacle.z > threshold {
            return false;
        }
        if !session.is_running() || !car_box.intersects(&bounding_box_of(obstacle, config)) {
            return true;
        }
        match obstacle.kind {
            ObstacleKind::Death => {
                log::debug!("Crashed into obstacle {}", obstacle.id);
                if let Some(event) = session.end(EndReason::Crashed) {
                    events.push(event);
                }
                // The wreck stays where it is
                true
            }
            ObstacleKind::Slow => {
                log::debug!("Hit slow obstacle {}", obstacle.id);
                session.speed_multiplier = config.score.slow_penalty_multiplier;
                events.push(GameEvent::Slowed {
                    obstacle_id: obstacle.id,
                });
                false
            }
        }
    });

    pickups.retain(|pickup| {
        if pickup.z > threshold {
            return false;
        }
        if !session.is_running() || !pickup_in_reach(car, pickup, config.score.pickup_radius) {
            return true;
        }
        session.time_remaining += config.score.time_bonus;
        log::debug!("Collected pickup {} (+{}s)", pickup.id, config.score.time_bonus);
        events.push(GameEvent::PickupCollected {
            pickup_id: pickup.id,
            bonus: config.score.time_bonus,
        });
        false
    });

    events
}
