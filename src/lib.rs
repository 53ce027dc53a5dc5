//! Coast Runner - an endless beach-road driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lifecycle, world loop, car, spawning, collisions)
//! - `config`: Session tuning, JSON loading and validation
//! - `input`: Logical key state consumed by the simulation
//! - `hud`: Integer HUD values and events exposed to the host
//! - `scene`: Asset/render collaborator boundary and per-frame scene sync

pub mod config;
pub mod error;
pub mod hud;
pub mod input;
pub mod scene;
pub mod sim;

pub use config::{Config, SteeringMode};
pub use error::{GameError, Result};
pub use hud::HudSnapshot;
pub use input::{Key, KeyState};

/// Default tuning constants
pub mod consts {
    /// Fixed frame step used by the native driver (60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World corridor
    pub const CRUISE_SPEED: f32 = 0.5; // units per frame at full multiplier
    pub const SEGMENT_LENGTH: f32 = 2.5;
    pub const SEGMENT_COUNT: u32 = 50; // visible corridor depth
    pub const TRAILING_SEGMENTS: u32 = 2; // pieces behind the camera at start
    pub const RESET_THRESHOLD: f32 = 15.0;
    pub const ROAD_WIDTH: f32 = 14.0;
    pub const SAND_WIDTH: f32 = 10.0;
    pub const WATER_WIDTH: f32 = 200.0;

    /// Car steering
    pub const STEERING_SPEED: f32 = 0.05;
    pub const MAX_STEER_X: f32 = 5.0;
    pub const TILT_ANGLE: f32 = 0.2;
    pub const STEER_EASING: f32 = 0.1;
    pub const LANE_EASING: f32 = 0.05;
    pub const RIDE_HEIGHT: f32 = 0.25;
    pub const CAR_MODEL_SCALE: f32 = 5.0;

    /// Follow camera
    pub const CAMERA_HEIGHT: f32 = 5.0;
    pub const CAMERA_DISTANCE: f32 = 12.0;
    pub const CAMERA_FOLLOW: f32 = 0.1;
    pub const CAMERA_EASING: f32 = 0.05;
    pub const LOOK_AT_SCALE: f32 = 0.05;
    pub const LOOK_AT_HEIGHT: f32 = 1.0;
    pub const LOOK_AT_FORWARD: f32 = -10.0;

    /// Speed ramp
    pub const RAMP_FACTOR: f32 = 0.02;
    pub const SLOW_PENALTY_MULTIPLIER: f32 = 0.05;
    pub const SPEED_KMH_FACTOR: f32 = 125.0;

    /// Spawning
    pub const SPAWN_INTERVAL: f32 = 1.5;
    pub const SPAWN_DISTANCE: f32 = 250.0;
    pub const SLOW_THRESHOLD: f32 = 0.2; // draw > threshold => slow kind
    pub const PICKUP_PROBABILITY: f32 = 0.15;

    /// Scoring
    pub const INITIAL_TIME: f32 = 60.0;
    pub const METERS_PER_SECOND: f32 = 30.0;
    pub const TIME_BONUS: f32 = 5.0;
    pub const PICKUP_RADIUS: f32 = 1.5;
}

/// Linear interpolation, `t` = 0 gives `a`, 1 gives `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
