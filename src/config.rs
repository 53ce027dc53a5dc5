//! Session configuration
//!
//! Immutable for the lifetime of a session. Every field has a default, so a
//! JSON file only needs to name the values it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// How left/right input moves the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SteeringMode {
    /// Continuous lateral drift while a direction key is held
    #[default]
    Free,
    /// Each key press hops one lane; the car eases onto the lane centre
    Lanes,
}

/// Road corridor and scenery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Scroll speed at full multiplier (units per frame)
    pub cruise_speed: f32,
    pub segment_length: f32,
    pub segment_count: u32,
    /// Segments placed behind the camera at start
    pub trailing_segments: u32,
    /// Longitudinal position past which segments wrap and entities are pruned
    pub reset_threshold: f32,
    pub road_width: f32,
    pub sand_width: f32,
    pub water_width: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cruise_speed: CRUISE_SPEED,
            segment_length: SEGMENT_LENGTH,
            segment_count: SEGMENT_COUNT,
            trailing_segments: TRAILING_SEGMENTS,
            reset_threshold: RESET_THRESHOLD,
            road_width: ROAD_WIDTH,
            sand_width: SAND_WIDTH,
            water_width: WATER_WIDTH,
        }
    }
}

impl WorldConfig {
    /// Length of the whole segment ring
    pub fn total_length(&self) -> f32 {
        self.segment_count as f32 * self.segment_length
    }
}

/// Car handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarConfig {
    pub steering: SteeringMode,
    /// Lane centres for `SteeringMode::Lanes`
    pub lanes: Vec<f32>,
    /// Lateral units per frame while a key is held (free mode)
    pub steering_speed: f32,
    /// Per-frame easing toward the lane centre (lane mode)
    pub lane_easing: f32,
    pub max_steer_x: f32,
    /// Tilt/steer target magnitude while steering (radians)
    pub tilt_angle: f32,
    /// Per-frame easing of tilt/steer toward their target
    pub steer_easing: f32,
    /// Collision box half extents
    pub half_extents: Vec3,
    pub ride_height: f32,
    pub model_scale: f32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            steering: SteeringMode::Free,
            lanes: vec![-4.0, 0.0, 4.0],
            steering_speed: STEERING_SPEED,
            lane_easing: LANE_EASING,
            max_steer_x: MAX_STEER_X,
            tilt_angle: TILT_ANGLE,
            steer_easing: STEER_EASING,
            half_extents: Vec3::new(0.9, 0.7, 1.8),
            ride_height: RIDE_HEIGHT,
            model_scale: CAR_MODEL_SCALE,
        }
    }
}

/// Follow camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub height: f32,
    pub distance: f32,
    /// Fraction of the car's lateral position the camera drifts toward
    pub follow_fraction: f32,
    pub easing: f32,
    pub look_at_scale: f32,
    pub look_at_height: f32,
    pub look_at_forward: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height: CAMERA_HEIGHT,
            distance: CAMERA_DISTANCE,
            follow_fraction: CAMERA_FOLLOW,
            easing: CAMERA_EASING,
            look_at_scale: LOOK_AT_SCALE,
            look_at_height: LOOK_AT_HEIGHT,
            look_at_forward: LOOK_AT_FORWARD,
        }
    }
}

/// Obstacle and pickup spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between spawn ticks
    pub interval: f32,
    /// Distance ahead of the car where entities appear
    pub distance: f32,
    /// Kind draw above this value spawns a slow obstacle, otherwise death
    pub slow_threshold: f32,
    /// Chance per spawn tick of an extra pickup
    pub pickup_probability: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    /// Unscaled half extents of each obstacle model
    pub slow_half_extents: Vec3,
    pub death_half_extents: Vec3,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: SPAWN_INTERVAL,
            distance: SPAWN_DISTANCE,
            slow_threshold: SLOW_THRESHOLD,
            pickup_probability: PICKUP_PROBABILITY,
            scale_min: 0.8,
            scale_max: 1.2,
            slow_half_extents: Vec3::new(0.6, 0.5, 0.6),
            death_half_extents: Vec3::new(1.2, 1.0, 0.8),
        }
    }
}

/// Timer, score and speed tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub initial_time: f32,
    /// Distance accrued per second at full speed multiplier
    pub meters_per_second: f32,
    pub time_bonus: f32,
    pub pickup_radius: f32,
    /// Per-frame easing of the speed multiplier toward 1
    pub ramp_factor: f32,
    /// Speed multiplier after hitting a slow obstacle
    pub slow_penalty_multiplier: f32,
    pub speed_kmh_factor: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            initial_time: INITIAL_TIME,
            meters_per_second: METERS_PER_SECOND,
            time_bonus: TIME_BONUS,
            pickup_radius: PICKUP_RADIUS,
            ramp_factor: RAMP_FACTOR,
            slow_penalty_multiplier: SLOW_PENALTY_MULTIPLIER,
            speed_kmh_factor: SPEED_KMH_FACTOR,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub car: CarConfig,
    pub camera: CameraConfig,
    pub spawn: SpawnConfig,
    pub score: ScoreConfig,
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn unit_factor(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(GameError::invalid(field, format!("must be in (0, 1], got {value}")))
    }
}

fn probability(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::invalid(field, format!("must be in [0, 1], got {value}")))
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(GameError::Encode)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        positive("world.cruise_speed", w.cruise_speed)?;
        positive("world.segment_length", w.segment_length)?;
        if w.segment_count == 0 {
            return Err(GameError::invalid("world.segment_count", "must be at least 1"));
        }
        if w.trailing_segments >= w.segment_count {
            return Err(GameError::invalid(
                "world.trailing_segments",
                format!("must be below segment_count ({})", w.segment_count),
            ));
        }
        if (w.trailing_segments as f32) * w.segment_length > w.reset_threshold {
            return Err(GameError::invalid(
                "world.reset_threshold",
                "must cover the segments placed behind the camera",
            ));
        }
        positive("world.road_width", w.road_width)?;
        positive("world.sand_width", w.sand_width)?;
        positive("world.water_width", w.water_width)?;

        let c = &self.car;
        positive("car.steering_speed", c.steering_speed)?;
        positive("car.max_steer_x", c.max_steer_x)?;
        if c.max_steer_x > w.road_width / 2.0 {
            return Err(GameError::invalid(
                "car.max_steer_x",
                format!("exceeds the corridor half-width ({})", w.road_width / 2.0),
            ));
        }
        unit_factor("car.steer_easing", c.steer_easing)?;
        unit_factor("car.lane_easing", c.lane_easing)?;
        if c.half_extents.min_element() <= 0.0 {
            return Err(GameError::invalid("car.half_extents", "must be positive"));
        }
        if c.steering == SteeringMode::Lanes {
            self.validate_lanes()?;
        }

        let cam = &self.camera;
        unit_factor("camera.easing", cam.easing)?;

        let s = &self.spawn;
        positive("spawn.interval", s.interval)?;
        positive("spawn.distance", s.distance)?;
        probability("spawn.slow_threshold", s.slow_threshold)?;
        probability("spawn.pickup_probability", s.pickup_probability)?;
        positive("spawn.scale_min", s.scale_min)?;
        if s.scale_max < s.scale_min {
            return Err(GameError::invalid("spawn.scale_max", "must not be below scale_min"));
        }
        if s.slow_half_extents.min_element() <= 0.0 || s.death_half_extents.min_element() <= 0.0 {
            return Err(GameError::invalid("spawn.half_extents", "must be positive"));
        }

        let sc = &self.score;
        positive("score.initial_time", sc.initial_time)?;
        positive("score.meters_per_second", sc.meters_per_second)?;
        positive("score.pickup_radius", sc.pickup_radius)?;
        if sc.time_bonus < 0.0 {
            return Err(GameError::invalid("score.time_bonus", "must not be negative"));
        }
        unit_factor("score.ramp_factor", sc.ramp_factor)?;
        probability("score.slow_penalty_multiplier", sc.slow_penalty_multiplier)?;

        Ok(())
    }

    /// The camera starts centred, so the lane layout must be symmetric
    /// around a middle lane at x = 0.
    fn validate_lanes(&self) -> Result<()> {
        let lanes = &self.car.lanes;
        if lanes.is_empty() || lanes.len() % 2 == 0 {
            return Err(GameError::invalid(
                "car.lanes",
                format!("needs an odd number of lanes, got {}", lanes.len()),
            ));
        }
        if lanes[lanes.len() / 2] != 0.0 {
            return Err(GameError::invalid("car.lanes", "middle lane must be at x = 0"));
        }
        if lanes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GameError::invalid("car.lanes", "must be strictly increasing"));
        }
        if lanes.iter().any(|x| x.abs() > self.car.max_steer_x) {
            return Err(GameError::invalid("car.lanes", "lane outside max_steer_x"));
        }
        Ok(())
    }

    /// Index of the centre lane
    pub fn start_lane(&self) -> usize {
        self.car.lanes.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = Config::from_json_str(
            r#"{ "world": { "segment_count": 20 }, "car": { "steering": "lanes" } }"#,
        )
        .unwrap();
        assert_eq!(config.world.segment_count, 20);
        assert_eq!(config.world.segment_length, SEGMENT_LENGTH);
        assert_eq!(config.car.steering, SteeringMode::Lanes);
        assert_eq!(config.start_lane(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default();
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let mut config = Config::default();
        config.world.sand_width = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConfig { field: "world.sand_width", .. }
        ));
    }

    #[test]
    fn test_rejects_zero_segments() {
        let mut config = Config::default();
        config.world.segment_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_steer_outside_road() {
        let mut config = Config::default();
        config.car.max_steer_x = 8.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_uncentred_lanes() {
        let mut config = Config::default();
        config.car.steering = SteeringMode::Lanes;
        config.car.lanes = vec![-4.0, 4.0];
        assert!(config.validate().is_err());

        config.car.lanes = vec![-4.0, 1.0, 4.0];
        assert!(config.validate().is_err());

        config.car.lanes = vec![-2.0, 0.0, 2.0];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lanes_ignored_in_free_mode() {
        let mut config = Config::default();
        config.car.lanes = vec![];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(GameError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_steering_mode_json_names() {
        let config = Config::from_json_str(r#"{ "car": { "steering": "lanes" } }"#).unwrap();
        assert_eq!(config.car.steering, SteeringMode::Lanes);
        assert!(Config::from_json_str(r#"{ "car": { "steering": "hover" } }"#).is_err());
    }
}
