//! Car steering and follow camera
//!
//! All easing here uses fixed per-frame factors rather than dt, so handling
//! feel depends on the display refresh rate. That matches how the game has
//! always played and is kept on purpose.

use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::{CameraConfig, CarConfig, Config, SteeringMode};
use crate::lerp;

/// Lane-mode tilt kicks in while the car is further than this from its lane
const LANE_TILT_DEADZONE: f32 = 0.1;

/// Held steering direction for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    #[default]
    Neutral,
    Left,
    Right,
}

impl Steer {
    /// Left wins when both keys are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            Steer::Left
        } else if right {
            Steer::Right
        } else {
            Steer::Neutral
        }
    }

    /// Tilt/steer target angle (left leans positive)
    fn target_angle(self, magnitude: f32) -> f32 {
        match self {
            Steer::Left => magnitude,
            Steer::Right => -magnitude,
            Steer::Neutral => 0.0,
        }
    }
}

/// Steering input consumed by the car each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarInput {
    pub steer: Steer,
    /// Lane hops requested this frame (-1 left, +1 right); lane mode only
    pub lane_step: i32,
}

/// The player's car
#[derive(Debug, Clone, PartialEq)]
pub struct CarState {
    /// Lateral position, always within +-max_steer_x
    pub x: f32,
    /// Body lean (radians, added to the yaw of the model)
    pub tilt: f32,
    /// Roll from steering (radians)
    pub steer: f32,
    /// Current lane index (lane mode)
    pub lane: usize,
}

impl CarState {
    pub fn new(config: &Config) -> Self {
        Self {
            x: 0.0,
            tilt: 0.0,
            steer: 0.0,
            lane: config.start_lane(),
        }
    }

    /// Advance one frame. Input only counts while the run is live; the
    /// easing and clamp run regardless so the car settles before start and
    /// after game over.
    pub fn update(&mut self, input: CarInput, running: bool, config: &CarConfig) {
        let steer = if running { input.steer } else { Steer::Neutral };

        let target_angle = match config.steering {
            SteeringMode::Free => {
                match steer {
                    Steer::Left => self.x -= config.steering_speed,
                    Steer::Right => self.x += config.steering_speed,
                    Steer::Neutral => {}
                }
                steer.target_angle(config.tilt_angle)
            }
            SteeringMode::Lanes => {
                if running && input.lane_step != 0 && !config.lanes.is_empty() {
                    let last = config.lanes.len() as i32 - 1;
                    self.lane = (self.lane as i32 + input.lane_step).clamp(0, last) as usize;
                }
                match config.lanes.get(self.lane) {
                    Some(&lane_x) => {
                        self.x = lerp(self.x, lane_x, config.lane_easing);
                        let gap = lane_x - self.x;
                        if gap < -LANE_TILT_DEADZONE {
                            Steer::Left.target_angle(config.tilt_angle)
                        } else if gap > LANE_TILT_DEADZONE {
                            Steer::Right.target_angle(config.tilt_angle)
                        } else {
                            0.0
                        }
                    }
                    None => 0.0,
                }
            }
        };

        self.tilt = lerp(self.tilt, target_angle, config.steer_easing);
        self.steer = lerp(self.steer, target_angle, config.steer_easing);
        self.x = self.x.clamp(-config.max_steer_x, config.max_steer_x);
    }

    /// Model matrix: translate, then rotate (model faces -z after the half
    /// turn), then uniform scale
    pub fn transform(&self, config: &CarConfig) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(config.model_scale),
            self.rotation(),
            Vec3::new(self.x, config.ride_height, 0.0),
        )
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, 0.0, PI + self.tilt, self.steer)
    }
}

/// Chase camera that drifts with the car
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    pub look_at: Vec3,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            eye: Vec3::new(0.0, config.height, config.distance),
            look_at: Vec3::new(0.0, config.look_at_height, config.look_at_forward),
        }
    }

    pub fn follow(&mut self, car_x: f32, config: &CameraConfig) {
        self.eye.x = lerp(self.eye.x, car_x * config.follow_fraction, config.easing);
        self.look_at = Vec3::new(
            car_x * config.look_at_scale,
            config.look_at_height,
            config.look_at_forward,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look_at, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(steer: Steer) -> CarInput {
        CarInput { steer, lane_step: 0 }
    }

    #[test]
    fn test_steer_from_keys() {
        assert_eq!(Steer::from_keys(true, true), Steer::Left);
        assert_eq!(Steer::from_keys(false, true), Steer::Right);
        assert_eq!(Steer::from_keys(false, false), Steer::Neutral);
    }

    #[test]
    fn test_free_steering_moves_fixed_step() {
        let config = Config::default();
        let mut car = CarState::new(&config);
        car.update(input(Steer::Left), true, &config.car);
        assert!((car.x + 0.05).abs() < 1e-6);
        assert!((car.tilt - 0.02).abs() < 1e-6);
        assert!((car.steer - 0.02).abs() < 1e-6);

        car.update(input(Steer::Right), true, &config.car);
        car.update(input(Steer::Right), true, &config.car);
        assert!((car.x - 0.05).abs() < 1e-6);
        assert!(car.tilt < 0.02);
    }

    #[test]
    fn test_input_ignored_until_running() {
        let config = Config::default();
        let mut car = CarState::new(&config);
        car.tilt = 0.2;
        car.update(input(Steer::Left), false, &config.car);
        assert_eq!(car.x, 0.0);
        // Still eases toward neutral
        assert!((car.tilt - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_applies_when_idle() {
        let config = Config::default();
        let mut car = CarState::new(&config);
        car.x = 9.0;
        car.update(CarInput::default(), false, &config.car);
        assert_eq!(car.x, config.car.max_steer_x);
    }

    #[test]
    fn test_lane_hops_and_eases() {
        let mut config = Config::default();
        config.car.steering = SteeringMode::Lanes;
        let mut car = CarState::new(&config);
        assert_eq!(car.lane, 1);

        let hop_left = CarInput { steer: Steer::Neutral, lane_step: -1 };
        car.update(hop_left, true, &config.car);
        assert_eq!(car.lane, 0);
        assert!((car.x + 0.2).abs() < 1e-5); // lerp(0, -4, 0.05)
        assert!(car.tilt > 0.0);

        // Already in the leftmost lane
        car.update(hop_left, true, &config.car);
        assert_eq!(car.lane, 0);

        for _ in 0..400 {
            car.update(CarInput::default(), true, &config.car);
        }
        assert!((car.x + 4.0).abs() < 1e-3);
        assert!(car.tilt.abs() < 1e-3);
    }

    #[test]
    fn test_lane_hop_ignored_when_not_running() {
        let mut config = Config::default();
        config.car.steering = SteeringMode::Lanes;
        let mut car = CarState::new(&config);
        car.update(CarInput { steer: Steer::Neutral, lane_step: 1 }, false, &config.car);
        assert_eq!(car.lane, 1);
    }

    #[test]
    fn test_camera_follows_fraction() {
        let config = Config::default();
        let mut camera = CameraRig::new(&config.camera);
        assert_eq!(camera.eye, Vec3::new(0.0, 5.0, 12.0));
        camera.follow(4.0, &config.camera);
        // lerp(0, 0.4, 0.05)
        assert!((camera.eye.x - 0.02).abs() < 1e-6);
        assert!((camera.look_at.x - 0.2).abs() < 1e-6);
        assert_eq!(camera.look_at.y, 1.0);
        assert_eq!(camera.look_at.z, -10.0);
    }

    #[test]
    fn test_transform_places_car() {
        let config = Config::default();
        let mut car = CarState::new(&config);
        car.x = 2.0;
        let m = car.transform(&config.car);
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(2.0, 0.25, 0.0)).length() < 1e-5);
        // Half turn: model forward (+z) now points down the road (-z)
        let forward = m.transform_vector3(Vec3::Z).normalize();
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_lateral_stays_clamped(
            moves in prop::collection::vec((0u8..3, any::<bool>()), 1..600),
            lanes in any::<bool>(),
        ) {
            let mut config = Config::default();
            if lanes {
                config.car.steering = SteeringMode::Lanes;
            }
            let mut car = CarState::new(&config);
            for (dir, running) in moves {
                let steer = match dir {
                    0 => Steer::Left,
                    1 => Steer::Right,
                    _ => Steer::Neutral,
                };
                let step = match steer {
                    Steer::Left => -1,
                    Steer::Right => 1,
                    Steer::Neutral => 0,
                };
                car.update(CarInput { steer, lane_step: step }, running, &config.car);
                prop_assert!(car.x.abs() <= config.car.max_steer_x);
            }
        }
    }
}
