//! Per-frame simulation step
//!
//! One call per display refresh. Ordering within a frame is fixed:
//! lifecycle signals, car, then (while running) ramp, world, spawner and
//! timer, and collision resolution last.

use super::car::{CarInput, Steer};
use super::collision;
use super::ramp;
use super::score;
use super::spawn;
use super::state::{GamePhase, GameState, ObstacleKind};
use super::world;
use crate::config::SteeringMode;

/// How far down the road the autopilot looks for death obstacles
const AUTOPILOT_LOOKAHEAD: f32 = 60.0;
/// Lateral clearance the autopilot keeps from death obstacles
const AUTOPILOT_CLEARANCE: f32 = 2.5;

/// Input for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Steer left / right is held
    pub left: bool,
    pub right: bool,
    /// Steer keys went down this frame (lane hops)
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Start key went down this frame
    pub start: bool,
    /// Restart key went down this frame
    pub restart: bool,
    /// Idle/demo mode - autopilot drives
    pub idle_mode: bool,
}

impl TickInput {
    fn car_input(&self) -> CarInput {
        let lane_step = i32::from(self.right_pressed) - i32::from(self.left_pressed);
        CarInput {
            steer: Steer::from_keys(self.left, self.right),
            lane_step,
        }
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    // Lifecycle signals
    if input.restart {
        state.restart();
    }
    if input.start {
        state.start();
    }

    let running = state.session.is_running();

    // Car easing and clamp run in every phase
    state.car.update(input.car_input(), running, &state.config.car);
    state.camera.follow(state.car.x, &state.config.camera);

    if !running {
        return;
    }

    ramp::advance(&mut state.session, state.config.score.ramp_factor);
    let speed = state.current_speed();
    state.world.advance(speed);
    world::scroll_entities(&mut state.obstacles, &mut state.pickups, speed);
    spawn::spawn_tick(state, dt);
    if let Some(event) = score::tick(&mut state.session, dt, &state.config.score) {
        state.events.push(event);
    }

    // If the timer just ran out this still prunes, but nothing can hit
    let events = collision::resolve(
        &state.car,
        &mut state.obstacles,
        &mut state.pickups,
        &mut state.session,
        &state.config,
    );
    state.events.extend(events);
}

/// Demo driver: keeps a run going on its own, chasing pickups and dodging
/// death obstacles
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    match state.session.phase {
        GamePhase::NotStarted => input.start = true,
        GamePhase::Ended => input.restart = true,
        GamePhase::Running => {}
    }

    let car_x = state.car.x;
    let max_x = state.config.car.max_steer_x;

    // Nearest death obstacle ahead that is close to our line
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Death)
        .filter(|o| o.z < 0.0 && o.z > -AUTOPILOT_LOOKAHEAD)
        .filter(|o| (o.x - car_x).abs() < AUTOPILOT_CLEARANCE)
        .max_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal));

    let target_x = if let Some(threat) = threat {
        // Dodge toward whichever side has more room
        let left_room = (threat.x - AUTOPILOT_CLEARANCE) + max_x;
        let right_room = max_x - (threat.x + AUTOPILOT_CLEARANCE);
        if left_room > right_room {
            threat.x - AUTOPILOT_CLEARANCE
        } else {
            threat.x + AUTOPILOT_CLEARANCE
        }
    } else {
        // Road is clear - go for the closest pickup ahead
        state
            .pickups
            .iter()
            .filter(|p| p.z < 0.0)
            .max_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal))
            .map(|p| p.x)
            .unwrap_or(car_x)
    };
    let target_x = target_x.clamp(-max_x, max_x);

    match state.config.car.steering {
        SteeringMode::Free => {
            let gap = target_x - car_x;
            if gap < -state.config.car.steering_speed {
                input.left = true;
            } else if gap > state.config.car.steering_speed {
                input.right = true;
            }
        }
        SteeringMode::Lanes => {
            let lanes = &state.config.car.lanes;
            let wanted = lanes
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    (*a - target_x)
                        .abs()
                        .partial_cmp(&(*b - target_x).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
                .unwrap_or(state.car.lane);
            if wanted < state.car.lane {
                input.left_pressed = true;
            } else if wanted > state.car.lane {
                input.right_pressed = true;
            }
        }
    }

    input
}
