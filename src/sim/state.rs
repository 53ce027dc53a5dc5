//! Game state and core simulation types
//!
//! `GameState` is the single owned aggregate the frame driver holds. Nothing
//! in the simulation lives outside it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::car::{CameraRig, CarState};
use super::spawn::SpawnDirector;
use super::world::WorldSegmentRecycler;
use crate::config::Config;
use crate::error::Result;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Car idles on the road, waiting for the start key
    #[default]
    NotStarted,
    /// World scrolls, timer counts down
    Running,
    /// Run finished; only a restart leaves this phase
    Ended,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    Crashed,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Knocks the speed multiplier down to near zero
    Slow,
    /// Ends the run
    Death,
}

/// An obstacle on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub z: f32,
    pub scale: f32,
    /// Rotation about Y (radians)
    pub yaw: f32,
}

/// A time-bonus pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u32,
    pub x: f32,
    pub z: f32,
}

/// Which optional models the scene backend managed to load.
///
/// A spawn whose model is missing is skipped for that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAvailability {
    pub slow_obstacle: bool,
    pub death_obstacle: bool,
    pub pickup: bool,
}

impl Default for ModelAvailability {
    fn default() -> Self {
        Self {
            slow_obstacle: true,
            death_obstacle: true,
            pickup: true,
        }
    }
}

impl ModelAvailability {
    pub fn obstacle(&self, kind: ObstacleKind) -> bool {
        match kind {
            ObstacleKind::Slow => self.slow_obstacle,
            ObstacleKind::Death => self.death_obstacle,
        }
    }
}

/// Per-run session values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub time_remaining: f32,
    pub distance: f32,
    /// Eased 0 -> 1 fraction of cruise speed
    pub speed_multiplier: f32,
    pub end_reason: Option<EndReason>,
}

impl GameSession {
    pub fn new(initial_time: f32) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            time_remaining: initial_time,
            distance: 0.0,
            speed_multiplier: 0.0,
            end_reason: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

/// Events produced during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started,
    Ended { final_distance: u32, reason: EndReason },
    Slowed { obstacle_id: u32 },
    PickupCollected { pickup_id: u32, bonus: f32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    /// Seed of the current run
    pub seed: u64,
    /// Runs started since construction (restart reseeds with seed + runs)
    pub runs: u64,
    pub rng: Pcg32,
    pub session: GameSession,
    pub car: CarState,
    pub camera: CameraRig,
    pub world: WorldSegmentRecycler,
    pub spawner: SpawnDirector,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Active pickups (spawn order)
    pub pickups: Vec<Pickup>,
    pub models: ModelAvailability,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Validate `config` and build a fresh, not-started session
    pub fn new(config: Config, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::fresh(config, seed, 0, ModelAvailability::default()))
    }

    fn fresh(config: Config, seed: u64, runs: u64, models: ModelAvailability) -> Self {
        Self {
            seed,
            runs,
            rng: Pcg32::seed_from_u64(seed),
            session: GameSession::new(config.score.initial_time),
            car: CarState::new(&config),
            camera: CameraRig::new(&config.camera),
            world: WorldSegmentRecycler::new(&config.world),
            spawner: SpawnDirector::default(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            models,
            events: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Throw away every piece of run state, keeping config, model
    /// availability and undrained events
    pub(crate) fn reinitialize(&mut self) {
        let runs = self.runs + 1;
        let seed = self.seed.wrapping_add(1);
        let events = std::mem::take(&mut self.events);
        *self = Self::fresh(self.config.clone(), seed, runs, self.models);
        self.events = events;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Scroll speed for this frame
    pub fn current_speed(&self) -> f32 {
        super::ramp::current_speed(self.config.world.cruise_speed, self.session.speed_multiplier)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place an obstacle directly (hosts scripting a scene, tests)
    pub fn place_obstacle(&mut self, kind: ObstacleKind, x: f32, z: f32) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            kind,
            x,
            z,
            scale: 1.0,
            yaw: 0.0,
        });
        id
    }

    /// Place a pickup directly (hosts scripting a scene, tests)
    pub fn place_pickup(&mut self, x: f32, z: f32) -> u32 {
        let id = self.next_entity_id();
        self.pickups.push(Pickup { id, x, z });
        id
    }
}
