//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod car;
pub mod collision;
pub mod lifecycle;
pub mod ramp;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use car::{CameraRig, CarInput, CarState, Steer};
pub use collision::{Aabb, bounding_box_of, car_bounding_box, resolve};
pub use spawn::{SpawnDirector, spawn_tick};
pub use state::{
    EndReason, GameEvent, GamePhase, GameSession, GameState, ModelAvailability, Obstacle,
    ObstacleKind, Pickup,
};
pub use tick::{TickInput, tick};
pub use world::{SceneryLayout, WorldSegment, WorldSegmentRecycler, scroll_entities};
