//! Values exposed to the HUD
//!
//! The host redraws its dashboard from a snapshot each frame and reacts to
//! `GameEvent`s for phase changes.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState};

/// Integer HUD readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    /// Seconds left, rounded up
    pub time_remaining: u32,
    /// Metres travelled, rounded down
    pub distance: u32,
    pub speed_kmh: u32,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let speed_kmh = (state.current_speed() * state.config.score.speed_kmh_factor)
            .max(0.0)
            .floor() as u32;
        Self {
            phase: state.session.phase,
            time_remaining: state.session.display_time(),
            distance: state.session.display_distance(),
            speed_kmh,
        }
    }

    /// Dashboard line for console hosts
    pub fn status_line(&self) -> String {
        format!(
            "{:?} | time {:>3}s | {:>6} m | {:>3} km/h",
            self.phase, self.time_remaining, self.distance, self.speed_kmh
        )
    }
}
