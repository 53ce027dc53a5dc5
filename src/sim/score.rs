//! Countdown timer and distance score

use super::state::{EndReason, GameEvent, GameSession};
use crate::config::ScoreConfig;

impl GameSession {
    /// Whole metres shown on the HUD
    pub fn display_distance(&self) -> u32 {
        self.distance.max(0.0).floor() as u32
    }

    /// Whole seconds shown on the HUD (rounded up, so 0 only at the end)
    pub fn display_time(&self) -> u32 {
        self.time_remaining.max(0.0).ceil() as u32
    }
}

/// Count down and accrue distance for one frame. Only call while running.
/// Returns the end event when the timer runs out.
pub fn tick(session: &mut GameSession, dt: f32, config: &ScoreConfig) -> Option<GameEvent> {
    session.distance += config.meters_per_second * session.speed_multiplier * dt;
    session.time_remaining -= dt;
    if session.time_remaining <= 0.0 {
        session.time_remaining = 0.0;
        return session.end(EndReason::TimeUp);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn running(time: f32) -> GameSession {
        let mut session = GameSession::new(time);
        session.start(time);
        session
    }

    #[test]
    fn test_distance_scales_with_multiplier() {
        let config = ScoreConfig::default();
        let mut session = running(60.0);
        session.speed_multiplier = 0.5;
        assert!(tick(&mut session, 1.0, &config).is_none());
        assert_eq!(session.distance, 15.0);
        assert_eq!(session.time_remaining, 59.0);
    }

    #[test]
    fn test_timer_expiry_clamps_and_ends() {
        let config = ScoreConfig::default();
        let mut session = running(1.5);
        assert!(tick(&mut session, 1.0, &config).is_none());
        let event = tick(&mut session, 1.0, &config);
        assert_eq!(session.time_remaining, 0.0);
        assert_eq!(session.phase, GamePhase::Ended);
        assert!(matches!(event, Some(GameEvent::Ended { reason: EndReason::TimeUp, .. })));
    }

    #[test]
    fn test_display_rounding() {
        let mut session = running(60.0);
        session.time_remaining = 4.2;
        session.distance = 99.99;
        assert_eq!(session.display_time(), 5);
        assert_eq!(session.display_distance(), 99);
        session.time_remaining = 0.0;
        assert_eq!(session.display_time(), 0);
    }
}
