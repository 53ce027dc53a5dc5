//! Speed ramp from standstill to cruise speed

use super::state::GameSession;
use crate::lerp;

/// Ease the speed multiplier one frame toward 1. Only call while running.
pub fn advance(session: &mut GameSession, ramp_factor: f32) {
    session.speed_multiplier = lerp(session.speed_multiplier, 1.0, ramp_factor);
}

/// Scroll speed for the given multiplier
#[inline]
pub fn current_speed(cruise_speed: f32, speed_multiplier: f32) -> f32 {
    cruise_speed * speed_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_first_steps() {
        let mut session = GameSession::new(60.0);
        advance(&mut session, 0.02);
        assert!((session.speed_multiplier - 0.02).abs() < 1e-7);
        advance(&mut session, 0.02);
        assert!((session.speed_multiplier - 0.0396).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_converges_without_overshoot() {
        let mut session = GameSession::new(60.0);
        for _ in 0..2000 {
            advance(&mut session, 0.02);
            assert!(session.speed_multiplier <= 1.0);
        }
        assert!(session.speed_multiplier > 0.999);
    }

    #[test]
    fn test_ramp_recovers_from_penalty() {
        let mut session = GameSession::new(60.0);
        session.speed_multiplier = 0.05;
        advance(&mut session, 0.5);
        assert!((session.speed_multiplier - 0.525).abs() < 1e-6);
        assert_eq!(current_speed(0.5, 0.5), 0.25);
    }
}
