//! Run lifecycle: NotStarted -> Running -> Ended, and restart
//!
//! Transitions that don't apply to the current phase are ignored, so the
//! host can forward raw start/restart key presses without checking first.

use super::state::{EndReason, GameEvent, GamePhase, GameSession, GameState};

impl GameSession {
    /// NotStarted -> Running. Resets the timer and distance.
    pub fn start(&mut self, initial_time: f32) -> Option<GameEvent> {
        if self.phase != GamePhase::NotStarted {
            return None;
        }
        self.phase = GamePhase::Running;
        self.time_remaining = initial_time;
        self.distance = 0.0;
        self.end_reason = None;
        Some(GameEvent::Started)
    }

    /// Running -> Ended. There is no way to end a run that never started.
    pub fn end(&mut self, reason: EndReason) -> Option<GameEvent> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.phase = GamePhase::Ended;
        self.end_reason = Some(reason);
        let final_distance = self.display_distance();
        log::info!("Run ended ({:?}) at {} m", reason, final_distance);
        Some(GameEvent::Ended {
            final_distance,
            reason,
        })
    }
}

impl GameState {
    /// Start the run if it hasn't started yet
    pub fn start(&mut self) -> bool {
        match self.session.start(self.config.score.initial_time) {
            Some(event) => {
                log::info!("Run {} started (seed {})", self.runs, self.seed);
                self.events.push(event);
                true
            }
            None => false,
        }
    }

    /// Ended -> fresh NotStarted -> Running. Every piece of run state is
    /// rebuilt; nothing carries over from the finished run.
    pub fn restart(&mut self) -> bool {
        if self.session.phase != GamePhase::Ended {
            return false;
        }
        self.reinitialize();
        log::info!("Restarting");
        self.start()
    }

    /// End the current run (no-op unless running)
    pub fn end(&mut self, reason: EndReason) -> bool {
        match self.session.end(reason) {
            Some(event) => {
                self.events.push(event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::state::ObstacleKind;

    fn state() -> GameState {
        GameState::new(Config::default(), 21).unwrap()
    }

    #[test]
    fn test_start_transition() {
        let mut state = state();
        state.session.time_remaining = 3.0;
        state.session.distance = 9.0;
        assert!(state.start());
        assert_eq!(state.session.phase, GamePhase::Running);
        assert_eq!(state.session.time_remaining, state.config.score.initial_time);
        assert_eq!(state.session.distance, 0.0);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);

        // Second start is ignored
        assert!(!state.start());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_cannot_end_before_start() {
        let mut state = state();
        assert!(!state.end(EndReason::TimeUp));
        assert_eq!(state.session.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_end_reports_floored_distance() {
        let mut state = state();
        state.start();
        state.session.distance = 12.9;
        state.drain_events();
        assert!(state.end(EndReason::Crashed));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Ended {
                final_distance: 12,
                reason: EndReason::Crashed
            }]
        );
        assert!(!state.end(EndReason::TimeUp));
    }

    #[test]
    fn test_restart_only_from_ended() {
        let mut state = state();
        assert!(!state.restart());
        state.start();
        assert!(!state.restart());
        assert_eq!(state.runs, 0);
    }

    #[test]
    fn test_restart_rebuilds_everything() {
        let mut state = state();
        state.start();
        state.place_obstacle(ObstacleKind::Slow, 1.0, -20.0);
        state.place_pickup(-1.0, -30.0);
        state.session.distance = 77.0;
        state.session.speed_multiplier = 0.9;
        state.car.x = 3.0;
        state.world.advance(40.0);
        state.spawner.timer = 1.2;
        state.end(EndReason::TimeUp);
        state.drain_events();

        assert!(state.restart());
        assert_eq!(state.session.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
        assert_eq!(state.session.distance, 0.0);
        assert_eq!(state.session.speed_multiplier, 0.0);
        assert_eq!(state.session.time_remaining, state.config.score.initial_time);
        assert_eq!(state.car.x, 0.0);
        assert_eq!(state.spawner.timer, 0.0);
        assert_eq!(state.world.segments()[0].z, 5.0);
        assert_eq!(state.runs, 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }
}
