//! Logical key state
//!
//! The host forwards raw key-down/key-up events by key name; this module
//! turns them into held flags plus per-frame press edges.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Start,
    Restart,
}

impl Key {
    /// Map a browser-style key name (`KeyboardEvent.key`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            _ => match name.to_lowercase().as_str() {
                "a" => Some(Key::Left),
                "d" => Some(Key::Right),
                "j" => Some(Key::Start),
                "r" => Some(Key::Restart),
                _ => None,
            },
        }
    }

    fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Start => 2,
            Key::Restart => 3,
        }
    }
}

/// Held keys and presses since the last frame
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: [bool; 4],
    pressed: [bool; 4],
    /// Let the autopilot drive
    pub idle_mode: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for names the game doesn't use
    pub fn key_down(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };
        let i = key.index();
        // Auto-repeat keeps sending key-down while held; only the first counts
        if !self.held[i] {
            self.pressed[i] = true;
        }
        self.held[i] = true;
        true
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };
        self.held[key.index()] = false;
        true
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.held = [false; 4];
        self.pressed = [false; 4];
    }

    /// Build this frame's input and consume the press edges
    pub fn frame_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.held[Key::Left.index()],
            right: self.held[Key::Right.index()],
            left_pressed: self.pressed[Key::Left.index()],
            right_pressed: self.pressed[Key::Right.index()],
            start: self.pressed[Key::Start.index()],
            restart: self.pressed[Key::Restart.index()],
            idle_mode: self.idle_mode,
        };
        self.pressed = [false; 4];
        input
    }
}
