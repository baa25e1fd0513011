//! Input collaborator interface
//!
//! Movement and fire are polled every frame; pause and restart arrive as
//! edge-triggered callbacks and are latched until the next frame consumes them.

use crate::sim::TickInput;

/// Logical actions the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
}

/// Polled input (keyboard, gamepad, scripted)
pub trait InputSource {
    fn is_pressed(&self, action: Action) -> bool;
}

/// Holds edge-triggered requests between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    pause: bool,
    restart: bool,
}

impl InputLatch {
    /// Callback for the pause key
    pub fn on_pause(&mut self) {
        self.pause = true;
    }

    /// Callback for the restart key
    pub fn on_restart(&mut self) {
        self.restart = true;
    }

    /// Build this frame's input and clear the latched edges
    pub fn capture(&mut self, source: &impl InputSource) -> TickInput {
        let axis = |neg: Action, pos: Action| {
            let mut v = 0.0;
            if source.is_pressed(neg) {
                v -= 1.0;
            }
            if source.is_pressed(pos) {
                v += 1.0;
            }
            v
        };

        let input = TickInput {
            move_x: axis(Action::MoveLeft, Action::MoveRight),
            move_y: axis(Action::MoveDown, Action::MoveUp),
            fire: source.is_pressed(Action::Fire),
            pause: self.pause,
            restart: self.restart,
        };
        self.pause = false;
        self.restart = false;
        input
    }
}
