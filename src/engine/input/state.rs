// Live input flags read by every tick

use super::action::Action;
use glam::{IVec2, Vec2};
use std::collections::HashSet;

/// Input state for the single playable entity
///
/// Events mutate this between ticks; each tick reads the latest values.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Movement actions currently held
    pressed: HashSet<Action>,

    /// Last pointer position over the play field
    pointer: Vec2,

    /// Primary button held after being pressed over the play field
    attacking: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Movement axes: `x = right - left`, `y = down - up`, each in {-1, 0, 1}
    pub fn axes(&self) -> IVec2 {
        let axis = |negative: Action, positive: Action| {
            i32::from(self.is_pressed(positive)) - i32::from(self.is_pressed(negative))
        };

        IVec2::new(
            axis(Action::MoveLeft, Action::MoveRight),
            axis(Action::MoveUp, Action::MoveDown),
        )
    }

    /// Pointer position in play field pixels
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = position;
    }

    pub fn attacking(&self) -> bool {
        self.attacking
    }

    pub fn set_attacking(&mut self, attacking: bool) {
        self.attacking = attacking;
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.pointer = Vec2::ZERO;
        self.attacking = false;
    }
}
