// Input manager - turns window events into input state and edge events

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::state::InputState;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Which surface the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Field,
    Preview,
    Outside,
}

/// Pointer position expressed in both canvases' pixel spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub surface: Surface,
    /// Relative to the play field's top-left corner
    pub field: Vec2,
    /// Relative to the preview's top-left corner
    pub preview: Vec2,
}

/// Edge events the controller reacts to immediately
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary pressed over the play field
    AttackStarted,
    /// Primary released after an attack press
    AttackEnded,
    /// Primary pressed over the preview, at preview coordinates
    DragStarted(Vec2),
    /// Pointer moved while dragging, at preview coordinates
    DragMoved(Vec2),
    DragEnded,
    Reload,
    Quit,
}

/// Main input manager
pub struct InputManager {
    config: InputConfig,
    state: InputState,
    /// Movement keys currently down; several may drive one action
    held: HashSet<InputSource>,
    last_pointer: Option<PointerPosition>,
    dragging: bool,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            state: InputState::new(),
            held: HashSet::new(),
            last_pointer: None,
            dragging: false,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.process_key(code, event.state == ElementState::Pressed, event.repeat)
    }

    /// Process a key transition
    pub fn process_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> Option<InputEvent> {
        let source = InputSource::key(code);
        let action = self.config.action_for(source)?;

        if action.is_movement() {
            if pressed {
                self.held.insert(source);
                self.state.press(action);
            } else {
                self.held.remove(&source);
                let still_held = self
                    .held
                    .iter()
                    .any(|other| self.config.action_for(*other) == Some(action));
                if !still_held {
                    self.state.release(action);
                }
            }
            return None;
        }

        if !pressed || repeat {
            return None;
        }

        match action {
            Action::Reload => Some(InputEvent::Reload),
            Action::Quit => Some(InputEvent::Quit),
            _ => None,
        }
    }

    /// Process pointer motion
    pub fn process_cursor(&mut self, position: PointerPosition) -> Option<InputEvent> {
        self.last_pointer = Some(position);

        if position.surface == Surface::Field {
            self.state.set_pointer(position.field);
        }

        self.dragging
            .then_some(InputEvent::DragMoved(position.preview))
    }

    /// Process a mouse button transition
    pub fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        if self.config.action_for(InputSource::mouse(button)) != Some(Action::Primary) {
            return None;
        }

        match state {
            ElementState::Pressed => {
                let pointer = self.last_pointer?;
                match pointer.surface {
                    Surface::Field => {
                        self.state.set_pointer(pointer.field);
                        self.state.set_attacking(true);
                        Some(InputEvent::AttackStarted)
                    }
                    Surface::Preview => {
                        self.dragging = true;
                        Some(InputEvent::DragStarted(pointer.preview))
                    }
                    Surface::Outside => None,
                }
            }
            // Releasing anywhere ends both gestures
            ElementState::Released => {
                let was_attacking = self.state.attacking();
                let was_dragging = self.dragging;
                self.state.set_attacking(false);
                self.dragging = false;

                if was_attacking {
                    Some(InputEvent::AttackEnded)
                } else if was_dragging {
                    Some(InputEvent::DragEnded)
                } else {
                    None
                }
            }
        }
    }

    /// Latest input flags
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Forget held keys, pointer and gestures
    pub fn reset(&mut self) {
        self.state.reset();
        self.held.clear();
        self.dragging = false;
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::with_defaults())
    }
}
