// Input handling system
//
// Keyboard and mouse input for the single playable entity and the preview.
//
// ## Architecture
//
// - `action`: actions and default key bindings
// - `config`: rebindable binding table
// - `state`: held movement keys, aim pointer and the attacking flag
// - `manager`: translates winit events into state changes and edge events
//
// Events mutate `InputState` between ticks; the tick only reads it.

pub mod action;
pub mod config;
pub mod manager;
pub mod state;

// Re-export commonly used types
pub use action::Action;
pub use config::InputConfig;
pub use manager::{InputEvent, InputManager, PointerPosition, Surface};
pub use state::InputState;
